//! Integration tests for the `roadtrip` binary.
//!
//! These tests use `assert_cmd` to verify:
//! - distance, route and check output in text and JSON
//! - exit codes for unknown and invalid countries
//! - the interactive prompt loop driven through stdin
//! - dataset location flags and missing files

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// `roadtrip` pointed at the fixture world with colors disabled.
fn roadtrip() -> Command {
    let mut cmd = Command::cargo_bin("roadtrip").expect("binary exists");
    cmd.env("NO_COLOR", "1")
        .env_remove("ROADTRIP_DATA_DIR")
        .arg("--data-dir")
        .arg(fixtures_dir());
    cmd
}

/// Temporary copy of the fixture files, so tests can break them.
struct TestEnv {
    _temp_dir: TempDir,
    data_dir: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let data_dir = temp_dir.path().to_path_buf();
        for file in ["borders.txt", "capdist.csv", "state_name.tsv"] {
            fs::copy(fixtures_dir().join(file), data_dir.join(file)).expect("copy fixture");
        }
        Self {
            _temp_dir: temp_dir,
            data_dir,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("roadtrip").expect("binary exists");
        cmd.env("NO_COLOR", "1").env("ROADTRIP_DATA_DIR", &self.data_dir);
        cmd
    }
}

// =============================================================================
// route
// =============================================================================

#[test]
fn route_prints_hops_and_total() {
    roadtrip()
        .args(["route", "Andorra", "Spain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Route from Andorra to Spain:"))
        .stdout(predicate::str::contains("* andorra --> spain (200 km.)"))
        .stdout(predicate::str::contains("Total: 200 km over 1 border crossing"));
}

#[test]
fn route_prefers_shorter_detour() {
    roadtrip()
        .args(["route", "spain", "france"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "* spain --> andorra (200 km.)\n* andorra --> france (150 km.)\n",
        ));
}

#[test]
fn route_without_path_still_succeeds() {
    roadtrip()
        .args(["route", "iceland", "france"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No valid path found."));
}

#[test]
fn route_accepts_aliases_in_any_case() {
    roadtrip()
        .args(["route", "  TURKIYE ", "greece"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* turkey --> greece (192 km.)"));
}

#[test]
fn route_unknown_country_fails_with_suggestion() {
    roadtrip()
        .args(["route", "Portgual", "spain"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown country name: Portgual"))
        .stderr(predicate::str::contains("portugal"));
}

#[test]
fn route_json_output() {
    let output = roadtrip()
        .args(["--format", "json", "route", "portugal", "netherlands"])
        .output()
        .expect("run roadtrip");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["route"]["total_km"], 2557);
    assert_eq!(value["route"]["hops"].as_array().map(Vec::len), Some(5));
    assert_eq!(value["route"]["hops"][0]["from"], "portugal");
}

#[test]
fn fallback_policy_flag_changes_the_graph() {
    roadtrip()
        .args(["route", "switzerland", "liechtenstein"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "* switzerland --> liechtenstein (175 km.)\n",
        ))
        .stdout(predicate::str::contains(
            "Note: Capital-to-capital distance used for: switzerland --> liechtenstein",
        ));

    roadtrip()
        .args(["--fallback", "drop", "route", "switzerland", "liechtenstein"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No valid path found."));
}

#[test]
fn alias_flag_adds_a_spelling() {
    roadtrip()
        .args(["--alias", "Hellas=Greece", "route", "hellas", "turkey"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* greece --> turkey (192 km.)"));
}

#[test]
fn malformed_alias_flag_is_rejected() {
    roadtrip()
        .args(["--alias", "Hellas", "check", "greece"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NAME=CANONICAL"));
}

// =============================================================================
// distance
// =============================================================================

#[test]
fn distance_prints_capital_distance() {
    roadtrip()
        .args(["distance", "andorra", "FRANCE"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("708 km"));
}

#[test]
fn distance_missing_pair_is_not_an_error() {
    roadtrip()
        .args(["distance", "belgium", "germany"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No direct distance recorded"));
}

#[test]
fn distance_json_output() {
    let output = roadtrip()
        .args(["distance", "uk", "iceland", "--format", "json"])
        .output()
        .expect("run roadtrip");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["distance_km"], 1891);
}

#[test]
fn distance_unknown_country_fails() {
    roadtrip()
        .args(["distance", "narnia", "spain"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown country name"));
}

// =============================================================================
// check
// =============================================================================

#[test]
fn check_valid_country() {
    roadtrip()
        .args(["check", "Gibraltar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gibraltar is a valid country"));
}

#[test]
fn check_invalid_country_exits_with_one() {
    roadtrip()
        .args(["check", "Germny"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Germny is not a valid country"))
        .stdout(predicate::str::contains("germany"));
}

// =============================================================================
// interactive
// =============================================================================

#[test]
fn interactive_is_the_default_command() {
    roadtrip()
        .write_stdin("andorra\nspain\nEXIT\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Enter the name of the first country (type EXIT to quit):",
        ))
        .stdout(predicate::str::contains("* andorra --> spain (200 km.)"));
}

#[test]
fn interactive_reprompts_on_invalid_names() {
    roadtrip()
        .arg("interactive")
        .write_stdin("atlantiss\nportugal\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Invalid country name. Please enter a valid country name.",
        ))
        .stdout(predicate::str::contains("Enter the name of the second country"));
}

// =============================================================================
// dataset location
// =============================================================================

#[test]
fn data_dir_comes_from_the_environment() {
    let env = TestEnv::new();
    env.command()
        .args(["check", "portugal"])
        .assert()
        .success();
}

#[test]
fn missing_dataset_file_aborts_before_queries() {
    let env = TestEnv::new();
    fs::remove_file(env.data_dir.join("state_name.tsv")).expect("remove registry");
    env.command()
        .args(["check", "portugal"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load country datasets"));
}

#[test]
fn per_file_override_is_used() {
    let env = TestEnv::new();
    let renamed = env.data_dir.join("world.txt");
    fs::rename(env.data_dir.join("borders.txt"), &renamed).expect("rename borders");
    env.command()
        .arg("--borders")
        .arg(&renamed)
        .args(["route", "andorra", "france"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* andorra --> france (150 km.)"));
}
