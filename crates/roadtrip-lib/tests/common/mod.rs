//! Shared fixture helpers for integration tests.

use std::path::PathBuf;

use roadtrip_lib::{BuildOptions, DatasetPaths, LoadReport, RoadTrip};

/// Directory holding the small hand-made world used by the tests.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

#[allow(dead_code)]
pub fn fixture_paths() -> DatasetPaths {
    DatasetPaths::in_dir(&fixtures_dir())
}

/// Load the fixture world with the given build options.
#[allow(dead_code)]
pub fn load_with(options: &BuildOptions) -> (RoadTrip, LoadReport) {
    RoadTrip::load(&fixture_paths(), options).expect("fixture loads")
}

#[allow(dead_code)]
pub fn load_fixture() -> RoadTrip {
    load_with(&BuildOptions::default()).0
}
