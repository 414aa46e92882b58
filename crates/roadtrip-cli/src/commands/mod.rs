// Module exports for CLI subcommands
//
// Each module handles one subcommand. main.rs parses arguments, loads the
// datasets once through `load_road_trip`, then dispatches to these handlers.

pub mod check;
pub mod distance;
pub mod interactive;
pub mod route;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};

use roadtrip_lib::{
    resolve_data_dir, AliasOverride, BuildOptions, DatasetPaths, FallbackPolicy, RoadTrip,
};

/// Dataset location and graph construction flags shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct DatasetArgs {
    /// Directory holding borders.txt, capdist.csv and state_name.tsv.
    #[arg(long, global = true, env = "ROADTRIP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the border list path.
    #[arg(long, global = true, value_name = "PATH")]
    pub borders: Option<PathBuf>,

    /// Override the capital distance table path.
    #[arg(long, global = true, value_name = "PATH")]
    pub capdist: Option<PathBuf>,

    /// Override the country code registry path.
    #[arg(long, global = true, value_name = "PATH")]
    pub registry: Option<PathBuf>,

    /// How to weight borders that have no recorded length
    /// (capital-or-drop, capital-or-zero, zero, drop).
    #[arg(long, global = true, default_value_t = FallbackPolicy::default())]
    pub fallback: FallbackPolicy,

    /// Extra spelling for a country; may be repeated.
    #[arg(long = "alias", global = true, value_name = "NAME=CANONICAL")]
    pub aliases: Vec<AliasOverride>,
}

impl DatasetArgs {
    /// Resolve the three dataset paths, applying per-file overrides.
    pub fn dataset_paths(&self) -> Result<DatasetPaths> {
        let dir = resolve_data_dir(self.data_dir.as_deref())
            .context("failed to resolve the dataset directory")?;
        let mut paths = DatasetPaths::in_dir(&dir);
        if let Some(borders) = &self.borders {
            paths.borders = borders.clone();
        }
        if let Some(capdist) = &self.capdist {
            paths.capdist = capdist.clone();
        }
        if let Some(registry) = &self.registry {
            paths.registry = registry.clone();
        }
        Ok(paths)
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            fallback: self.fallback,
            aliases: self.aliases.clone(),
        }
    }
}

/// Load the datasets and build the route engine.
///
/// Record-level problems are logged and skipped; only a missing or unreadable
/// file aborts.
pub fn load_road_trip(args: &DatasetArgs) -> Result<RoadTrip> {
    let paths = args.dataset_paths()?;
    let (trip, report) = RoadTrip::load(&paths, &args.build_options()).with_context(|| {
        format!(
            "failed to load country datasets ({}, {}, {})",
            paths.borders.display(),
            paths.capdist.display(),
            paths.registry.display()
        )
    })?;

    for issue in &report.issues {
        debug!(%issue, "dataset issue");
    }
    if !report.is_clean() {
        info!(
            issues = report.issues.len(),
            "dataset loaded with skipped records; run with RUST_LOG=debug for details"
        );
    }
    Ok(trip)
}
