use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::error::{Error, Result};
use crate::sources::SourceKind;

/// Default filename for the border adjacency list.
pub const BORDERS_FILENAME: &str = "borders.txt";
/// Default filename for the capital distance table.
pub const CAPDIST_FILENAME: &str = "capdist.csv";
/// Default filename for the country code registry.
pub const REGISTRY_FILENAME: &str = "state_name.tsv";
/// Environment variable overriding the dataset directory.
pub const DATA_DIR_ENV: &str = "ROADTRIP_DATA_DIR";

/// Paths to the three dataset files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub borders: PathBuf,
    pub capdist: PathBuf,
    pub registry: PathBuf,
}

impl DatasetPaths {
    /// Paths for the default file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            borders: dir.join(BORDERS_FILENAME),
            capdist: dir.join(CAPDIST_FILENAME),
            registry: dir.join(REGISTRY_FILENAME),
        }
    }

    /// Open all three files, failing on the first one that is missing.
    pub(crate) fn open(&self) -> Result<(File, File, File)> {
        Ok((
            open_source(SourceKind::Borders, &self.borders)?,
            open_source(SourceKind::CapitalDistances, &self.capdist)?,
            open_source(SourceKind::Registry, &self.registry)?,
        ))
    }
}

/// Resolve the default dataset location using platform-specific project directories.
pub fn default_data_dir() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("com", "roadtrip", "roadtrip").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Resolve the dataset directory.
///
/// The resolution order is:
/// 1. Explicit `target` argument when provided.
/// 2. `ROADTRIP_DATA_DIR` environment variable.
/// 3. Platform-specific project data directory.
pub fn resolve_data_dir(target: Option<&Path>) -> Result<PathBuf> {
    if let Some(explicit) = target {
        return Ok(explicit.to_path_buf());
    }

    if let Some(env_path) = env::var_os(DATA_DIR_ENV) {
        debug!(path = ?env_path, "using dataset directory from environment");
        return Ok(PathBuf::from(env_path));
    }

    default_data_dir()
}

fn open_source(source_kind: SourceKind, path: &Path) -> Result<File> {
    if !path.is_file() {
        return Err(Error::SourceNotFound {
            source_kind,
            path: path.to_path_buf(),
        });
    }
    debug!(source = %source_kind, path = %path.display(), "opening dataset source");
    Ok(File::open(path)?)
}
