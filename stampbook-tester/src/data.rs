use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use stampbook_engine::constants::{
    BUNDLED_COURSES_JSON, BUNDLED_STAMPS_JSON, BUNDLED_UNLOCKABLES_JSON,
};
use stampbook_engine::{CourseSet, PlayerStatistics, StampCatalog, UnlockableCatalog};

pub const COURSES_FILE: &str = "courses.json";
pub const STAMPS_FILE: &str = "stamps.json";
pub const UNLOCKABLES_FILE: &str = "unlockables.json";

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {label}: {source}")]
    Parse {
        label: String,
        source: serde_json::Error,
    },
}

/// Raw data as authored. Nothing here has been checked yet, so every problem
/// can be reported instead of only the first.
#[derive(Debug, Clone)]
pub struct DataSet {
    pub source: String,
    pub courses: CourseSet,
    pub stamps: StampCatalog,
    pub unlockables: UnlockableCatalog,
}

impl DataSet {
    /// Data compiled into the engine crate.
    pub fn bundled() -> Result<Self, DataError> {
        Ok(Self {
            source: "bundled".to_string(),
            courses: parse(BUNDLED_COURSES_JSON, COURSES_FILE)?,
            stamps: parse(BUNDLED_STAMPS_JSON, STAMPS_FILE)?,
            unlockables: parse(BUNDLED_UNLOCKABLES_JSON, UNLOCKABLES_FILE)?,
        })
    }

    /// Data from `dir`. Files missing from the directory fall back to the
    /// bundled copies.
    pub fn from_dir(dir: &Path) -> Result<Self, DataError> {
        Ok(Self {
            source: dir.display().to_string(),
            courses: load_or_bundled(dir, COURSES_FILE, BUNDLED_COURSES_JSON)?,
            stamps: load_or_bundled(dir, STAMPS_FILE, BUNDLED_STAMPS_JSON)?,
            unlockables: load_or_bundled(dir, UNLOCKABLES_FILE, BUNDLED_UNLOCKABLES_JSON)?,
        })
    }
}

fn load_or_bundled<T: DeserializeOwned>(
    dir: &Path,
    file: &str,
    bundled: &str,
) -> Result<T, DataError> {
    let path = dir.join(file);
    if !path.exists() {
        log::info!("{} not found, using bundled {file}", path.display());
        return parse(bundled, file);
    }
    read_json(&path)
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let json = fs::read_to_string(path).map_err(|source| DataError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&json, &path.display().to_string())
}

fn parse<T: DeserializeOwned>(json: &str, label: &str) -> Result<T, DataError> {
    serde_json::from_str(json).map_err(|source| DataError::Parse {
        label: label.to_string(),
        source,
    })
}

pub fn read_statistics(path: &Path) -> Result<PlayerStatistics, DataError> {
    read_json(path)
}

/// A JSON array of ids.
pub fn read_id_set(path: &Path) -> Result<BTreeSet<String>, DataError> {
    read_json(path)
}
