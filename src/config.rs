use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "SCHOLARSHIP_DATA_DIR";
pub const DEFAULT_DATA_DIR: &str = "data";

const CATALOGUE_FILE: &str = "scholarships.csv";
const ENRICHED_FILE: &str = "scholarships_enriched.csv";
const SUMMARY_FILE: &str = "summary.json";

/// Locations of the three pipeline files under one data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub data_dir: PathBuf,
}

impl DataPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Explicit flag first, then the environment, then `./data`.
    pub fn resolve(flag: Option<PathBuf>) -> Self {
        let data_dir = flag
            .or_else(|| {
                std::env::var(DATA_DIR_ENV)
                    .ok()
                    .filter(|value| !value.trim().is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        Self::new(data_dir)
    }

    pub fn catalogue(&self) -> PathBuf {
        self.data_dir.join(CATALOGUE_FILE)
    }

    pub fn enriched(&self) -> PathBuf {
        self.data_dir.join(ENRICHED_FILE)
    }

    pub fn summary(&self) -> PathBuf {
        self.data_dir.join(SUMMARY_FILE)
    }

    pub fn dir(&self) -> &Path {
        &self.data_dir
    }
}
