use super::RawPlayRecord;
use crate::error::{Result, StatsError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Default file name prefix of the music part of a streaming-history export.
pub const DEFAULT_FILE_PREFIX: &str = "StreamingHistory_music";

#[derive(Debug, Clone)]
pub struct HistoryLoader {
    file_prefix: String,
}

impl HistoryLoader {
    pub fn new(file_prefix: impl Into<String>) -> Self {
        Self {
            file_prefix: file_prefix.into(),
        }
    }

    /// Finds `<prefix>*.json` files directly inside `dir`, sorted by file name so
    /// `_0`, `_1`, ... are read in export order.
    pub fn discover<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(StatsError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("data folder {} does not exist", dir.display()),
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && self.is_history_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        info!("Found {} streaming history files", files.len());
        Ok(files)
    }

    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<RawPlayRecord>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let records: Vec<RawPlayRecord> =
            serde_json::from_str(&content).map_err(|source| StatsError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        if records.is_empty() {
            warn!("{} contains no streams", path.display());
        } else {
            debug!("Read {} streams from {}", records.len(), path.display());
        }

        Ok(records)
    }

    /// Reads every history file in `dir`, concatenated in file order.
    pub fn load_dir<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<RawPlayRecord>> {
        let mut all_records = Vec::new();
        for file in self.discover(dir)? {
            let mut records = self.load_file(&file)?;
            all_records.append(&mut records);
        }
        Ok(all_records)
    }

    fn is_history_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.starts_with(&self.file_prefix) && n.ends_with(".json"))
    }
}

impl Default for HistoryLoader {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_PREFIX)
    }
}
