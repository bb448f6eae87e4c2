// Export module - writes a finished report as a structured JSON payload
// Same rows the console sees, so other tools don't have to scrape the tables

use crate::analysis::AnalysisReport;
use crate::error::{Result, StatsError};
use std::fs;
use std::path::Path;
use tracing::info;

pub struct ExportManager;

impl ExportManager {
    pub fn new() -> Self {
        Self
    }

    pub fn to_json_string(&self, report: &AnalysisReport) -> serde_json::Result<String> {
        serde_json::to_string_pretty(report)
    }

    pub fn export_to_json<P: AsRef<Path>>(&self, report: &AnalysisReport, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json_string(report).map_err(|source| StatsError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, json)?;

        info!("Exported report to {}", path.display());
        Ok(())
    }
}

impl Default for ExportManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analyzer;
    use crate::config::{AnalysisConfig, ReportConfig};
    use crate::history::EventStore;
    use tempfile::TempDir;

    #[test]
    fn test_export_writes_parseable_json() {
        let report = Analyzer::new(AnalysisConfig::default(), ReportConfig::default())
            .unwrap()
            .run(&EventStore::default());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("report.json");
        ExportManager::new().export_to_json(&report, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["rankings"].as_array().unwrap().len(), 5);
        assert_eq!(value["rankings"][0]["kind"], "play_count");
    }
}
