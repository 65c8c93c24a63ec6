//! Dashboard state built once at startup
//!
//! The server runs the pipeline exactly once, before it binds a socket, and
//! shares the result read-only with every request through an `Arc`.

use std::io::Cursor;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use cpg_common::checksum::{sha256_bytes, verify_sha256};
use cpg_common::CpgError;
use cpg_pipeline::{pipeline, DataSource, Dataset, LoadOptions};
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, ServerResult};
use crate::recommendations::{Recommendation, RECOMMENDATIONS};

/// Handle given to every route handler
pub type SharedState = Arc<DashboardState>;

/// Provenance of the loaded data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub name: String,
    /// Hex SHA-256 of the data file, absent for in-memory sources
    pub sha256: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

/// Immutable dashboard data
#[derive(Debug)]
pub struct DashboardState {
    pub title: String,
    pub dataset: Dataset,
    pub source: SourceInfo,
    pub recommendations: &'static [Recommendation],
    pub table_page_size: usize,
}

impl DashboardState {
    /// Fingerprint, load and aggregate the configured data file.
    ///
    /// The file is read once; the digest and the parsed records come from the
    /// same bytes. Blocking; call from `spawn_blocking` inside a runtime.
    pub fn build(config: &Config) -> ServerResult<Self> {
        let path = &config.data.path;
        let name = path.display().to_string();

        let bytes = std::fs::read(path).map_err(CpgError::from)?;
        let sha256 = match config.data.expected_sha256 {
            Some(ref expected) => verify_sha256(&bytes, expected)?,
            None => sha256_bytes(&bytes),
        };
        info!(path = %name, %sha256, size = bytes.len(), "Fingerprinted sales data");

        let options = LoadOptions::with_delimiter(config.data.delimiter)
            .map_err(|e| AppError::Config(e.to_string()))?;
        let dataset = pipeline::run(DataSource::reader(name.clone(), Cursor::new(bytes)), &options)?;

        let source = SourceInfo {
            name,
            sha256: Some(sha256),
            loaded_at: Utc::now(),
        };

        Ok(Self::from_dataset(config, dataset, source))
    }

    /// Wrap an already-built dataset
    pub fn from_dataset(config: &Config, dataset: Dataset, source: SourceInfo) -> Self {
        Self {
            title: config.dashboard.title.clone(),
            dataset,
            source,
            recommendations: RECOMMENDATIONS,
            table_page_size: config.dashboard.table_page_size,
        }
    }

    pub fn into_shared(self) -> SharedState {
        Arc::new(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_sales_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "Product Line,Sales Region,Units Sold,Revenue ($),Returns (%),Avg Discount (%)"
        )
        .unwrap();
        writeln!(file, "Snacks,North,10,100,5,2").unwrap();
        writeln!(file, "Dairy,South,4,40,1,3").unwrap();
        file
    }

    fn config_for(file: &tempfile::NamedTempFile) -> Config {
        let mut config = Config::default();
        config.data.path = file.path().to_path_buf();
        config
    }

    #[test]
    fn test_build_from_file() {
        let file = write_sales_file();
        let state = DashboardState::build(&config_for(&file)).unwrap();

        assert_eq!(state.dataset.records.len(), 2);
        assert_eq!(state.dataset.aggregates.summary.total_units, 14);
        assert_eq!(state.source.sha256.as_ref().map(String::len), Some(64));
        assert_eq!(state.title, "CPG Sales Dashboard");
    }

    #[test]
    fn test_digest_describes_loaded_bytes() {
        let file = write_sales_file();
        let bytes = std::fs::read(file.path()).unwrap();
        let state = DashboardState::build(&config_for(&file)).unwrap();

        assert_eq!(state.source.sha256.as_deref(), Some(sha256_bytes(&bytes).as_str()));
        assert_eq!(state.source.name, file.path().display().to_string());
    }

    #[test]
    fn test_build_accepts_pinned_checksum() {
        let file = write_sales_file();
        let digest = sha256_bytes(&std::fs::read(file.path()).unwrap());
        let mut config = config_for(&file);
        config.data.expected_sha256 = Some(digest.to_uppercase());

        let state = DashboardState::build(&config).unwrap();
        assert_eq!(state.source.sha256, Some(digest));
    }

    #[test]
    fn test_build_rejects_checksum_mismatch() {
        let file = write_sales_file();
        let mut config = config_for(&file);
        config.data.expected_sha256 = Some("00".repeat(32));

        let err = DashboardState::build(&config).unwrap_err();
        assert!(matches!(err, AppError::DataFile(cpg_common::CpgError::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_build_missing_file() {
        let mut config = Config::default();
        config.data.path = "/nonexistent/cpg.csv".into();
        assert!(matches!(DashboardState::build(&config), Err(AppError::DataFile(_))));
    }
}
