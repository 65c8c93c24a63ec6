//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default server host binding (all interfaces).
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 5000;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default sales data file, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "CPG_Sales_Data.csv";

/// Default field delimiter of the sales data file.
pub const DEFAULT_DATA_DELIMITER: char = ',';

/// Default dashboard title.
pub const DEFAULT_DASHBOARD_TITLE: &str = "CPG Sales Dashboard";

/// Default number of rows per page of the records table.
pub const DEFAULT_TABLE_PAGE_SIZE: usize = 10;

/// Largest page of the records table a client may request.
pub const MAX_TABLE_PAGE_SIZE: usize = 100;

/// Default CORS allowed origin for local development.
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub dashboard: DashboardConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

/// Where the sales sheet lives and how to read it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub path: PathBuf,
    pub delimiter: char,
    /// Pinned SHA-256 of the data file; startup fails on mismatch when set
    pub expected_sha256: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub title: String,
    pub table_page_size: usize,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Config {
    /// Load configuration from `.env`, the environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// `PORT` wins over `CPG_PORT` so platform-assigned ports are honoured.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let config = Config {
            server: ServerConfig {
                host: lookup("CPG_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
                port: parse_var(&lookup, "PORT")
                    .or_else(|| parse_var(&lookup, "CPG_PORT"))
                    .unwrap_or(DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: parse_var(&lookup, "CPG_SHUTDOWN_TIMEOUT")
                    .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            },
            data: DataConfig {
                path: lookup("CPG_DATA_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
                delimiter: match lookup("CPG_DATA_DELIMITER").as_deref() {
                    None => DEFAULT_DATA_DELIMITER,
                    Some("\\t") | Some("tab") => '\t',
                    Some(raw) => {
                        let mut chars = raw.chars();
                        match (chars.next(), chars.next()) {
                            (Some(c), None) => c,
                            _ => anyhow::bail!(
                                "CPG_DATA_DELIMITER must be a single character, got {:?}",
                                raw
                            ),
                        }
                    },
                },
                expected_sha256: lookup("CPG_DATA_SHA256").filter(|s| !s.trim().is_empty()),
            },
            dashboard: DashboardConfig {
                title: lookup("CPG_DASHBOARD_TITLE")
                    .unwrap_or_else(|| DEFAULT_DASHBOARD_TITLE.to_string()),
                table_page_size: parse_var(&lookup, "CPG_TABLE_PAGE_SIZE").unwrap_or(DEFAULT_TABLE_PAGE_SIZE),
            },
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|| DEFAULT_CORS_ALLOWED_ORIGIN.to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                allow_credentials: parse_var(&lookup, "CORS_ALLOW_CREDENTIALS").unwrap_or(false),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.data.path.as_os_str().is_empty() {
            anyhow::bail!("Data path cannot be empty");
        }

        if !self.data.delimiter.is_ascii() {
            anyhow::bail!(
                "Data delimiter must be an ASCII character, got {:?}",
                self.data.delimiter
            );
        }

        if self.dashboard.table_page_size == 0
            || self.dashboard.table_page_size > MAX_TABLE_PAGE_SIZE
        {
            anyhow::bail!(
                "Table page size must be between 1 and {}, got {}",
                MAX_TABLE_PAGE_SIZE,
                self.dashboard.table_page_size
            );
        }

        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("No CORS origins configured - all origins will be allowed");
        }

        if self.cors.allow_credentials && self.cors.allowed_origins.iter().any(|o| o == "*") {
            anyhow::bail!("CORS credentials cannot be combined with a wildcard origin");
        }

        Ok(())
    }
}

/// Parse a variable, treating unparsable values as unset
fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    lookup(key).and_then(|s| s.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            },
            data: DataConfig {
                path: PathBuf::from(DEFAULT_DATA_PATH),
                delimiter: DEFAULT_DATA_DELIMITER,
                expected_sha256: None,
            },
            dashboard: DashboardConfig {
                title: DEFAULT_DASHBOARD_TITLE.to_string(),
                table_page_size: DEFAULT_TABLE_PAGE_SIZE,
            },
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
                allow_credentials: false,
            },
        }
    }
}
