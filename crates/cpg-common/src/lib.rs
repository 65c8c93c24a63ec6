//! CPG Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling, logging setup and file fingerprinting for the CPG
//! sales dashboard workspace.
//!
//! - **Error Handling**: [`CpgError`] and the crate [`Result`] alias
//! - **Logging**: `tracing` subscriber configuration shared by every binary
//! - **Checksums**: SHA-256 fingerprints of input data files
//!
//! # Example
//!
//! ```no_run
//! use cpg_common::checksum::sha256_bytes;
//!
//! fn fingerprint(path: &str) -> cpg_common::Result<()> {
//!     let bytes = std::fs::read(path)?;
//!     let digest = sha256_bytes(&bytes);
//!     tracing::info!(%digest, "data file fingerprint");
//!     Ok(())
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod logging;

pub use error::{CpgError, Result};
