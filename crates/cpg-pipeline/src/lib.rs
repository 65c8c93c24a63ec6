//! CPG Sales Pipeline
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Loads a tabular CPG sales sheet and computes the aggregates behind the
//! sales dashboard.
//!
//! - **loader**: delimited text → typed [`RecordSet`], with fail-fast coercion
//! - **engine**: grouped sums and means in first-appearance key order
//! - **pipeline**: the one-shot `load` → `aggregate` run a host performs at startup
//!
//! # Example
//!
//! ```no_run
//! use cpg_pipeline::{pipeline, DataSource, LoadOptions};
//! use std::path::PathBuf;
//!
//! fn main() -> anyhow::Result<()> {
//!     let source = DataSource::from(PathBuf::from("CPG_Sales_Data.csv"));
//!     let dataset = pipeline::run(source, &LoadOptions::default())?;
//!     tracing::info!(total = dataset.aggregates.summary.total_revenue, "revenue");
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod loader;
pub mod models;
pub mod pipeline;

pub use engine::{aggregate, Aggregates, Summary};
pub use error::{AggregateError, LoadError, PipelineError, Result};
pub use loader::{load, load_path, load_reader, DataSource, LoadOptions};
pub use models::{Column, Record, RecordSet};
pub use pipeline::Dataset;
