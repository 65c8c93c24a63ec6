//! Load-then-aggregate entry point
//!
//! Hosts call [`run`] once at startup and hand the resulting [`Dataset`] to
//! whatever renders it. There is no ambient global state: the dataset is an
//! ordinary value owned by the caller.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, info_span};

use crate::engine::{aggregate, Aggregates};
use crate::error::Result;
use crate::loader::{load, DataSource, LoadOptions};
use crate::models::RecordSet;

/// Loaded records together with everything derived from them
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub records: RecordSet,
    pub aggregates: Aggregates,
}

impl Dataset {
    /// Aggregate an already-loaded record set
    pub fn from_records(records: RecordSet) -> Result<Self> {
        let aggregates = aggregate(&records)?;
        Ok(Self { records, aggregates })
    }
}

/// Load `source` and aggregate it. Any failure aborts the whole run.
pub fn run(source: DataSource, options: &LoadOptions) -> Result<Dataset> {
    let span = info_span!("pipeline", source = %source);
    let _enter = span.enter();

    let started = Instant::now();
    let records = load(source, options)?;
    let dataset = Dataset::from_records(records)?;

    info!(
        records = dataset.records.len(),
        product_lines = dataset.aggregates.revenue_by_product.len(),
        regions = dataset.aggregates.units_by_region.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Pipeline complete"
    );

    Ok(dataset)
}
