//! Aggregation engine
//!
//! Turns a [`RecordSet`] into the grouped tables and summary scalars that
//! drive every dashboard widget:
//!
//! | Output | Group key | Reduction |
//! |---|---|---|
//! | `revenueByProduct` | product line | sum(revenue) |
//! | `unitsByRegion` | sales region | sum(units sold) |
//! | `returnsVsRevenue` | product line | sum(revenue), mean(returns %) |
//! | `discountByProduct` | product line | mean(avg discount %) |
//! | `summary` | whole set | totals and means |
//!
//! Grouped rows follow the first-appearance order of their key in the source,
//! never a sort. Revenue is summed once per product line and every other
//! revenue figure, the overall total included, is folded from those group
//! sums, so the summary always reconciles with the tables. Means are
//! accumulated incrementally (Welford). An empty record set is an error, not
//! a table of zeros.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::AggregateError;
use crate::models::{Record, RecordSet};

// ============================================================================
// Output Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRevenue {
    pub product_line: String,
    pub revenue_sum: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionUnits {
    pub sales_region: String,
    pub units_sum: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReturns {
    pub product_line: String,
    pub revenue_sum: f64,
    pub returns_mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDiscount {
    pub product_line: String,
    pub discount_mean: f64,
}

/// Whole-set scalars shown in the dashboard header cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_revenue: f64,
    pub total_units: u64,
    pub avg_returns_percent: f64,
    pub avg_discount_percent: f64,
    pub record_count: usize,
}

/// Everything the presentation layer reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub revenue_by_product: Vec<ProductRevenue>,
    pub units_by_region: Vec<RegionUnits>,
    pub returns_vs_revenue: Vec<ProductReturns>,
    pub discount_by_product: Vec<ProductDiscount>,
    pub summary: Summary,
}

// ============================================================================
// Accumulators
// ============================================================================

/// Running arithmetic mean
#[derive(Debug, Clone, Copy, Default)]
struct RunningMean {
    count: u64,
    mean: f64,
}

impl RunningMean {
    fn push(&mut self, x: f64) {
        self.count += 1;
        self.mean += (x - self.mean) / self.count as f64;
    }

    fn finish(&self, output: &'static str) -> Result<f64, AggregateError> {
        if self.count == 0 {
            return Err(AggregateError::EmptyDataset { output });
        }
        Ok(self.mean)
    }
}

fn checked_units(
    total: u64,
    units: u64,
    output: &'static str,
    key: &str,
) -> Result<u64, AggregateError> {
    total.checked_add(units).ok_or_else(|| AggregateError::Overflow {
        output,
        key: key.to_string(),
    })
}

fn ensure_not_empty(rs: &RecordSet, output: &'static str) -> Result<(), AggregateError> {
    if rs.is_empty() {
        return Err(AggregateError::EmptyDataset { output });
    }
    Ok(())
}

/// Partition `records` by `key`, folding each record into its group's
/// accumulator. Groups keep first-appearance order.
fn group_by<'a, A, K, F>(
    records: &'a [Record],
    key: K,
    mut fold: F,
) -> Result<IndexMap<&'a str, A>, AggregateError>
where
    A: Default,
    K: Fn(&'a Record) -> &'a str,
    F: FnMut(&mut A, &'a Record) -> Result<(), AggregateError>,
{
    let mut groups: IndexMap<&'a str, A> = IndexMap::new();
    for record in records {
        let acc = groups.entry(key(record)).or_default();
        fold(acc, record)?;
    }
    Ok(groups)
}

fn by_product(record: &Record) -> &str {
    &record.product_line
}

fn by_region(record: &Record) -> &str {
    &record.sales_region
}

/// Per-product revenue sums. Every revenue figure in the output is derived
/// from these, so group and overall totals reconcile exactly.
fn revenue_sums(rs: &RecordSet) -> Result<IndexMap<&str, f64>, AggregateError> {
    group_by(rs.as_slice(), by_product, |sum: &mut f64, r| {
        *sum += r.revenue;
        Ok(())
    })
}

// ============================================================================
// Operations
// ============================================================================

/// Sum of revenue per product line
pub fn revenue_by_product(rs: &RecordSet) -> Result<Vec<ProductRevenue>, AggregateError> {
    ensure_not_empty(rs, "revenueByProduct")?;

    Ok(revenue_sums(rs)?
        .into_iter()
        .map(|(product_line, revenue_sum)| ProductRevenue {
            product_line: product_line.to_string(),
            revenue_sum,
        })
        .collect())
}

/// Sum of units sold per sales region
pub fn units_by_region(rs: &RecordSet) -> Result<Vec<RegionUnits>, AggregateError> {
    const OUTPUT: &str = "unitsByRegion";
    ensure_not_empty(rs, OUTPUT)?;

    let groups = group_by(rs.as_slice(), by_region, |sum: &mut u64, r| {
        *sum = checked_units(*sum, r.units_sold, OUTPUT, &r.sales_region)?;
        Ok(())
    })?;

    Ok(groups
        .into_iter()
        .map(|(sales_region, units_sum)| RegionUnits {
            sales_region: sales_region.to_string(),
            units_sum,
        })
        .collect())
}

/// Revenue sum alongside mean returns percentage per product line
pub fn returns_vs_revenue(rs: &RecordSet) -> Result<Vec<ProductReturns>, AggregateError> {
    const OUTPUT: &str = "returnsVsRevenue";
    ensure_not_empty(rs, OUTPUT)?;

    let revenue = revenue_sums(rs)?;
    let returns = group_by(rs.as_slice(), by_product, |mean: &mut RunningMean, r| {
        mean.push(r.returns_percent);
        Ok(())
    })?;

    revenue
        .into_iter()
        .zip(returns.into_values())
        .map(|((product_line, revenue_sum), returns)| {
            Ok(ProductReturns {
                product_line: product_line.to_string(),
                revenue_sum,
                returns_mean: returns.finish(OUTPUT)?,
            })
        })
        .collect()
}

/// Mean average-discount percentage per product line
pub fn discount_by_product(rs: &RecordSet) -> Result<Vec<ProductDiscount>, AggregateError> {
    const OUTPUT: &str = "discountByProduct";
    ensure_not_empty(rs, OUTPUT)?;

    let groups = group_by(rs.as_slice(), by_product, |mean: &mut RunningMean, r| {
        mean.push(r.avg_discount_percent);
        Ok(())
    })?;

    groups
        .into_iter()
        .map(|(product_line, discount)| {
            Ok(ProductDiscount {
                product_line: product_line.to_string(),
                discount_mean: discount.finish(OUTPUT)?,
            })
        })
        .collect()
}

/// Totals and means over the whole record set
pub fn summarize(rs: &RecordSet) -> Result<Summary, AggregateError> {
    const OUTPUT: &str = "summary";
    ensure_not_empty(rs, OUTPUT)?;

    let total_revenue: f64 = revenue_sums(rs)?.into_values().sum();
    let mut total_units = 0u64;
    let mut returns = RunningMean::default();
    let mut discount = RunningMean::default();

    for r in rs {
        total_units = checked_units(total_units, r.units_sold, OUTPUT, "totalUnits")?;
        returns.push(r.returns_percent);
        discount.push(r.avg_discount_percent);
    }

    Ok(Summary {
        total_revenue,
        total_units,
        avg_returns_percent: returns.finish(OUTPUT)?,
        avg_discount_percent: discount.finish(OUTPUT)?,
        record_count: rs.len(),
    })
}

/// Compute every dashboard output. Fails before producing anything when the
/// set is empty.
#[instrument(skip_all, fields(records = rs.len()))]
pub fn aggregate(rs: &RecordSet) -> Result<Aggregates, AggregateError> {
    ensure_not_empty(rs, "aggregates")?;

    let aggregates = Aggregates {
        revenue_by_product: revenue_by_product(rs)?,
        units_by_region: units_by_region(rs)?,
        returns_vs_revenue: returns_vs_revenue(rs)?,
        discount_by_product: discount_by_product(rs)?,
        summary: summarize(rs)?,
    };

    debug!(
        product_lines = aggregates.revenue_by_product.len(),
        regions = aggregates.units_by_region.len(),
        total_revenue = aggregates.summary.total_revenue,
        "Aggregated sales data"
    );

    Ok(aggregates)
}
