//! Property tests for the aggregation engine

use std::collections::HashSet;

use cpg_pipeline::{aggregate, AggregateError, Record, RecordSet};
use proptest::prelude::*;

const PRODUCTS: &[&str] = &["Snacks", "Beverages", "Dairy", "Household", "Personal Care"];
const REGIONS: &[&str] = &["North", "South", "East", "West"];

/// Slack for floating point rounding in running means
const EPSILON: f64 = 1e-9;

fn record_strategy() -> impl Strategy<Value = Record> {
    (
        prop::sample::select(PRODUCTS),
        prop::sample::select(REGIONS),
        0u64..10_000,
        // Revenue in cents, up to one million currency units
        0u64..100_000_000,
        0.0f64..=100.0,
        0.0f64..=100.0,
    )
        .prop_map(|(product, region, units, revenue, returns, discount)| {
            Record::new(product, region, units, revenue as f64 / 100.0, returns, discount)
        })
}

fn record_set_strategy() -> impl Strategy<Value = RecordSet> {
    prop::collection::vec(record_strategy(), 1..80).prop_map(RecordSet::new)
}

fn first_appearance<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    keys.filter(|k| seen.insert(*k)).collect()
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

proptest! {
    #[test]
    fn prop_aggregate_is_deterministic(rs in record_set_strategy()) {
        let first = aggregate(&rs).unwrap();
        let second = aggregate(&rs).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn prop_every_key_appears_once_in_first_appearance_order(rs in record_set_strategy()) {
        let agg = aggregate(&rs).unwrap();
        let products = first_appearance(rs.iter().map(|r| r.product_line.as_str()));
        let regions = first_appearance(rs.iter().map(|r| r.sales_region.as_str()));

        let revenue_keys: Vec<&str> = agg.revenue_by_product.iter().map(|r| r.product_line.as_str()).collect();
        let returns_keys: Vec<&str> = agg.returns_vs_revenue.iter().map(|r| r.product_line.as_str()).collect();
        let discount_keys: Vec<&str> = agg.discount_by_product.iter().map(|r| r.product_line.as_str()).collect();
        let region_keys: Vec<&str> = agg.units_by_region.iter().map(|r| r.sales_region.as_str()).collect();

        prop_assert_eq!(&revenue_keys, &products);
        prop_assert_eq!(&returns_keys, &products);
        prop_assert_eq!(&discount_keys, &products);
        prop_assert_eq!(&region_keys, &regions);
    }

    #[test]
    fn prop_group_totals_reconcile_with_summary(rs in record_set_strategy()) {
        let agg = aggregate(&rs).unwrap();

        let revenue: f64 = agg.revenue_by_product.iter().map(|r| r.revenue_sum).sum();
        let units: u64 = agg.units_by_region.iter().map(|r| r.units_sum).sum();

        prop_assert_eq!(agg.summary.total_revenue, revenue);
        prop_assert_eq!(agg.summary.total_units, units);
        prop_assert_eq!(agg.summary.record_count, rs.len());

        for (sum_row, returns_row) in agg.revenue_by_product.iter().zip(&agg.returns_vs_revenue) {
            prop_assert_eq!(sum_row.revenue_sum, returns_row.revenue_sum);
        }
    }

    #[test]
    fn prop_means_stay_within_group_bounds(rs in record_set_strategy()) {
        let agg = aggregate(&rs).unwrap();

        for row in &agg.returns_vs_revenue {
            let group = rs.iter().filter(|r| r.product_line == row.product_line);
            let (lo, hi) = bounds(group.map(|r| r.returns_percent));
            prop_assert!(row.returns_mean >= lo - EPSILON && row.returns_mean <= hi + EPSILON);
        }

        for row in &agg.discount_by_product {
            let group = rs.iter().filter(|r| r.product_line == row.product_line);
            let (lo, hi) = bounds(group.map(|r| r.avg_discount_percent));
            prop_assert!(row.discount_mean >= lo - EPSILON && row.discount_mean <= hi + EPSILON);
        }

        let (lo, hi) = bounds(rs.iter().map(|r| r.returns_percent));
        prop_assert!(agg.summary.avg_returns_percent >= lo - EPSILON);
        prop_assert!(agg.summary.avg_returns_percent <= hi + EPSILON);
    }

    #[test]
    fn prop_aggregation_ignores_row_order_for_values(rs in record_set_strategy()) {
        let reversed: RecordSet = rs.iter().rev().cloned().collect();
        let forward = aggregate(&rs).unwrap();
        let backward = aggregate(&reversed).unwrap();

        prop_assert_eq!(forward.summary.total_units, backward.summary.total_units);
        for row in &forward.units_by_region {
            let other = backward
                .units_by_region
                .iter()
                .find(|r| r.sales_region == row.sales_region)
                .unwrap();
            prop_assert_eq!(row.units_sum, other.units_sum);
        }
    }
}

#[test]
fn test_empty_input_yields_no_output() {
    let err = aggregate(&RecordSet::default()).unwrap_err();
    assert_eq!(err, AggregateError::EmptyDataset { output: "aggregates" });
}
