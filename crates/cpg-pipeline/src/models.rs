//! Sales record types
//!
//! A [`Record`] is one typed row of the sales sheet; a [`RecordSet`] is the
//! full, immutable collection loaded from a source.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Columns
// ============================================================================

/// The six columns every sales sheet must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    ProductLine,
    SalesRegion,
    UnitsSold,
    Revenue,
    ReturnsPercent,
    AvgDiscountPercent,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::ProductLine,
        Column::SalesRegion,
        Column::UnitsSold,
        Column::Revenue,
        Column::ReturnsPercent,
        Column::AvgDiscountPercent,
    ];

    /// Header text as it appears in the source file (case- and spelling-exact)
    pub fn header(self) -> &'static str {
        match self {
            Column::ProductLine => "Product Line",
            Column::SalesRegion => "Sales Region",
            Column::UnitsSold => "Units Sold",
            Column::Revenue => "Revenue ($)",
            Column::ReturnsPercent => "Returns (%)",
            Column::AvgDiscountPercent => "Avg Discount (%)",
        }
    }

    /// Human-readable name of the type a cell in this column coerces to
    pub fn expected_type(self) -> &'static str {
        match self {
            Column::ProductLine | Column::SalesRegion => "text",
            Column::UnitsSold => "non-negative integer",
            Column::Revenue => "non-negative decimal",
            Column::ReturnsPercent | Column::AvgDiscountPercent => "percentage between 0 and 100",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ============================================================================
// Records
// ============================================================================

/// One row of sales data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub product_line: String,
    pub sales_region: String,
    pub units_sold: u64,
    /// Currency units
    pub revenue: f64,
    pub returns_percent: f64,
    pub avg_discount_percent: f64,
}

impl Record {
    pub fn new(
        product_line: impl Into<String>,
        sales_region: impl Into<String>,
        units_sold: u64,
        revenue: f64,
        returns_percent: f64,
        avg_discount_percent: f64,
    ) -> Self {
        Self {
            product_line: product_line.into(),
            sales_region: sales_region.into(),
            units_sold,
            revenue,
            returns_percent,
            avg_discount_percent,
        }
    }
}

/// Ordered, immutable collection of [`Record`]s.
///
/// Order matters only for display (table pagination). Exposes no mutating
/// methods once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    /// Records in `[offset, offset + limit)`, clipped to the set bounds
    pub fn window(&self, offset: usize, limit: usize) -> &[Record] {
        let start = offset.min(self.records.len());
        let end = start.saturating_add(limit).min(self.records.len());
        &self.records[start..end]
    }
}

impl From<Vec<Record>> for RecordSet {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn sample() -> RecordSet {
        (0..5)
            .map(|i| Record::new(format!("P{}", i), "North", i, i as f64, 1.0, 2.0))
            .collect()
    }

    #[test]
    fn test_window_clips_to_bounds() {
        let rs = sample();
        assert_eq!(rs.window(0, 2).len(), 2);
        assert_eq!(rs.window(4, 10).len(), 1);
        assert!(rs.window(9, 10).is_empty());
        assert_eq!(rs.window(3, usize::MAX)[0].product_line, "P3");
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let json = serde_json::to_value(Record::new("A", "West", 3, 9.5, 1.0, 2.0)).unwrap();
        assert_eq!(json["productLine"], "A");
        assert_eq!(json["unitsSold"], 3);
        assert_eq!(json["avgDiscountPercent"], 2.0);
    }

    #[test]
    fn test_headers_are_distinct() {
        let mut headers: Vec<_> = Column::ALL.iter().map(|c| c.header()).collect();
        headers.sort_unstable();
        headers.dedup();
        assert_eq!(headers.len(), Column::ALL.len());
    }
}
