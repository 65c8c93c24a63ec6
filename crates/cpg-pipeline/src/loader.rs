//! Sales sheet loader
//!
//! Reads delimited text (CSV by default) with a header row into a typed
//! [`RecordSet`]. Coercion is explicit and fail-fast: the first cell that
//! cannot become its column's type aborts the load with the line, column and
//! raw value.
//!
//! # File Format
//! ```text
//! Product Line,Sales Region,Units Sold,Revenue ($),Returns (%),Avg Discount (%)
//! Snacks,North,120,2400.50,3.5,10
//! ```
//!
//! Header names are matched exactly, extra columns are ignored and column
//! order is free.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::models::{Column, Record, RecordSet};

/// Byte-order mark some spreadsheet exports prepend to the first header
const UTF8_BOM: char = '\u{feff}';

/// Largest integer an `f64` represents exactly
const MAX_EXACT_F64_INT: f64 = 9_007_199_254_740_992.0;

/// Options controlling how a source is parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl LoadOptions {
    /// Options with a custom single-byte delimiter, e.g. `'\t'`
    pub fn with_delimiter(delimiter: char) -> Result<Self, LoadError> {
        if !delimiter.is_ascii() {
            return Err(LoadError::InvalidDelimiter(delimiter));
        }
        Ok(Self {
            delimiter: delimiter as u8,
        })
    }
}

/// Where sales data is read from
pub enum DataSource {
    Path(PathBuf),
    Reader {
        name: String,
        reader: Box<dyn Read + Send>,
    },
}

impl DataSource {
    pub fn reader(name: impl Into<String>, reader: impl Read + Send + 'static) -> Self {
        DataSource::Reader {
            name: name.into(),
            reader: Box::new(reader),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Reader { name, .. } => f.write_str(name),
        }
    }
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            DataSource::Reader { name, .. } => f.debug_struct("Reader").field("name", name).finish(),
        }
    }
}

impl From<PathBuf> for DataSource {
    fn from(path: PathBuf) -> Self {
        DataSource::Path(path)
    }
}

impl From<&Path> for DataSource {
    fn from(path: &Path) -> Self {
        DataSource::Path(path.to_path_buf())
    }
}

/// Load a record set from any [`DataSource`]
pub fn load(source: DataSource, options: &LoadOptions) -> Result<RecordSet, LoadError> {
    match source {
        DataSource::Path(path) => load_path(path, options),
        DataSource::Reader { name, reader } => {
            debug!(source = %name, "Reading sales data from stream");
            load_reader(reader, options)
        },
    }
}

/// Load a record set from a file on disk
pub fn load_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<RecordSet, LoadError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Opening sales data file");
    let file = File::open(path)?;
    let records = load_reader(file, options)?;
    info!(path = %path.display(), records = records.len(), "Loaded sales data");
    Ok(records)
}

/// Load a record set from any reader
pub fn load_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<RecordSet, LoadError> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .trim(Trim::Fields)
        .from_reader(reader);

    let layout = ColumnLayout::resolve(csv_reader.headers()?)?;

    let mut records = Vec::new();
    for (index, row) in csv_reader.records().enumerate() {
        let row = row?;
        // Header is line 1, so the first data row is line 2 unless the reader knows better
        let line = row
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 2);
        records.push(layout.coerce(&row, line)?);
    }

    debug!(records = records.len(), "Coerced all rows");
    Ok(RecordSet::new(records))
}

/// Positions of the required columns within a header row
#[derive(Debug)]
struct ColumnLayout {
    product_line: usize,
    sales_region: usize,
    units_sold: usize,
    revenue: usize,
    returns_percent: usize,
    avg_discount_percent: usize,
}

impl ColumnLayout {
    fn resolve(headers: &StringRecord) -> Result<Self, LoadError> {
        let names: Vec<&str> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| if i == 0 { h.trim_start_matches(UTF8_BOM) } else { h })
            .collect();

        let find = |column: Column| -> Result<usize, LoadError> {
            let mut hits = names
                .iter()
                .enumerate()
                .filter(|(_, name)| **name == column.header())
                .map(|(i, _)| i);

            let index = hits.next().ok_or_else(|| LoadError::MissingColumn {
                column: column.header(),
                found: names.iter().map(|n| n.to_string()).collect(),
            })?;

            if hits.next().is_some() {
                warn!(column = column.header(), "Duplicate header, using the first occurrence");
            }
            debug!(column = column.header(), index, "Resolved column");
            Ok(index)
        };

        Ok(Self {
            product_line: find(Column::ProductLine)?,
            sales_region: find(Column::SalesRegion)?,
            units_sold: find(Column::UnitsSold)?,
            revenue: find(Column::Revenue)?,
            returns_percent: find(Column::ReturnsPercent)?,
            avg_discount_percent: find(Column::AvgDiscountPercent)?,
        })
    }

    fn coerce(&self, row: &StringRecord, line: u64) -> Result<Record, LoadError> {
        let cell = |index: usize| row.get(index).unwrap_or("");

        Ok(Record {
            product_line: parse_text(cell(self.product_line), Column::ProductLine, line)?,
            sales_region: parse_text(cell(self.sales_region), Column::SalesRegion, line)?,
            units_sold: parse_units(cell(self.units_sold), line)?,
            revenue: parse_revenue(cell(self.revenue), line)?,
            returns_percent: parse_percent(cell(self.returns_percent), Column::ReturnsPercent, line)?,
            avg_discount_percent: parse_percent(
                cell(self.avg_discount_percent),
                Column::AvgDiscountPercent,
                line,
            )?,
        })
    }
}

fn type_mismatch(raw: &str, column: Column, line: u64) -> LoadError {
    LoadError::TypeMismatch {
        line,
        column: column.header(),
        expected: column.expected_type(),
        value: raw.to_string(),
    }
}

fn out_of_range(raw: &str, column: Column, line: u64, reason: &'static str) -> LoadError {
    LoadError::OutOfRange {
        line,
        column: column.header(),
        value: raw.to_string(),
        reason,
    }
}

/// Grouping keys must be present; an empty key would silently merge unrelated rows
fn parse_text(raw: &str, column: Column, line: u64) -> Result<String, LoadError> {
    if raw.is_empty() {
        return Err(type_mismatch(raw, column, line));
    }
    Ok(raw.to_string())
}

/// Finite decimal; `NaN`/`inf` spellings parse in Rust but are not data
fn parse_decimal(raw: &str, column: Column, line: u64) -> Result<f64, LoadError> {
    let value: f64 = raw.parse().map_err(|_| type_mismatch(raw, column, line))?;
    if !value.is_finite() {
        return Err(out_of_range(raw, column, line, "value must be finite"));
    }
    Ok(value)
}

/// Whole units. Spreadsheet exports often write integers as `120.0`, which is accepted.
fn parse_units(raw: &str, line: u64) -> Result<u64, LoadError> {
    let column = Column::UnitsSold;
    if let Ok(units) = raw.parse::<u64>() {
        return Ok(units);
    }

    let value = parse_decimal(raw, column, line)?;
    if value < 0.0 {
        return Err(out_of_range(raw, column, line, "units sold cannot be negative"));
    }
    if value.fract() != 0.0 || value > MAX_EXACT_F64_INT {
        return Err(type_mismatch(raw, column, line));
    }
    Ok(value as u64)
}

fn parse_revenue(raw: &str, line: u64) -> Result<f64, LoadError> {
    let value = parse_decimal(raw, Column::Revenue, line)?;
    if value < 0.0 {
        return Err(out_of_range(raw, Column::Revenue, line, "revenue cannot be negative"));
    }
    Ok(value)
}

fn parse_percent(raw: &str, column: Column, line: u64) -> Result<f64, LoadError> {
    let value = parse_decimal(raw, column, line)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(out_of_range(raw, column, line, "percentage must be between 0 and 100"));
    }
    Ok(value)
}
