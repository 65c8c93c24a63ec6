//! CPG Report - one-shot sales aggregation

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cpg_common::logging::{init_logging, LogConfig, LogLevel};
use cpg_pipeline::{pipeline, Aggregates, DataSource, LoadOptions};
use serde_json::Value;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "cpg-report")]
#[command(author, version, about = "Aggregate a CPG sales sheet and print the dashboard data as JSON")]
struct Cli {
    /// Sales data file (delimited text with a header row)
    input: PathBuf,

    /// Field delimiter
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,

    /// Print only one section of the output
    #[arg(short, long, value_enum, default_value_t = Section::All)]
    section: Section,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Section {
    All,
    Summary,
    RevenueByProduct,
    UnitsByRegion,
    ReturnsVsRevenue,
    DiscountByProduct,
}

impl Section {
    fn select(self, aggregates: &Aggregates) -> serde_json::Result<Value> {
        match self {
            Section::All => serde_json::to_value(aggregates),
            Section::Summary => serde_json::to_value(&aggregates.summary),
            Section::RevenueByProduct => serde_json::to_value(&aggregates.revenue_by_product),
            Section::UnitsByRegion => serde_json::to_value(&aggregates.units_by_region),
            Section::ReturnsVsRevenue => serde_json::to_value(&aggregates.returns_vs_revenue),
            Section::DiscountByProduct => serde_json::to_value(&aggregates.discount_by_product),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    };

    // Environment variables take precedence over flags
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("cpg-report")
        .build()
        .merge_env()?;

    let _guard = init_logging(&log_config)?;

    let options = LoadOptions::with_delimiter(cli.delimiter)?;
    info!(input = %cli.input.display(), "Generating sales report");

    let dataset = pipeline::run(DataSource::from(cli.input.clone()), &options)
        .with_context(|| format!("Failed to build report from {}", cli.input.display()))?;

    let output = cli.section.select(&dataset.aggregates)?;
    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };

    // The report itself is the program's output, so it goes to stdout
    println!("{}", rendered);
    Ok(())
}
