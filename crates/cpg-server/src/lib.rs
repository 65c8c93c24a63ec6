//! CPG Sales Dashboard Server
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Serves the aggregated sales data behind the dashboard as a read-only JSON
//! API. The pipeline runs once at startup; requests only read the result.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod pagination;
pub mod recommendations;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::{AppError, ServerResult};
pub use routes::router;
pub use state::{DashboardState, SharedState, SourceInfo};
