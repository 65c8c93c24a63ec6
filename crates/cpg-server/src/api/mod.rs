//! JSON envelopes shared by every endpoint

pub mod response;

pub use response::{ApiResponse, ErrorResponse};
