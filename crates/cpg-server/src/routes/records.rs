//! Paginated raw records for the dashboard table

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::ApiResponse;
use crate::error::{AppError, ServerResult};
use crate::pagination::{PaginationMetadata, PaginationParams};
use crate::state::SharedState;

/// GET /api/v1/records?page=2&per_page=10
///
/// Rows are returned in load order.
pub async fn list_records(
    State(state): State<SharedState>,
    Query(params): Query<PaginationParams>,
) -> ServerResult<Response> {
    params
        .validate()
        .map_err(|msg| AppError::BadRequest(msg.to_string()))?;

    let records = &state.dataset.records;
    let per_page = params.per_page(state.table_page_size);
    let rows = records.window(params.offset(state.table_page_size), per_page);
    let pagination = PaginationMetadata::new(params.page(), per_page, records.len());

    Ok(ApiResponse::success_with_meta(rows, json!({ "pagination": pagination })).into_response())
}
