//! Whole-dashboard, summary and recommendation endpoints

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use cpg_pipeline::{
    engine::{ProductDiscount, ProductReturns, ProductRevenue, RegionUnits},
    Summary,
};
use serde::Serialize;

use crate::api::ApiResponse;
use crate::recommendations::Recommendation;
use crate::state::{SharedState, SourceInfo};

/// Single payload carrying every dashboard widget's data
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView<'a> {
    pub title: &'a str,
    pub summary: &'a Summary,
    pub revenue_by_product: &'a [ProductRevenue],
    pub units_by_region: &'a [RegionUnits],
    pub returns_vs_revenue: &'a [ProductReturns],
    pub discount_by_product: &'a [ProductDiscount],
    pub recommendations: &'a [Recommendation],
    pub source: &'a SourceInfo,
    pub table_page_size: usize,
}

/// GET /api/v1/dashboard
pub async fn get_dashboard(State(state): State<SharedState>) -> Response {
    let aggregates = &state.dataset.aggregates;

    ApiResponse::success(DashboardView {
        title: &state.title,
        summary: &aggregates.summary,
        revenue_by_product: &aggregates.revenue_by_product,
        units_by_region: &aggregates.units_by_region,
        returns_vs_revenue: &aggregates.returns_vs_revenue,
        discount_by_product: &aggregates.discount_by_product,
        recommendations: state.recommendations,
        source: &state.source,
        table_page_size: state.table_page_size,
    })
    .into_response()
}

/// GET /api/v1/summary
pub async fn get_summary(State(state): State<SharedState>) -> Response {
    ApiResponse::success(&state.dataset.aggregates.summary).into_response()
}

/// GET /api/v1/recommendations
pub async fn get_recommendations(State(state): State<SharedState>) -> Response {
    ApiResponse::success(state.recommendations).into_response()
}
