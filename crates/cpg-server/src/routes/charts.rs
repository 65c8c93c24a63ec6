//! Per-chart data endpoints

use std::str::FromStr;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::api::ApiResponse;
use crate::error::{AppError, ServerResult};
use crate::state::SharedState;

/// The grouped tables a chart can be drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartName {
    RevenueByProduct,
    UnitsByRegion,
    ReturnsVsRevenue,
    DiscountByProduct,
}

impl ChartName {
    pub const ALL: [ChartName; 4] = [
        ChartName::RevenueByProduct,
        ChartName::UnitsByRegion,
        ChartName::ReturnsVsRevenue,
        ChartName::DiscountByProduct,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            ChartName::RevenueByProduct => "revenue-by-product",
            ChartName::UnitsByRegion => "units-by-region",
            ChartName::ReturnsVsRevenue => "returns-vs-revenue",
            ChartName::DiscountByProduct => "discount-by-product",
        }
    }
}

impl FromStr for ChartName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartName::ALL
            .into_iter()
            .find(|chart| chart.slug() == s)
            .ok_or_else(|| {
                let known: Vec<_> = ChartName::ALL.iter().map(|c| c.slug()).collect();
                AppError::NotFound(format!("Unknown chart '{}' (known: {})", s, known.join(", ")))
            })
    }
}

/// GET /api/v1/charts/:name
pub async fn get_chart(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> ServerResult<Response> {
    let chart: ChartName = name.parse()?;
    let aggregates = &state.dataset.aggregates;

    let response = match chart {
        ChartName::RevenueByProduct => ApiResponse::success(&aggregates.revenue_by_product).into_response(),
        ChartName::UnitsByRegion => ApiResponse::success(&aggregates.units_by_region).into_response(),
        ChartName::ReturnsVsRevenue => ApiResponse::success(&aggregates.returns_vs_revenue).into_response(),
        ChartName::DiscountByProduct => ApiResponse::success(&aggregates.discount_by_product).into_response(),
    };

    Ok(response)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_slugs_round_trip() {
        for chart in ChartName::ALL {
            assert_eq!(chart.slug().parse::<ChartName>().unwrap(), chart);
        }
    }

    #[test]
    fn test_unknown_chart_is_not_found() {
        assert!(matches!("pie".parse::<ChartName>(), Err(AppError::NotFound(_))));
    }
}
