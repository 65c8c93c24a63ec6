//! Integration tests for the dashboard API
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`, so no
//! socket is bound.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use cpg_pipeline::{Dataset, Record, RecordSet};
use cpg_server::{config::Config, router, DashboardState, SourceInfo};

fn sample_records() -> RecordSet {
    RecordSet::new(vec![
        Record::new("A", "North", 10, 100.0, 5.0, 2.0),
        Record::new("B", "South", 20, 200.0, 3.0, 4.0),
        Record::new("A", "East", 5, 50.0, 7.0, 6.0),
    ])
}

fn test_app_with(config: Config) -> Router {
    let dataset = Dataset::from_records(sample_records()).expect("sample data aggregates");
    let source = SourceInfo {
        name: "in-memory".to_string(),
        sha256: None,
        loaded_at: Utc::now(),
    };
    let state = DashboardState::from_dataset(&config, dataset, source).into_shared();
    router(state, &config.cors)
}

fn test_app() -> Router {
    test_app_with(Config::default())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(test_app(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["records"], 3);
}

#[tokio::test]
async fn test_dashboard_payload() {
    let (status, body) = get(test_app(), "/api/v1/dashboard").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let data = &body["data"];
    assert_eq!(data["title"], "CPG Sales Dashboard");
    assert_eq!(data["tablePageSize"], 10);
    assert_eq!(data["source"]["name"], "in-memory");
    assert!(data["source"]["sha256"].is_null());
    assert_eq!(data["recommendations"].as_array().unwrap().len(), 4);

    let revenue = data["revenueByProduct"].as_array().unwrap();
    assert_eq!(revenue.len(), 2);
    assert_eq!(revenue[0]["productLine"], "A");
    assert_eq!(revenue[0]["revenueSum"], 150.0);
    assert_eq!(revenue[1]["productLine"], "B");

    let regions: Vec<_> = data["unitsByRegion"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["salesRegion"].as_str().unwrap())
        .collect();
    assert_eq!(regions, vec!["North", "South", "East"]);
}

#[tokio::test]
async fn test_summary() {
    let (status, body) = get(test_app(), "/api/v1/summary").await;

    assert_eq!(status, StatusCode::OK);
    let summary = &body["data"];
    assert_eq!(summary["totalRevenue"], 350.0);
    assert_eq!(summary["totalUnits"], 35);
    assert_eq!(summary["avgReturnsPercent"], 5.0);
    assert_eq!(summary["avgDiscountPercent"], 4.0);
    assert_eq!(summary["recordCount"], 3);
}

#[tokio::test]
async fn test_returns_vs_revenue_chart() {
    let (status, body) = get(test_app(), "/api/v1/charts/returns-vs-revenue").await;

    assert_eq!(status, StatusCode::OK);
    let first = &body["data"][0];
    assert_eq!(first["productLine"], "A");
    assert_eq!(first["revenueSum"], 150.0);
    assert_eq!(first["returnsMean"], 6.0);
}

#[tokio::test]
async fn test_every_chart_is_served() {
    for name in [
        "revenue-by-product",
        "units-by-region",
        "returns-vs-revenue",
        "discount-by-product",
    ] {
        let (status, body) = get(test_app(), &format!("/api/v1/charts/{}", name)).await;
        assert_eq!(status, StatusCode::OK, "chart {}", name);
        assert!(!body["data"].as_array().unwrap().is_empty(), "chart {}", name);
    }
}

#[tokio::test]
async fn test_unknown_chart_is_404() {
    let (status, body) = get(test_app(), "/api/v1/charts/pie").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_records_pagination() {
    let (status, body) = get(test_app(), "/api/v1/records?page=2&per_page=2").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["salesRegion"], "East");

    let pagination = &body["meta"]["pagination"];
    assert_eq!(pagination["total"], 3);
    assert_eq!(pagination["pages"], 2);
    assert_eq!(pagination["has_prev"], true);
    assert_eq!(pagination["has_next"], false);
}

#[tokio::test]
async fn test_records_default_page_size() {
    let mut config = Config::default();
    config.dashboard.table_page_size = 2;

    let (status, body) = get(test_app_with(config), "/api/v1/records").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["meta"]["pagination"]["per_page"], 2);
}

#[tokio::test]
async fn test_records_rejects_page_zero() {
    let (status, body) = get(test_app(), "/api/v1/records?page=0").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_recommendations() {
    let (status, body) = get(test_app(), "/api/v1/recommendations").await;

    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert!(items.iter().all(|r| r["title"].is_string() && r["detail"].is_string()));
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/v1/summary")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
}

#[tokio::test]
async fn test_post_is_not_allowed() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/summary")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
