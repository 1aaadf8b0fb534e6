use super::common::*;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::selection::service::{JobSelector, SelectionRequest};

fn post_json(uri: &str, body: serde_json::Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&body).expect("serializable"),
        ))
        .expect("valid request")
}

#[tokio::test]
async fn rank_route_returns_report() {
    let router = selection_router_with_service(service());

    let response = router
        .oneshot(post_json(
            "/api/v1/selection/rank",
            json!({
                "candidates": roster(),
                "job": "Sales Manager",
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["job"]["Job Position"], "Sales Manager");
    assert_eq!(payload["criteria"].as_array().map(Vec::len), Some(3));
    assert_eq!(payload["vikor"]["rows"][0]["name"], "Budi");
    assert_eq!(payload["vikor"]["verdict"], "satisfied");
    assert_eq!(payload["electre"]["rows"][0]["net_score"], 2);
}

#[tokio::test]
async fn rank_handler_reports_missing_fields_as_unprocessable() {
    let service = Arc::new(service());
    let request = SelectionRequest {
        candidates: vec![without(candidate("Ayu", 5.0), "P_D")],
        job: JobSelector::Title("Admin".to_string()),
        weights: None,
        v: None,
        electre: None,
        methods: Vec::new(),
    };

    let response = crate::workflows::selection::router::rank_handler(
        State(service),
        axum::Json(request),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["kind"], "missing_field");
    assert_eq!(payload["field"], "P_D");
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("Ayu"));
}

#[tokio::test]
async fn rank_route_rejects_bad_weights() {
    let router = selection_router_with_service(service());

    let response = router
        .oneshot(post_json(
            "/api/v1/selection/rank",
            json!({
                "candidates": roster(),
                "job": "Admin",
                "weights": [0.5, 0.5],
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["kind"], "invalid_input");
}

#[tokio::test]
async fn positions_route_lists_catalogue() {
    let router = selection_router_with_service(service());

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/selection/positions")
                .body(axum::body::Body::empty())
                .expect("valid request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let positions = payload["positions"].as_array().expect("array");
    assert_eq!(positions.len(), 5);
    assert_eq!(positions[1]["Job Position"], "IT Developer");
    assert_eq!(positions[1]["PAPI context"], "R");
}
