use super::common::*;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::platform::provider::ProviderFailure;
use crate::platform::query::SearchMode;
use crate::platform::router::platform_router;

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn posting_a_job_returns_created() {
    let provider = Arc::new(RecordingProvider::default());
    let (platform, _, _) = registered_platform(provider.clone());
    let app = platform_router(Arc::new(platform));

    let response = app
        .oneshot(json_request(
            "/api/v1/jobs",
            json!({
                "title": "Cultural Program Manager",
                "description": "Managing cultural programs and events.",
                "addresses": ["Toronto, ON, Canada"],
                "benefits": ["PAID_TIME_OFF"],
                "custom_attributes": {
                    "indigenous_focused": { "string_values": ["true"], "filterable": true }
                }
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["title"], "Cultural Program Manager");
    assert_eq!(body["benefits"], json!(["PAID_TIME_OFF"]));
    assert_eq!(provider.jobs().len(), 1);
}

#[tokio::test]
async fn invalid_job_returns_unprocessable() {
    let provider = Arc::new(RecordingProvider::default());
    let (platform, _, _) = registered_platform(provider);
    let app = platform_router(Arc::new(platform));

    let response = app
        .oneshot(json_request(
            "/api/v1/jobs",
            json!({ "description": "No title here." }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "title required");
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn unregistered_platform_returns_conflict() {
    let provider = Arc::new(RecordingProvider::default());
    let app = platform_router(Arc::new(platform_with(provider.clone())));

    let response = app
        .oneshot(json_request(
            "/api/v1/jobs/search",
            json!({ "query": "Indigenous" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn search_returns_mapped_jobs() {
    let provider = Arc::new(RecordingProvider::with_matches(canned_matches()));
    let (platform, _, _) = registered_platform(provider);
    let app = platform_router(Arc::new(platform));

    let response = app
        .oneshot(json_request(
            "/api/v1/jobs/search",
            json!({ "query": "Indigenous", "location": "Canada" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let jobs = body["jobs"].as_array().expect("jobs array");
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0]["primary_location"], "Vancouver, BC, Canada");
    assert_eq!(jobs[1]["primary_location"], "no location");
}

#[tokio::test]
async fn retryable_provider_failure_returns_service_unavailable() {
    let provider = Arc::new(RecordingProvider::default());
    let (platform, _, _) = registered_platform(provider.clone());
    provider.fail_with(ProviderFailure::Unavailable("connection reset".to_string()));
    let app = platform_router(Arc::new(platform));

    let response = app
        .oneshot(json_request(
            "/api/v1/jobs/search",
            json!({ "query": "Indigenous" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = read_json_body(response).await;
    assert_eq!(body["retryable"], true);
}

#[tokio::test]
async fn search_mode_is_forwarded_to_provider() {
    let provider = Arc::new(RecordingProvider::default());
    let (platform, _, _) = registered_platform(provider.clone());
    let app = platform_router(Arc::new(platform));

    let response = app
        .oneshot(json_request(
            "/api/v1/jobs/search",
            json!({
                "query": "  Liaison ",
                "location": " ",
                "filters": { "indigenous_focused": "true" },
                "mode": "FEATURED_JOB_SEARCH"
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let queries = provider.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].text, "Liaison");
    assert_eq!(queries[0].location_filter, None);
    assert_eq!(queries[0].mode, SearchMode::FeaturedJobSearch);
    assert_eq!(
        queries[0].attribute_filters.get("indigenous_focused").map(String::as_str),
        Some("true")
    );
}
