use crate::infra::{AppState, SharedPlatform};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use job_platform::platform::platform_router;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_platform_routes(platform: Arc<SharedPlatform>) -> axum::Router {
    platform_router(platform)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryJobSearchProvider;
    use axum::body::Body;
    use axum::http::Request;
    use job_platform::platform::{JobPlatform, JobSearchProvider, ProjectScope};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let provider: Arc<dyn JobSearchProvider> = Arc::new(InMemoryJobSearchProvider::default());
        let mut platform: SharedPlatform = JobPlatform::new(provider, ProjectScope::new("local"));
        platform.create_tenant("tenant").expect("tenant");
        platform
            .create_company("Indigenous Development Corp", "idc-001")
            .expect("company");

        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_platform_routes(Arc::new(platform)).layer(Extension(state))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let request = Request::get("/ready").body(Body::empty()).expect("request");
        let response = app(false).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let request = Request::get("/ready").body(Body::empty()).expect("request");
        let response = app(true).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ready");
    }

    #[tokio::test]
    async fn posted_job_is_searchable() {
        let app = app(true);
        let post = Request::post("/api/v1/jobs")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "title": "Indigenous Community Liaison",
                    "description": "Working with Indigenous communities.",
                    "addresses": ["Vancouver, BC, Canada"]
                })
                .to_string(),
            ))
            .expect("request");
        let response = app.clone().oneshot(post).await.expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);

        let search = Request::post("/api/v1/jobs/search")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "query": "liaison", "location": "Canada" }).to_string(),
            ))
            .expect("request");
        let response = app.oneshot(search).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["jobs"][0]["title"], "Indigenous Community Liaison");
        assert_eq!(body["jobs"][0]["primary_location"], "Vancouver, BC, Canada");
    }
}
