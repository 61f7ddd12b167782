use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::builder::JobRequest;
use super::error::PlatformError;
use super::facade::JobPlatform;
use super::provider::JobSearchProvider;
use super::query::{translate, AttributeFilters, SearchMode};

/// Body accepted by the search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub filters: Option<AttributeFilters>,
    #[serde(default)]
    pub mode: SearchMode,
}

/// Router exposing job posting and search over HTTP.
///
/// The tenant and company must already be registered on `platform`; requests
/// arriving earlier are answered with `409 Conflict`.
pub fn platform_router<P>(platform: Arc<JobPlatform<P>>) -> Router
where
    P: JobSearchProvider + ?Sized + 'static,
{
    Router::new()
        .route("/api/v1/jobs", post(post_job_handler::<P>))
        .route("/api/v1/jobs/search", post(search_handler::<P>))
        .with_state(platform)
}

pub(crate) async fn post_job_handler<P>(
    State(platform): State<Arc<JobPlatform<P>>>,
    axum::Json(request): axum::Json<JobRequest>,
) -> Response
where
    P: JobSearchProvider + ?Sized + 'static,
{
    // Provider calls block; keep them off the async workers.
    let outcome = tokio::task::spawn_blocking(move || -> Result<_, PlatformError> {
        let company = platform.registry().company()?.clone();
        platform.post_job(&company, request)
    })
    .await;

    match outcome {
        Ok(Ok(posting)) => (StatusCode::CREATED, axum::Json(posting)).into_response(),
        Ok(Err(err)) => platform_error_response(err),
        Err(join_error) => internal_error_response(join_error),
    }
}

pub(crate) async fn search_handler<P>(
    State(platform): State<Arc<JobPlatform<P>>>,
    axum::Json(request): axum::Json<SearchRequest>,
) -> Response
where
    P: JobSearchProvider + ?Sized + 'static,
{
    let outcome = tokio::task::spawn_blocking(move || -> Result<_, PlatformError> {
        let tenant = platform.registry().tenant()?.clone();
        let query = translate(&request.query, request.location.as_deref(), request.filters)?
            .with_mode(request.mode);
        platform.run_search(&tenant, &query)
    })
    .await;

    match outcome {
        Ok(Ok(jobs)) => (StatusCode::OK, axum::Json(json!({ "jobs": jobs }))).into_response(),
        Ok(Err(err)) => platform_error_response(err),
        Err(join_error) => internal_error_response(join_error),
    }
}

fn platform_error_response(err: PlatformError) -> Response {
    let status = match &err {
        PlatformError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PlatformError::State(_) => StatusCode::CONFLICT,
        PlatformError::Provider(provider) if provider.retryable => StatusCode::SERVICE_UNAVAILABLE,
        PlatformError::Provider(_) => StatusCode::BAD_GATEWAY,
    };

    let payload = json!({
        "error": err.to_string(),
        "retryable": err.is_retryable(),
    });
    (status, axum::Json(payload)).into_response()
}

fn internal_error_response(join_error: tokio::task::JoinError) -> Response {
    error!(error = %join_error, "platform task failed");
    let payload = json!({ "error": "internal error" });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
