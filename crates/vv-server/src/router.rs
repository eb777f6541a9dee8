//! Axum router construction.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::hello,
        routes::health::health_check,
        routes::videos::upload_video,
        routes::videos::get_video,
        routes::stream::stream_video,
    ),
    components(schemas(
        routes::health::HealthResponse,
        routes::videos::VideoResponse,
    ))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let upload_limit = DefaultBodyLimit::max(ctx.config.upload.max_upload_bytes());

    Router::new()
        .route("/", get(routes::health::hello))
        .route("/health", get(routes::health::health_check))
        .route(
            "/video",
            post(routes::videos::upload_video).layer(upload_limit),
        )
        .route("/video/{id}", get(routes::videos::get_video))
        .route("/streaming/{id}", get(routes::stream::stream_video))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
