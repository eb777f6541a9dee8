//! Video streaming with HTTP range request support.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::Response;
use vv_core::VideoId;

use crate::context::AppContext;
use crate::error::AppError;

/// GET /streaming/:id
///
/// Serve the stored video, or the byte window named by the `Range` header.
#[utoipa::path(
    get,
    path = "/streaming/{id}",
    params(
        ("id" = String, Path, description = "Video ID"),
        ("Range" = Option<String>, Header, description = "Single byte range, e.g. bytes=0-1023")
    ),
    responses(
        (status = 200, description = "Entire file"),
        (status = 206, description = "Requested byte window"),
        (status = 404, description = "Video or its file not found"),
        (status = 416, description = "Malformed or unsatisfiable range")
    )
)]
pub async fn stream_video(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    // Ids are opaque to clients: anything unparseable is simply unknown.
    let video_id: VideoId = id
        .parse()
        .map_err(|_| vv_core::Error::not_found("video", &id))?;

    let video = ctx
        .store
        .find_by_id(video_id)?
        .ok_or_else(|| vv_core::Error::not_found("video", video_id))?;

    let range_header = headers
        .get(header::RANGE)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    Ok(super::streaming_helpers::serve_file_streaming(
        std::path::Path::new(&video.url),
        range_header.as_deref(),
        ctx.config.streaming.effective_chunk_size(),
    )
    .await?)
}
