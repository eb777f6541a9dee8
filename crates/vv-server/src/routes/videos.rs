//! Video upload and metadata route handlers.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use vv_core::VideoId;

use crate::context::AppContext;
use crate::error::AppError;
use crate::upload;

/// Video record response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub thumbnail_url: String,
    pub size_in_kb: i64,
    pub duration: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl VideoResponse {
    fn from_model(video: &vv_db::models::Video) -> Self {
        Self {
            id: video.id.to_string(),
            title: video.title.clone(),
            description: video.description.clone(),
            url: video.url.clone(),
            thumbnail_url: video.thumbnail_url.clone(),
            size_in_kb: video.size_in_kb,
            duration: video.duration,
            created_at: video.created_at.clone(),
            updated_at: video.updated_at.clone(),
        }
    }
}

/// POST /video
///
/// Multipart fields: `video` (mp4), `thumbnail` (jpeg), `title`,
/// `description`, and optionally `sizeInKb` and `duration`.
#[utoipa::path(
    post,
    path = "/video",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Video stored", body = VideoResponse),
        (status = 400, description = "Invalid file type or missing fields"),
        (status = 413, description = "Upload exceeds the configured limit")
    )
)]
pub async fn upload_video(
    State(ctx): State<AppContext>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<VideoResponse>), AppError> {
    let upload_dir = &ctx.config.upload.dir;
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(vv_core::Error::from)?;

    let form = upload::parse_upload(&mut multipart, upload_dir).await?;

    let new = match form.to_new_video() {
        Ok(new) => new,
        Err(e) => {
            form.discard().await;
            return Err(e.into());
        }
    };

    let video = match ctx.store.create(new) {
        Ok(video) => video,
        Err(e) => {
            form.discard().await;
            return Err(e.into());
        }
    };

    tracing::info!(
        video_id = %video.id,
        url = %video.url,
        size_in_kb = video.size_in_kb,
        "Video uploaded"
    );

    Ok((StatusCode::CREATED, Json(VideoResponse::from_model(&video))))
}

/// GET /video/:id
#[utoipa::path(
    get,
    path = "/video/{id}",
    params(("id" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video metadata", body = VideoResponse),
        (status = 404, description = "Video not found")
    )
)]
pub async fn get_video(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<VideoResponse>, AppError> {
    let video_id: VideoId = id
        .parse()
        .map_err(|_| vv_core::Error::not_found("video", &id))?;

    let video = ctx
        .store
        .find_by_id(video_id)?
        .ok_or_else(|| vv_core::Error::not_found("video", video_id))?;

    Ok(Json(VideoResponse::from_model(&video)))
}
