//! Multipart upload pipeline.
//!
//! The stages are plain functions composed by the `POST /video` handler:
//! [`parse_upload`] walks the multipart fields, checking each file's MIME
//! type with [`validate_mime_type`] and streaming it to disk under a
//! generated name; [`UploadForm::to_new_video`] then checks the form is
//! complete and produces the record to persist.

use std::path::{Path, PathBuf};

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use tokio::io::AsyncWriteExt;
use vv_core::storage::{extension_of, generate_storage_name};
use vv_core::{Error, Result};
use vv_db::models::NewVideo;

/// MIME types accepted for uploaded files.
pub const ALLOWED_MIME_TYPES: &[&str] = &["video/mp4", "image/jpeg"];

/// A file written to the upload directory.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub path: PathBuf,
    pub bytes_written: u64,
}

/// Everything collected from one multipart upload.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub size_in_kb: Option<i64>,
    pub duration: Option<i64>,
    pub video: Option<StoredFile>,
    pub thumbnail: Option<StoredFile>,
}

/// Reject content types outside [`ALLOWED_MIME_TYPES`].
///
/// Matching is by prefix so parameters such as `; codecs=...` are tolerated.
pub fn validate_mime_type(content_type: Option<&str>) -> Result<()> {
    let allowed = content_type
        .map(|ct| ct.trim().to_ascii_lowercase())
        .is_some_and(|ct| ALLOWED_MIME_TYPES.iter().any(|m| ct.starts_with(m)));

    if allowed {
        Ok(())
    } else {
        Err(Error::Validation(
            "Invalid file type. Only mp4 and jpeg files are allowed.".into(),
        ))
    }
}

fn multipart_error(e: MultipartError) -> Error {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge(e.body_text())
    } else {
        Error::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}

fn parse_integer(name: &str, value: &str) -> Result<i64> {
    let n: i64 = value
        .trim()
        .parse()
        .map_err(|_| Error::Validation(format!("{name} must be an integer")))?;
    if n < 0 {
        return Err(Error::Validation(format!("{name} must not be negative")));
    }
    Ok(n)
}

/// Read every field of `multipart`, writing file fields into `upload_dir`.
///
/// On failure any file already written for this request is removed.
pub async fn parse_upload(multipart: &mut Multipart, upload_dir: &Path) -> Result<UploadForm> {
    let mut form = UploadForm::default();
    match collect_fields(multipart, upload_dir, &mut form).await {
        Ok(()) => Ok(form),
        Err(e) => {
            form.discard().await;
            Err(e)
        }
    }
}

async fn collect_fields(
    multipart: &mut Multipart,
    upload_dir: &Path,
    form: &mut UploadForm,
) -> Result<()> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "video" | "thumbnail" => {
                let slot = if name == "video" {
                    &mut form.video
                } else {
                    &mut form.thumbnail
                };
                if slot.is_some() {
                    return Err(Error::Validation(format!("Only one {name} file is allowed")));
                }
                validate_mime_type(field.content_type())?;
                *slot = Some(store_field(&mut field, upload_dir).await?);
            }
            "title" => form.title = Some(field.text().await.map_err(multipart_error)?),
            "description" => {
                form.description = Some(field.text().await.map_err(multipart_error)?)
            }
            "sizeInKb" => {
                let text = field.text().await.map_err(multipart_error)?;
                form.size_in_kb = Some(parse_integer("sizeInKb", &text)?);
            }
            "duration" => {
                let text = field.text().await.map_err(multipart_error)?;
                form.duration = Some(parse_integer("duration", &text)?);
            }
            other => {
                tracing::debug!(field = other, "Ignoring unexpected upload field");
            }
        }
    }
    Ok(())
}

/// Stream one file field to a freshly named file in `upload_dir`.
async fn store_field(field: &mut Field<'_>, upload_dir: &Path) -> Result<StoredFile> {
    let ext = field.file_name().map(extension_of).unwrap_or_default().to_string();
    let path = upload_dir.join(generate_storage_name(&ext));

    match copy_field(field, &path).await {
        Ok(bytes_written) => {
            tracing::debug!(path = %path.display(), bytes_written, "Stored upload field");
            Ok(StoredFile {
                path,
                bytes_written,
            })
        }
        Err(e) => {
            remove_quietly(&path).await;
            Err(e)
        }
    }
}

async fn copy_field(field: &mut Field<'_>, path: &Path) -> Result<u64> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written = 0u64;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove upload");
        }
    }
}

impl UploadForm {
    /// Remove every file this form wrote to disk.
    pub async fn discard(&self) {
        for stored in [&self.video, &self.thumbnail].into_iter().flatten() {
            remove_quietly(&stored.path).await;
        }
    }

    /// Check the form is complete and build the record to persist.
    ///
    /// Declared size defaults to the stored video size in KiB (rounded up);
    /// declared duration defaults to 0.
    pub fn to_new_video(&self) -> Result<NewVideo> {
        let (Some(video), Some(thumbnail)) = (&self.video, &self.thumbnail) else {
            return Err(Error::Validation(
                "Both video and thumbnail are required".into(),
            ));
        };

        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Validation("title is required".into()))?;

        let size_in_kb = match self.size_in_kb {
            Some(kb) => kb,
            None => i64::try_from(video.bytes_written.div_ceil(1024))
                .map_err(|_| Error::Validation("video is too large".into()))?,
        };

        Ok(NewVideo {
            title: title.to_string(),
            description: self.description.clone().unwrap_or_default(),
            url: video.path.to_string_lossy().into_owned(),
            thumbnail_url: thumbnail.path.to_string_lossy().into_owned(),
            size_in_kb,
            duration: self.duration.unwrap_or(0),
        })
    }
}
