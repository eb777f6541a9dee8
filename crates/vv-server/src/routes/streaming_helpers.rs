//! Range-aware file serving via `ReaderStream`.
//!
//! Reads are done in bounded chunks so memory stays flat regardless of file
//! size. The file handle lives inside the body stream: it is released when
//! the transfer completes, when a read fails, or when the client goes away
//! and hyper drops the body.

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use futures::TryStreamExt;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use vv_core::range::{self, ByteWindow, Resolution};

/// Content type of every streamed video.
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Serve `file_path`, honouring an optional `Range` header value.
///
/// Lookup and stat failures surface as errors before any header is written.
/// Once the body has started, read errors only end the stream.
pub async fn serve_file_streaming(
    file_path: &Path,
    range_header: Option<&str>,
    chunk_size: usize,
) -> Result<Response, vv_core::Error> {
    let metadata = tokio::fs::metadata(file_path).await.map_err(|e| {
        tracing::warn!(
            path = %file_path.display(),
            error = %e,
            "Media file referenced by record is missing"
        );
        vv_core::Error::not_found("file", file_path.display())
    })?;

    if !metadata.is_file() {
        tracing::warn!(path = %file_path.display(), "Media path is not a regular file");
        return Err(vv_core::Error::not_found("file", file_path.display()));
    }

    let file_size = metadata.len();

    match range::resolve(range_header, file_size)? {
        Resolution::Full => serve_full(file_path, file_size, chunk_size).await,
        Resolution::Partial(window) => serve_window(file_path, window, chunk_size).await,
    }
}

async fn open(file_path: &Path) -> Result<tokio::fs::File, vv_core::Error> {
    tokio::fs::File::open(file_path).await.map_err(|e| {
        tracing::warn!(path = %file_path.display(), error = %e, "Failed to open media file");
        vv_core::Error::not_found("file", file_path.display())
    })
}

async fn serve_full(
    file_path: &Path,
    file_size: u64,
    chunk_size: usize,
) -> Result<Response, vv_core::Error> {
    let file = open(file_path).await?;

    tracing::debug!(path = %file_path.display(), file_size, "Serving full file");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE.as_str(), VIDEO_CONTENT_TYPE.to_string()),
            (header::CONTENT_LENGTH.as_str(), file_size.to_string()),
            (header::ACCEPT_RANGES.as_str(), "bytes".to_string()),
        ],
        // Capped at the stat size so a growing file cannot overrun Content-Length.
        stream_body(file.take(file_size), chunk_size, file_path.to_path_buf()),
    )
        .into_response())
}

async fn serve_window(
    file_path: &Path,
    window: ByteWindow,
    chunk_size: usize,
) -> Result<Response, vv_core::Error> {
    let mut file = open(file_path).await?;
    file.seek(std::io::SeekFrom::Start(window.start())).await?;

    tracing::debug!(
        path = %file_path.display(),
        start = window.start(),
        end = window.end(),
        file_size = window.file_size(),
        "Serving partial content"
    );

    // Take limits reads to exactly the window length.
    let limited = file.take(window.length());

    Ok((
        StatusCode::PARTIAL_CONTENT,
        [
            (header::CONTENT_TYPE.as_str(), VIDEO_CONTENT_TYPE.to_string()),
            (header::CONTENT_RANGE.as_str(), window.content_range()),
            (header::CONTENT_LENGTH.as_str(), window.length().to_string()),
            (header::ACCEPT_RANGES.as_str(), "bytes".to_string()),
        ],
        stream_body(limited, chunk_size, file_path.to_path_buf()),
    )
        .into_response())
}

fn stream_body<R>(reader: R, chunk_size: usize, path: PathBuf) -> Body
where
    R: AsyncRead + Send + 'static,
{
    let stream = ReaderStream::with_capacity(reader, chunk_size).inspect_err(move |e| {
        tracing::warn!(path = %path.display(), error = %e, "Read failed mid-stream; ending response");
    });
    Body::from_stream(stream)
}
