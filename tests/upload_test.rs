//! Integration tests for `POST /video`.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use reqwest::multipart::{Form, Part};
use tower::ServiceExt;
use vv_core::config::Config;

use common::{pattern, TestHarness};

fn file_part(bytes: Vec<u8>, name: &str, mime: &str) -> Part {
    Part::bytes(bytes).file_name(name.to_string()).mime_str(mime).unwrap()
}

fn upload_form(video_mime: &str, thumb_mime: &str) -> Form {
    Form::new()
        .text("title", "Test Video")
        .text("description", "Test Description")
        .part("video", file_part(pattern(5000), "clip.mp4", video_mime))
        .part("thumbnail", file_part(vec![0xFF, 0xD8, 0xFF, 0xE0], "thumb.jpg", thumb_mime))
}

async fn post_form(addr: std::net::SocketAddr, form: Form) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{addr}/video"))
        .multipart(form)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn upload_creates_record() {
    let (h, addr) = TestHarness::with_server().await;

    let form = upload_form("video/mp4", "image/jpeg")
        .text("sizeInKb", "1000")
        .text("duration", "100");
    let resp = post_form(addr, form).await;
    assert_eq!(resp.status(), 201);

    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["title"], "Test Video");
    assert_eq!(json["description"], "Test Description");
    assert_eq!(json["sizeInKb"], 1000);
    assert_eq!(json["duration"], 100);
    assert!(json["url"].as_str().unwrap().ends_with(".mp4"));
    assert!(json["thumbnailUrl"].as_str().unwrap().ends_with(".jpg"));
    assert!(json["createdAt"].is_string());

    // Both files landed in the upload dir, and the record is readable.
    assert_eq!(h.upload_count(), 2);
    let stored = std::fs::read(json["url"].as_str().unwrap()).unwrap();
    assert_eq!(stored, pattern(5000));

    let id = json["id"].as_str().unwrap();
    let resp = reqwest::get(format!("http://{addr}/video/{id}")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let fetched: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(fetched["id"], json["id"]);
}

#[tokio::test]
async fn declared_size_defaults_to_file_size() {
    let (_h, addr) = TestHarness::with_server().await;

    let resp = post_form(addr, upload_form("video/mp4", "image/jpeg")).await;
    assert_eq!(resp.status(), 201);
    let json: serde_json::Value = resp.json().await.unwrap();
    // 5000 bytes rounds up to 5 KiB.
    assert_eq!(json["sizeInKb"], 5);
    assert_eq!(json["duration"], 0);
}

#[tokio::test]
async fn uploaded_video_can_be_streamed() {
    let (_h, addr) = TestHarness::with_server().await;

    let resp = post_form(addr, upload_form("video/mp4", "image/jpeg")).await;
    let json: serde_json::Value = resp.json().await.unwrap();
    let id = json["id"].as_str().unwrap();

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/streaming/{id}"))
        .header("range", "bytes=100-199")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 206);
    assert_eq!(
        resp.headers().get("content-range").unwrap().to_str().unwrap(),
        "bytes 100-199/5000"
    );
    let body = resp.bytes().await.unwrap();
    assert_eq!(&body[..], &pattern(5000)[100..200]);
}

#[tokio::test]
async fn invalid_mime_type_is_rejected_and_cleaned_up() {
    let (h, addr) = TestHarness::with_server().await;

    // The video is written before the bad thumbnail is seen.
    let resp = post_form(addr, upload_form("video/mp4", "image/png")).await;
    assert_eq!(resp.status(), 400);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["code"], "validation_error");
    assert!(json["error"].as_str().unwrap().contains("Invalid file type"));

    assert_eq!(h.upload_count(), 0);
}

#[tokio::test]
async fn missing_thumbnail_is_rejected() {
    let (h, addr) = TestHarness::with_server().await;

    let form = Form::new()
        .text("title", "No thumb")
        .part("video", file_part(pattern(100), "clip.mp4", "video/mp4"));
    let resp = post_form(addr, form).await;
    assert_eq!(resp.status(), 400);
    assert_eq!(h.upload_count(), 0);
}

#[tokio::test]
async fn missing_title_is_rejected() {
    let (h, addr) = TestHarness::with_server().await;

    let form = Form::new()
        .part("video", file_part(pattern(100), "clip.mp4", "video/mp4"))
        .part("thumbnail", file_part(vec![1, 2, 3], "t.jpg", "image/jpeg"));
    let resp = post_form(addr, form).await;
    assert_eq!(resp.status(), 400);
    assert_eq!(h.upload_count(), 0);
}

#[tokio::test]
async fn oversized_upload_is_413() {
    let mut config = Config::default();
    config.upload.max_upload_mb = 1;
    let h = TestHarness::with_config(config);
    let app = vv_server::router::build_router(h.ctx.clone());

    let boundary = "vvboundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"video\"; filename=\"big.mp4\"\r\nContent-Type: video/mp4\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend(pattern(2 * 1024 * 1024));
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let req = Request::builder()
        .method("POST")
        .uri("/video")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(h.upload_count(), 0);
}
