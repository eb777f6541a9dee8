//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory store, a temporary
//! upload directory and a full [`AppContext`]. The [`TestHarness::with_server`]
//! constructor starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use vv_core::config::Config;
use vv_db::models::{NewVideo, Video};
use vv_db::pool::init_memory_pool;
use vv_db::store::{SqliteVideoStore, VideoStore};
use vv_server::context::AppContext;
use vv_server::router::build_router;

/// Test harness wrapping an [`AppContext`] backed by an in-memory database.
pub struct TestHarness {
    pub ctx: AppContext,
    pub store: Arc<SqliteVideoStore>,
    /// Upload directory used by `POST /video`.
    pub upload_dir: TempDir,
    /// Scratch directory for files referenced by seeded records.
    pub media_dir: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration. The upload
    /// directory is always replaced by a fresh temp dir.
    pub fn with_config(mut config: Config) -> Self {
        let upload_dir = tempfile::tempdir().expect("failed to create upload dir");
        let media_dir = tempfile::tempdir().expect("failed to create media dir");
        config.upload.dir = upload_dir.path().to_path_buf();

        let pool = init_memory_pool().expect("failed to create in-memory pool");
        let store = Arc::new(SqliteVideoStore::new(pool));
        let ctx = AppContext::new(store.clone(), config);

        Self {
            ctx,
            store,
            upload_dir,
            media_dir,
        }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let app = build_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Write a file of `len` patterned bytes into the media dir.
    pub fn create_media_file(&self, name: &str, len: usize) -> PathBuf {
        let path = self.media_dir.path().join(name);
        std::fs::write(&path, pattern(len)).expect("failed to write media file");
        path
    }

    /// Insert a record pointing at `path`.
    pub fn create_video(&self, path: &std::path::Path) -> Video {
        self.store
            .create(NewVideo {
                title: "Test Video".into(),
                description: "Test Description".into(),
                url: path.to_string_lossy().into_owned(),
                thumbnail_url: path.with_extension("jpg").to_string_lossy().into_owned(),
                size_in_kb: 1000,
                duration: 100,
            })
            .expect("failed to create video")
    }

    /// Number of entries currently in the upload directory.
    pub fn upload_count(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Deterministic non-uniform content so byte offsets can be checked.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
