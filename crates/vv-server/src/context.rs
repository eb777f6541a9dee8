//! Application context shared by all route handlers via Axum state.

use std::sync::Arc;

use vv_core::config::Config;
use vv_db::store::VideoStore;

/// Application context shared by all request handlers (via Axum state).
///
/// This is cheaply cloneable because it only holds `Arc`s. The record store
/// is injected by whoever owns the process lifecycle.
#[derive(Clone)]
pub struct AppContext {
    /// Video record store.
    pub store: Arc<dyn VideoStore>,
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
}

impl AppContext {
    pub fn new(store: Arc<dyn VideoStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
