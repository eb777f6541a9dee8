//! The [`VideoStore`] trait: the record-store capability handed to handlers.

use vv_core::{Result, VideoId};

use crate::models::{NewVideo, Video};
use crate::pool::{get_conn, DbPool};
use crate::queries::videos;

/// Lookup and creation of video records.
///
/// Implementations must be safe to share across threads (`Send + Sync`).
/// The owner of the process decides when the underlying connection is
/// opened and closed; implementations only use it.
pub trait VideoStore: Send + Sync {
    /// Fetch a record by id, or `None` if it does not exist.
    fn find_by_id(&self, id: VideoId) -> Result<Option<Video>>;

    /// Persist a new record and return it with its assigned id and timestamps.
    fn create(&self, new: NewVideo) -> Result<Video>;
}

/// [`VideoStore`] backed by the SQLite pool.
#[derive(Clone)]
pub struct SqliteVideoStore {
    pool: DbPool,
}

impl SqliteVideoStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl VideoStore for SqliteVideoStore {
    fn find_by_id(&self, id: VideoId) -> Result<Option<Video>> {
        let conn = get_conn(&self.pool)?;
        videos::get_video(&conn, id)
    }

    fn create(&self, new: NewVideo) -> Result<Video> {
        let conn = get_conn(&self.pool)?;
        let video = videos::create_video(&conn, &new)?;
        tracing::debug!(video_id = %video.id, title = %video.title, "Video record created");
        Ok(video)
    }
}
