//! Video record CRUD operations.

use chrono::Utc;
use rusqlite::Connection;
use vv_core::{Error, Result, VideoId};

use crate::models::{NewVideo, Video};

const COLS: &str = "id, title, description, url, thumbnail_url, size_in_kb, duration,
    created_at, updated_at";

/// Create a new video record.
pub fn create_video(conn: &Connection, new: &NewVideo) -> Result<Video> {
    let id = VideoId::new();
    let now = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO videos (id, title, description, url, thumbnail_url,
            size_in_kb, duration, created_at, updated_at)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
        rusqlite::params![
            id.to_string(),
            new.title,
            new.description,
            new.url,
            new.thumbnail_url,
            new.size_in_kb,
            new.duration,
            now,
            now,
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Video {
        id,
        title: new.title.clone(),
        description: new.description.clone(),
        url: new.url.clone(),
        thumbnail_url: new.thumbnail_url.clone(),
        size_in_kb: new.size_in_kb,
        duration: new.duration,
        created_at: now.clone(),
        updated_at: now,
    })
}

/// Get a video by ID.
pub fn get_video(conn: &Connection, id: VideoId) -> Result<Option<Video>> {
    let q = format!("SELECT {COLS} FROM videos WHERE id = ?1");
    let result = conn.query_row(&q, [id.to_string()], Video::from_row);
    match result {
        Ok(v) => Ok(Some(v)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}
