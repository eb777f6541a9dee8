//! Rust structs mapping to database tables.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`.

use uuid::Uuid;
use vv_core::VideoId;

/// Parse a UUID-based ID from a text column.
fn parse_id<T: From<Uuid>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    let s: String = row.get(idx)?;
    let uuid = Uuid::parse_str(&s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(T::from(uuid))
}

// ---------------------------------------------------------------------------
// Video
// ---------------------------------------------------------------------------

/// Metadata for one uploaded video/thumbnail pair.
///
/// `url` and `thumbnail_url` are storage paths on the local filesystem.
/// `size_in_kb` and `duration` are declared values and are never used for
/// byte-range math.
#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    pub description: String,
    pub url: String,
    pub thumbnail_url: String,
    pub size_in_kb: i64,
    pub duration: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl Video {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            url: row.get(3)?,
            thumbnail_url: row.get(4)?,
            size_in_kb: row.get(5)?,
            duration: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

/// Fields supplied when creating a [`Video`]; the store assigns the id and
/// timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVideo {
    pub title: String,
    pub description: String,
    pub url: String,
    pub thumbnail_url: String,
    pub size_in_kb: i64,
    pub duration: i64,
}
