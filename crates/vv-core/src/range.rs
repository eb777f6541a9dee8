//! `Range` header parsing and byte-window resolution.
//!
//! Only a single `bytes=<start>-[<end>]` range is accepted. Parsing is split
//! from resolution: [`parse_range`] validates the header syntax, and
//! [`RangeRequest::resolve`] applies it to the real on-disk size of the file.

use crate::error::{Error, Result};

/// A syntactically valid single-range request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRequest {
    pub start: u64,
    /// `None` for open-ended ranges like `bytes=500-`.
    pub end: Option<u64>,
}

/// Why a `Range` header was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("malformed Range header: {0}")]
    Malformed(String),

    #[error("range start {start} is beyond end of file ({file_size} bytes)")]
    Unsatisfiable { start: u64, file_size: u64 },
}

impl RangeError {
    /// Convert into the crate error, carrying the file size for `Content-Range`.
    pub fn into_error(self, file_size: u64) -> Error {
        Error::range_not_satisfiable(self.to_string(), file_size)
    }
}

/// An inclusive byte window guaranteed to lie inside the file.
///
/// Invariant: `start <= end < file_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteWindow {
    start: u64,
    end: u64,
    file_size: u64,
}

impl ByteWindow {
    /// Build a window, returning `None` if the bounds break the invariant.
    pub fn new(start: u64, end: u64, file_size: u64) -> Option<Self> {
        if start > end || end >= file_size {
            return None;
        }
        Some(Self {
            start,
            end,
            file_size,
        })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Number of bytes in the window (`end - start + 1`).
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Value for the `Content-Range` response header.
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.file_size)
    }
}

/// Outcome of resolving an optional `Range` header against a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No range requested; serve the whole file with 200.
    Full,
    /// Serve only this window with 206.
    Partial(ByteWindow),
}

const BYTES_UNIT: &str = "bytes=";

/// Parse a `Range` header value.
///
/// Returns `Ok(None)` for an empty value.
pub fn parse_range(value: &str) -> std::result::Result<Option<RangeRequest>, RangeError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let spec = match value.get(..BYTES_UNIT.len()) {
        Some(unit) if unit.eq_ignore_ascii_case(BYTES_UNIT) => &value[BYTES_UNIT.len()..],
        _ => {
            return Err(RangeError::Malformed(format!(
                "expected a bytes range, got {value:?}"
            )))
        }
    };

    if spec.contains(',') {
        return Err(RangeError::Malformed(
            "multiple ranges are not supported".into(),
        ));
    }

    let (start_str, end_str) = match spec.split_once('-') {
        Some((start, end)) => (start.trim(), end.trim()),
        None => (spec.trim(), ""),
    };

    if start_str.is_empty() {
        return Err(RangeError::Malformed("missing range start".into()));
    }

    let start = parse_bound(start_str)?;
    let end = if end_str.is_empty() {
        None
    } else {
        Some(parse_bound(end_str)?)
    };

    if let Some(end) = end {
        if start > end {
            return Err(RangeError::Malformed(format!(
                "range start {start} is after end {end}"
            )));
        }
    }

    Ok(Some(RangeRequest { start, end }))
}

fn parse_bound(s: &str) -> std::result::Result<u64, RangeError> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RangeError::Malformed(format!("{s:?} is not a byte offset")));
    }
    s.parse()
        .map_err(|_| RangeError::Malformed(format!("{s:?} is out of range")))
}

impl RangeRequest {
    /// Apply this request to a file of `file_size` bytes.
    ///
    /// A missing end means "through the last byte"; an end past the last byte
    /// is clamped. A start at or past the end of the file is unsatisfiable.
    pub fn resolve(&self, file_size: u64) -> std::result::Result<ByteWindow, RangeError> {
        let unsatisfiable = RangeError::Unsatisfiable {
            start: self.start,
            file_size,
        };
        if self.start >= file_size {
            return Err(unsatisfiable);
        }

        let last = file_size - 1;
        let end = self.end.map_or(last, |end| end.min(last));

        ByteWindow::new(self.start, end, file_size).ok_or(unsatisfiable)
    }
}

/// Resolve an optional `Range` header against a file of `file_size` bytes.
pub fn resolve(range_header: Option<&str>, file_size: u64) -> Result<Resolution> {
    let Some(header) = range_header else {
        return Ok(Resolution::Full);
    };

    match parse_range(header) {
        Ok(None) => Ok(Resolution::Full),
        Ok(Some(request)) => request
            .resolve(file_size)
            .map(Resolution::Partial)
            .map_err(|e| e.into_error(file_size)),
        Err(e) => Err(e.into_error(file_size)),
    }
}
