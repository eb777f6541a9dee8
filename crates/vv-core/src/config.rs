//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! server, upload, and streaming sections. Every section defaults sensibly so
//! a completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub streaming: StreamingConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file, failing if it cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.upload.max_upload_mb == 0 {
            warnings.push("upload.max_upload_mb is 0; every upload will be rejected".into());
        }

        if self.streaming.chunk_size < MIN_CHUNK_SIZE {
            warnings.push(format!(
                "streaming.chunk_size {} is below {MIN_CHUNK_SIZE}; using {MIN_CHUNK_SIZE}",
                self.streaming.chunk_size
            ));
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            db_path: PathBuf::from("./data/vidvault.db"),
        }
    }
}

/// Upload storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory uploaded files are written to.
    pub dir: PathBuf,
    /// Maximum accepted request body for `POST /video`, in megabytes.
    pub max_upload_mb: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./uploads"),
            max_upload_mb: 512,
        }
    }
}

impl UploadConfig {
    /// Body limit in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        usize::try_from(self.max_upload_mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
    }
}

/// Smallest read buffer the streaming responder will use.
pub const MIN_CHUNK_SIZE: usize = 4 * 1024;

/// Streaming settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Read buffer size for streamed response bodies, in bytes.
    pub chunk_size: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 64 * 1024,
        }
    }
}

impl StreamingConfig {
    /// Chunk size clamped to [`MIN_CHUNK_SIZE`].
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(MIN_CHUNK_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.upload.dir, PathBuf::from("./uploads"));
        assert_eq!(cfg.streaming.chunk_size, 64 * 1024);
    }

    #[test]
    fn default_config_no_warnings() {
        let cfg = Config::default();
        let warnings = cfg.validate();
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn tiny_chunk_size_warns_and_is_clamped() {
        let mut cfg = Config::default();
        cfg.streaming.chunk_size = 16;
        assert!(cfg.validate().iter().any(|w| w.contains("chunk_size")));
        assert_eq!(cfg.streaming.effective_chunk_size(), MIN_CHUNK_SIZE);
    }

    #[test]
    fn zero_upload_limit_warns() {
        let mut cfg = Config::default();
        cfg.upload.max_upload_mb = 0;
        assert!(cfg.validate().iter().any(|w| w.contains("max_upload_mb")));
    }

    #[test]
    fn max_upload_bytes_converts_megabytes() {
        let cfg = UploadConfig {
            dir: PathBuf::from("u"),
            max_upload_mb: 2,
        };
        assert_eq!(cfg.max_upload_bytes(), 2 * 1024 * 1024);
    }

    #[test]
    fn parse_json_config() {
        let json = r#"{"server": {"port": 9090}, "upload": {"dir": "/srv/media"}}"#;
        let cfg = Config::from_json(json).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.upload.dir, PathBuf::from("/srv/media"));
        assert_eq!(cfg.upload.max_upload_mb, 512);
    }

    #[test]
    fn parse_empty_json_uses_defaults() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn parse_invalid_json_is_validation_error() {
        let err = Config::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn load_or_default_with_none() {
        let cfg = Config::load_or_default(None);
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn load_or_default_with_missing_file() {
        let cfg = Config::load_or_default(Some(Path::new("/nonexistent/vidvault.json")));
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"streaming": {"chunk_size": 8192}}"#).unwrap();
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.streaming.chunk_size, 8192);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Config::load(Path::new("/nonexistent/vidvault.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
