//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | `postgres://localhost/docvault` |
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `3000` |
//! | `ALLOWED_ORIGINS` | unset (any origin) |
//! | `OBJECT_STORE` | `cloudinary` (`filesystem` for local development) |
//! | `FILE_STORAGE_PATH` | `/var/lib/docvault/files` |
//! | `FILE_PUBLIC_BASE_URL` | `http://localhost:{PORT}/files` |
//!
//! Cloudinary credentials are read by `CloudinaryConfig::from_env`, pool
//! tuning by `PoolConfig::from_env`.

use axum::http::HeaderValue;
use tracing::warn;

use docvault_core::{Error, Result};

/// Mount point for files served by the filesystem store.
pub const FILES_ROUTE: &str = "/files";

/// Which object store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Cloudinary,
    Filesystem,
}

impl std::str::FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cloudinary" => Ok(StoreBackend::Cloudinary),
            "filesystem" | "fs" | "local" => Ok(StoreBackend::Filesystem),
            other => Err(Error::Config(format!(
                "OBJECT_STORE must be 'cloudinary' or 'filesystem', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<HeaderValue>,
    pub store: StoreBackend,
    pub file_storage_path: String,
    pub file_public_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/docvault".to_string());
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);

        let store = std::env::var("OBJECT_STORE")
            .map(|v| v.parse::<StoreBackend>())
            .unwrap_or(Ok(StoreBackend::Cloudinary))?;

        let file_storage_path = std::env::var("FILE_STORAGE_PATH")
            .unwrap_or_else(|_| "/var/lib/docvault/files".to_string());
        let file_public_base_url = std::env::var("FILE_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}{}", port, FILES_ROUTE));

        Ok(Self {
            database_url,
            host,
            port,
            allowed_origins: parse_allowed_origins(
                std::env::var("ALLOWED_ORIGINS").ok().as_deref(),
            ),
            store,
            file_storage_path,
            file_public_base_url,
        })
    }
}

/// Parse a comma-separated origin list.
///
/// An empty result means any origin is allowed. Unparseable entries are
/// skipped with a warning.
pub fn parse_allowed_origins(raw: Option<&str>) -> Vec<HeaderValue> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == "*" {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}
