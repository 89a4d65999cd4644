//! Configuration module for filehost.

use serde::Deserialize;
use std::path::Path;

use crate::{FilehostError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// File storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Path to the upload directory.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    /// External base address used to build public URLs.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Path segment between the base address and the stored filename.
    #[serde(default = "default_public_path")]
    pub public_path: String,
    /// WebP quality (0-100) for re-encoded images.
    #[serde(default = "default_image_quality")]
    pub image_quality: f32,
    /// Maximum upload size in megabytes (0 = unlimited).
    #[serde(default)]
    pub max_upload_size_mb: u64,
    /// Serve stored files under `/{public_path}` from this process.
    #[serde(default)]
    pub serve_uploads: bool,
}

/// Top-level path segments owned by the API router.
const RESERVED_PATH_SEGMENTS: &[&str] = &["files", "health", "swagger-ui", "api-docs"];

fn default_storage_path() -> String {
    "./uploads".to_string()
}

fn default_public_base_url() -> String {
    "https://cloud.cher1shrxd.me".to_string()
}

fn default_public_path() -> String {
    "uploads".to_string()
}

fn default_image_quality() -> f32 {
    85.0
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            public_base_url: default_public_base_url(),
            public_path: default_public_path(),
            image_quality: default_image_quality(),
            max_upload_size_mb: 0,
            serve_uploads: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/filehost.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// File storage configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FilehostError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FilehostError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FILEHOST_PUBLIC_BASE_URL`: Override the public base URL
    /// - `FILEHOST_STORAGE_PATH`: Override the upload directory
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var("FILEHOST_PUBLIC_BASE_URL") {
            if !base_url.is_empty() {
                self.files.public_base_url = base_url;
            }
        }
        if let Ok(storage_path) = std::env::var("FILEHOST_STORAGE_PATH") {
            if !storage_path.is_empty() {
                self.files.storage_path = storage_path;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.files.image_quality) {
            return Err(FilehostError::Config(format!(
                "image_quality must be between 0 and 100, got {}",
                self.files.image_quality
            )));
        }
        if self.files.public_base_url.trim().is_empty() {
            return Err(FilehostError::Config(
                "public_base_url must not be empty".to_string(),
            ));
        }
        if self.files.public_path.split('/').any(|seg| seg == "..") {
            return Err(FilehostError::Config(
                "public_path must not contain '..'".to_string(),
            ));
        }
        if self.files.serve_uploads {
            let first_segment = self.files.public_path.trim_matches('/').split('/').next();
            if let Some(segment) = first_segment.filter(|s| RESERVED_PATH_SEGMENTS.contains(s)) {
                return Err(FilehostError::Config(format!(
                    "public_path must not start with reserved segment '{segment}' when serve_uploads is enabled"
                )));
            }
        }
        if self.files.storage_path.trim().is_empty() {
            return Err(FilehostError::Config(
                "storage_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert!(config.server.cors_origins.is_empty());

        assert_eq!(config.files.storage_path, "./uploads");
        assert_eq!(config.files.public_base_url, "https://cloud.cher1shrxd.me");
        assert_eq!(config.files.public_path, "uploads");
        assert_eq!(config.files.image_quality, 85.0);
        assert_eq!(config.files.max_upload_size_mb, 0);
        assert!(!config.files.serve_uploads);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/filehost.log");

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
cors_origins = ["http://localhost:3000"]

[files]
storage_path = "/var/lib/filehost"
public_base_url = "http://localhost:9000"
public_path = "media"
image_quality = 70.0
max_upload_size_mb = 25
serve_uploads = true

[logging]
level = "debug"
file = "custom.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.files.storage_path, "/var/lib/filehost");
        assert_eq!(config.files.public_base_url, "http://localhost:9000");
        assert_eq!(config.files.public_path, "media");
        assert_eq!(config.files.image_quality, 70.0);
        assert_eq!(config.files.max_upload_size_mb, 25);
        assert!(config.files.serve_uploads);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom.log");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[files]
public_base_url = "https://files.example.com"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.files.public_base_url, "https://files.example.com");
        assert_eq!(config.files.storage_path, "./uploads");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.files.public_path, "uploads");
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("[server\nport = 1");
        assert!(matches!(result, Err(FilehostError::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("definitely/not/here.toml");
        assert!(matches!(result, Err(FilehostError::Io(_))));
    }

    #[test]
    fn test_validate_rejects_bad_quality() {
        let mut config = Config::default();
        config.files.image_quality = 120.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_traversing_public_path() {
        let mut config = Config::default();
        config.files.public_path = "uploads/../secret".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_public_path_clashing_with_api() {
        let mut config = Config::default();
        config.files.serve_uploads = true;

        for path in ["files", "/files/", "files/media", "health", "swagger-ui", "api-docs"] {
            config.files.public_path = path.to_string();
            assert!(
                matches!(config.validate(), Err(FilehostError::Config(_))),
                "{path} should be rejected"
            );
        }

        config.files.public_path = "filestore".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_allows_api_segment_without_serving() {
        let mut config = Config::default();
        config.files.public_path = "files".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_base_url() {
        let mut config = Config::default();
        config.files.public_base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
