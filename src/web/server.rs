//! Web server for filehost.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::Config;
use crate::file::{FileService, LocalStore, UrlBuilder};
use crate::{FilehostError, Result};

use super::handlers::AppState;
use super::router::{
    create_health_router, create_router, create_swagger_router, create_uploads_router,
};

/// Web server for the file API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Absolute path of the storage directory.
    storage_path: PathBuf,
    /// Configuration.
    config: Config,
}

impl WebServer {
    /// Create a new web server.
    ///
    /// Validates the configuration and opens (and if needed creates) the
    /// storage directory.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| FilehostError::Config(format!("invalid server address: {e}")))?;

        let store = LocalStore::new(&config.files.storage_path)?;
        let storage_path = store.base_path().to_path_buf();
        tracing::info!("File storage initialized at: {}", storage_path.display());

        let files = FileService::new(Arc::new(store), UrlBuilder::from_config(&config.files))
            .with_image_quality(config.files.image_quality);

        Ok(Self {
            addr,
            app_state: Arc::new(AppState::new(files)),
            storage_path,
            config: config.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get the absolute path of the storage directory.
    pub fn storage_path(&self) -> &PathBuf {
        &self.storage_path
    }

    fn build_router(&self) -> Router {
        let mut router = create_router(
            self.app_state.clone(),
            &self.config.server.cors_origins,
            self.config.files.max_upload_size_mb,
        )
        .merge(create_health_router())
        .merge(create_swagger_router());

        if self.config.files.serve_uploads {
            router = router.merge(create_uploads_router(
                &self.config.files.public_path,
                &self.storage_path,
            ));
            tracing::info!(
                "Serving stored files under /{}",
                self.config.files.public_path.trim_matches('/')
            );
        }

        router.layer(CompressionLayer::new())
    }

    /// Run the web server.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config(temp_dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.files.storage_path = temp_dir
            .path()
            .join("uploads")
            .to_string_lossy()
            .into_owned();
        config
    }

    #[test]
    fn test_web_server_new() {
        let temp_dir = TempDir::new().unwrap();
        let config = create_test_config(&temp_dir);

        let server = WebServer::new(&config).unwrap();

        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
        assert!(server.storage_path().is_absolute());
        assert!(temp_dir.path().join("uploads").is_dir());
    }

    #[test]
    fn test_web_server_invalid_address() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = create_test_config(&temp_dir);
        config.server.host = "not an address".to_string();

        assert!(matches!(
            WebServer::new(&config),
            Err(FilehostError::Config(_))
        ));
    }

    #[test]
    fn test_web_server_rejects_uploads_path_over_api() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = create_test_config(&temp_dir);
        config.files.serve_uploads = true;
        config.files.public_path = "files".to_string();

        assert!(matches!(
            WebServer::new(&config),
            Err(FilehostError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_web_server_run() {
        let temp_dir = TempDir::new().unwrap();
        let config = create_test_config(&temp_dir);

        let server = WebServer::new(&config).unwrap();
        let addr = server.run_with_addr().await.unwrap();

        let client = reqwest::Client::new();
        let resp = client
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .unwrap();

        assert!(resp.status().is_success());
        assert_eq!(resp.text().await.unwrap(), "OK");

        let resp = client
            .get(format!("http://{}/files", addr))
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_success());
        assert_eq!(resp.text().await.unwrap(), r#"{"files":[],"count":0}"#);
    }

    #[tokio::test]
    async fn test_web_server_serves_uploads() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = create_test_config(&temp_dir);
        config.files.serve_uploads = true;

        let server = WebServer::new(&config).unwrap();
        std::fs::write(server.storage_path().join("hello.txt"), b"hello").unwrap();
        let addr = server.run_with_addr().await.unwrap();

        let resp = reqwest::get(format!("http://{}/uploads/hello.txt", addr))
            .await
            .unwrap();

        assert!(resp.status().is_success());
        assert_eq!(resp.text().await.unwrap(), "hello");
    }
}
