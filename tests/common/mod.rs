//! Test helpers for the web API tests.
//!
//! Provides a TestServer on a temporary storage directory and sample payloads.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum_test::TestServer;
use filehost::file::{FileService, LocalStore, UrlBuilder};
use filehost::web::handlers::AppState;
use filehost::web::router::create_router;
use image::{DynamicImage, ImageFormat, Rgb};
use tempfile::TempDir;

/// Base URL used for every test server.
pub const BASE_URL: &str = "https://files.example.com";

/// A test server together with its storage directory.
pub struct TestContext {
    pub server: TestServer,
    pub storage_path: PathBuf,
    _temp_dir: TempDir,
}

impl TestContext {
    /// Paths of regular files currently in the storage directory.
    pub fn stored_files(&self) -> Vec<PathBuf> {
        stored_files(&self.storage_path)
    }
}

/// Regular files in a directory.
pub fn stored_files(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect()
}

/// Create a test server with no upload size limit.
pub fn create_test_server() -> TestContext {
    create_test_server_with_limit(0)
}

/// Create a test server with the given upload limit in megabytes.
pub fn create_test_server_with_limit(max_upload_size_mb: u64) -> TestContext {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = LocalStore::new(temp_dir.path().join("uploads"))
        .expect("Failed to create storage directory");
    let storage_path = store.base_path().to_path_buf();

    let files = FileService::new(Arc::new(store), UrlBuilder::new(BASE_URL, "uploads"));
    let app_state = Arc::new(AppState::new(files));

    let router = create_router(app_state, &[], max_upload_size_mb);
    let server = TestServer::new(router).expect("Failed to create test server");

    TestContext {
        server,
        storage_path,
        _temp_dir: temp_dir,
    }
}

/// A small RGB PNG.
pub fn sample_png() -> Vec<u8> {
    let img = image::RgbImage::from_fn(8, 8, |x, y| Rgb([(x * 30) as u8, (y * 30) as u8, 90]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// A 2x2 BMP using an 8-bit colour palette.
///
/// Same bytes as the fixture in the library's transcode tests.
pub fn palette_bmp() -> Vec<u8> {
    let mut bmp = Vec::new();
    // File header
    bmp.extend_from_slice(b"BM");
    bmp.extend_from_slice(&70u32.to_le_bytes());
    bmp.extend_from_slice(&0u32.to_le_bytes());
    bmp.extend_from_slice(&62u32.to_le_bytes());
    // BITMAPINFOHEADER
    bmp.extend_from_slice(&40u32.to_le_bytes());
    bmp.extend_from_slice(&2i32.to_le_bytes());
    bmp.extend_from_slice(&2i32.to_le_bytes());
    bmp.extend_from_slice(&1u16.to_le_bytes());
    bmp.extend_from_slice(&8u16.to_le_bytes());
    bmp.extend_from_slice(&0u32.to_le_bytes());
    bmp.extend_from_slice(&8u32.to_le_bytes());
    bmp.extend_from_slice(&2835i32.to_le_bytes());
    bmp.extend_from_slice(&2835i32.to_le_bytes());
    bmp.extend_from_slice(&2u32.to_le_bytes());
    bmp.extend_from_slice(&0u32.to_le_bytes());
    // Palette (BGRx): red, blue
    bmp.extend_from_slice(&[0, 0, 255, 0]);
    bmp.extend_from_slice(&[255, 0, 0, 0]);
    // Pixel rows, each padded to 4 bytes
    bmp.extend_from_slice(&[0, 1, 0, 0]);
    bmp.extend_from_slice(&[1, 0, 0, 0]);
    assert_eq!(bmp.len(), 70);
    bmp
}
