//! Shared integration-test server bootstrap helpers.
#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use recipebox_server::{create_app, AppState, Config, Database};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub(crate) const TEST_BASE_URL: &str = "http://localhost:5000";

pub(crate) struct TestApp {
    pub server: TestServer,
    pub db_path: PathBuf,
    pub upload_dir: PathBuf,
    _temp: TempDir,
}

pub(crate) fn test_config(temp: &Path) -> Config {
    Config {
        db_path: temp.join("recipes.db").to_str().expect("db path").to_string(),
        upload_dir: temp.join("uploads").to_str().expect("upload dir").to_string(),
        port: 0,
        public_base_url: TEST_BASE_URL.to_string(),
        max_upload_size: None,
    }
}

pub(crate) fn setup_test_server() -> TestApp {
    setup_test_server_with_upload_limit(None)
}

pub(crate) fn setup_test_server_with_upload_limit(max_upload_size: Option<usize>) -> TestApp {
    let temp = TempDir::new().expect("temp dir");
    let config = Config {
        max_upload_size,
        ..test_config(temp.path())
    };
    let db = Database::new(&config.db_path).expect("open db");
    let db_path = PathBuf::from(&config.db_path);
    let upload_dir = PathBuf::from(&config.upload_dir);
    let server = TestServer::new(create_app(AppState::new(config, db))).expect("server");
    TestApp {
        server,
        db_path,
        upload_dir,
        _temp: temp,
    }
}

pub(crate) fn recipe_form(name: &str, file_name: &str, bytes: &[u8]) -> MultipartForm {
    MultipartForm::new()
        .add_text("name", name.to_string())
        .add_text("poster", "Alice")
        .add_text("ingredients", "water,salt")
        .add_text("instructions", "boil")
        .add_part(
            "image",
            Part::bytes(bytes.to_vec())
                .file_name(file_name.to_string())
                .mime_type("image/jpeg"),
        )
}

/// Files currently stored in the upload directory (empty if it is missing).
pub(crate) fn uploaded_files(upload_dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(upload_dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|entry| entry.file_name().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// Basename of a public image URL.
pub(crate) fn url_basename(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
