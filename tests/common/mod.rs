#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;
use text_upload_service::config::UploadConfig;
use text_upload_service::infrastructure::storage::setup_storage;
use text_upload_service::{AppState, create_app};
use tower::ServiceExt;

pub const BOUNDARY: &str = "---------------------------123456789012345678901234567";

pub struct TestApp {
    pub app: Router,
    pub dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = UploadConfig::development(dir.path().join("uploads"));
        let storage = setup_storage(&config).await.unwrap();
        let app = create_app(AppState::new(storage, config));
        Self { app, dir }
    }

    pub fn upload_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("uploads")
    }

    /// Regular files currently in the upload directory, sorted.
    pub fn stored_files(&self) -> Vec<String> {
        list_files(&self.upload_dir())
    }

    pub async fn upload(&self, body: String) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/upload-text")
                    .header(
                        "Content-Type",
                        format!("multipart/form-data; boundary={}", BOUNDARY),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap_or_else(|_| {
            panic!("non-JSON body: {:?}", String::from_utf8_lossy(&body))
        });
        (status, json)
    }

    pub async fn upload_text(&self, filename: &str, content: &str) -> (StatusCode, Value) {
        self.upload(file_part("file", filename, Some("text/plain"), content) + &closing())
            .await
    }
}

pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().unwrap().is_file())
        .map(|e| e.file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

pub fn file_part(field: &str, filename: &str, content_type: Option<&str>, content: &str) -> String {
    let content_type = content_type
        .map(|ct| format!("Content-Type: {}\r\n", ct))
        .unwrap_or_default();
    format!(
        "--{boundary}\r\n\
        Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
        {content_type}\r\n\
        {content}\r\n",
        boundary = BOUNDARY,
    )
}

pub fn text_part(field: &str, value: &str) -> String {
    format!(
        "--{boundary}\r\n\
        Content-Disposition: form-data; name=\"{field}\"\r\n\r\n\
        {value}\r\n",
        boundary = BOUNDARY,
    )
}

pub fn closing() -> String {
    format!("--{}--\r\n", BOUNDARY)
}
