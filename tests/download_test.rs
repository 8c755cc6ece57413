mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use common::TestApp;
use http_body_util::BodyExt;
use serde_json::Value;
use std::io::{Cursor, Read};
use tower::ServiceExt;

fn download_request() -> Request<Body> {
    Request::builder()
        .uri("/download-all")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_download_empty_storage() {
    let test = TestApp::new().await;

    let response = test.app.clone().oneshot(download_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "No files to download");
}

#[tokio::test]
async fn test_download_flow() {
    let test = TestApp::new().await;

    let mut saved = Vec::new();
    for (name, content) in [
        ("a.txt", "first file"),
        ("b.txt", "second file"),
        ("a.txt", "same original name, different upload"),
    ] {
        let (status, json) = test.upload_text(name, content).await;
        assert_eq!(status, StatusCode::OK, "unexpected body: {}", json);
        saved.push(json["file"]["savedAs"].as_str().unwrap().to_string());
    }
    saved.sort();
    assert_eq!(test.stored_files(), saved);

    let response = test.app.clone().oneshot(download_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/zip"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=all_uploads.zip"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();

    // Storage is purged once the body has been fully streamed.
    assert!(test.stored_files().is_empty());

    let mut archive = zip::ZipArchive::new(Cursor::new(body.to_vec())).unwrap();
    assert_eq!(archive.len(), 3);

    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(names, saved);
    assert!(names.iter().all(|n| !n.contains('/')));

    let mut content = String::new();
    archive
        .by_index(0)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert!(!content.is_empty());

    // A second download finds nothing left.
    let response = test.app.clone().oneshot(download_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_after_download_starts_fresh() {
    let test = TestApp::new().await;

    test.upload_text("old.txt", "old").await;
    let response = test.app.clone().oneshot(download_request()).await.unwrap();
    response.into_body().collect().await.unwrap();

    let (status, json) = test.upload_text("new.txt", "new").await;
    assert_eq!(status, StatusCode::OK);

    let response = test.app.clone().oneshot(download_request()).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let archive = zip::ZipArchive::new(Cursor::new(body.to_vec())).unwrap();

    let names: Vec<&str> = archive.file_names().collect();
    assert_eq!(names, vec![json["file"]["savedAs"].as_str().unwrap()]);
}

#[tokio::test]
async fn test_unreadable_directory_is_server_error() {
    let test = TestApp::new().await;
    std::fs::remove_dir_all(test.upload_dir()).unwrap();

    let response = test.app.clone().oneshot(download_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].is_string());
}
