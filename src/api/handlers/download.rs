use crate::AppState;
use crate::api::error::AppError;
use crate::services::archive::ARCHIVE_FILENAME;
use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

#[utoipa::path(
    get,
    path = "/download-all",
    responses(
        (status = 200, description = "Zip archive (application/zip) of every stored upload"),
        (status = 404, description = "Nothing to download"),
        (status = 500, description = "Upload directory unreadable")
    ),
    tag = "files"
)]
pub async fn download_all(State(state): State<AppState>) -> Result<Response, AppError> {
    let stream = state.archive.stream_all().await?;

    let content_disposition = format!("attachment; filename={}", ARCHIVE_FILENAME);
    let response = (
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition),
        ],
        Body::from_stream(stream),
    )
        .into_response();

    Ok(response)
}
