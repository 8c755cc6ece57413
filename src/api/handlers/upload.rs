use crate::AppState;
use crate::api::error::{AppError, UploadError};
use crate::services::storage::{StagedFile, StoredFile};
use crate::utils::validation::{check_declared_type, check_text_content};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use futures::TryStreamExt;
use serde::Serialize;
use tokio_util::io::StreamReader;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub file: UploadedFile,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub original_name: String,
    pub saved_as: String,
    pub size: u64,
}

impl From<StoredFile> for UploadedFile {
    fn from(stored: StoredFile) -> Self {
        Self {
            original_name: stored.original_name,
            saved_as: stored.stored_name,
            size: stored.size,
        }
    }
}

#[utoipa::path(
    post,
    path = "/upload-text",
    request_body(content = Multipart, description = "Single plain-text file in the `file` field"),
    responses(
        (status = 200, description = "File uploaded successfully", body = UploadResponse),
        (status = 400, description = "No file, wrong type, or storage failure")
    ),
    tag = "files"
)]
pub async fn upload_text(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let multipart = multipart.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let stored = receive_upload(&state, multipart).await?;

    tracing::info!(
        "📝 Stored {} as {} ({} bytes)",
        stored.original_name,
        stored.stored_name,
        stored.size
    );

    Ok(Json(UploadResponse {
        success: true,
        message: "File uploaded successfully".to_string(),
        file: stored.into(),
    }))
}

/// Reads the multipart body, admitting exactly one text file under `file`.
///
/// Nothing becomes visible in storage until every part has been consumed, so
/// a rejected request leaves the directory untouched.
async fn receive_upload(state: &AppState, mut multipart: Multipart) -> Result<StoredFile, UploadError> {
    let mut staged: Option<(String, StagedFile)> = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(original_name) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
        else {
            // Plain form fields, and file inputs left empty, carry no file.
            continue;
        };

        if field.name() != Some("file") || staged.is_some() {
            return Err(UploadError::UnexpectedField);
        }

        check_declared_type(field.content_type())?;

        let reader = StreamReader::new(field.map_err(std::io::Error::other));
        let file = state.storage.stage(reader).await?;

        if state.config.verify_text_content {
            check_text_content(&file.head)?;
        }

        staged = Some((original_name, file));
    }

    let (original_name, file) = staged.ok_or(UploadError::NoFile)?;
    Ok(state.storage.persist(file, &original_name).await?)
}
