pub mod api;
pub mod config;
pub mod infrastructure;
pub mod services;
pub mod utils;

use crate::config::UploadConfig;
use crate::services::archive::ArchiveService;
use crate::services::storage::LocalStorage;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Extra room on top of `max_file_size` for multipart framing
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::health::health_check,
        api::handlers::upload::upload_text,
        api::handlers::download::download_all,
    ),
    components(
        schemas(
            api::handlers::upload::UploadResponse,
            api::handlers::upload::UploadedFile,
        )
    ),
    tags(
        (name = "system", description = "Liveness"),
        (name = "files", description = "Text upload and bulk download")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<LocalStorage>,
    pub archive: Arc<ArchiveService>,
    pub config: UploadConfig,
}

impl AppState {
    pub fn new(storage: Arc<LocalStorage>, config: UploadConfig) -> Self {
        let archive = Arc::new(ArchiveService::new(storage.clone()));
        Self {
            storage,
            archive,
            config,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(api::handlers::health::health_check))
        .route(
            "/upload-text",
            post(api::handlers::upload::upload_text).layer(axum::extract::DefaultBodyLimit::max(
                state.config.max_file_size + MULTIPART_OVERHEAD,
            )),
        )
        .route("/download-all", get(api::handlers::download::download_all))
        .with_state(state)
}
