/// Body returned by the liveness probe
pub const HEALTH_MESSAGE: &str = "Text file upload API is running";

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is alive", body = String, content_type = "text/plain")
    ),
    tag = "system"
)]
pub async fn health_check() -> &'static str {
    HEALTH_MESSAGE
}
