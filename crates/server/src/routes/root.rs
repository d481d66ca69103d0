use axum::http::StatusCode;

/// Landing endpoint; identifies the service
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", content_type = "text/plain", body = String)
    ),
    tag = "Home"
)]
pub async fn root() -> (StatusCode, &'static str) {
    (StatusCode::OK, "University Admin API")
}
