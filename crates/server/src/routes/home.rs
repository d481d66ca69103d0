use crate::dtos::home::EnrollmentDateGroup;
use axum::{Json, http::StatusCode};
use database::{db::create_connection, services::report::ReportService};

/// Students grouped by enrollment date, for the About page
#[utoipa::path(
    get,
    path = "/about",
    responses(
        (status = 200, description = "Enrollment report retrieved successfully", body = Vec<EnrollmentDateGroup>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Home"
)]
pub async fn about() -> Result<Json<Vec<EnrollmentDateGroup>>, StatusCode> {
    let db = create_connection()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let groups = ReportService::enrollment_date_groups(&db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let groups = groups
        .into_iter()
        .map(|(enrollment_date, student_count)| EnrollmentDateGroup {
            enrollment_date,
            student_count,
        })
        .collect();

    Ok(Json(groups))
}
