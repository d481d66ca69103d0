use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// One row of the About page report
#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentDateGroup {
    pub enrollment_date: NaiveDate,
    pub student_count: i64,
}
