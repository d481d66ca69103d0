use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Submitted course form; mirrors what the create/edit screens post
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseForm {
    /// Course number, assigned by the registrar rather than the database
    pub id: i32,
    pub title: String,
    pub credits: i32,
    pub department_id: i32,
    /// Multi-select of instructor ids; absent when nothing was selected
    #[serde(default)]
    pub instructor_ids: Option<Vec<i32>>,
}

impl CourseForm {
    const TITLE_MIN: usize = 3;
    const TITLE_MAX: usize = 50;

    /// Field-level validation, run before anything touches the database
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let title_len = self.title.chars().count();
        if title_len < Self::TITLE_MIN || title_len > Self::TITLE_MAX {
            errors.push(format!(
                "title must be between {} and {} characters",
                Self::TITLE_MIN,
                Self::TITLE_MAX
            ));
        }

        if !(0..=5).contains(&self.credits) {
            errors.push("credits must be between 0 and 5".to_string());
        }

        errors
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    pub id: i32,
    pub title: String,
    pub credits: i32,
    pub department_id: i32,
    /// Department name when the list view resolved it
    pub department: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseDetailsResponse {
    pub id: i32,
    pub title: String,
    pub credits: i32,
    pub department_id: i32,
    pub department: Option<String>,
    pub instructors: Vec<AssignedInstructorResponse>,
    pub enrollment_count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignedInstructorResponse {
    pub id: i32,
    pub name: String,
    pub office: Option<String>,
}

/// Dropdown option lists for the course form
#[derive(Debug, Serialize, ToSchema)]
pub struct CourseOptionsResponse {
    pub departments: Vec<SelectItemResponse>,
    pub instructors: Vec<SelectItemResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SelectItemResponse {
    pub id: i32,
    pub label: String,
}

/// Returned when a save cannot proceed; echoes the submitted form so the
/// client re-renders its selections from the submitted, not persisted, values
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveErrorResponse {
    pub errors: Vec<String>,
    pub form: CourseForm,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, credits: i32) -> CourseForm {
        CourseForm {
            id: 1050,
            title: title.to_string(),
            credits,
            department_id: 3,
            instructor_ids: None,
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(form("Chemistry", 3).validate().is_empty());
    }

    #[test]
    fn title_length_bounds() {
        assert!(form("abc", 3).validate().is_empty());
        assert!(form(&"a".repeat(50), 3).validate().is_empty());

        assert_eq!(form("ab", 3).validate().len(), 1);
        assert_eq!(form(&"a".repeat(51), 3).validate().len(), 1);
        assert_eq!(form("", 3).validate().len(), 1);
    }

    #[test]
    fn credits_range_bounds() {
        assert!(form("Chemistry", 0).validate().is_empty());
        assert!(form("Chemistry", 5).validate().is_empty());

        assert_eq!(form("Chemistry", -1).validate().len(), 1);
        assert_eq!(form("Chemistry", 6).validate().len(), 1);
    }

    #[test]
    fn all_failures_are_reported_together() {
        assert_eq!(form("x", 9).validate().len(), 2);
    }
}
