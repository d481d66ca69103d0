use crate::dtos::course::{
    AssignedInstructorResponse, CourseDetailsResponse, CourseForm, CourseOptionsResponse,
    CourseResponse, SaveErrorResponse, SelectItemResponse,
};
use axum::{Json, extract::Path, http::StatusCode};
use database::{
    db::create_connection,
    entities::{course, department},
    services::{
        course::{CourseInput, CourseSaveError, CourseService},
        lookup::{LookupService, SelectItem},
    },
};

/// Shown whenever a save fails at commit time; the edit is discarded and the
/// client is expected to resubmit
const SAVE_FAILED_MESSAGE: &str =
    "Unable to save changes. Try again, and if the problem persists, see your system administrator.";

type SaveError = (StatusCode, Json<SaveErrorResponse>);

/// Get all courses with their department
#[utoipa::path(
    get,
    path = "/courses",
    responses(
        (status = 200, description = "List of courses retrieved successfully", body = Vec<CourseResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Courses"
)]
pub async fn get_courses() -> Result<Json<Vec<CourseResponse>>, StatusCode> {
    let db = create_connection()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let courses = CourseService::list_courses(&db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let responses = courses
        .into_iter()
        .map(|(course, dept)| convert_to_course_response(course, dept))
        .collect();

    Ok(Json(responses))
}

/// Get a specific course with its instructors and enrollment count
#[utoipa::path(
    get,
    path = "/courses/{id}",
    params(
        ("id" = i32, Path, description = "Course number")
    ),
    responses(
        (status = 200, description = "Course found", body = CourseDetailsResponse),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Courses"
)]
pub async fn get_course_by_id(
    Path(id): Path<i32>,
) -> Result<Json<CourseDetailsResponse>, StatusCode> {
    let db = create_connection()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let details = CourseService::get_course_details(&db, id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let instructors = details
        .instructors
        .into_iter()
        .map(|(instructor, office)| AssignedInstructorResponse {
            id: instructor.id,
            name: instructor.full_name(),
            office: office.map(|o| o.location),
        })
        .collect();

    Ok(Json(CourseDetailsResponse {
        id: details.course.id,
        title: details.course.title,
        credits: details.course.credits,
        department_id: details.course.department_id,
        department: details.department.map(|d| d.name),
        instructors,
        enrollment_count: details.enrollment_count,
    }))
}

/// Create a course with its initial instructor selection
#[utoipa::path(
    post,
    path = "/courses",
    request_body = CourseForm,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 404, description = "Selected instructor not found"),
        (status = 409, description = "Unable to save changes", body = SaveErrorResponse),
        (status = 422, description = "Validation failed", body = SaveErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Courses"
)]
pub async fn create_course(
    Json(form): Json<CourseForm>,
) -> Result<(StatusCode, Json<CourseResponse>), SaveError> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Err(validation_failed(errors, form));
    }

    let db = create_connection()
        .await
        .map_err(|_| internal_error(form.clone()))?;

    let created = CourseService::create_course(&db, to_input(&form))
        .await
        .map_err(|err| convert_save_error(err, form))?;

    Ok((
        StatusCode::CREATED,
        Json(convert_to_course_response(created, None)),
    ))
}

/// Edit a course; its instructor assignments are reconciled against the
/// submitted selection
#[utoipa::path(
    put,
    path = "/courses/{id}",
    params(
        ("id" = i32, Path, description = "Course number")
    ),
    request_body = CourseForm,
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 404, description = "Course or selected instructor not found"),
        (status = 409, description = "Unable to save changes", body = SaveErrorResponse),
        (status = 422, description = "Validation failed", body = SaveErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Courses"
)]
pub async fn update_course(
    Path(id): Path<i32>,
    Json(form): Json<CourseForm>,
) -> Result<Json<CourseResponse>, SaveError> {
    if id != form.id {
        return Err(not_found(form));
    }

    let errors = form.validate();
    if !errors.is_empty() {
        return Err(validation_failed(errors, form));
    }

    let db = create_connection()
        .await
        .map_err(|_| internal_error(form.clone()))?;

    let updated = CourseService::update_course(&db, to_input(&form))
        .await
        .map_err(|err| convert_save_error(err, form))?;

    Ok(Json(convert_to_course_response(updated, None)))
}

/// Delete a course; its enrollments and assignments go with it
#[utoipa::path(
    delete,
    path = "/courses/{id}",
    params(
        ("id" = i32, Path, description = "Course number")
    ),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Courses"
)]
pub async fn delete_course(Path(id): Path<i32>) -> Result<StatusCode, StatusCode> {
    let db = create_connection()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let deleted = CourseService::delete_course(&db, id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

/// Get the dropdown option lists for the course form
#[utoipa::path(
    get,
    path = "/courses/options",
    responses(
        (status = 200, description = "Option lists retrieved successfully", body = CourseOptionsResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Courses"
)]
pub async fn get_course_options() -> Result<Json<CourseOptionsResponse>, StatusCode> {
    let db = create_connection()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let (departments, instructors) = LookupService::get_course_options(&db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(CourseOptionsResponse {
        departments: departments.into_iter().map(convert_to_select_item).collect(),
        instructors: instructors.into_iter().map(convert_to_select_item).collect(),
    }))
}

fn to_input(form: &CourseForm) -> CourseInput {
    CourseInput {
        id: form.id,
        title: form.title.clone(),
        credits: form.credits,
        department_id: form.department_id,
        instructor_ids: form.instructor_ids.clone(),
    }
}

fn convert_to_select_item(item: SelectItem) -> SelectItemResponse {
    SelectItemResponse {
        id: item.id,
        label: item.label,
    }
}

fn convert_to_course_response(course: course::Model, dept: Option<department::Model>) -> CourseResponse {
    CourseResponse {
        id: course.id,
        title: course.title,
        credits: course.credits,
        department_id: course.department_id,
        department: dept.map(|d| d.name),
    }
}

fn convert_save_error(err: CourseSaveError, form: CourseForm) -> SaveError {
    match err {
        CourseSaveError::CourseNotFound => not_found(form),
        CourseSaveError::UnknownInstructor => (
            StatusCode::NOT_FOUND,
            Json(SaveErrorResponse {
                errors: vec!["selected instructor not found".to_string()],
                form,
            }),
        ),
        CourseSaveError::Db(err) => {
            log::warn!("course save failed: {err}");
            (
                StatusCode::CONFLICT,
                Json(SaveErrorResponse {
                    errors: vec![SAVE_FAILED_MESSAGE.to_string()],
                    form,
                }),
            )
        }
    }
}

fn not_found(form: CourseForm) -> SaveError {
    (
        StatusCode::NOT_FOUND,
        Json(SaveErrorResponse {
            errors: vec!["course not found".to_string()],
            form,
        }),
    )
}

fn validation_failed(errors: Vec<String>, form: CourseForm) -> SaveError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(SaveErrorResponse { errors, form }),
    )
}

fn internal_error(form: CourseForm) -> SaveError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(SaveErrorResponse {
            errors: vec![SAVE_FAILED_MESSAGE.to_string()],
            form,
        }),
    )
}
