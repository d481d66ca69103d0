use utoipa::OpenApi;

/// API Documentation; paths are collected by the router
#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "Courses", description = "Course administration endpoints"),
        (name = "Home", description = "Dashboard and report endpoints"),
        (name = "Health", description = "Liveness endpoints"),
    ),
    info(
        title = "University Admin API",
        version = "1.0.0",
        description = "University administration API: courses, instructors, enrollment reports",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
