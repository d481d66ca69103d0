mod doc;
mod dtos;
mod routes;
mod utils;

use crate::doc::ApiDoc;
use crate::utils::shutdown::shutdown_signal;
use log::info;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(routes::root::root))
        .routes(routes!(routes::health::health))
        .routes(routes!(routes::home::about))
        .routes(routes!(routes::course::get_courses, routes::course::create_course))
        .routes(routes!(routes::course::get_course_options))
        .routes(routes!(
            routes::course::get_course_by_id,
            routes::course::update_course,
            routes::course::delete_course
        ))
        .split_for_parts();

    let app = router
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", api))
        .layer(ServiceBuilder::new().layer(CompressionLayer::new()));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Running axum on http://localhost:3000");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}
