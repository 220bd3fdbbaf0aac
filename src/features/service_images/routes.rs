use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::features::service_images::handlers;
use crate::features::service_images::services::ServiceImageService;

pub fn public_routes(service: Arc<ServiceImageService>) -> Router {
    Router::new()
        .route("/api/service-images", get(handlers::list_service_images))
        .with_state(service)
}

/// Service image management (require JWT authentication)
pub fn protected_routes(service: Arc<ServiceImageService>) -> Router {
    Router::new()
        .route("/api/service-images", post(handlers::create_service_image))
        .route(
            "/api/service-images/{id}",
            delete(handlers::delete_service_image),
        )
        .with_state(service)
}
