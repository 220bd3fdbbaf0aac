use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::images::handlers;
use crate::features::images::services::ImageService;

/// Public gallery listing used by the portfolio pages
pub fn public_routes(service: Arc<ImageService>) -> Router {
    Router::new()
        .route("/api/images", get(handlers::list_images))
        .with_state(service)
}

/// Admin gallery management (require JWT authentication)
pub fn protected_routes(service: Arc<ImageService>) -> Router {
    Router::new()
        .route(
            "/api/images",
            post(handlers::create_image).delete(handlers::delete_image),
        )
        .route("/api/images/all", get(handlers::list_all_images))
        .with_state(service)
}
