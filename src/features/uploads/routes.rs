use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;

use crate::features::uploads::handlers::upload_image;
use crate::features::uploads::services::UploadService;
use crate::shared::constants::MAX_IMAGE_UPLOAD_SIZE;

/// Create routes for the uploads feature (require JWT authentication)
pub fn routes(service: Arc<UploadService>) -> Router {
    Router::new()
        .route(
            "/api/uploads/image",
            // Room for the multipart envelope on top of the image itself
            post(upload_image).layer(DefaultBodyLimit::max(MAX_IMAGE_UPLOAD_SIZE + 1024 * 1024)),
        )
        .with_state(service)
}
