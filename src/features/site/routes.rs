use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::site::handlers::{health_check, robots_txt};

pub fn routes(site_url: String) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/robots.txt", get(robots_txt))
        .with_state(Arc::new(site_url))
}
