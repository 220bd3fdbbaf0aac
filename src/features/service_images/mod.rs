//! Images shown on the service pages, stored in a single table keyed by
//! service category.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/service-images[?category=]` | No | Active images, grouped or for one category |
//! | POST | `/api/service-images` | Yes | Save an image |
//! | DELETE | `/api/service-images/{id}` | Yes | Delete an image and its file |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::{protected_routes, public_routes};
pub use services::ServiceImageService;
