//! Portfolio galleries, one table per category.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/images?category=` | No | Active images of a gallery |
//! | GET | `/api/images/all` | Yes | Every gallery, grouped |
//! | POST | `/api/images` | Yes | Save an uploaded image |
//! | DELETE | `/api/images` | Yes | Delete an image and its file |
//!
//! Reads are cached under the `images` tag; every mutation invalidates it.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::{protected_routes, public_routes};
pub use services::ImageService;
