//! Contact form submission for the estimate request page.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/contact` | No | Validate the form and email a confirmation |
//!
//! Submissions are rate limited per client (first `X-Forwarded-For` hop),
//! sanitized, and never stored.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::ContactService;
