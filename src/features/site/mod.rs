//! Unauthenticated endpoints for load balancers and crawlers.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/health` | Liveness probe |
//! | GET | `/robots.txt` | Crawler rules with the sitemap location |

pub mod handlers;
pub mod routes;

pub use routes::routes;
