//! Admin session validation.
//!
//! Sessions are issued by an external OIDC provider; this service only
//! verifies the bearer JWT against the provider's key set and exposes the
//! principal to handlers through the `AuthenticatedUser` extractor.

mod jwks;
mod validator;

pub mod dto;
pub mod handler;
pub mod model;
pub mod routes;

pub use jwks::JwksClient;
pub use validator::JwtValidator;
