//! In-memory, fixed-window rate limiting keyed by client identifier.
//!
//! Records live in process memory only: they are lost on restart and are not
//! shared between instances.

pub mod dtos;
pub mod models;
pub mod services;

pub use dtos::RateLimitDecision;
pub use services::RateLimiter;
