//! Embedded Jinja2 templates for outgoing email.

pub mod engine;

pub use engine::{render_template, TemplateError};
