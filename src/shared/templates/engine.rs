//! Template engine for outgoing email bodies using Jinja2 syntax.
//!
//! Templates live in `templates/email/` and are embedded at build time.
//! Names ending in `.html.jinja` are rendered with HTML auto-escaping.

use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const EMBEDDED_TEMPLATES: &[(&str, &str)] = &[
    (
        "email/contact_confirmation.txt.jinja",
        include_str!("../../../templates/email/contact_confirmation.txt.jinja"),
    ),
    (
        "email/contact_confirmation.html.jinja",
        include_str!("../../../templates/email/contact_confirmation.html.jinja"),
    ),
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

/// Escape mode for a template, decided by the extension under `.jinja`
fn auto_escape_for(name: &str) -> AutoEscape {
    let base = name.strip_suffix(".jinja").unwrap_or(name);
    if base.ends_with(".html") || base.ends_with(".htm") {
        AutoEscape::Html
    } else {
        AutoEscape::None
    }
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(auto_escape_for);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);

    for (name, source) in EMBEDDED_TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        } else {
            tracing::debug!("Loaded template: {}", name);
        }
    }

    env
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render `template_name` (relative to `templates/`) with a serializable context
pub fn render_template<S: Serialize>(template_name: &str, context: S) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(context)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}
