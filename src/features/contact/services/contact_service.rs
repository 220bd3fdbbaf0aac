use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use validator::Validate;

use crate::core::config::ContactConfig;
use crate::core::error::{AppError, Result};
use crate::core::extractor::ClientInfo;
use crate::features::contact::dtos::{collect_field_errors, ContactFormDto};
use crate::features::contact::models::contact_submission::ContactEmailContext;
use crate::features::contact::models::ContactSubmission;
use crate::features::rate_limits::{RateLimitDecision, RateLimiter};
use crate::modules::mailer::{EmailTransport, OutgoingEmail};
use crate::shared::templates::render_template;

const TEXT_TEMPLATE: &str = "email/contact_confirmation.txt.jinja";
const HTML_TEMPLATE: &str = "email/contact_confirmation.html.jinja";

#[derive(Serialize)]
struct BusinessContext<'a> {
    name: &'a str,
    phone: &'a str,
    email: &'a str,
    service_area: &'a str,
}

#[derive(Serialize)]
struct ConfirmationContext<'a> {
    business: BusinessContext<'a>,
    #[serde(flatten)]
    submission: ContactEmailContext<'a>,
}

/// Outcome of an accepted submission
#[derive(Debug, Clone)]
pub struct ContactReceipt {
    pub rate_limit: RateLimitDecision,
    pub processing_time_ms: u64,
}

/// What we know about a submission so far, for the audit log line
struct ContactAttempt<'a> {
    client: &'a ClientInfo,
    email: String,
    name: String,
    service_type: String,
}

impl<'a> ContactAttempt<'a> {
    fn new(client: &'a ClientInfo) -> Self {
        Self {
            client,
            email: ClientInfo::UNKNOWN.to_string(),
            name: ClientInfo::UNKNOWN.to_string(),
            service_type: ClientInfo::UNKNOWN.to_string(),
        }
    }

    fn note_form(&mut self, form: &ContactFormDto) {
        let or_unknown =
            |v: &Option<String>| v.clone().unwrap_or_else(|| ClientInfo::UNKNOWN.to_string());
        self.email = or_unknown(&form.email);
        self.name = or_unknown(&form.name);
        self.service_type = or_unknown(&form.service_type);
    }

    fn note_submission(&mut self, submission: &ContactSubmission) {
        self.email = submission.email.clone();
        self.name = submission.name.clone();
        self.service_type = submission.service_type.as_str().to_string();
    }

    fn log<T>(&self, result: &Result<T>) {
        match result {
            Ok(_) => tracing::info!(
                target: "contact_form",
                ip = %self.client.ip,
                user_agent = %self.client.user_agent,
                email = %self.email,
                name = %self.name,
                service_type = %self.service_type,
                success = true,
                "Contact form submitted"
            ),
            Err(error) => tracing::warn!(
                target: "contact_form",
                ip = %self.client.ip,
                user_agent = %self.client.user_agent,
                email = %self.email,
                name = %self.name,
                service_type = %self.service_type,
                success = false,
                error = %error,
                "Contact form rejected"
            ),
        }
    }
}

/// Contact form pipeline: rate limit, parse, validate, sanitize, email
pub struct ContactService {
    rate_limiter: Arc<RateLimiter>,
    mailer: Option<Arc<dyn EmailTransport>>,
    config: ContactConfig,
}

impl ContactService {
    /// `mailer` is `None` when SMTP settings are incomplete; submissions then fail with 503
    pub fn new(
        rate_limiter: Arc<RateLimiter>,
        mailer: Option<Arc<dyn EmailTransport>>,
        config: ContactConfig,
    ) -> Self {
        Self {
            rate_limiter,
            mailer,
            config,
        }
    }

    pub async fn submit(&self, client: &ClientInfo, body: &[u8]) -> Result<ContactReceipt> {
        let started = Instant::now();
        let mut attempt = ContactAttempt::new(client);

        let result = self.process(&mut attempt, body).await.map(|rate_limit| ContactReceipt {
            rate_limit,
            processing_time_ms: started.elapsed().as_millis() as u64,
        });

        attempt.log(&result);
        result
    }

    async fn process(
        &self,
        attempt: &mut ContactAttempt<'_>,
        body: &[u8],
    ) -> Result<RateLimitDecision> {
        let decision = self.rate_limiter.check(&attempt.client.ip);
        if !decision.allowed {
            return Err(AppError::RateLimited {
                retry_after_secs: decision.retry_after_secs(Utc::now()),
                limit: decision.limit,
                reset_at: decision.reset_at,
            });
        }

        let form: ContactFormDto = serde_json::from_slice(body).map_err(|e| {
            tracing::debug!("Invalid contact payload: {}", e);
            AppError::BadRequest("Invalid request format. Please check your input.".to_string())
        })?;
        attempt.note_form(&form);

        form.validate()
            .map_err(|e| AppError::ValidationFailed(collect_field_errors(&e)))?;

        let submission = ContactSubmission::from_validated(form)?;
        attempt.note_submission(&submission);

        let mailer = self.mailer.as_ref().ok_or_else(|| {
            AppError::ServiceUnavailable("SMTP transport is not configured".to_string())
        })?;

        let email = self.compose(&submission)?;

        // Connection check and delivery share one time budget
        let deliver = async {
            mailer.verify().await.map_err(|e| {
                AppError::ServiceUnavailable(format!("SMTP connection failed: {}", e))
            })?;
            mailer
                .send(email)
                .await
                .map_err(|e| AppError::ServiceUnavailable(e.to_string()))
        };

        match tokio::time::timeout(self.config.email_timeout, deliver).await {
            Ok(result) => result.map(|()| decision),
            Err(_) => Err(AppError::Timeout(format!(
                "Email delivery exceeded {}ms",
                self.config.email_timeout.as_millis()
            ))),
        }
    }

    /// Render the confirmation sent to the submitter, blind-copied to the business inbox
    fn compose(&self, submission: &ContactSubmission) -> Result<OutgoingEmail> {
        let ctx = ConfirmationContext {
            business: BusinessContext {
                name: &self.config.business_name,
                phone: &self.config.business_phone,
                email: &self.config.business_email,
                service_area: &self.config.service_area,
            },
            submission: submission.email_context(),
        };

        let render = |template: &str| {
            render_template(template, &ctx).map_err(|e| AppError::Internal(e.to_string()))
        };

        Ok(OutgoingEmail {
            to: submission.email.clone(),
            bcc: self.config.inbox.clone(),
            subject: format!(
                "Thank you for contacting {}, {}!",
                self.config.business_name, submission.name
            ),
            text_body: render(TEXT_TEMPLATE)?,
            html_body: render(HTML_TEMPLATE)?,
        })
    }
}
