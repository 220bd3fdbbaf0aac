use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::ClientInfo;
use crate::features::contact::dtos::{ContactFormDto, ContactSubmittedDto};
use crate::features::contact::services::ContactService;
use crate::features::rate_limits::RateLimitDecision;
use crate::shared::types::ApiResponse;

fn rate_limit_headers(decision: &RateLimitDecision) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert(
        "x-ratelimit-reset",
        HeaderValue::from(decision.reset_at.timestamp_millis()),
    );
    headers
}

/// Submit the estimate request form
///
/// Sends a confirmation email to the submitter with the business inbox in Bcc.
/// Limited to 3 submissions per client per minute.
#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactFormDto,
    responses(
        (status = 200, description = "Confirmation email sent", body = ApiResponse<ContactSubmittedDto>),
        (status = 400, description = "Malformed payload or validation error"),
        (status = 408, description = "Email delivery timed out"),
        (status = 429, description = "Too many submissions from this client"),
        (status = 503, description = "Email service unavailable")
    ),
    tag = "contact"
)]
pub async fn submit_contact(
    State(service): State<Arc<ContactService>>,
    client: ClientInfo,
    body: Bytes,
) -> Result<(HeaderMap, Json<ApiResponse<ContactSubmittedDto>>)> {
    let receipt = service.submit(&client, &body).await?;

    Ok((
        rate_limit_headers(&receipt.rate_limit),
        Json(ApiResponse::success(
            Some(ContactSubmittedDto {
                email_sent: true,
                processing_time_ms: receipt.processing_time_ms,
            }),
            Some("Email sent successfully".to_string()),
            None,
        )),
    ))
}
