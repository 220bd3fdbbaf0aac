use super::jwks::JwksClient;
use super::model::AuthenticatedUser;
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Verifies admin bearer tokens: RS256 only, issuer and audience pinned
pub struct JwtValidator {
    jwks: Arc<JwksClient>,
    validation: Validation,
}

#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl From<SessionClaims> for AuthenticatedUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            sub: claims.sub,
            email: claims.email,
            name: claims.name,
        }
    }
}

impl JwtValidator {
    pub fn new(jwks: Arc<JwksClient>, issuer: String, audience: String, leeway: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.leeway = leeway.as_secs();
        validation.validate_nbf = true;

        Self { jwks, validation }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header =
            decode_header(token).map_err(|e| AppError::Auth(format!("Malformed token: {}", e)))?;

        if header.alg != Algorithm::RS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm {:?}, expected RS256",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Token header has no key id".to_string()))?;

        let key = self
            .jwks
            .get_key(&kid)
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let data = decode::<SessionClaims>(token, &key, &self.validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        tracing::debug!("Admin session validated for {}", data.claims.sub);
        Ok(data.claims.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::prelude::*;

    fn validator() -> JwtValidator {
        JwtValidator::new(
            Arc::new(JwksClient::new(
                "http://127.0.0.1:9/jwks",
                Duration::from_secs(60),
            )),
            "https://auth.crc-electrical.test".to_string(),
            "crc-admin".to_string(),
            Duration::from_secs(60),
        )
    }

    fn unsigned_token(header: &str) -> String {
        format!(
            "{}.{}.c2ln",
            BASE64_URL_SAFE_NO_PAD.encode(header),
            BASE64_URL_SAFE_NO_PAD.encode(r#"{"sub":"admin"}"#)
        )
    }

    async fn auth_error(token: &str) -> String {
        match validator().validate_token(token).await {
            Err(AppError::Auth(message)) => message,
            other => panic!("expected auth error, got {:?}", other.map(|u| u.sub)),
        }
    }

    #[tokio::test]
    async fn test_symmetric_tokens_are_refused() {
        let message = auth_error(&unsigned_token(r#"{"alg":"HS256","typ":"JWT"}"#)).await;
        assert!(message.contains("Unsupported algorithm"));
    }

    #[tokio::test]
    async fn test_token_without_kid_is_refused() {
        let message = auth_error(&unsigned_token(r#"{"alg":"RS256","typ":"JWT"}"#)).await;
        assert_eq!(message, "Token header has no key id");
    }

    #[tokio::test]
    async fn test_garbage_is_malformed() {
        let message = auth_error("not-a-jwt").await;
        assert!(message.starts_with("Malformed token"));
    }
}
