use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Unknown `kid`s trigger a refetch at most this often
const MIN_REFETCH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct JwksDocument {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    #[serde(default)]
    kid: Option<String>,
    kty: String,
    #[serde(default, rename = "use")]
    key_use: Option<String>,
    #[serde(default)]
    n: String,
    #[serde(default)]
    e: String,
}

impl Jwk {
    /// RSA signing keys with an id; encryption keys and other families are skipped
    fn is_rsa_signing_key(&self) -> bool {
        self.kty == "RSA" && self.kid.is_some() && self.key_use.as_deref().unwrap_or("sig") == "sig"
    }
}

struct KeySet {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Instant,
}

/// Signing keys of the identity provider that issues admin sessions
pub struct JwksClient {
    jwks_url: String,
    http: reqwest::Client,
    key_set: RwLock<Option<KeySet>>,
    ttl: Duration,
}

impl JwksClient {
    pub fn new(jwks_url: &str, ttl: Duration) -> Self {
        Self {
            jwks_url: jwks_url.to_string(),
            http: reqwest::Client::new(),
            key_set: RwLock::new(None),
            ttl,
        }
    }

    /// Key for `kid`, refetching the set when it is stale or the key is unknown
    pub async fn get_key(&self, kid: &str) -> Result<DecodingKey, JwksError> {
        let refetch = {
            let key_set = self.key_set.read().await;
            match key_set.as_ref() {
                Some(set) if set.fetched_at.elapsed() < self.ttl => {
                    if let Some(key) = set.keys.get(kid) {
                        return Ok(key.clone());
                    }
                    set.fetched_at.elapsed() >= MIN_REFETCH_INTERVAL
                }
                _ => true,
            }
        };

        if refetch {
            self.refresh().await?;
        }

        self.key_set
            .read()
            .await
            .as_ref()
            .and_then(|set| set.keys.get(kid).cloned())
            .ok_or_else(|| JwksError::KeyNotFound(kid.to_string()))
    }

    async fn refresh(&self) -> Result<(), JwksError> {
        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| JwksError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(JwksError::Fetch(format!("HTTP {}", response.status())));
        }

        let document: JwksDocument = response
            .json()
            .await
            .map_err(|e| JwksError::Parse(e.to_string()))?;
        let keys = decode_key_set(document)?;

        tracing::debug!("Loaded {} signing keys from {}", keys.len(), self.jwks_url);

        *self.key_set.write().await = Some(KeySet {
            keys,
            fetched_at: Instant::now(),
        });
        Ok(())
    }
}

fn decode_key_set(document: JwksDocument) -> Result<HashMap<String, DecodingKey>, JwksError> {
    let mut keys = HashMap::new();
    for jwk in document.keys {
        if !jwk.is_rsa_signing_key() {
            continue;
        }
        let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|e| JwksError::InvalidKey(e.to_string()))?;
        if let Some(kid) = jwk.kid {
            keys.insert(kid, key);
        }
    }
    Ok(keys)
}

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("Failed to fetch signing keys: {0}")]
    Fetch(String),

    #[error("Malformed key set: {0}")]
    Parse(String),

    #[error("Unknown signing key: {0}")]
    KeyNotFound(String),

    #[error("Invalid signing key: {0}")]
    InvalidKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(json: &str) -> JwksDocument {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_only_rsa_signing_keys_are_kept() {
        let keys = decode_key_set(document(
            r#"{"keys": [
                {"kid": "sig-1", "kty": "RSA", "use": "sig", "n": "AQAB", "e": "AQAB"},
                {"kid": "enc-1", "kty": "RSA", "use": "enc", "n": "AQAB", "e": "AQAB"},
                {"kid": "ec-1", "kty": "EC", "crv": "P-256"},
                {"kty": "RSA", "n": "AQAB", "e": "AQAB"}
            ]}"#,
        ))
        .unwrap();

        assert_eq!(keys.len(), 1);
        assert!(keys.contains_key("sig-1"));
    }

    #[test]
    fn test_garbage_components_are_rejected() {
        let result = decode_key_set(document(
            r#"{"keys": [{"kid": "bad", "kty": "RSA", "n": "!!!", "e": "AQAB"}]}"#,
        ));
        assert!(matches!(result, Err(JwksError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_a_fetch_error() {
        let client = JwksClient::new("http://127.0.0.1:9/jwks", Duration::from_secs(60));
        let result = client.get_key("any").await;
        assert!(matches!(result, Err(JwksError::Fetch(_))));
    }
}
