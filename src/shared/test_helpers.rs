//! Fixtures shared by handler and service tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::modules::mailer::{EmailTransport, MailError, OutgoingEmail};
use crate::modules::storage::FileStorage;

pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "test-admin".to_string(),
        email: Some("admin@crc-electrical.test".to_string()),
        name: Some("Test Admin".to_string()),
    }
}

async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin_user());
    next.run(request).await
}

/// Wrap `router` so every request carries an admin session
pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

/// In-memory SQLite database with all migrations applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations apply");
    pool
}

/// Storage double that records keys and can be told to fail
#[derive(Default)]
pub struct MemoryStorage {
    pub uploaded: Mutex<Vec<(String, String, usize)>>,
    pub deleted: Mutex<Vec<String>>,
    pub fail_deletes: AtomicBool,
    pub fail_uploads: AtomicBool,
}

impl MemoryStorage {
    pub fn failing_deletes() -> Self {
        let storage = Self::default();
        storage.fail_deletes.store(true, Ordering::SeqCst);
        storage
    }

    pub fn deleted_keys(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileStorage for MemoryStorage {
    async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::ExternalServiceError("upload refused".to_string()));
        }
        self.uploaded
            .lock()
            .unwrap()
            .push((key.to_string(), content_type.to_string(), data.len()));
        Ok(key.to_string())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::ExternalServiceError("delete refused".to_string()));
        }
        self.deleted.lock().unwrap().push(key.to_string());
        Ok(())
    }

    fn public_key(&self, path: &str) -> String {
        format!("public/{}", path)
    }

    fn file_url(&self, key: &str) -> String {
        format!("https://cdn.test/{}", key)
    }
}

/// How a `RecordingMailer` behaves when asked to deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailerMode {
    Deliver,
    RejectVerify,
    FailSend,
    Hang,
    HangVerify,
}

/// Mail transport double that keeps every message it was asked to send
pub struct RecordingMailer {
    mode: MailerMode,
    pub sent: Mutex<Vec<OutgoingEmail>>,
    pub attempts: AtomicUsize,
}

impl RecordingMailer {
    pub fn new(mode: MailerMode) -> Self {
        Self {
            mode,
            sent: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailTransport for RecordingMailer {
    async fn verify(&self) -> Result<(), MailError> {
        match self.mode {
            MailerMode::RejectVerify => Err(MailError::Connection("auth rejected".to_string())),
            MailerMode::HangVerify => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            MailerMode::FailSend => Err(MailError::Delivery("relay refused".to_string())),
            MailerMode::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
            _ => {
                self.sent.lock().unwrap().push(email);
                Ok(())
            }
        }
    }
}
