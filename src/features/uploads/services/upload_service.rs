use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::uploads::dtos::{
    extension_for, UploadedImageDto, ALLOWED_IMAGE_TYPES,
};
use crate::modules::storage::FileStorage;
use crate::shared::constants::MAX_IMAGE_UPLOAD_SIZE;

/// Folder inside the public prefix holding portfolio pictures
const PORTFOLIO_FOLDER: &str = "portfolio";

pub struct UploadService {
    storage: Arc<dyn FileStorage>,
}

impl UploadService {
    pub fn new(storage: Arc<dyn FileStorage>) -> Self {
        Self { storage }
    }

    /// Store an admin-uploaded image under `public/portfolio/<uuid>.<ext>`
    pub async fn upload_image(
        &self,
        data: Vec<u8>,
        content_type: &str,
        user_id: &str,
    ) -> Result<UploadedImageDto> {
        if data.is_empty() {
            return Err(AppError::BadRequest("File is empty".to_string()));
        }

        if data.len() > MAX_IMAGE_UPLOAD_SIZE {
            return Err(AppError::BadRequest(format!(
                "File too large. Maximum size is {} MB",
                MAX_IMAGE_UPLOAD_SIZE / 1024 / 1024
            )));
        }

        let extension = extension_for(content_type).ok_or_else(|| {
            AppError::BadRequest(format!(
                "File type '{}' is not allowed. Allowed types: {}",
                content_type,
                ALLOWED_IMAGE_TYPES.join(", ")
            ))
        })?;

        let path = format!("{}/{}.{}", PORTFOLIO_FOLDER, Uuid::new_v4(), extension);
        let file_key = self.storage.public_key(&path);
        let size = data.len();

        self.storage.upload(&file_key, data, content_type).await?;
        let url = self.storage.file_url(&file_key);

        info!(
            "Image uploaded: key={}, size={}, uploaded_by={}",
            file_key, size, user_id
        );

        Ok(UploadedImageDto {
            url,
            file_key,
            uploaded_by: user_id.to_string(),
        })
    }
}
