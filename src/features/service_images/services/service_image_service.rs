use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::service_images::dtos::{
    CreateServiceImageDto, ServiceCategoryImagesDto, ServiceImageResponseDto, ServiceImagesDto,
};
use crate::features::service_images::models::{ServiceCategory, ServiceImage};
use crate::modules::storage::FileStorage;
use crate::shared::cache::TaggedCache;
use crate::shared::constants::{IMAGE_CACHE_TTL_SECS, SERVICE_IMAGES_CACHE_TAG};

const SERVICE_IMAGES_CACHE_KEY: &str = "service-images";

const SERVICE_IMAGE_COLUMNS: &str = "id, title, url, file_key, service_category, sort_order, \
     is_active, created_at, updated_at, uploaded_by";

pub struct ServiceImageService {
    pool: SqlitePool,
    storage: Arc<dyn FileStorage>,
    cache: TaggedCache<ServiceImagesDto>,
}

impl ServiceImageService {
    pub fn new(pool: SqlitePool, storage: Arc<dyn FileStorage>) -> Self {
        Self {
            pool,
            storage,
            cache: TaggedCache::new(Duration::from_secs(IMAGE_CACHE_TTL_SECS)),
        }
    }

    pub fn parse_category(value: &str) -> Result<ServiceCategory> {
        value.parse().map_err(|_| {
            AppError::BadRequest(format!(
                "Invalid service category '{}'. Valid categories: {}",
                value,
                ServiceCategory::ALL.map(|c| c.as_str()).join(", ")
            ))
        })
    }

    /// Active images grouped by category, oldest first within a category
    pub async fn list_grouped(&self) -> Result<ServiceImagesDto> {
        self.cache
            .get_or_try_insert_with(
                SERVICE_IMAGES_CACHE_KEY,
                &[SERVICE_IMAGES_CACHE_TAG],
                || async move {
                    let sql = format!(
                        "SELECT {} FROM service_images WHERE is_active = 1 \
                         ORDER BY service_category ASC, created_at ASC, rowid ASC",
                        SERVICE_IMAGE_COLUMNS
                    );
                    let rows = sqlx::query_as::<_, ServiceImage>(&sql)
                        .fetch_all(&self.pool)
                        .await?;

                    let total_images = rows.len();
                    let mut images_by_category: BTreeMap<String, Vec<ServiceImageResponseDto>> =
                        BTreeMap::new();
                    for row in rows {
                        images_by_category
                            .entry(row.service_category.clone())
                            .or_default()
                            .push(row.into());
                    }

                    let categories = ServiceCategory::ALL
                        .into_iter()
                        .map(|c| (c.as_str().to_string(), c.label().to_string()))
                        .collect();

                    info!("Service images loaded: {} images", total_images);
                    Ok::<_, AppError>(ServiceImagesDto {
                        images_by_category,
                        total_images,
                        categories,
                    })
                },
            )
            .await
            .map_err(AppError::from)
    }

    pub async fn list_for_category(
        &self,
        category: ServiceCategory,
    ) -> Result<ServiceCategoryImagesDto> {
        let grouped = self.list_grouped().await?;
        let images = grouped
            .images_by_category
            .get(category.as_str())
            .cloned()
            .unwrap_or_default();

        Ok(ServiceCategoryImagesDto {
            category: category.as_str().to_string(),
            count: images.len(),
            images,
        })
    }

    pub async fn create(
        &self,
        dto: CreateServiceImageDto,
        uploaded_by: &str,
    ) -> Result<ServiceImageResponseDto> {
        let category = Self::parse_category(&dto.service_category)?;
        let file_key = dto
            .file_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty());
        let now = Utc::now().timestamp_millis();

        let sql = format!(
            "INSERT INTO service_images \
             (id, title, url, file_key, service_category, created_at, updated_at, uploaded_by) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}",
            SERVICE_IMAGE_COLUMNS
        );
        let image = sqlx::query_as::<_, ServiceImage>(&sql)
            .bind(Uuid::new_v4().to_string())
            .bind(dto.title.trim())
            .bind(dto.url.trim())
            .bind(file_key)
            .bind(category.as_str())
            .bind(now)
            .bind(now)
            .bind(uploaded_by)
            .fetch_one(&self.pool)
            .await?;

        info!(
            "Service image saved: id={}, category={}",
            image.id,
            category.as_str()
        );
        self.cache.invalidate(SERVICE_IMAGES_CACHE_TAG);

        Ok(image.into())
    }

    /// Delete the row first, then make a best-effort attempt at the stored file
    pub async fn delete(&self, id: &str) -> Result<()> {
        let sql = format!(
            "DELETE FROM service_images WHERE id = ? RETURNING {}",
            SERVICE_IMAGE_COLUMNS
        );
        let image = sqlx::query_as::<_, ServiceImage>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

        if let Some(file_key) = image.file_key.as_deref() {
            match self.storage.delete(file_key).await {
                Ok(()) => debug!("Deleted stored file: {}", file_key),
                Err(e) => warn!("Failed to delete stored file '{}': {}", file_key, e),
            }
        }

        info!("Service image deleted: id={}", id);
        self.cache.invalidate(SERVICE_IMAGES_CACHE_TAG);

        Ok(())
    }
}
