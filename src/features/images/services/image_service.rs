use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::try_join_all;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::images::dtos::{CreateImageDto, ImageResponseDto, ImagesByCategoryDto};
use crate::features::images::models::{Image, ImageCategory};
use crate::modules::storage::FileStorage;
use crate::shared::cache::TaggedCache;
use crate::shared::constants::{IMAGES_CACHE_TAG, IMAGE_CACHE_TTL_SECS};

const ALL_IMAGES_CACHE_KEY: &str = "all-images";

const IMAGE_COLUMNS: &str =
    "id, title, url, file_key, sort_order, is_active, created_at, updated_at, uploaded_by";

/// CRUD over the per-category gallery tables
pub struct ImageService {
    pool: SqlitePool,
    storage: Arc<dyn FileStorage>,
    active_cache: TaggedCache<Vec<ImageResponseDto>>,
    all_cache: TaggedCache<ImagesByCategoryDto>,
}

impl ImageService {
    pub fn new(pool: SqlitePool, storage: Arc<dyn FileStorage>) -> Self {
        Self {
            pool,
            storage,
            active_cache: TaggedCache::new(Duration::from_secs(IMAGE_CACHE_TTL_SECS)),
            all_cache: TaggedCache::new(Duration::from_secs(IMAGE_CACHE_TTL_SECS)),
        }
    }

    pub fn parse_category(value: &str) -> Result<ImageCategory> {
        value
            .parse()
            .map_err(|_| AppError::BadRequest(format!("Invalid category '{}'", value)))
    }

    fn invalidate(&self) {
        self.active_cache.invalidate(IMAGES_CACHE_TAG);
        self.all_cache.invalidate(IMAGES_CACHE_TAG);
    }

    pub async fn create(&self, dto: CreateImageDto, uploaded_by: &str) -> Result<ImageResponseDto> {
        let category = Self::parse_category(&dto.category)?;
        let now = Utc::now().timestamp_millis();

        let sql = format!(
            "INSERT INTO {} (id, title, url, file_key, created_at, updated_at, uploaded_by) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {}",
            category.table_name(),
            IMAGE_COLUMNS
        );
        let image = sqlx::query_as::<_, Image>(&sql)
            .bind(Uuid::new_v4().to_string())
            .bind(dto.title.trim())
            .bind(dto.url.trim())
            .bind(dto.file_key.trim())
            .bind(now)
            .bind(now)
            .bind(uploaded_by)
            .fetch_one(&self.pool)
            .await?;

        info!("Image saved: id={}, category={}", image.id, category);
        self.invalidate();

        Ok(image.into_dto(category))
    }

    /// Active images of one gallery, newest first
    pub async fn list_active(&self, category: ImageCategory) -> Result<Vec<ImageResponseDto>> {
        let key = format!("images:{}", category);
        self.active_cache
            .get_or_try_insert_with(&key, &[IMAGES_CACHE_TAG], || async move {
                let sql = format!(
                    "SELECT {} FROM {} WHERE is_active = 1 ORDER BY created_at DESC, rowid DESC",
                    IMAGE_COLUMNS,
                    category.table_name()
                );
                let rows = sqlx::query_as::<_, Image>(&sql)
                    .fetch_all(&self.pool)
                    .await?;
                debug!("Found {} images for {}", rows.len(), category);
                Ok::<_, AppError>(rows.into_iter().map(|i| i.into_dto(category)).collect())
            })
            .await
            .map_err(AppError::from)
    }

    async fn fetch_category(&self, category: ImageCategory) -> Result<(ImageCategory, Vec<Image>)> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY created_at DESC, rowid DESC",
            IMAGE_COLUMNS,
            category.table_name()
        );
        let rows = sqlx::query_as::<_, Image>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok((category, rows))
    }

    /// Every row of every gallery, read concurrently and cached under `all-images`
    pub async fn list_all(&self) -> Result<ImagesByCategoryDto> {
        self.all_cache
            .get_or_try_insert_with(
                ALL_IMAGES_CACHE_KEY,
                &[IMAGES_CACHE_TAG],
                || async move {
                    let results =
                        try_join_all(ImageCategory::ALL.map(|c| self.fetch_category(c))).await?;

                    let mut images_by_category = BTreeMap::new();
                    let mut total_images = 0;
                    for (category, rows) in results {
                        total_images += rows.len();
                        images_by_category.insert(
                            category.as_str().to_string(),
                            rows.into_iter().map(|i| i.into_dto(category)).collect(),
                        );
                    }

                    info!("Image galleries loaded: {} images", total_images);
                    Ok::<_, AppError>(ImagesByCategoryDto {
                        images_by_category,
                        total_images,
                    })
                },
            )
            .await
            .map_err(AppError::from)
    }

    /// Delete an image row; the stored file is removed on a best-effort basis
    pub async fn delete(&self, category: ImageCategory, image_id: &str) -> Result<()> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?",
            IMAGE_COLUMNS,
            category.table_name()
        );
        let image = sqlx::query_as::<_, Image>(&sql)
            .bind(image_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

        if let Some(file_key) = image.file_key.as_deref() {
            match self.storage.delete(file_key).await {
                Ok(()) => debug!("Deleted stored file: {}", file_key),
                Err(e) => warn!("Failed to delete stored file '{}': {}", file_key, e),
            }
        }

        let sql = format!("DELETE FROM {} WHERE id = ?", category.table_name());
        sqlx::query(&sql)
            .bind(image_id)
            .execute(&self.pool)
            .await?;

        info!("Image deleted: id={}, category={}", image_id, category);
        self.invalidate();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{test_pool, MemoryStorage};

    fn create_dto(title: &str, category: ImageCategory) -> CreateImageDto {
        CreateImageDto {
            title: title.to_string(),
            url: format!("https://cdn.test/public/portfolio/{}.jpg", title),
            file_key: format!("public/portfolio/{}.jpg", title),
            category: category.as_str().to_string(),
        }
    }

    async fn service_with(storage: Arc<MemoryStorage>) -> ImageService {
        ImageService::new(test_pool().await, storage)
    }

    #[tokio::test]
    async fn test_create_then_list_newest_first() {
        let service = service_with(Arc::new(MemoryStorage::default())).await;
        let pool_sauna = ImageCategory::PoolSaunaElectrical;

        let first = service.create(create_dto("first", pool_sauna), "admin").await.unwrap();
        let second = service.create(create_dto("second", pool_sauna), "admin").await.unwrap();
        service
            .create(create_dto("other", ImageCategory::TvMountingWiring), "admin")
            .await
            .unwrap();

        let listed = service.list_active(pool_sauna).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
        assert_eq!(listed[0].uploaded_by.as_deref(), Some("admin"));
        assert_eq!(listed[0].category, pool_sauna);
    }

    #[tokio::test]
    async fn test_create_invalidates_cached_listing() {
        let service = service_with(Arc::new(MemoryStorage::default())).await;
        let category = ImageCategory::AccentSpecialtyLighting;

        assert!(service.list_active(category).await.unwrap().is_empty());
        service.create(create_dto("accent", category), "admin").await.unwrap();

        assert_eq!(service.list_active(category).await.unwrap().len(), 1);
        assert_eq!(service.list_all().await.unwrap().total_images, 1);
    }

    #[tokio::test]
    async fn test_list_all_covers_every_category() {
        let service = service_with(Arc::new(MemoryStorage::default())).await;
        service
            .create(create_dto("panel", ImageCategory::ElectricalPanelsUpgrades), "admin")
            .await
            .unwrap();

        let all = service.list_all().await.unwrap();
        assert_eq!(all.images_by_category.len(), ImageCategory::ALL.len());
        assert_eq!(all.total_images, 1);
        assert_eq!(all.images_by_category["electrical_panels_upgrades"].len(), 1);
        assert!(all.images_by_category["tv_mounting_wiring"].is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_row_even_when_storage_fails() {
        let storage = Arc::new(MemoryStorage::failing_deletes());
        let service = service_with(storage.clone()).await;
        let category = ImageCategory::LandscapeOutdoorLighting;

        let image = service.create(create_dto("patio", category), "admin").await.unwrap();
        assert_eq!(service.list_active(category).await.unwrap().len(), 1);

        service.delete(category, &image.id).await.unwrap();

        assert!(service.list_active(category).await.unwrap().is_empty());
        assert_eq!(service.list_all().await.unwrap().total_images, 0);
        assert!(storage.deleted_keys().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_stored_file() {
        let storage = Arc::new(MemoryStorage::default());
        let service = service_with(storage.clone()).await;
        let category = ImageCategory::CustomLightingInstallation;

        let image = service.create(create_dto("chandelier", category), "admin").await.unwrap();
        service.delete(category, &image.id).await.unwrap();

        assert_eq!(storage.deleted_keys(), vec!["public/portfolio/chandelier.jpg"]);
    }

    #[tokio::test]
    async fn test_delete_unknown_image_is_not_found() {
        let service = service_with(Arc::new(MemoryStorage::default())).await;
        let result = service
            .delete(ImageCategory::PoolSaunaElectrical, "missing")
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unknown_category_is_bad_request() {
        assert!(matches!(
            ImageService::parse_category("kitchens"),
            Err(AppError::BadRequest(_))
        ));
    }
}
