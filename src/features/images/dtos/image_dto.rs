use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::images::models::ImageCategory;
use crate::shared::validation::validate_not_blank;

/// Request DTO for saving an uploaded image into a gallery
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateImageDto {
    #[validate(
        length(min = 1, max = 255, message = "Title must be 1-255 characters"),
        custom(function = validate_not_blank)
    )]
    pub title: String,

    #[validate(
        length(min = 1, max = 2048, message = "URL must be 1-2048 characters"),
        custom(function = validate_not_blank)
    )]
    pub url: String,

    #[validate(length(min = 1, message = "fileKey is required"), custom(function = validate_not_blank))]
    pub file_key: String,

    /// Gallery category, e.g. `pool_sauna_electrical`
    #[serde(alias = "section")]
    pub category: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteImageDto {
    #[validate(custom(function = validate_not_blank))]
    pub image_id: String,

    #[serde(alias = "section")]
    pub category: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImageCategoryQuery {
    /// Gallery category to list
    #[serde(alias = "section")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponseDto {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_key: Option<String>,
    pub category: ImageCategory,
    pub sort_order: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<String>,
}

/// Every gallery's images keyed by category wire value
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImagesByCategoryDto {
    pub images_by_category: BTreeMap<String, Vec<ImageResponseDto>>,
    pub total_images: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteImageResponseDto {
    pub deleted: bool,
}
