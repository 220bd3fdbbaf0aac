use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::shared::validation::validate_not_blank;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceImageDto {
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

    pub file_key: Option<String>,

    /// One of `landscape`, `pool`, `residential`, `commercial`, `ev`, `generator`
    pub service_category: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServiceImageQuery {
    /// Limit the response to one service category
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceImageResponseDto {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_key: Option<String>,
    pub service_category: String,
    pub sort_order: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<String>,
}

/// Active service images grouped by category, with the category headings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceImagesDto {
    pub images_by_category: BTreeMap<String, Vec<ServiceImageResponseDto>>,
    pub total_images: usize,
    pub categories: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCategoryImagesDto {
    pub category: String,
    pub images: Vec<ServiceImageResponseDto>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteServiceImageResponseDto {
    pub deleted: bool,
}
