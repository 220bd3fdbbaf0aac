use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::features::images::models::image::millis_to_datetime;
use crate::features::service_images::dtos::ServiceImageResponseDto;

/// Service page an image is shown on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Landscape,
    Pool,
    Residential,
    Commercial,
    Ev,
    Generator,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 6] = [
        ServiceCategory::Landscape,
        ServiceCategory::Pool,
        ServiceCategory::Residential,
        ServiceCategory::Commercial,
        ServiceCategory::Ev,
        ServiceCategory::Generator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Landscape => "landscape",
            ServiceCategory::Pool => "pool",
            ServiceCategory::Residential => "residential",
            ServiceCategory::Commercial => "commercial",
            ServiceCategory::Ev => "ev",
            ServiceCategory::Generator => "generator",
        }
    }

    /// Heading shown above the category on the services page
    pub fn label(&self) -> &'static str {
        match self {
            ServiceCategory::Landscape => "LANDSCAPE & OUTDOOR LIGHTING",
            ServiceCategory::Pool => "POOL & SAUNA ELECTRICAL",
            ServiceCategory::Residential => "RESIDENTIAL ELECTRICAL SERVICES",
            ServiceCategory::Commercial => "COMMERCIAL ELECTRICAL SOLUTIONS",
            ServiceCategory::Ev => "EV Charger Installation",
            ServiceCategory::Generator => "Residential & Commercial Generator Installation",
        }
    }
}

impl FromStr for ServiceCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or(())
    }
}

/// Row of the `service_images` table
#[derive(Debug, Clone, FromRow)]
pub struct ServiceImage {
    pub id: String,
    pub title: String,
    pub url: String,
    pub file_key: Option<String>,
    pub service_category: String,
    pub sort_order: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub uploaded_by: Option<String>,
}

impl From<ServiceImage> for ServiceImageResponseDto {
    fn from(image: ServiceImage) -> Self {
        Self {
            id: image.id,
            title: image.title,
            url: image.url,
            file_key: image.file_key,
            service_category: image.service_category,
            sort_order: image.sort_order,
            is_active: image.is_active,
            created_at: millis_to_datetime(image.created_at),
            updated_at: millis_to_datetime(image.updated_at),
            uploaded_by: image.uploaded_by,
        }
    }
}
