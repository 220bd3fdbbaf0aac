use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::features::images::dtos::ImageResponseDto;

/// Portfolio gallery a picture belongs to. Each category has its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ImageCategory {
    CustomLightingInstallation,
    LandscapeOutdoorLighting,
    PoolSaunaElectrical,
    TvMountingWiring,
    ElectricalPanelsUpgrades,
    AccentSpecialtyLighting,
}

impl ImageCategory {
    pub const ALL: [ImageCategory; 6] = [
        ImageCategory::CustomLightingInstallation,
        ImageCategory::LandscapeOutdoorLighting,
        ImageCategory::PoolSaunaElectrical,
        ImageCategory::TvMountingWiring,
        ImageCategory::ElectricalPanelsUpgrades,
        ImageCategory::AccentSpecialtyLighting,
    ];

    /// Wire value, identical to the table name
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageCategory::CustomLightingInstallation => "custom_lighting_installation",
            ImageCategory::LandscapeOutdoorLighting => "landscape_outdoor_lighting",
            ImageCategory::PoolSaunaElectrical => "pool_sauna_electrical",
            ImageCategory::TvMountingWiring => "tv_mounting_wiring",
            ImageCategory::ElectricalPanelsUpgrades => "electrical_panels_upgrades",
            ImageCategory::AccentSpecialtyLighting => "accent_specialty_lighting",
        }
    }

    pub fn table_name(&self) -> &'static str {
        self.as_str()
    }
}

impl FromStr for ImageCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or(())
    }
}

impl std::fmt::Display for ImageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row of any per-category image table
#[derive(Debug, Clone, FromRow)]
pub struct Image {
    pub id: String,
    pub title: String,
    pub url: String,
    pub file_key: Option<String>,
    pub sort_order: i64,
    pub is_active: bool,
    /// Unix epoch milliseconds
    pub created_at: i64,
    pub updated_at: i64,
    pub uploaded_by: Option<String>,
}

pub(crate) fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

impl Image {
    pub fn into_dto(self, category: ImageCategory) -> ImageResponseDto {
        ImageResponseDto {
            id: self.id,
            title: self.title,
            url: self.url,
            file_key: self.file_key,
            category,
            sort_order: self.sort_order,
            is_active: self.is_active,
            created_at: millis_to_datetime(self.created_at),
            updated_at: millis_to_datetime(self.updated_at),
            uploaded_by: self.uploaded_by,
        }
    }
}
