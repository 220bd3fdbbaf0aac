use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::contact::{dtos as contact_dtos, handlers as contact_handlers};
use crate::features::images::{
    dtos as images_dtos, handlers as images_handlers, models as images_models,
};
use crate::features::service_images::{
    dtos as service_images_dtos, handlers as service_images_handlers,
    models as service_images_models,
};
use crate::features::site::handlers as site_handlers;
use crate::features::uploads::{dtos as uploads_dtos, handlers as uploads_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        // Contact (public)
        contact_handlers::submit_contact,
        // Portfolio images
        images_handlers::list_images,
        images_handlers::list_all_images,
        images_handlers::create_image,
        images_handlers::delete_image,
        // Service images
        service_images_handlers::list_service_images,
        service_images_handlers::create_service_image,
        service_images_handlers::delete_service_image,
        // Uploads
        uploads_handlers::upload_image,
        // Site
        site_handlers::health_check,
        site_handlers::robots_txt,
    ),
    components(
        schemas(
            Meta,
            // Auth
            auth::dto::MeResponseDto,
            auth::model::AuthenticatedUser,
            ApiResponse<auth::dto::MeResponseDto>,
            // Contact
            contact_dtos::ServiceType,
            contact_dtos::PropertyType,
            contact_dtos::WiringType,
            contact_dtos::ContactFormDto,
            contact_dtos::ContactSubmittedDto,
            ApiResponse<contact_dtos::ContactSubmittedDto>,
            // Portfolio images
            images_models::ImageCategory,
            images_dtos::CreateImageDto,
            images_dtos::DeleteImageDto,
            images_dtos::ImageResponseDto,
            images_dtos::ImagesByCategoryDto,
            images_dtos::DeleteImageResponseDto,
            ApiResponse<images_dtos::ImageResponseDto>,
            ApiResponse<Vec<images_dtos::ImageResponseDto>>,
            ApiResponse<images_dtos::ImagesByCategoryDto>,
            ApiResponse<images_dtos::DeleteImageResponseDto>,
            // Service images
            service_images_models::ServiceCategory,
            service_images_dtos::CreateServiceImageDto,
            service_images_dtos::ServiceImageResponseDto,
            service_images_dtos::ServiceImagesDto,
            service_images_dtos::ServiceCategoryImagesDto,
            service_images_dtos::DeleteServiceImageResponseDto,
            ApiResponse<service_images_dtos::ServiceImageResponseDto>,
            ApiResponse<service_images_dtos::ServiceImagesDto>,
            ApiResponse<service_images_dtos::ServiceCategoryImagesDto>,
            ApiResponse<service_images_dtos::DeleteServiceImageResponseDto>,
            // Uploads
            uploads_dtos::UploadImageDto,
            uploads_dtos::UploadedImageDto,
            ApiResponse<uploads_dtos::UploadedImageDto>,
        )
    ),
    tags(
        (name = "auth", description = "Admin session"),
        (name = "contact", description = "Estimate request form (public, rate limited)"),
        (name = "images", description = "Portfolio images per category"),
        (name = "service-images", description = "Images shown on the service pages"),
        (name = "uploads", description = "Image upload to object storage (admin only)"),
        (name = "site", description = "Health check and crawler rules"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "CRC Electrical API",
        version = "0.1.0",
        description = "API documentation for the CRC Electrical website",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
