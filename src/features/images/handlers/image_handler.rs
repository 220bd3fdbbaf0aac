use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::images::dtos::{
    CreateImageDto, DeleteImageDto, DeleteImageResponseDto, ImageCategoryQuery,
    ImageResponseDto, ImagesByCategoryDto,
};
use crate::features::images::services::ImageService;
use crate::shared::types::{ApiResponse, Meta};

/// Save an uploaded image into a gallery
#[utoipa::path(
    post,
    path = "/api/images",
    request_body = CreateImageDto,
    responses(
        (status = 201, description = "Image saved", body = ApiResponse<ImageResponseDto>),
        (status = 400, description = "Missing field or invalid category"),
        (status = 401, description = "Authentication required")
    ),
    tag = "images",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_image(
    user: AuthenticatedUser,
    State(service): State<Arc<ImageService>>,
    AppJson(dto): AppJson<CreateImageDto>,
) -> Result<(StatusCode, Json<ApiResponse<ImageResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let image = service.create(dto, &user.sub).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(image),
            Some("Image saved successfully".to_string()),
            None,
        )),
    ))
}

/// List the active images of one gallery, newest first
#[utoipa::path(
    get,
    path = "/api/images",
    params(ImageCategoryQuery),
    responses(
        (status = 200, description = "Images retrieved", body = ApiResponse<Vec<ImageResponseDto>>),
        (status = 400, description = "Missing or invalid category")
    ),
    tag = "images"
)]
pub async fn list_images(
    State(service): State<Arc<ImageService>>,
    Query(query): Query<ImageCategoryQuery>,
) -> Result<Json<ApiResponse<Vec<ImageResponseDto>>>> {
    let category = query
        .category
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("Category is required".to_string()))?;
    let category = ImageService::parse_category(category)?;

    let images = service.list_active(category).await?;
    let total = images.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(images),
        None,
        Some(Meta { total }),
    )))
}

/// List every image of every gallery for the admin dashboard
#[utoipa::path(
    get,
    path = "/api/images/all",
    responses(
        (status = 200, description = "All galleries retrieved", body = ApiResponse<ImagesByCategoryDto>),
        (status = 401, description = "Authentication required")
    ),
    tag = "images",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_all_images(
    _user: AuthenticatedUser,
    State(service): State<Arc<ImageService>>,
) -> Result<Json<ApiResponse<ImagesByCategoryDto>>> {
    let all = service.list_all().await?;
    let total = all.total_images as i64;
    Ok(Json(ApiResponse::success(
        Some(all),
        None,
        Some(Meta { total }),
    )))
}

/// Delete an image and its stored file
#[utoipa::path(
    delete,
    path = "/api/images",
    request_body = DeleteImageDto,
    responses(
        (status = 200, description = "Image deleted", body = ApiResponse<DeleteImageResponseDto>),
        (status = 400, description = "Missing field or invalid category"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Image not found")
    ),
    tag = "images",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_image(
    _user: AuthenticatedUser,
    State(service): State<Arc<ImageService>>,
    AppJson(dto): AppJson<DeleteImageDto>,
) -> Result<Json<ApiResponse<DeleteImageResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let category = ImageService::parse_category(&dto.category)?;

    service.delete(category, &dto.image_id).await?;
    Ok(Json(ApiResponse::success(
        Some(DeleteImageResponseDto { deleted: true }),
        Some("Image deleted successfully".to_string()),
        None,
    )))
}
