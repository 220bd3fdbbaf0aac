use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::service_images::dtos::{
    CreateServiceImageDto, DeleteServiceImageResponseDto, ServiceCategoryImagesDto,
    ServiceImageQuery, ServiceImageResponseDto, ServiceImagesDto,
};
use crate::features::service_images::services::ServiceImageService;
use crate::shared::types::{ApiResponse, Meta};

/// List active service images, grouped or for one category
#[utoipa::path(
    get,
    path = "/api/service-images",
    params(ServiceImageQuery),
    responses(
        (status = 200, description = "Images grouped by category, or a `ServiceCategoryImagesDto` when `category` is given", body = ApiResponse<ServiceImagesDto>),
        (status = 400, description = "Invalid category")
    ),
    tag = "service-images"
)]
pub async fn list_service_images(
    State(service): State<Arc<ServiceImageService>>,
    Query(query): Query<ServiceImageQuery>,
) -> Result<Response> {
    if let Some(category) = query.category.as_deref() {
        let category = ServiceImageService::parse_category(category)?;
        let images = service.list_for_category(category).await?;
        let total = images.count as i64;
        return Ok(Json(ApiResponse::success(Some(images), None, Some(Meta { total })))
            .into_response());
    }

    let grouped = service.list_grouped().await?;
    let total = grouped.total_images as i64;
    Ok(Json(ApiResponse::success(Some(grouped), None, Some(Meta { total }))).into_response())
}

#[utoipa::path(
    post,
    path = "/api/service-images",
    request_body = CreateServiceImageDto,
    responses(
        (status = 201, description = "Service image saved", body = ApiResponse<ServiceImageResponseDto>),
        (status = 400, description = "Missing field or invalid category"),
        (status = 401, description = "Authentication required")
    ),
    tag = "service-images",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_service_image(
    user: AuthenticatedUser,
    State(service): State<Arc<ServiceImageService>>,
    AppJson(dto): AppJson<CreateServiceImageDto>,
) -> Result<(StatusCode, Json<ApiResponse<ServiceImageResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let image = service.create(dto, &user.sub).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(image),
            Some("Service image saved successfully".to_string()),
            None,
        )),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/service-images/{id}",
    params(
        ("id" = String, Path, description = "Service image ID")
    ),
    responses(
        (status = 200, description = "Service image deleted", body = ApiResponse<DeleteServiceImageResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Image not found")
    ),
    tag = "service-images",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_service_image(
    _user: AuthenticatedUser,
    State(service): State<Arc<ServiceImageService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeleteServiceImageResponseDto>>> {
    service.delete(&id).await?;
    Ok(Json(ApiResponse::success(
        Some(DeleteServiceImageResponseDto { deleted: true }),
        Some("Service image deleted successfully".to_string()),
        None,
    )))
}
