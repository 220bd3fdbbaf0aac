use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::uploads::dtos::{UploadImageDto, UploadedImageDto};
use crate::features::uploads::services::UploadService;
use crate::shared::types::ApiResponse;

/// Upload a portfolio image
///
/// Accepts multipart/form-data with a single `file` field. The returned
/// `url` and `fileKey` are then saved through the image endpoints.
#[utoipa::path(
    post,
    path = "/api/uploads/image",
    tag = "uploads",
    request_body(
        content = UploadImageDto,
        content_type = "multipart/form-data",
        description = "Image file (JPEG, PNG, GIF or WebP, max 4MB)",
    ),
    responses(
        (status = 201, description = "Image uploaded", body = ApiResponse<UploadedImageDto>),
        (status = 400, description = "Missing file, wrong type or too large"),
        (status = 401, description = "Authentication required"),
        (status = 502, description = "Object storage error")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_image(
    user: AuthenticatedUser,
    State(service): State<Arc<UploadService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadedImageDto>>), AppError> {
    let mut file: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        if field.name() != Some("file") {
            debug!("Ignoring unknown field: {:?}", field.name());
            continue;
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read file bytes: {}", e);
            AppError::BadRequest(format!("Failed to read file data: {}", e))
        })?;

        file = Some((data.to_vec(), content_type));
    }

    let (data, content_type) =
        file.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    let uploaded = service.upload_image(data, &content_type, &user.sub).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(uploaded), None, None)),
    ))
}

#[cfg(test)]
mod tests {
    use crate::features::uploads::{routes, UploadService};
    use crate::shared::test_helpers::{with_admin_auth, MemoryStorage};
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::Value;
    use std::sync::Arc;

    fn server(admin: bool) -> TestServer {
        let router = routes(Arc::new(UploadService::new(Arc::new(MemoryStorage::default()))));
        let router = if admin { with_admin_auth(router) } else { router };
        TestServer::new(router).unwrap()
    }

    fn image_form(mime: &str) -> MultipartForm {
        MultipartForm::new().add_part(
            "file",
            Part::bytes(vec![0x89, 0x50, 0x4E, 0x47])
                .file_name("deck.png")
                .mime_type(mime),
        )
    }

    #[tokio::test]
    async fn test_upload_returns_key_and_url() {
        let server = server(true);

        let response = server
            .post("/api/uploads/image")
            .multipart(image_form("image/png"))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        let key = body["data"]["fileKey"].as_str().unwrap();
        assert!(key.starts_with("public/portfolio/") && key.ends_with(".png"));
        assert_eq!(body["data"]["uploadedBy"], "test-admin");
    }

    #[tokio::test]
    async fn test_upload_rejects_other_types() {
        server(true)
            .post("/api/uploads/image")
            .multipart(image_form("application/pdf"))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_requires_session() {
        server(false)
            .post("/api/uploads/image")
            .multipart(image_form("image/png"))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
