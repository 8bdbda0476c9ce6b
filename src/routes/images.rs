use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
};

use crate::{
    dto::images::{ImageUpload, ImageUploadForm},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Image,
    response::ApiResponse,
    services::image_service,
    state::AppState,
};

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().route(
        "/",
        post(upload_image).layer(DefaultBodyLimit::max(max_upload_bytes)),
    )
}

fn parse_id(field: &str, raw: &str) -> AppResult<Option<i32>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i32>()
        .map(Some)
        .map_err(|_| AppError::invalid(field, "a valid integer is required"))
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1" | "on" | "yes")
}

async fn read_upload(mut multipart: Multipart) -> AppResult<ImageUpload> {
    let mut file = None;
    let mut product_id = None;
    let mut category_id = None;
    let mut is_primary = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" | "image" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                file = Some((file_name, bytes.to_vec()));
            }
            "product_id" | "category_id" | "is_primary" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                match name.as_str() {
                    "product_id" => product_id = parse_id("product_id", &text)?,
                    "category_id" => category_id = parse_id("category_id", &text)?,
                    _ => is_primary = parse_flag(&text),
                }
            }
            other => tracing::debug!(field = other, "ignoring unknown upload field"),
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| AppError::invalid("file", "no file was submitted"))?;
    Ok(ImageUpload {
        file_name,
        bytes,
        product_id,
        category_id,
        is_primary,
    })
}

#[utoipa::path(
    post,
    path = "/api/images",
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image stored and attached", body = ApiResponse<Image>),
        (status = 400, description = "Missing file or ambiguous target"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Images"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<Image>>)> {
    let upload = read_upload(multipart).await?;
    let resp = image_service::save_image(&state, &user, upload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
