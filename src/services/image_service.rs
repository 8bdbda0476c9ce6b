use std::path::Path;

use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, Set};
use uuid::Uuid;

use crate::{
    dto::images::ImageUpload,
    entity::{categories::Entity as Categories, images::ActiveModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Image,
    response::{ApiResponse, Meta},
    services::product_service::find_product,
    state::AppState,
};

const UPLOAD_DIR: &str = "images";

/// Keeps the final path component and replaces anything outside
/// `[A-Za-z0-9._-]`, so the name cannot escape the upload directory.
pub fn sanitize_file_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

pub async fn save_image(
    state: &AppState,
    user: &AuthUser,
    upload: ImageUpload,
) -> AppResult<ApiResponse<Image>> {
    ensure_admin(user)?;

    match (upload.product_id, upload.category_id) {
        (Some(product_id), None) => {
            find_product(&state.orm, product_id)
                .await
                .map_err(|_| AppError::invalid("product_id", "product does not exist"))?;
        }
        (None, Some(category_id)) => {
            if Categories::find_by_id(category_id)
                .one(&state.orm)
                .await?
                .is_none()
            {
                return Err(AppError::invalid("category_id", "category does not exist"));
            }
        }
        _ => {
            return Err(AppError::BadRequest(
                "exactly one of product_id or category_id is required".into(),
            ));
        }
    }
    if upload.bytes.is_empty() {
        return Err(AppError::invalid("file", "the submitted file is empty"));
    }

    let stored_name = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(&upload.file_name));
    let relative = format!("{UPLOAD_DIR}/{stored_name}");
    let dir = state.config.media_dir.join(UPLOAD_DIR);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    let file_path = dir.join(&stored_name);
    tokio::fs::write(&file_path, &upload.bytes)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let inserted = ActiveModel {
        id: NotSet,
        image: Set(relative),
        product_id: Set(upload.product_id),
        category_id: Set(upload.category_id),
        is_primary: Set(upload.is_primary),
    }
    .insert(&state.orm)
    .await;
    let image = match inserted {
        Ok(image) => image,
        Err(err) => {
            // No row points at the file; don't leave it behind.
            if let Err(io_err) = tokio::fs::remove_file(&file_path).await {
                tracing::warn!(path = %file_path.display(), error = %io_err, "orphaned upload not removed");
            }
            return Err(err.into());
        }
    };

    tracing::info!(image_id = image.id, path = %image.image, "image stored");

    Ok(ApiResponse::success(
        "Image uploaded",
        Image::from(image),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::sanitize_file_name;

    #[test]
    fn strips_directories_and_odd_characters() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("my photo (1).png"), "my_photo__1_.png");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
        assert_eq!(sanitize_file_name(""), "upload");
    }
}
