mod common;

use std::path::Path;

use axum_catalog_api::{dto::images::ImageUpload, error::AppError, services::image_service};
use common::{admin, customer, seed_category, seed_product, spawn_app};
use sea_orm::ConnectionTrait;

fn upload(product_id: Option<i32>, category_id: Option<i32>, bytes: &[u8]) -> ImageUpload {
    ImageUpload {
        file_name: "front view.png".into(),
        bytes: bytes.to_vec(),
        product_id,
        category_id,
        is_primary: false,
    }
}

fn stored_files(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[tokio::test]
async fn upload_is_stored_under_media_images() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = admin(&app.state).await?;
    let category = seed_category(&app.state, &admin, "Phones").await?;
    let product = seed_product(&app.state, &admin, category.id, "Galaxy", 100, 0).await?;

    let image = image_service::save_image(&app.state, &admin, upload(Some(product.id), None, b"png"))
        .await?
        .data
        .expect("image");
    assert!(image.image.starts_with("images/"));
    assert!(image.image.ends_with("-front_view.png"));
    assert_eq!(image.product_id, Some(product.id));
    assert_eq!(image.category_id, None);

    let on_disk = app.state.config.media_dir.join(&image.image);
    assert_eq!(std::fs::read(on_disk)?, b"png");

    let category_image =
        image_service::save_image(&app.state, &admin, upload(None, Some(category.id), b"jpg"))
            .await?
            .data
            .expect("image");
    assert_eq!(category_image.category_id, Some(category.id));
    assert_eq!(stored_files(&app.state.config.media_dir.join("images")).len(), 2);
    Ok(())
}

#[tokio::test]
async fn upload_needs_exactly_one_existing_target() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = admin(&app.state).await?;
    let category = seed_category(&app.state, &admin, "Phones").await?;
    let product = seed_product(&app.state, &admin, category.id, "Galaxy", 100, 0).await?;

    let both = image_service::save_image(
        &app.state,
        &admin,
        upload(Some(product.id), Some(category.id), b"png"),
    )
    .await
    .err()
    .expect("two targets");
    assert!(matches!(both, AppError::BadRequest(_)));

    let neither = image_service::save_image(&app.state, &admin, upload(None, None, b"png"))
        .await
        .err()
        .expect("no target");
    assert!(matches!(neither, AppError::BadRequest(_)));

    let missing = image_service::save_image(&app.state, &admin, upload(Some(9999), None, b"png"))
        .await
        .err()
        .expect("unknown product");
    match missing {
        AppError::Validation(fields) => assert!(fields.contains_key("product_id")),
        other => panic!("unexpected error: {other}"),
    }

    assert!(stored_files(&app.state.config.media_dir.join("images")).is_empty());
    Ok(())
}

#[tokio::test]
async fn empty_file_and_customers_are_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = admin(&app.state).await?;
    let customer = customer(&app.state).await?;
    let category = seed_category(&app.state, &admin, "Phones").await?;

    let empty = image_service::save_image(&app.state, &admin, upload(None, Some(category.id), b""))
        .await
        .err()
        .expect("empty file");
    match empty {
        AppError::Validation(fields) => assert!(fields.contains_key("file")),
        other => panic!("unexpected error: {other}"),
    }

    let forbidden =
        image_service::save_image(&app.state, &customer, upload(None, Some(category.id), b"png"))
            .await
            .err()
            .expect("customer upload");
    assert!(matches!(forbidden, AppError::Forbidden));
    Ok(())
}

#[tokio::test]
async fn failed_insert_removes_the_written_file() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = admin(&app.state).await?;
    let category = seed_category(&app.state, &admin, "Phones").await?;
    app.state.orm.execute_unprepared("DROP TABLE images").await?;

    let err = image_service::save_image(&app.state, &admin, upload(None, Some(category.id), b"png"))
        .await
        .err()
        .expect("insert must fail");
    assert!(matches!(err, AppError::OrmError(_)));

    let dir = app.state.config.media_dir.join("images");
    assert!(dir.is_dir());
    assert!(stored_files(&dir).is_empty());
    Ok(())
}
