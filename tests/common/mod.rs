#![allow(dead_code)]

use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum_catalog_api::{
    config::{AppConfig, MailConfig},
    db::{create_orm_conn, run_migrations},
    dto::{categories::CreateCategoryRequest, products::CreateProductRequest},
    entity::users,
    mail::{MailError, Mailer, MemoryMailer, OutgoingMail},
    middleware::auth::{AuthUser, ROLE_ADMIN, ROLE_USER},
    models::{Category, Product},
    services::{category_service, product_service},
    state::AppState,
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Set};
use tempfile::TempDir;

pub const JWT_SECRET: &str = "test-secret";
pub const NOTIFY_EMAIL: &str = "owner@example.com";

/// A migrated sqlite database plus the directories and outbox the app
/// writes to. Everything lives under `dir` and goes away with it.
/// `mailer` only sees mail when the app was built with the default outbox.
pub struct TestApp {
    pub state: AppState,
    pub mailer: Arc<MemoryMailer>,
    pub dir: TempDir,
}

impl TestApp {
    pub fn archive_root(&self) -> &Path {
        &self.state.config.archive_dir
    }
}

pub fn test_config(dir: &Path) -> AppConfig {
    AppConfig {
        database_url: format!("sqlite://{}?mode=rwc", dir.join("catalog.db").display()),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: JWT_SECRET.into(),
        archive_dir: dir.join("archive"),
        media_dir: dir.join("media"),
        max_upload_bytes: 1024 * 1024,
        mail: MailConfig {
            smtp: None,
            from: "noreply@example.com".into(),
            notify: NOTIFY_EMAIL.into(),
            fail_silently: false,
        },
    }
}

pub async fn spawn_app() -> anyhow::Result<TestApp> {
    let dir = tempfile::tempdir()?;
    spawn_app_with(dir, |_| {}).await
}

/// Like [`spawn_app`] but lets the caller adjust the config first.
pub async fn spawn_app_with(
    dir: TempDir,
    tweak: impl FnOnce(&mut AppConfig),
) -> anyhow::Result<TestApp> {
    let outbox = Arc::new(MemoryMailer::new());
    let mut app = spawn_app_with_mailer(dir, outbox.clone(), tweak).await?;
    app.mailer = outbox;
    Ok(app)
}

/// Wires the hooks to `mailer` instead of the in-memory outbox.
pub async fn spawn_app_with_mailer(
    dir: TempDir,
    mailer: Arc<dyn Mailer>,
    tweak: impl FnOnce(&mut AppConfig),
) -> anyhow::Result<TestApp> {
    let mut config = test_config(dir.path());
    tweak(&mut config);

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let state = AppState::new(orm, config, mailer);
    Ok(TestApp {
        state,
        mailer: Arc::new(MemoryMailer::new()),
        dir,
    })
}

/// Mailer whose every delivery fails, counting the attempts.
#[derive(Default)]
pub struct FailingMailer {
    attempts: AtomicUsize,
}

impl FailingMailer {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _mail: &OutgoingMail) -> Result<(), MailError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let err = "not an address"
            .parse::<lettre::Address>()
            .expect_err("address must be rejected");
        Err(MailError::Address(err))
    }
}

pub async fn create_user(state: &AppState, username: &str, role: &str) -> anyhow::Result<AuthUser> {
    let user = users::ActiveModel {
        id: NotSet,
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        password_hash: Set("not-a-real-hash".to_string()),
        role: Set(role.to_string()),
        created_at: Set(Utc::now().fixed_offset()),
    }
    .insert(&state.orm)
    .await?;
    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
    })
}

pub async fn admin(state: &AppState) -> anyhow::Result<AuthUser> {
    create_user(state, "admin", ROLE_ADMIN).await
}

pub async fn customer(state: &AppState) -> anyhow::Result<AuthUser> {
    create_user(state, "customer", ROLE_USER).await
}

pub async fn seed_category(
    state: &AppState,
    admin: &AuthUser,
    name: &str,
) -> anyhow::Result<Category> {
    let resp = category_service::create_category(
        state,
        admin,
        CreateCategoryRequest {
            category_name: name.to_string(),
            slug: None,
        },
    )
    .await?;
    resp.data.ok_or_else(|| anyhow::anyhow!("category missing from response"))
}

pub async fn seed_product(
    state: &AppState,
    admin: &AuthUser,
    category_id: i32,
    name: &str,
    price: i64,
    discount: i32,
) -> anyhow::Result<Product> {
    let resp = product_service::create_product(
        state,
        admin,
        CreateProductRequest {
            product_name: name.to_string(),
            price,
            description: Some(format!("{name} description")),
            slug: None,
            discount: Some(discount),
            category_id,
        },
    )
    .await?;
    resp.data.ok_or_else(|| anyhow::anyhow!("product missing from response"))
}

/// Signed bearer token for `user`, valid for an hour.
pub fn token_for(user: &AuthUser) -> String {
    let claims = axum_catalog_api::dto::auth::Claims {
        sub: user.user_id.to_string(),
        role: user.role.clone(),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("token encodes")
}
