use std::net::{IpAddr, SocketAddr};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use axum_catalog_api::{
    app::build_app,
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    mail::mailer_from_config,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,axum_catalog_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let addr = SocketAddr::from((config.host.parse::<IpAddr>()?, config.port));

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let mailer = mailer_from_config(&config.mail);
    tracing::info!(
        smtp = config.mail.smtp.is_some(),
        archive_dir = %config.archive_dir.display(),
        media_dir = %config.media_dir.display(),
        "catalog configured"
    );
    let app = build_app(AppState::new(orm, config, mailer));

    tracing::info!("listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
