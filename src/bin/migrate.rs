use sea_orm_migration::MigratorTrait;

use axum_catalog_api::{config::AppConfig, db::create_orm_conn, migrator::Migrator};

/// `migrate [up|down|status]`, `up` by default.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;

    let command = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());
    match command.as_str() {
        "up" => {
            let pending = Migrator::get_pending_migrations(&orm).await?.len();
            Migrator::up(&orm, None).await?;
            println!("Applied {pending} migration(s)");
        }
        "down" => {
            Migrator::down(&orm, Some(1)).await?;
            println!("Rolled back the latest migration");
        }
        "status" => {
            let pending = Migrator::get_pending_migrations(&orm).await?;
            if pending.is_empty() {
                println!("Schema is up to date");
            }
            for migration in pending {
                println!("pending: {}", migration.name());
            }
        }
        other => anyhow::bail!("unknown command `{other}`, expected up, down or status"),
    }
    Ok(())
}
