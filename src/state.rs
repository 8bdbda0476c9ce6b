use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{cache::ResponseCache, config::AppConfig, hooks::HookRegistry, mail::Mailer};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub hooks: Arc<HookRegistry>,
    pub cache: ResponseCache,
}

impl AppState {
    /// State with the standard change hooks wired to `mailer`.
    pub fn new(orm: DatabaseConnection, config: AppConfig, mailer: Arc<dyn Mailer>) -> Self {
        let hooks = HookRegistry::standard(&config, mailer);
        Self::with_hooks(orm, config, hooks)
    }

    pub fn with_hooks(orm: DatabaseConnection, config: AppConfig, hooks: HookRegistry) -> Self {
        Self {
            orm,
            config: Arc::new(config),
            hooks: Arc::new(hooks),
            cache: ResponseCache::new(),
        }
    }
}
