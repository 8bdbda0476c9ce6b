//! Change hooks fired by the service layer around persistence.
//!
//! Services dispatch [`ChangeEvent::Created`] and [`ChangeEvent::Updated`]
//! after the transaction commits, and [`ChangeEvent::Deleting`] inside the
//! delete transaction before any row is removed. Hooks run in registration
//! order; the first error stops dispatch and is returned to the caller.
//! When a delete fails after its `Deleting` hooks ran, the services call
//! [`HookRegistry::revert_deleting`] so side effects such as archive files
//! do not outlive the rolled back transaction.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{config::AppConfig, error::AppResult, mail::Mailer};

mod archive;
mod notify;
mod records;

pub use archive::{ArchiveError, ArchiveOnDelete};
pub use notify::NotifyOnCreate;
pub use records::{CatalogRecord, RecordKind};

#[derive(Clone, Copy)]
pub enum ChangeEvent<'a> {
    Created(&'a dyn CatalogRecord),
    Updated(&'a dyn CatalogRecord),
    Deleting(&'a dyn CatalogRecord),
}

impl<'a> ChangeEvent<'a> {
    pub fn record(&self) -> &'a dyn CatalogRecord {
        match *self {
            ChangeEvent::Created(record)
            | ChangeEvent::Updated(record)
            | ChangeEvent::Deleting(record) => record,
        }
    }
}

#[async_trait]
pub trait ChangeHook: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(&self, event: &ChangeEvent<'_>) -> AppResult<()>;

    /// Undoes what `handle` did for an event whose change was rolled back.
    async fn revert(&self, _event: &ChangeEvent<'_>) {}
}

#[derive(Default, Clone)]
pub struct HookRegistry {
    hooks: Vec<Arc<dyn ChangeHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notification on create plus archive on delete.
    pub fn standard(config: &AppConfig, mailer: Arc<dyn Mailer>) -> Self {
        Self::new()
            .register(NotifyOnCreate::new(mailer, &config.mail))
            .register(ArchiveOnDelete::new(config.archive_dir.clone()))
    }

    pub fn register(mut self, hook: impl ChangeHook + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub async fn dispatch(&self, event: ChangeEvent<'_>) -> AppResult<()> {
        for hook in &self.hooks {
            if let Err(err) = hook.handle(&event).await {
                let record = event.record();
                tracing::warn!(
                    hook = hook.name(),
                    kind = record.kind().label(),
                    id = record.record_id(),
                    error = %err,
                    "change hook failed"
                );
                return Err(err);
            }
        }
        Ok(())
    }

    /// Fires `Deleting` for each record in order. On failure the records
    /// already handled, and the failing one, are reverted before the error
    /// is returned.
    pub async fn dispatch_deleting(&self, records: &[&dyn CatalogRecord]) -> AppResult<()> {
        for (handled, record) in records.iter().enumerate() {
            if let Err(err) = self.dispatch(ChangeEvent::Deleting(*record)).await {
                self.revert_deleting(&records[..=handled]).await;
                return Err(err);
            }
        }
        Ok(())
    }

    /// Reverts `Deleting` for every record, hooks in reverse order.
    pub async fn revert_deleting(&self, records: &[&dyn CatalogRecord]) {
        for record in records.iter().rev() {
            let event = ChangeEvent::Deleting(*record);
            for hook in self.hooks.iter().rev() {
                hook.revert(&event).await;
            }
        }
    }
}
