use std::sync::Arc;

use async_trait::async_trait;

use super::{ChangeEvent, ChangeHook};
use crate::{
    config::MailConfig,
    error::AppResult,
    mail::{Mailer, OutgoingMail},
};

/// Mails the catalog owner when a record is first created. Updates only
/// leave a log line.
pub struct NotifyOnCreate {
    mailer: Arc<dyn Mailer>,
    from: String,
    to: String,
    fail_silently: bool,
}

impl NotifyOnCreate {
    pub fn new(mailer: Arc<dyn Mailer>, config: &MailConfig) -> Self {
        Self {
            mailer,
            from: config.from.clone(),
            to: config.notify.clone(),
            fail_silently: config.fail_silently,
        }
    }
}

#[async_trait]
impl ChangeHook for NotifyOnCreate {
    fn name(&self) -> &'static str {
        "notify_on_create"
    }

    async fn handle(&self, event: &ChangeEvent<'_>) -> AppResult<()> {
        match event {
            ChangeEvent::Created(record) => {
                let label = record.kind().label();
                tracing::info!(id = record.record_id(), "{label} was created");
                let mail = OutgoingMail {
                    from: self.from.clone(),
                    to: vec![self.to.clone()],
                    subject: format!("{label} was created"),
                    body: format!("{} was created by admin", record.display_name()),
                };
                match self.mailer.send(&mail).await {
                    Ok(()) => Ok(()),
                    Err(err) if self.fail_silently => {
                        tracing::warn!(error = %err, "creation notice not sent");
                        Ok(())
                    }
                    Err(err) => Err(err.into()),
                }
            }
            ChangeEvent::Updated(record) => {
                tracing::info!(
                    id = record.record_id(),
                    "{} was updated",
                    record.kind().label()
                );
                Ok(())
            }
            ChangeEvent::Deleting(_) => Ok(()),
        }
    }
}
