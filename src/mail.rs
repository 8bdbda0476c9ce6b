use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::Mailbox,
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::config::MailConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("smtp: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// Delivers through an SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(host: &str, port: u16, credentials: Option<(String, String)>) -> Self {
        // Plain SMTP; TLS is expected to be terminated by the local relay.
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port);
        if let Some((username, password)) = credentials {
            builder = builder.credentials(Credentials::new(username, password));
        }
        Self {
            transport: builder.build(),
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let mut builder = Message::builder()
            .from(mail.from.parse::<Mailbox>()?)
            .subject(mail.subject.clone());
        for to in &mail.to {
            builder = builder.to(to.parse::<Mailbox>()?);
        }
        let message = builder.body(mail.body.clone())?;
        self.transport.send(message).await?;
        Ok(())
    }
}

/// Writes messages to the log instead of sending them.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        tracing::info!(
            from = %mail.from,
            to = ?mail.to,
            subject = %mail.subject,
            body = %mail.body,
            "mail"
        );
        Ok(())
    }
}

/// Keeps every message in memory, for tests.
#[derive(Default)]
pub struct MemoryMailer {
    outbox: Mutex<Vec<OutgoingMail>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        if let Ok(mut outbox) = self.outbox.lock() {
            outbox.push(mail.clone());
        }
        Ok(())
    }
}

/// Picks the SMTP mailer when a relay is configured, the log mailer otherwise.
pub fn mailer_from_config(config: &MailConfig) -> Arc<dyn Mailer> {
    match &config.smtp {
        Some(smtp) => {
            let credentials = smtp.username.clone().zip(smtp.password.clone());
            Arc::new(SmtpMailer::new(&smtp.host, smtp.port, credentials))
        }
        None => Arc::new(LogMailer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_mailer_records_in_order() {
        let mailer = MemoryMailer::new();
        for subject in ["first", "second"] {
            mailer
                .send(&OutgoingMail {
                    from: "noreply@localhost".into(),
                    to: vec!["admin@localhost".into()],
                    subject: subject.into(),
                    body: String::new(),
                })
                .await
                .unwrap();
        }
        let subjects: Vec<_> = mailer.sent().into_iter().map(|m| m.subject).collect();
        assert_eq!(subjects, vec!["first", "second"]);
    }
}
