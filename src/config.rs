use std::{env, path::PathBuf};

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    /// `None` falls back to the logging mailer.
    pub smtp: Option<SmtpConfig>,
    pub from: String,
    pub notify: String,
    pub fail_silently: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub archive_dir: PathBuf,
    pub media_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let archive_dir = env::var("ARCHIVE_DIR").unwrap_or_else(|_| ".".to_string());
        let media_dir = env::var("MEDIA_DIR").unwrap_or_else(|_| "media".to_string());
        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(10 * 1024 * 1024);

        let smtp = env::var("SMTP_HOST").ok().map(|host| SmtpConfig {
            host,
            port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(25),
            username: env::var("SMTP_USERNAME").ok(),
            password: env::var("SMTP_PASSWORD").ok(),
        });
        let mail = MailConfig {
            smtp,
            from: env::var("MAIL_FROM").unwrap_or_else(|_| "noreply@localhost".to_string()),
            notify: env::var("NOTIFY_EMAIL").unwrap_or_else(|_| "admin@localhost".to_string()),
            fail_silently: env::var("MAIL_FAIL_SILENTLY")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        };

        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            archive_dir: PathBuf::from(archive_dir),
            media_dir: PathBuf::from(media_dir),
            max_upload_bytes,
            mail,
        })
    }
}
