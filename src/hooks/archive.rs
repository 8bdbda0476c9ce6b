use std::{io, path::PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use super::{CatalogRecord, ChangeEvent, ChangeHook};
use crate::error::AppResult;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Dumps a JSON snapshot of a record to
/// `<root>/<kind dir>/<kind>.<id>.json` before it is deleted.
pub struct ArchiveOnDelete {
    root: PathBuf,
}

impl ArchiveOnDelete {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, record: &dyn CatalogRecord) -> PathBuf {
        let kind = record.kind();
        self.root.join(kind.archive_dir()).join(format!(
            "{}.{}.json",
            kind.file_prefix(),
            record.record_id()
        ))
    }

    pub async fn write(&self, record: &dyn CatalogRecord) -> Result<PathBuf, ArchiveError> {
        let path = self.path_for(record);
        let bytes = record.archive_json()?;
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| ArchiveError::Write {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| ArchiveError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}

#[async_trait]
impl ChangeHook for ArchiveOnDelete {
    fn name(&self) -> &'static str {
        "archive_on_delete"
    }

    async fn handle(&self, event: &ChangeEvent<'_>) -> AppResult<()> {
        if let ChangeEvent::Deleting(record) = event {
            let path = self.write(*record).await?;
            tracing::info!(
                path = %path.display(),
                "{} was saved before deleted",
                record.kind().label()
            );
        }
        Ok(())
    }

    async fn revert(&self, event: &ChangeEvent<'_>) {
        let ChangeEvent::Deleting(record) = event else {
            return;
        };
        let path = self.path_for(*record);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::info!(path = %path.display(), "archive removed after failed delete"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => tracing::warn!(path = %path.display(), error = %err, "archive not removed"),
        }
    }
}
