use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum SubscriberLogError {
    #[error("could not open subscriber log: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not write subscriber row: {0}")]
    Csv(#[from] csv::Error),
    #[error("subscriber log task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Append-only CSV of newsletter signups: `timestamp,name,email`, no header.
pub struct SubscriberLog {
    path: PathBuf,
    lock: Mutex<()>,
}

/// Keeps a name on a single CSV cell by blanking line breaks and commas.
pub fn sanitize_name(name: &str) -> String {
    name.replace(['\n', '\r', ','], " ")
}

impl SubscriberLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(
        &self,
        timestamp: &str,
        name: &str,
        email: &str,
    ) -> Result<(), SubscriberLogError> {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();
        let row = [timestamp.to_string(), sanitize_name(name), email.to_string()];

        tokio::task::spawn_blocking(move || -> Result<(), SubscriberLogError> {
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);
            writer.write_record(&row)?;
            writer.flush()?;
            Ok(())
        })
        .await??;

        tracing::debug!("Appended subscriber row to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn sanitize_strips_separators() {
        assert_eq!(sanitize_name("Ana,\r\nSouza"), "Ana   Souza");
        assert_eq!(sanitize_name("João Pedro"), "João Pedro");
    }

    #[tokio::test]
    async fn appends_rows_without_header() {
        let dir = tempdir().unwrap();
        let log = SubscriberLog::new(dir.path().join("inscricoes.csv"));

        log.append("2026-10-19 09:30:00", "Ana, Souza", "ana@example.com")
            .await
            .unwrap();
        log.append("2026-10-19 09:31:00", "Bruno", "bruno@example.com")
            .await
            .unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            contents,
            "2026-10-19 09:30:00,Ana  Souza,ana@example.com\n\
             2026-10-19 09:31:00,Bruno,bruno@example.com\n"
        );
    }

    #[tokio::test]
    async fn unwritable_path_is_an_error() {
        let dir = tempdir().unwrap();
        let log = SubscriberLog::new(dir.path().join("missing").join("inscricoes.csv"));
        assert!(log.append("2026-10-19 09:30:00", "Ana", "ana@example.com").await.is_err());
    }
}
