//! SQLite artifact store.
//!
//! Recording a run is best-effort by contract: the pipeline calls
//! [`ArtifactStore::record`], logs a warning on failure, and carries on —
//! documents are never lost to a database problem. The schema is created on
//! first use; a connection is opened per operation, which keeps the store
//! trivially `Send + Sync` and matches the single-writer usage pattern
//! (multi-user concurrency control is out of scope).

use crate::error::PersistError;
use crate::output::ArtifactRecord;
use rusqlite::{params, Connection};
use std::path::PathBuf;
use tracing::debug;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS articles (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    title         TEXT NOT NULL,
    topic         TEXT NOT NULL,
    author        TEXT NOT NULL,
    body          TEXT NOT NULL,
    produced_pdf  INTEGER NOT NULL DEFAULT 0,
    produced_docx INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
";

/// Handle on the artifact database file.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    path: PathBuf,
}

/// One stored run, as returned by [`ArtifactStore::list`].
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoredArticle {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub created_at: String,
    pub produced_pdf: bool,
    pub produced_docx: bool,
}

impl ArtifactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open(&self) -> Result<Connection, PersistError> {
        let conn = Connection::open(&self.path).map_err(|source| PersistError::Open {
            path: self.path.clone(),
            source,
        })?;
        conn.execute_batch(SCHEMA)?;
        Ok(conn)
    }

    /// Insert one run record.
    pub fn record(&self, record: &ArtifactRecord) -> Result<(), PersistError> {
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO articles (title, topic, author, body, produced_pdf, produced_docx)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.title,
                record.topic,
                record.author,
                record.body,
                record.produced_pdf,
                record.produced_docx,
            ],
        )?;
        debug!("Recorded artifact '{}' in {}", record.title, self.path.display());
        Ok(())
    }

    /// List stored runs, newest first.
    pub fn list(&self) -> Result<Vec<StoredArticle>, PersistError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, author, created_at, produced_pdf, produced_docx
             FROM articles
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StoredArticle {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    author: row.get(2)?,
                    created_at: row.get(3)?,
                    produced_pdf: row.get(4)?,
                    produced_docx: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(title: &str) -> ArtifactRecord {
        ArtifactRecord {
            title: title.to_string(),
            topic: "energia renovável".to_string(),
            author: "Maria Silva Santos".to_string(),
            body: "Resumo: texto".to_string(),
            produced_pdf: true,
            produced_docx: false,
        }
    }

    #[test]
    fn record_and_list_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("articles.db"));

        store.record(&sample("Primeiro")).unwrap();
        store.record(&sample("Segundo")).unwrap();

        let rows = store.list().unwrap();
        assert_eq!(rows.len(), 2);
        // Newest first; same created_at second resolves by id.
        assert_eq!(rows[0].title, "Segundo");
        assert!(rows[0].produced_pdf);
        assert!(!rows[0].produced_docx);
    }

    #[test]
    fn schema_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("articles.db"));
        store.record(&sample("Um")).unwrap();
        // Reopening re-runs CREATE TABLE IF NOT EXISTS without clobbering.
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn unwritable_path_is_a_persist_error() {
        let store = ArtifactStore::new("/definitely/not/a/real/dir/articles.db");
        assert!(matches!(
            store.record(&sample("X")),
            Err(PersistError::Open { .. })
        ));
    }
}
