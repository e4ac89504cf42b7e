// SPDX-License-Identifier: Apache-2.0

use crate::{StorageError, SubmissionStore};
use async_trait::async_trait;
use chrono::Utc;
use qscore_model::{NewSubmission, StoredSubmission};
use rusqlite::{Connection, OptionalExtension};
use std::path::PathBuf;
use uuid::Uuid;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS responses (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at_micros INTEGER NOT NULL,
    record TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_responses_name_created
    ON responses(name, created_at_micros);
";

/// SQLite-backed document store. Each record is persisted as one JSON
/// document in `record`, with `id`/`name`/`created_at_micros` broken out for
/// filtering and ordering. All rusqlite work runs on the blocking pool.
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StorageError(e.to_string()))?;
            }
        }
        let schema_path = path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&schema_path).map_err(|e| StorageError(e.to_string()))?;
            conn.execute_batch(SCHEMA_SQL)
                .map_err(|e| StorageError(e.to_string()))
        })
        .await
        .map_err(|e| StorageError(e.to_string()))??;
        Ok(Self { path })
    }

    async fn with_connection<T, F>(&self, work: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&path).map_err(|e| StorageError(e.to_string()))?;
            work(&conn)
        })
        .await
        .map_err(|e| StorageError(e.to_string()))?
    }
}

fn decode_record(raw: String) -> Result<StoredSubmission, StorageError> {
    serde_json::from_str(&raw).map_err(|e| StorageError(e.to_string()))
}

fn collect_records(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Vec<StoredSubmission>, StorageError> {
    let mut stmt = conn.prepare(sql).map_err(|e| StorageError(e.to_string()))?;
    let rows = stmt
        .query_map(params, |row| row.get::<_, String>(0))
        .map_err(|e| StorageError(e.to_string()))?;
    let mut out = Vec::new();
    for raw in rows {
        out.push(decode_record(raw.map_err(|e| StorageError(e.to_string()))?)?);
    }
    Ok(out)
}

#[async_trait]
impl SubmissionStore for SqliteStore {
    async fn insert(&self, submission: NewSubmission) -> Result<StoredSubmission, StorageError> {
        let stored =
            StoredSubmission::from_new(submission, Uuid::new_v4().to_string(), Utc::now());
        let row = stored.clone();
        self.with_connection(move |conn| {
            let record = serde_json::to_string(&row).map_err(|e| StorageError(e.to_string()))?;
            conn.execute(
                "INSERT INTO responses (id, name, created_at_micros, record) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    row.id,
                    row.name,
                    row.created_at.timestamp_micros(),
                    record
                ],
            )
            .map_err(|e| StorageError(e.to_string()))?;
            Ok(())
        })
        .await?;
        Ok(stored)
    }

    async fn find_all(&self) -> Result<Vec<StoredSubmission>, StorageError> {
        self.with_connection(|conn| {
            collect_records(
                conn,
                "SELECT record FROM responses ORDER BY created_at_micros DESC, id",
                &[],
            )
        })
        .await
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<StoredSubmission>, StorageError> {
        let name = name.to_string();
        self.with_connection(move |conn| {
            collect_records(
                conn,
                "SELECT record FROM responses WHERE name = ?1 \
                 ORDER BY created_at_micros DESC, id",
                &[&name as &dyn rusqlite::ToSql],
            )
        })
        .await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredSubmission>, StorageError> {
        let id = id.to_string();
        self.with_connection(move |conn| {
            let raw: Option<String> = conn
                .query_row("SELECT record FROM responses WHERE id = ?1", [&id], |row| {
                    row.get(0)
                })
                .optional()
                .map_err(|e| StorageError(e.to_string()))?;
            raw.map(decode_record).transpose()
        })
        .await
    }
}
