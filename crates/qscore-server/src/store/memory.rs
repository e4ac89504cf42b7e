// SPDX-License-Identifier: Apache-2.0

use crate::{StorageError, SubmissionStore};
use async_trait::async_trait;
use chrono::Utc;
use qscore_model::{NewSubmission, StoredSubmission};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

/// In-memory store: zero-setup runtime backend and the test double.
///
/// `insert_calls` counts write attempts so tests can assert that validation
/// failures never reach the store; the `fail_*` toggles force the
/// storage-error paths.
#[derive(Default)]
pub struct MemoryStore {
    pub records: Mutex<Vec<StoredSubmission>>,
    pub insert_calls: AtomicU64,
    pub fail_writes: bool,
    pub fail_reads: bool,
}

impl MemoryStore {
    fn check_read(&self) -> Result<(), StorageError> {
        if self.fail_reads {
            return Err(StorageError("simulated read failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn insert(&self, submission: NewSubmission) -> Result<StoredSubmission, StorageError> {
        self.insert_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_writes {
            return Err(StorageError("simulated write failure".to_string()));
        }
        let stored = StoredSubmission::from_new(
            submission,
            Uuid::new_v4().to_string(),
            Utc::now(),
        );
        self.records.lock().await.push(stored.clone());
        Ok(stored)
    }

    async fn find_all(&self) -> Result<Vec<StoredSubmission>, StorageError> {
        self.check_read()?;
        // Insertion order is creation order; reversing yields newest first
        // even when consecutive timestamps collide.
        let records = self.records.lock().await;
        Ok(records.iter().rev().cloned().collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<StoredSubmission>, StorageError> {
        self.check_read()?;
        let records = self.records.lock().await;
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.name == name)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredSubmission>, StorageError> {
        self.check_read()?;
        let records = self.records.lock().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }
}
