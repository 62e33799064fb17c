//! Run history: one JSON file per stored [`ExecutionResult`].
//!
//! File stems are UTC timestamps (`20250114T093015.123456Z`), so sorting the
//! stems sorts the runs chronologically.

use std::io::ErrorKind;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use relay_application::ports::HistoryStorage;
use relay_application::{ApplicationError, ApplicationResult};
use relay_domain::ExecutionResult;
use tokio::fs::{self, OpenOptions};
use tracing::debug;

use super::file_storage::{FileStorage, entry_path, storage_error};
use crate::serialization::to_json_stable_bytes;

const ID_FORMAT: &str = "%Y%m%dT%H%M%S%.6fZ";

fn history_id(at: DateTime<Utc>) -> String {
    at.format(ID_FORMAT).to_string()
}

fn is_history_id(stem: &str) -> bool {
    NaiveDateTime::parse_from_str(stem, ID_FORMAT).is_ok()
}

#[async_trait]
impl HistoryStorage for FileStorage {
    async fn save(&self, result: &ExecutionResult) -> ApplicationResult<String> {
        let dir = self.history_dir();
        let bytes = to_json_stable_bytes(result).map_err(|e| ApplicationError::Storage(e.to_string()))?;
        fs::create_dir_all(&dir).await.map_err(|e| storage_error(&dir, &e))?;

        let mut at = Utc::now();
        loop {
            let id = history_id(at);
            let path = entry_path(&dir, &id)?;
            // Claim the name before writing; a concurrent save gets the next microsecond.
            match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => {
                    drop(file);
                    fs::write(&path, &bytes).await.map_err(|e| storage_error(&path, &e))?;
                    debug!(id = %id, collection = %result.collection_name, "saved run to history");
                    return Ok(id);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => at += TimeDelta::microseconds(1),
                Err(e) => return Err(storage_error(&path, &e)),
            }
        }
    }

    async fn load(&self, id: &str) -> ApplicationResult<ExecutionResult> {
        Self::read_entry(&self.history_dir(), id).await
    }

    async fn list(&self) -> ApplicationResult<Vec<String>> {
        let mut ids = Self::list_entries(&self.history_dir()).await?;
        ids.retain(|id| is_history_id(id));
        ids.reverse();
        Ok(ids)
    }

    async fn clear(&self) -> ApplicationResult<()> {
        let dir = self.history_dir();
        let ids = HistoryStorage::list(self).await?;
        for id in &ids {
            match Self::delete_entry(&dir, id).await {
                Ok(()) | Err(ApplicationError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        debug!(removed = ids.len(), "cleared run history");
        Ok(())
    }
}
