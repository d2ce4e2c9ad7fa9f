//! Durable JSON substrate for daily records, completion history, and the
//! rollover marker.
//!
//! Each named record is one JSON document inside the store directory. The
//! documents stay small (at most eight days of sections), so every write
//! serializes the whole document and lands it via temp-file + rename: a
//! crash mid-write leaves either the old or the new version on disk, never
//! a torn one.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;

use crate::dates::Day;
use crate::types::{DailyCompletion, DailyRecord};

/// Retention window: the history log keeps this many entries, and the
/// reconciler prunes records older than this many days.
pub const RETENTION_DAYS: usize = 7;

const RECORDS_FILE: &str = "daily_records.json";
const HISTORY_FILE: &str = "completion_history.json";
const MARKER_FILE: &str = "last_rollover.json";

/// Errors specific to the storage substrate.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("home directory not found")]
    HomeDirNotFound,
}

/// Last date the daily rollover completed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RolloverMarker {
    date: Day,
}

/// File-backed store for the daily record collection, the bounded
/// completion-history log, and the last-rollover marker.
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    /// Open the store at `~/.goaldeck/`, creating the directory if needed.
    pub async fn open() -> Result<Self, StorageError> {
        let home = dirs::home_dir().ok_or(StorageError::HomeDirNotFound)?;
        Self::open_at(home.join(".goaldeck")).await
    }

    /// Open a store at an explicit directory. Useful for testing.
    pub async fn open_at(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await.map_err(|e| StorageError::Io {
            path: dir.clone(),
            source: e,
        })?;
        Ok(RecordStore { dir })
    }

    /// All daily records, sorted by date. Storage order is not trusted.
    pub async fn records(&self) -> Result<Vec<DailyRecord>, StorageError> {
        let mut records: Vec<DailyRecord> =
            self.read_document(RECORDS_FILE).await?.unwrap_or_default();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }

    /// The record for one date, if present.
    pub async fn record(&self, date: Day) -> Result<Option<DailyRecord>, StorageError> {
        Ok(self.records().await?.into_iter().find(|r| r.date == date))
    }

    /// Upsert one record, replacing any existing record for that date.
    pub async fn put_record(&self, record: DailyRecord) -> Result<(), StorageError> {
        let mut records = self.records().await?;
        match records.iter_mut().find(|r| r.date == record.date) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        self.save_records(records).await
    }

    /// Replace the whole record collection.
    pub async fn save_records(&self, mut records: Vec<DailyRecord>) -> Result<(), StorageError> {
        records.sort_by_key(|r| r.date);
        self.write_document(RECORDS_FILE, &records).await
    }

    /// Completion history, oldest first, never more than [`RETENTION_DAYS`]
    /// entries.
    pub async fn history(&self) -> Result<Vec<DailyCompletion>, StorageError> {
        let mut history: Vec<DailyCompletion> =
            self.read_document(HISTORY_FILE).await?.unwrap_or_default();
        history.sort_by_key(|e| e.date);
        Ok(history)
    }

    /// Append one history entry, evicting the oldest beyond the retention
    /// cap. Re-archiving a date already present replaces that entry, so an
    /// interrupted rollover can retry without duplicating a day.
    pub async fn append_history(&self, entry: DailyCompletion) -> Result<(), StorageError> {
        let mut history = self.history().await?;
        history.retain(|e| e.date != entry.date);
        history.push(entry);
        history.sort_by_key(|e| e.date);
        if history.len() > RETENTION_DAYS {
            let excess = history.len() - RETENTION_DAYS;
            history.drain(..excess);
        }
        self.write_document(HISTORY_FILE, &history).await
    }

    /// Replace the whole history log. Used by pruning.
    pub async fn save_history(&self, mut history: Vec<DailyCompletion>) -> Result<(), StorageError> {
        history.sort_by_key(|e| e.date);
        self.write_document(HISTORY_FILE, &history).await
    }

    /// The last date a rollover completed, if any.
    pub async fn last_rollover(&self) -> Result<Option<Day>, StorageError> {
        Ok(self
            .read_document::<RolloverMarker>(MARKER_FILE)
            .await?
            .map(|m| m.date))
    }

    /// Advance the rollover marker. Callers write this only after the
    /// archive and the completion reset have both landed.
    pub async fn set_last_rollover(&self, date: Day) -> Result<(), StorageError> {
        self.write_document(MARKER_FILE, &RolloverMarker { date }).await
    }

    /// Read one named document. A missing file reads as `None`; invalid
    /// JSON is an error, never a silent reset.
    async fn read_document<T: DeserializeOwned>(
        &self,
        file: &str,
    ) -> Result<Option<T>, StorageError> {
        let path = self.dir.join(file);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Io { path, source: e }),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StorageError::Json { path, source: e })
    }

    /// Serialize and land one named document via temp-file + rename.
    async fn write_document<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StorageError> {
        let path = self.dir.join(file);
        let payload = serde_json::to_string_pretty(value).map_err(|e| StorageError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, payload).await.map_err(|e| StorageError::Io {
            path: temp_path.clone(),
            source: e,
        })?;
        fs::rename(&temp_path, &path).await.map_err(|e| StorageError::Io {
            path,
            source: e,
        })
    }
}
