use crate::date_key::{DateKey, parse_key_list};
use crate::errors::StorageError;
use async_trait::async_trait;
use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};
use tokio::fs;

/// Name of the single slot the record set lives in.
pub const RECORDS_KEY: &str = "fitcheck_records";

pub fn default_data_path() -> PathBuf {
    PathBuf::from("data").join(format!("{RECORDS_KEY}.json"))
}

/// Decodes a stored slot value. Anything but an array of valid keys is
/// reported as [`StorageError::Corrupt`].
pub fn decode_records(text: &str) -> Result<Vec<DateKey>, StorageError> {
    parse_key_list(text).map_err(StorageError::Corrupt)
}

/// One durable key-value slot holding the serialized record set.
#[async_trait]
pub trait RecordSlot: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<String>, StorageError>;

    async fn save(&self, payload: &str) -> Result<(), StorageError>;
}

/// Slot backed by a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSlot for FileSlot {
    async fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path).await {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Read(err)),
        }
    }

    async fn save(&self, payload: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(StorageError::Write)?;
            }
        }
        fs::write(&self.path, payload)
            .await
            .map_err(StorageError::Write)
    }
}

/// In-process slot, also keeps count of writes.
#[derive(Debug, Default)]
pub struct MemorySlot {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    value: Option<String>,
    writes: usize,
    fail_writes: bool,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        let slot = Self::default();
        slot.lock().value = Some(value.into());
        slot
    }

    pub fn value(&self) -> Option<String> {
        self.lock().value.clone()
    }

    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    /// Makes every following `save` fail, to exercise degraded sessions.
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RecordSlot for MemorySlot {
    async fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.value())
    }

    async fn save(&self, payload: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(StorageError::Write(std::io::Error::other(
                "memory slot rejects writes",
            )));
        }
        inner.value = Some(payload.to_string());
        inner.writes += 1;
        Ok(())
    }
}
