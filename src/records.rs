use crate::date_key::DateKey;
use crate::errors::{StorageError, TrackerError};
use crate::storage::{RecordSlot, decode_records};
use std::{collections::BTreeSet, fmt, sync::Arc};
use tracing::{error, info, warn};

/// The set of days a workout was completed, written through to a
/// [`RecordSlot`] after every mutation.
pub struct RecordStore {
    dates: BTreeSet<DateKey>,
    slot: Arc<dyn RecordSlot>,
}

impl RecordStore {
    /// Empty store that has not touched its slot yet.
    pub fn new(slot: Arc<dyn RecordSlot>) -> Self {
        Self {
            dates: BTreeSet::new(),
            slot,
        }
    }

    /// Loads whatever the slot holds. A missing value is an empty history;
    /// an unreadable or corrupt one is logged and also treated as empty.
    pub async fn hydrate(slot: Arc<dyn RecordSlot>) -> Self {
        let dates = match slot.load().await {
            Ok(None) => BTreeSet::new(),
            Ok(Some(text)) => match decode_records(&text) {
                Ok(dates) => dates.into_iter().collect(),
                Err(err) => {
                    warn!("{err}; starting with empty records");
                    BTreeSet::new()
                }
            },
            Err(err) => {
                error!("{err}; starting with empty records");
                BTreeSet::new()
            }
        };

        info!(count = dates.len(), "loaded workout records");
        Self { dates, slot }
    }

    pub fn contains(&self, date: &DateKey) -> bool {
        self.dates.contains(date)
    }

    /// Flips membership of `date` and persists. Returns whether the day is
    /// now marked as completed.
    pub async fn toggle(&mut self, date: DateKey) -> bool {
        let completed = if self.dates.remove(&date) {
            false
        } else {
            self.dates.insert(date);
            true
        };
        self.persist().await;
        completed
    }

    pub async fn replace_all<I>(&mut self, dates: I)
    where
        I: IntoIterator<Item = DateKey>,
    {
        self.dates = dates.into_iter().collect();
        self.persist().await;
    }

    /// Like [`replace_all`](Self::replace_all) for unvalidated strings. Any
    /// malformed entry rejects the whole batch and leaves the store as is.
    pub async fn replace_all_raw<I, S>(&mut self, dates: I) -> Result<(), TrackerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = dates
            .into_iter()
            .map(|raw| DateKey::parse(raw.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.replace_all(parsed).await;
        Ok(())
    }

    pub async fn clear(&mut self) {
        self.replace_all(std::iter::empty()).await;
    }

    /// Chronologically sorted copy of the records.
    pub fn snapshot(&self) -> Vec<DateKey> {
        self.dates.iter().cloned().collect()
    }

    pub fn total_count(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &DateKey> {
        self.dates.iter()
    }

    pub(crate) fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.dates)
    }

    async fn persist(&self) {
        let result = match self.encode() {
            Ok(payload) => self.slot.save(&payload).await,
            Err(err) => Err(StorageError::from(err)),
        };
        if let Err(err) = result {
            error!("{err}; records kept in memory for this session only");
        }
    }
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("dates", &self.dates)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySlot;

    fn key(raw: &str) -> DateKey {
        DateKey::parse(raw).unwrap()
    }

    async fn store_with(slot: &Arc<MemorySlot>) -> RecordStore {
        RecordStore::hydrate(slot.clone()).await
    }

    #[tokio::test]
    async fn toggle_twice_restores_membership() {
        let slot = Arc::new(MemorySlot::new());
        let mut store = store_with(&slot).await;
        let day = key("2024-03-10");

        assert!(store.toggle(day.clone()).await);
        assert!(store.contains(&day));
        assert!(!store.toggle(day.clone()).await);
        assert!(!store.contains(&day));
        assert_eq!(store.total_count(), 0);
    }

    #[tokio::test]
    async fn persisted_state_follows_every_toggle() {
        let slot = Arc::new(MemorySlot::new());
        let mut store = store_with(&slot).await;
        store.toggle(key("2024-03-09")).await;
        store.toggle(key("2024-03-10")).await;
        store.toggle(key("2024-03-10")).await;

        assert_eq!(slot.value().as_deref(), Some(r#"["2024-03-09"]"#));
        assert_eq!(slot.writes(), 3);
        assert_eq!(store.encode().unwrap(), slot.value().unwrap());
    }

    #[tokio::test]
    async fn replace_all_deduplicates_and_counts() {
        let slot = Arc::new(MemorySlot::new());
        let mut store = store_with(&slot).await;
        store.toggle(key("2020-01-01")).await;
        store
            .replace_all(vec![key("2024-03-09"), key("2024-03-08"), key("2024-03-09")])
            .await;

        assert_eq!(store.total_count(), 2);
        assert!(!store.contains(&key("2020-01-01")));
        assert_eq!(
            store.snapshot(),
            vec![key("2024-03-08"), key("2024-03-09")]
        );

        store.toggle(key("2024-03-10")).await;
        assert_eq!(store.total_count(), 3);
    }

    #[tokio::test]
    async fn replace_all_raw_rejects_whole_batch() {
        let slot = Arc::new(MemorySlot::new());
        let mut store = store_with(&slot).await;
        store.toggle(key("2024-03-09")).await;

        let err = store
            .replace_all_raw(["2024-03-10", "yesterday"])
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidRecordFormat(raw) if raw == "yesterday"));
        assert_eq!(store.snapshot(), vec![key("2024-03-09")]);
        assert_eq!(slot.writes(), 1);
    }

    #[tokio::test]
    async fn clear_empties_and_persists() {
        let slot = Arc::new(MemorySlot::with_value(r#"["2024-03-09","2024-03-10"]"#));
        let mut store = store_with(&slot).await;
        assert_eq!(store.total_count(), 2);

        store.clear().await;
        assert!(store.is_empty());
        assert_eq!(slot.value().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn hydrate_treats_corrupt_slot_as_empty() {
        for stored in ["not json", r#"{"days":{}}"#, r#"["2024-03-09", 7]"#] {
            let slot = Arc::new(MemorySlot::with_value(stored));
            let store = store_with(&slot).await;
            assert!(store.is_empty(), "{stored} should hydrate empty");
            assert_eq!(slot.writes(), 0);
        }
    }

    #[tokio::test]
    async fn failed_write_keeps_memory_state() {
        let slot = Arc::new(MemorySlot::new());
        let mut store = store_with(&slot).await;
        slot.fail_writes(true);

        assert!(store.toggle(key("2024-03-10")).await);
        assert!(store.contains(&key("2024-03-10")));
        assert!(slot.value().is_none());
    }
}
