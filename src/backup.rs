//! JSON backups of the record set.
//!
//! A backup is a bare JSON array of `YYYY-MM-DD` strings, the same shape the
//! record slot stores. Imports are all-or-nothing: one malformed element
//! rejects the file.

use crate::date_key::{DateKey, parse_key_list};
use crate::errors::TrackerError;
use crate::records::RecordStore;

pub fn export(store: &RecordStore) -> Result<String, serde_json::Error> {
    store.encode()
}

/// Parses a backup document. The caller installs the result with
/// [`RecordStore::replace_all`]; nothing is merged.
pub fn import(text: &str) -> Result<Vec<DateKey>, TrackerError> {
    let mut dates =
        parse_key_list(text).map_err(|err| TrackerError::InvalidBackupFormat(err.to_string()))?;
    dates.sort();
    dates.dedup();
    Ok(dates)
}

pub fn export_filename(today: &DateKey) -> String {
    format!("fitcheck_backup_{}.json", today.date().format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySlot;
    use std::sync::Arc;

    fn key(raw: &str) -> DateKey {
        DateKey::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn export_then_import_reproduces_set() {
        let mut store = RecordStore::new(Arc::new(MemorySlot::new()));
        for raw in ["2024-03-10", "2023-12-31", "2024-01-05"] {
            store.toggle(key(raw)).await;
        }

        let text = export(&store).unwrap();
        assert_eq!(text, r#"["2023-12-31","2024-01-05","2024-03-10"]"#);

        let mut restored = RecordStore::new(Arc::new(MemorySlot::new()));
        restored.replace_all(import(&text).unwrap()).await;
        assert_eq!(restored.snapshot(), store.snapshot());
    }

    #[tokio::test]
    async fn import_failure_leaves_store_unchanged() {
        let mut store = RecordStore::new(Arc::new(MemorySlot::new()));
        store.toggle(key("2024-03-10")).await;

        let err = import("not json").unwrap_err();
        assert!(matches!(err, TrackerError::InvalidBackupFormat(_)));
        assert_eq!(store.snapshot(), vec![key("2024-03-10")]);
    }

    #[test]
    fn import_empty_array_is_empty() {
        assert!(import("[]").unwrap().is_empty());
    }

    #[test]
    fn import_rejects_non_arrays() {
        for text in [r#"{"dates":[]}"#, r#""2024-03-10""#, "null", "42"] {
            assert!(matches!(import(text), Err(TrackerError::InvalidBackupFormat(_))));
        }
    }

    #[test]
    fn import_rejects_any_malformed_entry() {
        for text in [
            r#"["2024-03-10", "2024-3-11"]"#,
            r#"["2024-03-10", null]"#,
            r#"["2024-03-10", {"date":"2024-03-11"}]"#,
            r#"["2024-02-30"]"#,
        ] {
            assert!(matches!(import(text), Err(TrackerError::InvalidBackupFormat(_))), "{text}");
        }
    }

    #[test]
    fn import_collapses_duplicates() {
        let dates = import(r#"["2024-03-10","2024-03-09","2024-03-10"]"#).unwrap();
        assert_eq!(dates, vec![key("2024-03-09"), key("2024-03-10")]);
    }

    #[test]
    fn filename_embeds_export_day() {
        assert_eq!(export_filename(&key("2024-03-10")), "fitcheck_backup_20240310.json");
    }
}
