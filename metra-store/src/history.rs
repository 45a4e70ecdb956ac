//! Conversion history, newest first

use std::sync::Arc;

use chrono::Utc;
use metra_core::{ConversionRecord, ConvertError, RecordDraft};
use tracing::debug;

use crate::store::{read_list, write_list, KeyValueStore};

pub const HISTORY_KEY: &str = "conversion_history";

/// Entries kept unless configured otherwise
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Clone)]
pub struct History {
    store: Arc<dyn KeyValueStore>,
    limit: usize,
}

impl History {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn list(&self) -> Result<Vec<ConversionRecord>, ConvertError> {
        read_list(self.store.as_ref(), HISTORY_KEY)
    }

    /// Validate `draft`, prepend it and drop the oldest entries past the limit.
    ///
    /// Returns the stored list.
    pub fn add(&self, draft: RecordDraft) -> Result<Vec<ConversionRecord>, ConvertError> {
        let record = draft.into_record(Utc::now())?;

        let mut history = self.list()?;
        history.insert(0, record);
        history.truncate(self.limit);

        write_list(self.store.as_ref(), HISTORY_KEY, &history)?;
        debug!(len = history.len(), "history updated");
        Ok(history)
    }

    pub fn clear(&self) -> Result<Vec<ConversionRecord>, ConvertError> {
        self.store.remove(HISTORY_KEY)?;
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileStore, MemoryStore};
    use metra_core::ConversionKind;
    use tempfile::TempDir;

    fn record(value: f64) -> ConversionRecord {
        ConversionRecord::new(ConversionKind::Length, "meter", value, "foot", value * 3.28084)
    }

    #[test]
    fn test_newest_first() {
        let history = History::new(Arc::new(MemoryStore::new()));
        history.add(record(1.0).into()).unwrap();
        let list = history.add(record(2.0).into()).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].from_value, 2.0);
        assert_eq!(history.list().unwrap(), list);
    }

    #[test]
    fn test_capped_at_limit() {
        let history = History::new(Arc::new(MemoryStore::new()));
        for i in 0..25 {
            history.add(record(i as f64).into()).unwrap();
        }
        let list = history.list().unwrap();
        assert_eq!(list.len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(list[0].from_value, 24.0);
        assert_eq!(list[19].from_value, 5.0);
    }

    #[test]
    fn test_incomplete_draft_rejected() {
        let history = History::new(Arc::new(MemoryStore::new()));
        let draft = RecordDraft {
            kind: Some(ConversionKind::Weight),
            from_unit: Some("gram".to_string()),
            ..Default::default()
        };
        let err = history.add(draft).unwrap_err();
        assert_eq!(
            err,
            ConvertError::IncompleteData {
                missing: vec!["toUnit", "fromValue", "toValue"]
            }
        );
        assert!(history.list().unwrap().is_empty());
    }

    #[test]
    fn test_missing_timestamp_is_stamped() {
        let history = History::new(Arc::new(MemoryStore::new()));
        let before = Utc::now();
        let mut draft: RecordDraft = record(1.0).into();
        draft.timestamp = None;
        let list = history.add(draft).unwrap();
        assert!(list[0].timestamp >= before);
    }

    #[test]
    fn test_overflowed_record_keeps_history() {
        let history = History::new(Arc::new(MemoryStore::new()));
        history.add(record(1.0).into()).unwrap();
        history.add(record(2.0).into()).unwrap();

        let mut overflowed: RecordDraft = record(1e308).into();
        overflowed.to_value = Some(f64::INFINITY);
        assert!(matches!(history.add(overflowed), Err(ConvertError::IncompleteData { .. })));
        assert_eq!(history.list().unwrap().len(), 2);
    }

    #[test]
    fn test_unreadable_entry_does_not_drop_the_rest() {
        let store = Arc::new(MemoryStore::new());
        let history = History::new(store.clone());
        history.add(record(1.0).into()).unwrap();

        let mut raw: serde_json::Value =
            serde_json::from_str(&store.get(HISTORY_KEY).unwrap().unwrap()).unwrap();
        let mut broken = raw[0].clone();
        broken["toValue"] = serde_json::Value::Null;
        raw.as_array_mut().unwrap().insert(0, broken);
        store.set(HISTORY_KEY, &raw.to_string()).unwrap();

        assert_eq!(history.list().unwrap().len(), 1);
        let list = history.add(record(2.0).into()).unwrap();
        let values: Vec<f64> = list.iter().map(|r| r.from_value).collect();
        assert_eq!(values, vec![2.0, 1.0]);
    }

    #[test]
    fn test_clear_removes_key() {
        let store = Arc::new(MemoryStore::new());
        let history = History::new(store.clone());
        history.add(record(1.0).into()).unwrap();

        assert!(history.clear().unwrap().is_empty());
        assert_eq!(store.get(HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn test_persists_across_instances() {
        let tmp = TempDir::new().unwrap();
        History::new(Arc::new(FileStore::new(tmp.path())))
            .add(record(3.0).into())
            .unwrap();

        let reopened = History::new(Arc::new(FileStore::new(tmp.path())));
        assert_eq!(reopened.list().unwrap()[0].from_value, 3.0);
    }
}
