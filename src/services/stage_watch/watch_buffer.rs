use std::sync::{Arc, PoisonError, RwLock};

use super::buffer_entry::BufferEntry;

/// Fixed-size, index addressed store of the entries of one watch cycle.
///
/// Slots are populated once before the workers start and never removed.
#[derive(Debug, Default)]
pub struct WatchBuffer {
    slots: RwLock<Vec<Option<Arc<BufferEntry>>>>,
}

impl WatchBuffer {
    pub fn with_len(len: usize) -> Self {
        Self {
            slots: RwLock::new(vec![None; len]),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store `entry` at `index`. The buffer keeps the length it was created with.
    pub fn set(&self, index: usize, entry: Arc<BufferEntry>) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let len = slots.len();
        debug_assert!(index < len, "watch buffer index {index} out of range for {len} stages");
        match slots.get_mut(index) {
            Some(slot) => *slot = Some(entry),
            None => tracing::error!(index, len, "Ignoring out of range watch buffer slot"),
        }
    }

    pub fn get(&self, index: usize) -> Option<Arc<BufferEntry>> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .cloned()
            .flatten()
    }

    /// Snapshot of all populated entries in index order.
    pub fn to_watch_results(&self) -> Vec<Arc<BufferEntry>> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .flatten()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::output_sink::{SharedBuffer, SyncedWriter};
    use crate::domain::models::promotion::{PromotionResultEntry, PromotionStatus};
    use crate::domain::models::watch_policy::WatchResult;

    fn entry(stage: &str) -> Arc<BufferEntry> {
        Arc::new(BufferEntry::new(
            PromotionResultEntry::new(stage, PromotionStatus::Success, "v"),
            SyncedWriter::new(SharedBuffer::new()),
        ))
    }

    #[test]
    fn test_results_follow_index_order() {
        let buffer = WatchBuffer::with_len(3);
        buffer.set(2, entry("c"));
        buffer.set(0, entry("a"));
        buffer.set(1, entry("b"));

        let stages: Vec<String> = buffer
            .to_watch_results()
            .iter()
            .map(|e| e.stage_name().to_string())
            .collect();
        assert_eq!(stages, ["a", "b", "c"]);
    }

    #[test]
    fn test_get_missing_index() {
        let buffer = WatchBuffer::with_len(1);
        assert!(buffer.get(0).is_none());
        assert!(buffer.get(5).is_none());
        buffer.set(0, entry("a"));
        assert_eq!(buffer.get(0).unwrap().stage(), "a");
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn test_set_out_of_range_is_a_bug() {
        let buffer = WatchBuffer::with_len(1);
        buffer.set(1, entry("b"));
    }

    #[test]
    fn test_length_is_fixed_at_creation() {
        let buffer = WatchBuffer::default();
        assert!(buffer.is_empty());
        let buffer = WatchBuffer::with_len(2);
        buffer.set(1, entry("b"));
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.to_watch_results().len(), 1);
    }

    #[test]
    fn test_concurrent_readers() {
        let buffer = Arc::new(WatchBuffer::with_len(4));
        for (i, stage) in ["a", "b", "c", "d"].iter().enumerate() {
            buffer.set(i, entry(stage));
        }

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let buffer = Arc::clone(&buffer);
                std::thread::spawn(move || buffer.get(i).map(|e| e.stage().to_string()))
            })
            .collect();
        let stages: Vec<Option<String>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(
            stages,
            [Some("a".to_string()), Some("b".to_string()), Some("c".to_string()), Some("d".to_string())]
        );
    }
}
