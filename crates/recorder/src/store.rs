//! Mutable per-session sample storage.

use std::collections::BTreeMap;

use playstats_model::{Point2, SampleSource};

/// Counters and ordered positional samples keyed by source.
///
/// Only the recorder reads the contents, and only to build snapshots.
#[derive(Debug, Clone, Default)]
pub struct SampleStore {
    counts: BTreeMap<SampleSource, u64>,
    positions: BTreeMap<SampleSource, Vec<Point2>>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `source`.
    pub fn record_discrete(&mut self, source: SampleSource) {
        *self.counts.entry(source).or_insert(0) += 1;
    }

    /// Count one occurrence of `source` and append `point` to its samples.
    pub fn record_positional(&mut self, source: SampleSource, point: Point2) {
        self.positions.entry(source.clone()).or_default().push(point);
        self.record_discrete(source);
    }

    /// Drop every count and sample.
    pub fn clear(&mut self) {
        self.counts.clear();
        self.positions.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty() && self.positions.is_empty()
    }

    pub(crate) fn counts(&self) -> &BTreeMap<SampleSource, u64> {
        &self.counts
    }

    pub(crate) fn positions(&self) -> &BTreeMap<SampleSource, Vec<Point2>> {
        &self.positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn discrete_records_create_and_increment() {
        let mut store = SampleStore::new();
        store.record_discrete(SampleSource::key("A"));
        store.record_discrete(SampleSource::key("A"));
        store.record_discrete(SampleSource::key("S"));

        assert_eq!(store.counts()[&SampleSource::key("A")], 2);
        assert_eq!(store.counts()[&SampleSource::key("S")], 1);
        assert!(store.positions().is_empty());
    }

    #[test]
    fn positional_records_count_and_keep_order() {
        let mut store = SampleStore::new();
        let click = SampleSource::MouseButton(0);
        store.record_positional(click.clone(), Point2::new(3.0, 4.0));
        store.record_positional(click.clone(), Point2::new(1.0, 2.0));

        assert_eq!(store.counts()[&click], 2);
        assert_eq!(
            store.positions()[&click],
            vec![Point2::new(3.0, 4.0), Point2::new(1.0, 2.0)]
        );
    }

    #[test]
    fn clear_empties_everything() {
        let mut store = SampleStore::new();
        store.record_positional(SampleSource::action("Look"), Point2::default());
        store.record_discrete(SampleSource::action("Jump"));
        assert!(!store.is_empty());

        store.clear();
        assert!(store.is_empty());
    }

    proptest! {
        #[test]
        fn counts_match_number_of_records(keys in prop::collection::vec("[A-D]", 0..64)) {
            let mut store = SampleStore::new();
            store.record_discrete(SampleSource::key("Z"));
            store.clear();

            for key in &keys {
                store.record_discrete(SampleSource::key(key.as_str()));
            }
            for key in ["A", "B", "C", "D", "Z"] {
                let expected = keys.iter().filter(|k| k.as_str() == key).count() as u64;
                let actual = store.counts().get(&SampleSource::key(key)).copied().unwrap_or(0);
                prop_assert_eq!(actual, expected);
            }
        }
    }
}
