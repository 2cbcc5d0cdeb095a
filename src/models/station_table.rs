use crate::models::StationStat;
use crate::utils::constants::INITIAL_TABLE_CAPACITY;
use ahash::AHashMap;

/// Station name (raw bytes, exact match) to running aggregate.
///
/// Used both as a worker's private table and as the merged global table.
#[derive(Debug, Clone, Default)]
pub struct StationTable {
    entries: AHashMap<Vec<u8>, StationStat>,
}

impl StationTable {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_TABLE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: AHashMap::with_capacity(capacity),
        }
    }

    /// Record one value. The name is only copied the first time it is seen.
    pub fn observe(&mut self, station: &[u8], value: f32) {
        match self.entries.get_mut(station) {
            Some(stat) => stat.add_value(value),
            None => {
                self.entries.insert(station.to_vec(), StationStat::new(value));
            }
        }
    }

    /// Fold a finished aggregate for `station` into the table.
    pub fn combine(&mut self, station: Vec<u8>, stat: StationStat) {
        self.entries
            .entry(station)
            .and_modify(|existing| existing.combine(&stat))
            .or_insert(stat);
    }

    pub fn get(&self, station: &[u8]) -> Option<&StationStat> {
        self.entries.get(station)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of values observed across all stations.
    pub fn total_count(&self) -> u64 {
        self.entries.values().map(|s| s.count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &StationStat)> {
        self.entries.iter().map(|(k, v)| (k.as_slice(), v))
    }
}

impl IntoIterator for StationTable {
    type Item = (Vec<u8>, StationStat);
    type IntoIter = std::collections::hash_map::IntoIter<Vec<u8>, StationStat>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_creates_and_updates() {
        let mut table = StationTable::new();
        table.observe(b"Kansas City", -0.8);
        table.observe(b"Damascus", 19.8);
        table.observe(b"Kansas City", 28.0);

        assert_eq!(table.len(), 2);
        assert_eq!(table.total_count(), 3);

        let kansas = table.get(b"Kansas City").unwrap();
        assert_eq!(kansas.min, -0.8);
        assert_eq!(kansas.max, 28.0);
        assert_eq!(kansas.count, 2);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut table = StationTable::new();
        table.observe(b"paris", 1.0);
        table.observe(b"Paris", 2.0);

        assert_eq!(table.len(), 2);
        assert!(table.get(b"PARIS").is_none());
    }

    #[test]
    fn test_combine() {
        let mut table = StationTable::new();
        table.observe(b"Oslo", 3.0);
        table.combine(b"Oslo".to_vec(), StationStat::new(-7.0));
        table.combine(b"Lima".to_vec(), StationStat::new(18.5));

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(b"Oslo").unwrap().min, -7.0);
        assert_eq!(table.get(b"Oslo").unwrap().count, 2);
        assert_eq!(table.get(b"Lima").unwrap().count, 1);
    }
}
