use crate::error::{ProcessingError, Result};
use crate::models::StationTable;
use std::sync::Mutex;

/// Fold `local` into `global`, moving keys that `global` has not seen yet.
pub fn merge_tables(global: &mut StationTable, local: StationTable) {
    for (station, stat) in local {
        global.combine(station, stat);
    }
}

/// Owner of the global table; the only place workers share mutable state.
///
/// Each merge holds the lock for one pass over a partition's distinct
/// stations, never across a scan.
pub struct MergeCoordinator {
    global: Mutex<StationTable>,
}

impl MergeCoordinator {
    pub fn new() -> Self {
        Self {
            global: Mutex::new(StationTable::new()),
        }
    }

    /// Merge a finished partition table. Returns the global station count.
    pub fn merge(&self, local: StationTable) -> Result<usize> {
        let mut global = self
            .global
            .lock()
            .map_err(|e| ProcessingError::DataMerge(e.to_string()))?;

        merge_tables(&mut global, local);
        Ok(global.len())
    }

    pub fn into_table(self) -> Result<StationTable> {
        self.global
            .into_inner()
            .map_err(|e| ProcessingError::DataMerge(e.to_string()))
    }
}

impl Default for MergeCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
