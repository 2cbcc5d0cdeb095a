use crate::error::Result;
use crate::models::{Partition, StationTable};
use crate::readers::{RecordScanner, ScanSummary, WindowedFile};

/// Worker-local aggregation of one partition. Never shared, never locked.
pub struct PartitionAggregator {
    table: StationTable,
}

impl PartitionAggregator {
    pub fn new() -> Self {
        Self {
            table: StationTable::new(),
        }
    }

    pub fn observe(&mut self, station: &[u8], value: f32) {
        self.table.observe(station, value);
    }

    /// Scan `partition` and fold every record into the local table.
    pub fn aggregate(&mut self, source: &WindowedFile, partition: &Partition) -> Result<ScanSummary> {
        RecordScanner::for_partition(source, partition)
            .scan(|station, value| self.observe(station, value))
    }

    pub fn table(&self) -> &StationTable {
        &self.table
    }

    pub fn into_table(self) -> StationTable {
        self.table
    }
}

impl Default for PartitionAggregator {
    fn default() -> Self {
        Self::new()
    }
}
