use crate::config::ProcessingConfig;
use crate::error::{PartitionFailure, ProcessingError, Result};
use crate::models::{Partition, StationTable};
use crate::processors::{MergeCoordinator, PartitionAggregator};
use crate::readers::{ScanSummary, WindowedFile};
use crate::utils::constants::DEFAULT_WINDOW_SIZE;
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, error, info};

/// Outcome of one successfully scanned partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionReport {
    pub partition: Partition,
    pub summary: ScanSummary,
}

/// Merged statistics for a whole file.
#[derive(Debug)]
pub struct AggregationResult {
    pub table: StationTable,
    pub partitions: Vec<PartitionReport>,
}

impl AggregationResult {
    pub fn total_records(&self) -> u64 {
        self.partitions.iter().map(|p| p.summary.records).sum()
    }
}

pub struct ParallelProcessor {
    max_workers: usize,
    window_size: usize,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }

    pub fn from_config(config: &ProcessingConfig) -> Self {
        Self::new(config.threads).with_window_size(config.window_size)
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// One partition per worker, but never more partitions than windows.
    pub fn plan_partitions(&self, source: &WindowedFile) -> Vec<Partition> {
        let windows = usize::try_from(source.window_count()).unwrap_or(usize::MAX);
        Partition::plan(source.size(), self.max_workers.min(windows))
    }

    /// Aggregate every record of the file at `path`.
    ///
    /// All partitions run to completion. If any of them failed, the
    /// surviving partitions are still merged and accounted for in the
    /// returned [`ProcessingError::PartitionsFailed`], but no table is
    /// returned.
    pub fn process_file(
        &self,
        path: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<AggregationResult> {
        let source = WindowedFile::open(path, self.window_size)?;
        info!("Reading {}", source.path().display());
        info!("Using window size of {} bytes", source.window_size());
        info!("File has size {} bytes", source.size());
        info!("Maximum of {} windows", source.window_count());

        let partitions = self.plan_partitions(&source);
        info!("Using {} partitions (threads)", partitions.len());

        if partitions.is_empty() {
            return Ok(AggregationResult {
                table: StationTable::new(),
                partitions: Vec::new(),
            });
        }

        if let Some(p) = progress {
            p.set_total(partitions.len() as u64);
            p.set_message(&format!("Scanning {} partitions...", partitions.len()));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(partitions.len())
            .thread_name(|i| format!("partition-{:02}", i))
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let coordinator = MergeCoordinator::new();

        let outcomes: Vec<Result<ScanSummary>> = pool.install(|| {
            partitions
                .par_iter()
                .with_max_len(1)
                .map(|partition| {
                    let result = Self::process_partition(&source, partition, &coordinator);

                    if let Some(p) = progress {
                        p.increment(1);
                    }

                    result
                })
                .collect()
        });

        let mut reports = Vec::with_capacity(partitions.len());
        let mut failures = Vec::new();
        for (partition, outcome) in partitions.into_iter().zip(outcomes) {
            match outcome {
                Ok(summary) => reports.push(PartitionReport { partition, summary }),
                Err(e) => {
                    error!("Partition {:02} failed: {}", partition.index, e);
                    failures.push(PartitionFailure {
                        partition: partition.index,
                        error: e,
                    });
                }
            }
        }

        if !failures.is_empty() {
            if let Some(p) = progress {
                p.finish_with_message(&format!("{} partition(s) failed", failures.len()));
            }
            return Err(ProcessingError::PartitionsFailed {
                succeeded: reports.len(),
                records: reports.iter().map(|r| r.summary.records).sum(),
                failures,
            });
        }

        let table = coordinator.into_table()?;

        if let Some(p) = progress {
            p.finish_with_message(&format!("Aggregated {} stations", table.len()));
        }

        Ok(AggregationResult {
            table,
            partitions: reports,
        })
    }

    /// Scan one partition into a private table, then merge it.
    ///
    /// A partition that fails to scan never reaches the merge.
    fn process_partition(
        source: &WindowedFile,
        partition: &Partition,
        coordinator: &MergeCoordinator,
    ) -> Result<ScanSummary> {
        debug!(
            "Partition {:02} from {:>12} to {:>12}",
            partition.index, partition.start, partition.end
        );

        let mut aggregator = PartitionAggregator::new();
        let summary = aggregator.aggregate(source, partition)?;

        if summary.skipped_bytes > 0 {
            debug!(
                "Partition {:02} skipped {} bytes",
                partition.index, summary.skipped_bytes
            );
        }

        let stations = coordinator.merge(aggregator.into_table())?;

        debug!(
            "Partition {:02} processed from {:>12} to actually {:>12} (end: {:>12}), {} records, {} windows, {} stations merged so far",
            partition.index,
            summary.first_record,
            summary.end_offset,
            partition.end,
            summary.records,
            summary.windows_mapped,
            stations
        );

        Ok(summary)
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
