pub mod merge_coordinator;
pub mod parallel_processor;
pub mod partition_aggregator;

pub use merge_coordinator::{merge_tables, MergeCoordinator};
pub use parallel_processor::{AggregationResult, ParallelProcessor, PartitionReport};
pub use partition_aggregator::PartitionAggregator;
