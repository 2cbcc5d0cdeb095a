pub mod partition;
pub mod station_stat;
pub mod station_table;

pub use partition::Partition;
pub use station_stat::StationStat;
pub use station_table::StationTable;
