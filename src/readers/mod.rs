pub mod record_scanner;
pub mod value_parser;
pub mod windowed_source;

pub use record_scanner::{RecordScanner, ScanSummary};
pub use value_parser::parse_value;
pub use windowed_source::{Window, WindowedFile};
