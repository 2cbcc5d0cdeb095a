/// Record format
pub const FIELD_SEPARATOR: u8 = b';';
pub const RECORD_TERMINATOR: u8 = b'\n';

/// Window geometry. memmap2 realigns offsets to the real page size itself,
/// so this only has to be a multiple of it on the platforms we target.
pub const PAGE_SIZE: u64 = 4096;
pub const MIN_WINDOW_PAGES: u64 = 2;
pub const DEFAULT_WINDOW_SIZE: usize = 1 << 26; // 64 MiB
pub const MIN_WINDOW_SIZE: usize = (PAGE_SIZE * MIN_WINDOW_PAGES) as usize;

/// Processing defaults
pub const DEFAULT_LOCALE: &str = "en";
pub const BYTE_ORDER_LOCALES: &[&str] = &["C", "POSIX"];
pub const MAX_THREADS: usize = 4096;
pub const INITIAL_TABLE_CAPACITY: usize = 1024;

/// Configuration
pub const ENV_PREFIX: &str = "BRC";

/// Report layout
pub const REPORT_HEADER: &str = " **** Statistics ***";
pub const STATION_COLUMN_WIDTH: usize = 30;

/// Process exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_BAD_ARGUMENTS: u8 = 2;
pub const EXIT_MALFORMED_INPUT: u8 = 65;
