pub mod collation;
pub mod report_writer;

pub use collation::{collation_for, ByteCollation, Collation, LocaleCollation};
pub use report_writer::{Report, ReportBuilder, ReportRow};
