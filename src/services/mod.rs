pub mod failure_writer;
pub mod file_archiver;
pub mod record_extractor;
pub mod report_writer;
pub mod year_aggregator;
pub mod year_classifier;

pub use failure_writer::FailureWriter;
pub use file_archiver::FileArchiver;
pub use record_extractor::extract_records;
pub use report_writer::{ReportWriter, WriteOutcome};
pub use year_aggregator::YearAggregator;
pub use year_classifier::classify_year;
