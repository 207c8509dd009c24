pub mod loaders;
pub mod record;

pub use loaders::{list_json_files, list_playbill_files, load_json_document};
pub use record::{AggregateResult, FlatRecord, SummaryRow, YearLabel};
