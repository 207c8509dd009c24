pub mod json_loader;

pub use json_loader::{list_json_files, list_playbill_files, load_json_document, DONE_PREFIX};
