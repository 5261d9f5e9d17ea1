pub mod csv;
pub mod json;

pub use json::{write_json, write_json_file, RunSummary};
