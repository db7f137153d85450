pub mod json;
pub mod memory;
pub mod spreadsheet;

pub use json::JsonBackend;
pub use memory::TabularSink;
pub use spreadsheet::CsvBackend;
