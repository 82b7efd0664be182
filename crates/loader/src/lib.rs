pub mod document;
pub mod loader;

pub use document::parse_document;
pub use loader::{LoadError, LoadReport, MissingResult, ResultLoader};
