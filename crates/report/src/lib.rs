pub mod error;
pub mod export;
pub mod plot;
pub mod runner;
pub mod select;
pub mod summary;

pub use error::ReportError;
pub use select::{BestModels, Metric};
pub use summary::{SummaryRow, SummaryTable};
