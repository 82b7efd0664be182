pub mod config;
pub mod result;

pub use config::{ConfigError, EvalConfig};
pub use result::{ResultRecord, ResultSet};
