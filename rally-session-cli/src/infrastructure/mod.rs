pub mod error;
pub mod observability;
pub mod schema;

pub use error::{CliError, Result};
pub use observability::LogConfig;
