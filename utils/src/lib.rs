//! Shared utilities for the ballot service.

pub mod logging;
pub mod shutdown;
pub mod time;

pub use logging::{init_logging, LogFormat, LoggingError};
pub use shutdown::ShutdownController;
pub use time::format_duration;
