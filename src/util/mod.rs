//! Utility modules for mstrict

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
