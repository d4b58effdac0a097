//! Configuration management for mstrict
//!
//! Settings are read from environment variables with defaults; command-line
//! flags override them in `main`.
//!
//! # Environment Variables
//!
//! - `MSTRICT_BUILD_DIR`: directory containing the source code to build - default: "."
//! - `MSTRICT_DEBUG`: enable debug output (true|false) - default: "false"
//! - `MSTRICT_LOG_LEVEL`: logging level - default: "info"
//! - `MSTRICT_LOG_JSON`: JSON log output (true|false) - default: "false"
//! - `MSTRICT_SORTED`: visit directories in name order (true|false) - default: "false"

use crate::plan::{BuildLoader, WalkOrder};
use crate::util::logging::{self, LoggingConfig};
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::Level;

const DEFAULT_BUILD_DIR: &str = ".";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Valid options: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone)]
pub struct MstrictConfig {
    pub build_dir: PathBuf,
    pub debug: bool,
    pub log_level: String,
    pub log_json: bool,
    pub order: WalkOrder,
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false)
}

impl Default for MstrictConfig {
    fn default() -> Self {
        let build_dir = env::var("MSTRICT_BUILD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_BUILD_DIR));

        let log_level = env::var("MSTRICT_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let order = if env_flag("MSTRICT_SORTED") {
            WalkOrder::Sorted
        } else {
            WalkOrder::Filesystem
        };

        Self {
            build_dir,
            debug: env_flag("MSTRICT_DEBUG"),
            log_level,
            log_json: env_flag("MSTRICT_LOG_JSON"),
            order,
        }
    }
}

impl MstrictConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.build_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Build directory must not be empty".to_string(),
            ));
        }

        if !logging::is_valid_level(&self.log_level) {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }

        Ok(())
    }

    /// `debug` wins over `log_level`.
    pub fn logging_config(&self) -> LoggingConfig {
        let base = if self.debug {
            LoggingConfig::development()
        } else {
            LoggingConfig::with_level(logging::parse_level(&self.log_level).unwrap_or(Level::INFO))
        };

        LoggingConfig {
            use_json: self.log_json,
            ..base
        }
    }

    pub fn loader(&self) -> BuildLoader {
        BuildLoader::new().with_order(self.order)
    }
}

impl fmt::Display for MstrictConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mstrict Configuration:")?;
        writeln!(f, "  Build Dir: {}", self.build_dir.display())?;
        writeln!(f, "  Debug: {}", self.debug)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Log JSON: {}", self.log_json)?;
        writeln!(f, "  Walk Order: {:?}", self.order)?;
        Ok(())
    }
}
