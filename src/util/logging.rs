//! Logging setup for mstrict
//!
//! Diagnostics go through `tracing` and are written to stderr; stdout carries
//! only the build tree or file listing.
//!
//! ```no_run
//! use mstrict::util::logging::{self, LoggingConfig};
//! use tracing::Level;
//!
//! logging::init_logging(LoggingConfig::with_level(Level::DEBUG));
//! tracing::debug!(build_file = "/work/BUILD", "Parsing build file");
//! ```

use std::env;
use std::io::{self, IsTerminal};
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Level names accepted by `--log-level` and `MSTRICT_LOG_LEVEL`.
pub const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    pub use_json: bool,
    /// Show the emitting module, e.g. `mstrict::plan::walker`.
    pub include_target: bool,
    /// Show source file and line of each event.
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::with_level(Level::INFO)
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            use_json: false,
            include_target: false,
            include_location: false,
        }
    }

    /// What `--debug` turns on.
    pub fn development() -> Self {
        Self {
            include_target: true,
            include_location: true,
            ..Self::with_level(Level::DEBUG)
        }
    }

    /// Filter applied when `RUST_LOG` is not set: only this crate's events.
    pub fn filter_directive(&self) -> String {
        format!("{}={}", env!("CARGO_CRATE_NAME"), self.level)
    }
}

/// Case-insensitive level name lookup.
pub fn parse_level(name: &str) -> Option<Level> {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

pub fn is_valid_level(name: &str) -> bool {
    parse_level(name).is_some()
}

/// Installs the global subscriber. Later calls are no-ops, as is the first
/// one if another subscriber was already installed. `RUST_LOG` overrides
/// `config.level`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = match env::var(EnvFilter::DEFAULT_ENV) {
            Ok(_) => EnvFilter::from_default_env(),
            Err(_) => EnvFilter::new(config.filter_directive()),
        };

        let layer = fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location);

        let registry = tracing_subscriber::registry().with(filter);
        let installed = if config.use_json {
            registry.with(layer.json()).try_init()
        } else {
            registry.with(layer).try_init()
        };

        if let Err(e) = installed {
            eprintln!("Logging not initialized: {}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_names() {
        let parsed: Vec<Level> = VALID_LEVELS.iter().filter_map(|n| parse_level(n)).collect();
        assert_eq!(
            parsed,
            vec![Level::TRACE, Level::DEBUG, Level::INFO, Level::WARN, Level::ERROR]
        );
        assert_eq!(parse_level(" Warn "), Some(Level::WARN));
    }

    #[test]
    fn test_parse_level_rejects_unknown() {
        assert_eq!(parse_level("verbose"), None);
        assert_eq!(parse_level(""), None);
        assert!(!is_valid_level("3"));
        assert!(is_valid_level("ERROR"));
    }

    #[test]
    fn test_development_config() {
        let config = LoggingConfig::development();
        assert_eq!(config.level, Level::DEBUG);
        assert!(config.include_target);
        assert!(config.include_location);
        assert!(!config.use_json);
    }

    #[test]
    fn test_filter_directive_targets_crate() {
        assert_eq!(LoggingConfig::default().filter_directive(), "mstrict=INFO");
        assert_eq!(
            LoggingConfig::with_level(Level::TRACE).filter_directive(),
            "mstrict=TRACE"
        );
    }
}
