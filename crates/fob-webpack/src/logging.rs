//! Subscriber installation for applications embedding fob-webpack.
//!
//! Only available with the `logging` feature. The library itself only emits
//! `tracing` events; libraries embedding it should install their own subscriber.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{ConfigError, Result};

static INIT: Once = Once::new();

/// Verbosity of composition logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Silent,
    Error,
    /// Missing required fields are reported here (default)
    #[default]
    Warn,
    Info,
    /// Composition start/finish and discovery
    Debug,
    /// Assembled style chains
    Trace,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "silent" | "off" => Ok(LogLevel::Silent),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(ConfigError::InvalidValue {
                field: "log_level".to_string(),
                hint: Some(format!("unknown level '{other}'")),
            }),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter())
    }
}

/// Install a compact stderr subscriber at `level`.
///
/// Only the first call in a process takes effect.
///
/// # Example
///
/// ```rust,no_run
/// use fob_webpack::logging::{init_logging, LogLevel};
///
/// init_logging(LogLevel::Debug);
/// ```
pub fn init_logging(level: LogLevel) {
    install(EnvFilter::new(level.as_filter()));
}

/// Install a subscriber from explicit filter directives, e.g. `"fob_webpack=trace"`.
pub fn init_logging_with_directives(directives: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directives).map_err(|e| ConfigError::InvalidValue {
        field: "log_directives".to_string(),
        hint: Some(e.to_string()),
    })?;
    install(filter);
    Ok(())
}

fn install(filter: EnvFilter) {
    INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(false).without_time())
            .init();
    });
}
