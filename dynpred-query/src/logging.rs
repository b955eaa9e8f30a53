//! Logging setup for dynpred.
//!
//! The library itself only emits `tracing` events: `debug` when a path is
//! resolved or a predicate or getter is built, `trace` when a compiled
//! predicate swallows an evaluation error. Installing a subscriber is left to
//! the host application, or to [`init`] when the `tracing-subscriber` feature
//! is enabled.
//!
//! # Environment Variables
//!
//! - `DYNPRED_DEBUG=true|1|yes` - Enable debug logging
//! - `DYNPRED_LOG_LEVEL=trace|debug|info|warn|error` - Set the level explicitly
//! - `DYNPRED_LOG_FORMAT=json|pretty|compact` - Output format (default: json)
//!
//! ```rust,no_run
//! use dynpred_query::logging;
//!
//! logging::init();
//! ```

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

const DEBUG_VAR: &str = "DYNPRED_DEBUG";
const LEVEL_VAR: &str = "DYNPRED_LOG_LEVEL";
const FORMAT_VAR: &str = "DYNPRED_LOG_FORMAT";

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line, human readable.
    Pretty,
    /// Single line, human readable.
    Compact,
}

impl LogFormat {
    fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "compact" => Self::Compact,
            _ => Self::Json,
        }
    }

    /// Get the format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Compact => "compact",
        }
    }
}

/// Logging settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Level applied to the dynpred crates.
    pub level: &'static str,
    /// Output format.
    pub format: LogFormat,
}

impl LogSettings {
    /// Read the settings from `DYNPRED_*` variables.
    ///
    /// Returns `None` when neither `DYNPRED_DEBUG` nor `DYNPRED_LOG_LEVEL`
    /// asks for logging.
    pub fn from_env() -> Option<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Resolve the settings through `lookup` instead of the process environment.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let level = lookup(LEVEL_VAR);
        let debug = debug_flag(lookup(DEBUG_VAR).as_deref());
        if !debug && level.is_none() {
            return None;
        }
        Some(Self {
            level: level_from(level.as_deref(), debug),
            format: lookup(FORMAT_VAR)
                .map(|f| LogFormat::parse(&f))
                .unwrap_or_default(),
        })
    }

    #[cfg_attr(not(feature = "tracing-subscriber"), allow(dead_code))]
    fn directives(&self) -> String {
        format!(
            "dynpred={level},dynpred_query={level},dynpred_schema={level}",
            level = self.level
        )
    }
}

/// Check if `DYNPRED_DEBUG` is set to `true`, `1` or `yes`.
#[inline]
pub fn is_debug_enabled() -> bool {
    debug_flag(env::var(DEBUG_VAR).ok().as_deref())
}

/// Get the level from `DYNPRED_LOG_LEVEL`.
///
/// Falls back to `debug` when `DYNPRED_DEBUG` is enabled, `warn` otherwise.
pub fn log_level() -> &'static str {
    level_from(env::var(LEVEL_VAR).ok().as_deref(), is_debug_enabled())
}

/// Get the format from `DYNPRED_LOG_FORMAT`.
pub fn log_format() -> LogFormat {
    env::var(FORMAT_VAR)
        .map(|f| LogFormat::parse(&f))
        .unwrap_or_default()
}

fn debug_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
}

fn level_from(level: Option<&str>, debug: bool) -> &'static str {
    let fallback = if debug { "debug" } else { "warn" };
    match level.map(str::to_lowercase).as_deref() {
        Some("trace") => "trace",
        Some("debug") => "debug",
        Some("info") => "info",
        Some("warn") => "warn",
        Some("error") => "error",
        _ => fallback,
    }
}

/// Install a global subscriber configured from the environment.
///
/// Only the first call has an effect. Without the `tracing-subscriber`
/// feature, or when no logging was requested, nothing is installed.
pub fn init() {
    if let Some(settings) = LogSettings::from_env() {
        init_with(settings);
    }
}

/// Install a global subscriber with explicit settings.
pub fn init_with(settings: LogSettings) {
    INIT.call_once(|| install(&settings));
}

#[cfg(feature = "tracing-subscriber")]
fn install(settings: &LogSettings) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_new(settings.directives()).unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match settings.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
    };

    if installed.is_ok() {
        tracing::info!(
            level = settings.level,
            format = settings.format.as_str(),
            "dynpred logging initialized"
        );
    }
}

#[cfg(not(feature = "tracing-subscriber"))]
fn install(_settings: &LogSettings) {
    // No subscriber available; the host application installs its own.
}

/// Debug event emitted only when `DYNPRED_DEBUG` is enabled.
#[macro_export]
macro_rules! dynpred_debug {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            tracing::debug!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_parsing() {
        assert_eq!(LogFormat::parse("PRETTY"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("xml"), LogFormat::Json);
    }

    #[test]
    fn test_directives_cover_every_crate() {
        let settings = LogSettings {
            level: "trace",
            format: LogFormat::Compact,
        };
        assert_eq!(
            settings.directives(),
            "dynpred=trace,dynpred_query=trace,dynpred_schema=trace"
        );
    }

    fn vars<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_defaults_without_variables() {
        assert_eq!(LogSettings::from_vars(vars(&[])), None);
        assert!(!debug_flag(None));
        assert_eq!(level_from(None, false), "warn");
    }

    #[test]
    fn test_debug_flag_enables_debug_level() {
        let settings = LogSettings::from_vars(vars(&[(DEBUG_VAR, "YES")])).unwrap();
        assert_eq!(settings.level, "debug");
        assert_eq!(settings.format, LogFormat::Json);
    }

    #[test]
    fn test_explicit_level_and_format() {
        let settings = LogSettings::from_vars(vars(&[
            (LEVEL_VAR, "Trace"),
            (FORMAT_VAR, "pretty"),
        ]))
        .unwrap();
        assert_eq!(
            settings,
            LogSettings {
                level: "trace",
                format: LogFormat::Pretty,
            }
        );
    }

    #[test]
    fn test_unknown_level_falls_back() {
        assert_eq!(level_from(Some("loud"), true), "debug");
        assert_eq!(level_from(Some("loud"), false), "warn");
        assert!(!debug_flag(Some("off")));
    }
}
