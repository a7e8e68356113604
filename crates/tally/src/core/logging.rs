//! Logging setup
//!
//! Structured logging via `tracing`. Native builds install a
//! `tracing-subscriber` registry with an `EnvFilter`; `wasm32` builds log to
//! the browser console through `tracing-wasm`.
//!
//! ```rust
//! use tally::core::logging::init_logging;
//!
//! let _ = init_logging(Some("debug"), Some("pretty"));
//! ```
//!
//! Every key press runs inside a `press` span; the calculated result is logged
//! at `debug`, branch decisions at `trace`, and a division by zero at `warn`.
//!
//! # Environment Variables
//!
//! - `TALLY_LOG_LEVEL`: log level or filter directive (trace|debug|info|warn|error|off)
//! - `TALLY_LOG_FORMAT`: compact|pretty|json
//! - `RUST_LOG`: standard `EnvFilter` directives, e.g.
//!   `RUST_LOG="info,tally::core::calculator=trace"`

use std::str::FromStr;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

#[cfg(target_arch = "wasm32")]
use tracing_wasm::WASMLayerConfig;

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line format
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Install the global subscriber
///
/// `level` falls back to `TALLY_LOG_LEVEL`, then `RUST_LOG`, then `warn`.
/// `format` falls back to `TALLY_LOG_FORMAT`, then `compact`.
///
/// Native output goes to stderr so stdout carries only calculator output.
/// Fails on an unknown format or when a global subscriber is already set.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(target_arch = "wasm32")]
    {
        // tracing-wasm 0.1 has no level filter and the console has one format
        let _ = (level, format);
        tracing_wasm::set_as_global_default_with_config(WASMLayerConfig::default());

        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let log_level = level
            .map(|s| s.to_string())
            .or_else(|| std::env::var("TALLY_LOG_LEVEL").ok())
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| "warn".to_string());

        let log_format = format
            .map(|s| s.to_string())
            .or_else(|| std::env::var("TALLY_LOG_FORMAT").ok())
            .unwrap_or_else(|| "compact".to_string());

        let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

        let format = LogFormat::from_str(&log_format)
            .map_err(|e| format!("Invalid log format: {}", e))?;

        // Exactly one of these layers is Some; a None layer is a no-op
        let compact = (format == LogFormat::Compact).then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_span_events(FmtSpan::NONE)
        });
        let pretty = (format == LogFormat::Pretty).then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::ACTIVE)
                .pretty()
        });
        let json = (format == LogFormat::Json).then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::CLOSE)
                .json()
        });

        Registry::default()
            .with(filter)
            .with(compact)
            .with(pretty)
            .with(json)
            .try_init()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert_eq!(
            LogFormat::from_str("COMPACT").unwrap(),
            LogFormat::Compact
        );
        assert!(LogFormat::from_str("invalid").is_err());
    }

    #[test]
    fn test_unknown_format_is_rejected_before_install() {
        let err = init_logging(Some("info"), Some("yaml")).unwrap_err();
        assert!(err.to_string().contains("yaml"));
    }
}
