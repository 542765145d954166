//! Logging configuration
//!
//! Controls the process's own diagnostics. Decoded frames are printed on
//! stdout by the binary, so logs go to stderr unless told otherwise.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Log level
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert to tracing level filter string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console output (default)
    #[default]
    Console,
    /// JSON structured logging
    Json,
}

/// Log output destination
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    #[default]
    Stderr,
}

/// Logging configuration
///
/// # Example
///
/// ```toml
/// [log]
/// level = "debug"
/// format = "json"
/// output = "stderr"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default: info
    pub level: LogLevel,

    /// Default: console
    pub format: LogFormat,

    /// Default: stderr
    pub output: LogOutput,
}

impl LogConfig {
    /// Filter directive for `EnvFilter`
    ///
    /// The configured level applies to logship crates; dependencies stay at
    /// `warn` unless the level is stricter.
    pub fn filter_directive(&self) -> String {
        let deps = self.level.max(LogLevel::Warn);
        format!(
            "{deps},logship={lvl},logship_pipeline={lvl},logship_shipper={lvl},logship_receiver={lvl}",
            lvl = self.level
        )
    }
}
