//! Scena Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all Scena crates.

use serde::{Deserialize, Serialize};

/// Configuration for the interpreter core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmConfig {
    /// Maximum opcodes dispatched within a single tick.
    ///
    /// A script that never suspends would otherwise pin the host tick;
    /// hitting this bound suspends the script until the next tick.
    pub max_ops_per_tick: usize,
}

/// Configuration for execution limits (API driver)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    /// Maximum ticks the run-to-completion driver will issue
    pub max_ticks: u64,
}

/// Logging verbosity, manifest-friendly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Silent,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Verbosity threshold
    pub level: LogLevel,
    /// Mirror records to stdout
    pub stdout: bool,
}

/// Execution phase enum for phase-specific configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loader,
    Vm,
    Api,
}

impl Phase {
    /// Get the string name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Loader => "loader",
            Phase::Vm => "vm",
            Phase::Api => "api",
        }
    }

    /// Get the log target name for this phase
    pub fn target(&self) -> String {
        format!("scena::{}", self.as_str())
    }
}

impl LogLevel {
    /// Get the string name of the level
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Silent => "silent",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Parse a manifest string ("silent", "error", ... "trace")
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "silent" => Some(LogLevel::Silent),
            "error" => Some(LogLevel::Error),
            "warn" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            max_ops_per_tick: 1024,
        }
    }
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self { max_ticks: 100_000 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            stdout: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vm_config() {
        let cfg = VmConfig::default();
        assert_eq!(cfg.max_ops_per_tick, 1024);
    }

    #[test]
    fn test_default_limit_config() {
        let cfg = LimitConfig::default();
        assert_eq!(cfg.max_ticks, 100_000);
    }

    #[test]
    fn test_phase_as_str() {
        assert_eq!(Phase::Loader.as_str(), "loader");
        assert_eq!(Phase::Vm.target(), "scena::vm");
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("trace"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::parse("verbose"), None);
        assert_eq!(LogLevel::Debug.as_str(), "debug");
    }
}
