//! API 层配置
//!
//! 包含执行配置 RunConfig 和全局单例（供 CLI 使用）

use once_cell::sync::OnceCell;
use scena_config::{LimitConfig, VmConfig};
use scena_log::Logger;
use std::sync::Arc;

/// Execution configuration
#[derive(Clone)]
pub struct RunConfig {
    /// Log every dispatched opcode (forces trace level on the logger)
    pub trace_dispatch: bool,
    /// Acknowledge message waits automatically between ticks
    ///
    /// The standalone driver has no message window; without this a
    /// `Message` opcode would wait forever.
    pub auto_ack_messages: bool,
    /// Interpreter configuration
    pub vm: VmConfig,
    /// Execution limits
    pub limits: LimitConfig,
    /// Logger
    pub logger: Arc<Logger>,
}

impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("trace_dispatch", &self.trace_dispatch)
            .field("auto_ack_messages", &self.auto_ack_messages)
            .field("vm", &self.vm)
            .field("limits", &self.limits)
            .finish()
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            trace_dispatch: false,
            auto_ack_messages: true,
            vm: VmConfig::default(),
            limits: LimitConfig::default(),
            logger: Logger::noop(),
        }
    }
}

// Global config singleton for CLI convenience
static GLOBAL_CONFIG: OnceCell<RunConfig> = OnceCell::new();

/// Initialize global configuration (must be called once before any operation)
///
/// # Panics
/// If config is already initialized
pub fn init(config: RunConfig) {
    GLOBAL_CONFIG
        .set(config)
        .expect("Config already initialized");
}

/// Get global config reference
///
/// # Panics
/// If config is not initialized
pub fn config() -> &'static RunConfig {
    GLOBAL_CONFIG.get().expect("Config not initialized")
}

/// Check if config is initialized
pub fn is_initialized() -> bool {
    GLOBAL_CONFIG.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_run_config() {
        let cfg = RunConfig::default();
        assert!(!cfg.trace_dispatch);
        assert!(cfg.auto_ack_messages);
        assert_eq!(cfg.vm.max_ops_per_tick, 1024);
        assert_eq!(cfg.limits.max_ticks, 100_000);
    }

    #[test]
    fn test_run_config_debug() {
        let cfg = RunConfig::default();
        let debug_str = format!("{:?}", cfg);
        assert!(debug_str.contains("trace_dispatch"));
        assert!(debug_str.contains("max_ticks"));
    }
}
