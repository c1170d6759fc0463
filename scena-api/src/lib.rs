//! Scena API - Execution orchestration layer
//!
//! Provides unified execution interface, including:
//! - Run-to-completion driver over the tick state machine
//! - Configuration abstraction (RunConfig)
//! - Unified error handling (ScenaError)
//!
//! For CLI convenience, this crate provides a global singleton API.
//! For library use, prefer the explicit `run_script(code, &config)` API.

use scena_core::runtime::commands::MSG_TEXT_SLOT;
use scena_core::runtime::context::MSG_WAIT_SLOT;
use scena_core::{ActorId, Interpreter, ScriptContext};
use scena_log::{debug, info, Level};
use std::sync::Arc;

// Re-export config
pub mod config;
pub use config::{config as get_config, init as init_config, is_initialized, RunConfig};

// Re-export config types from scena_config
pub use scena_config::{LimitConfig, LogLevel, LoggingConfig, Phase, VmConfig};

// Re-export error and types
pub mod error;
pub mod types;
pub use error::ScenaError;
pub use types::RunOutput;

// Re-export core types
pub use scena_core::{standard_table, ScriptError, ScriptStatus, TickOutcome, TwoTierStore};

/// 驱动脚本所属实体的固定编号（独立运行时只有一个脚本）
const DRIVER_OWNER: ActorId = ActorId(0);

/// Execute a script blob to completion with explicit configuration
///
/// This is the recommended API for library users. Ticks the context
/// against a fresh two-tier store until it terminates or the tick
/// budget runs out.
pub fn run_script(code: &[u8], config: &RunConfig) -> Result<RunOutput, ScenaError> {
    if code.is_empty() {
        return Err(ScenaError::EmptyScript);
    }

    if config.trace_dispatch {
        config.logger.set_level(Level::Trace);
    }

    info!(config.logger, "starting script, {} bytes", code.len());

    let mut vars = TwoTierStore::new();
    let mut ctx = ScriptContext::attach(DRIVER_OWNER, Arc::from(code), standard_table());
    let interp = Interpreter::with_config(Arc::clone(&config.logger), config.vm.clone());

    let mut ticks: u64 = 0;
    while ticks < config.limits.max_ticks {
        ticks += 1;
        let outcome = interp.tick(&mut ctx, &mut vars);

        match outcome {
            TickOutcome::Terminated | TickOutcome::Idle => {
                info!(config.logger, "script finished after {} ticks", ticks);
                return Ok(RunOutput {
                    ticks,
                    saved_vars: vars.saved_snapshot(),
                    locals: ctx.locals,
                });
            }
            TickOutcome::AwaitingAsync => {
                // 独立驱动没有消息窗口，代宿主立即收口
                if config.auto_ack_messages && ctx.locals[MSG_WAIT_SLOT] != 0 {
                    debug!(
                        config.logger,
                        "auto-ack message text {}", ctx.locals[MSG_TEXT_SLOT]
                    );
                    ctx.locals[MSG_WAIT_SLOT] = 0;
                }
            }
            TickOutcome::Suspended => {}
        }
    }

    Err(ScenaError::TickBudgetExceeded { ticks })
}

/// Execute using the global singleton configuration (CLI convenience)
pub fn run_script_with_global(code: &[u8]) -> Result<RunOutput, ScenaError> {
    run_script(code, get_config())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scena_core::runtime::commands::opcodes;
    use scena_core::SAVED_VAR_BASE;

    fn stream(parts: &[&[u8]]) -> Vec<u8> {
        parts.concat()
    }

    #[test]
    fn test_run_script_to_completion() {
        let var = SAVED_VAR_BASE + 1;
        let code = stream(&[
            &opcodes::SET_VAR.to_le_bytes(),
            &var.to_le_bytes(),
            &99u16.to_le_bytes(),
            &opcodes::END.to_le_bytes(),
        ]);

        let output = run_script(&code, &RunConfig::default()).unwrap();
        assert_eq!(output.ticks, 1);
        assert_eq!(output.saved(var), Some(99));
    }

    #[test]
    fn test_run_script_counts_wait_ticks() {
        let code = stream(&[
            &opcodes::WAIT_TICKS.to_le_bytes(),
            &3u16.to_le_bytes(),
            &opcodes::END.to_le_bytes(),
        ]);

        let output = run_script(&code, &RunConfig::default()).unwrap();
        // 1 次派发 + 3 次倒计时轮询（最后一次观察到完成）+ 1 次终结
        assert_eq!(output.ticks, 5);
    }

    #[test]
    fn test_message_is_auto_acked() {
        let code = stream(&[
            &opcodes::MESSAGE.to_le_bytes(),
            &[5u8][..],
            &opcodes::END.to_le_bytes(),
        ]);

        let output = run_script(&code, &RunConfig::default()).unwrap();
        assert_eq!(output.locals[MSG_TEXT_SLOT], 5);
        assert_eq!(output.locals[MSG_WAIT_SLOT], 0);
    }

    #[test]
    fn test_empty_script_rejected() {
        assert_eq!(
            run_script(&[], &RunConfig::default()),
            Err(ScenaError::EmptyScript)
        );
    }

    #[test]
    fn test_budget_exceeded_on_endless_wait() {
        // 消息等待但关闭自动收口：永不完成
        let code = stream(&[
            &opcodes::MESSAGE.to_le_bytes(),
            &[1u8][..],
            &opcodes::END.to_le_bytes(),
        ]);

        let config = RunConfig {
            auto_ack_messages: false,
            limits: LimitConfig { max_ticks: 50 },
            ..RunConfig::default()
        };
        assert_eq!(
            run_script(&code, &config),
            Err(ScenaError::TickBudgetExceeded { ticks: 50 })
        );
    }
}
