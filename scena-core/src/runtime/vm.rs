//! 派发循环与 tick 状态机
//!
//! 宿主每个调度 tick 调用一次 `Interpreter::tick`，解释器必须及时
//! 交还控制权：命令要求等待外部长操作时脚本挂起，下一 tick 透明
//! 恢复。异步完成采用两段式：观察到完成的那个 tick 不进入派发
//! 循环，恢复发生在再下一个 tick，保证单 tick 工作量有界。

use crate::runtime::command::{Control, PollStatus};
use crate::runtime::context::{ScriptContext, ScriptStatus};
use crate::runtime::resolver::VariableResolver;
use scena_config::VmConfig;
use scena_log::{debug, trace, warn, Logger};
use std::sync::Arc;

/// 单次 tick 的结果，报告给宿主
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// 没有脚本可推进
    Idle,
    /// 脚本让出本 tick，仍在运行
    Suspended,
    /// 脚本在等待异步命令完成
    AwaitingAsync,
    /// 脚本在本 tick 内终结（正常结束或故障）
    Terminated,
}

/// 脚本解释器
///
/// 无脚本本体状态，可在多个 `ScriptContext` 间复用；宿主若并发
/// 推进多个脚本，需对每个上下文各调用一次 `tick`。
pub struct Interpreter {
    logger: Arc<Logger>,
    config: VmConfig,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// 创建解释器（无日志输出，默认配置）
    pub fn new() -> Self {
        Self::with_logger(Logger::noop())
    }

    /// 创建解释器（带 logger）
    pub fn with_logger(logger: Arc<Logger>) -> Self {
        Self::with_config(logger, VmConfig::default())
    }

    /// 创建解释器（带 logger 与配置）
    pub fn with_config(logger: Arc<Logger>, config: VmConfig) -> Self {
        Interpreter { logger, config }
    }

    /// 推进一个脚本一个 tick
    ///
    /// 状态机转移：
    /// - `Finished`：no-op，报告 `Idle`
    /// - `AwaitingAsync` 且无在途命令：直接转 Running，同 tick 进入派发
    /// - `AwaitingAsync` 且有在途命令：轮询一次；未完成则保持等待，
    ///   完成则转 Running 并立即结束本 tick（不派发）
    /// - `Running`：进入派发循环
    pub fn tick(
        &self,
        ctx: &mut ScriptContext,
        vars: &mut dyn VariableResolver,
    ) -> TickOutcome {
        match ctx.status() {
            ScriptStatus::Finished => TickOutcome::Idle,
            ScriptStatus::AwaitingAsync => match ctx.take_pending() {
                None => {
                    ctx.set_status(ScriptStatus::Running);
                    self.dispatch(ctx, vars)
                }
                Some(mut pending) => match pending.poll(ctx, vars) {
                    PollStatus::Pending => {
                        ctx.store_pending(pending);
                        TickOutcome::AwaitingAsync
                    }
                    PollStatus::Done => {
                        debug!(self.logger, "async command done, resume next tick");
                        ctx.set_status(ScriptStatus::Running);
                        TickOutcome::Suspended
                    }
                },
            },
            ScriptStatus::Running => self.dispatch(ctx, vars),
        }
    }

    /// 派发循环
    ///
    /// 连续读取 opcode 并派发，直到脚本挂起、终结或达到单 tick
    /// 派发上限。越界或未注册的 opcode 按设计视为脚本结束，不向
    /// 宿主传播错误。
    fn dispatch(
        &self,
        ctx: &mut ScriptContext,
        vars: &mut dyn VariableResolver,
    ) -> TickOutcome {
        let table = ctx.table();
        let mut dispatched: usize = 0;

        loop {
            // 处理器可能清掉游标（显式结束脚本）
            if !ctx.has_cursor() {
                ctx.set_status(ScriptStatus::Finished);
                debug!(self.logger, "script terminated");
                return TickOutcome::Terminated;
            }

            if dispatched >= self.config.max_ops_per_tick {
                warn!(
                    self.logger,
                    "per-tick dispatch limit reached ({}), suspending",
                    self.config.max_ops_per_tick
                );
                return TickOutcome::Suspended;
            }

            let offset = ctx.cursor_position().unwrap_or(0);
            let opcode = match ctx.read_u16() {
                Ok(opcode) => opcode,
                Err(_) => {
                    // 流耗尽等同于脚本结束
                    debug!(self.logger, "stream exhausted at {:#x}, script ends", offset);
                    ctx.halt();
                    return TickOutcome::Terminated;
                }
            };

            let Some(command) = table.lookup(opcode) else {
                debug!(
                    self.logger,
                    "opcode {:#06x} outside command table (len {}), script ends",
                    opcode,
                    table.len()
                );
                ctx.halt();
                return TickOutcome::Terminated;
            };

            trace!(
                self.logger,
                "dispatch {:#06x} {} at {:#x}",
                opcode,
                command.name(),
                offset
            );

            match command.execute(ctx, vars) {
                Ok(Control::Continue) => {
                    dispatched += 1;
                }
                Ok(Control::Suspend) => {
                    return match ctx.status() {
                        ScriptStatus::AwaitingAsync => TickOutcome::AwaitingAsync,
                        ScriptStatus::Finished => TickOutcome::Terminated,
                        ScriptStatus::Running => TickOutcome::Suspended,
                    };
                }
                Err(err) => {
                    // 脚本级故障只终止这一个脚本
                    warn!(
                        self.logger,
                        "command {} faulted at {:#x}: {}, terminating script",
                        command.name(),
                        offset,
                        err
                    );
                    ctx.force_terminate();
                    return TickOutcome::Terminated;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::commands::{opcodes, standard_table};
    use crate::runtime::context::ActorId;
    use crate::runtime::resolver::TwoTierStore;
    use std::sync::Arc;

    fn wait_stream() -> Arc<[u8]> {
        // WaitTicks 2，End
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&opcodes::WAIT_TICKS.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&opcodes::END.to_le_bytes());
        Arc::from(bytes.into_boxed_slice())
    }

    #[test]
    fn test_finished_context_is_idle() {
        let mut ctx = ScriptContext::detached(ActorId(0), standard_table());
        let mut vars = TwoTierStore::new();
        let interp = Interpreter::new();
        assert_eq!(interp.tick(&mut ctx, &mut vars), TickOutcome::Idle);
    }

    #[test]
    fn test_awaiting_without_pending_dispatches_same_tick() {
        // 状态被置成 AwaitingAsync 但没有在途命令：直接转 Running，
        // 同一 tick 进入派发
        let mut ctx = ScriptContext::attach(ActorId(0), wait_stream(), standard_table());
        let mut vars = TwoTierStore::new();
        let interp = Interpreter::new();

        ctx.set_status(ScriptStatus::AwaitingAsync);
        assert_eq!(
            interp.tick(&mut ctx, &mut vars),
            TickOutcome::AwaitingAsync
        );
        // 同 tick 派发了 WaitTicks，重新登记了在途命令
        assert!(ctx.has_pending());
    }

    #[test]
    fn test_pending_iff_awaiting_invariant() {
        let mut ctx = ScriptContext::attach(ActorId(0), wait_stream(), standard_table());
        let mut vars = TwoTierStore::new();
        let interp = Interpreter::new();

        assert!(!ctx.has_pending());
        interp.tick(&mut ctx, &mut vars);
        assert_eq!(ctx.status(), ScriptStatus::AwaitingAsync);
        assert!(ctx.has_pending());

        // 完成后在途命令随状态一起清掉
        interp.tick(&mut ctx, &mut vars);
        interp.tick(&mut ctx, &mut vars);
        assert_eq!(ctx.status(), ScriptStatus::Running);
        assert!(!ctx.has_pending());
    }
}
