//! 命令派发契约与命令表
//!
//! 派发采用按 opcode 索引的 trait 对象表：每个命令执行一个
//! 工作单元并返回 `{Continue, Suspend}` 信号。

use crate::runtime::context::ScriptContext;
use crate::runtime::error::ScriptError;
use crate::runtime::resolver::VariableResolver;
use std::sync::Arc;

/// 命令执行后的控制信号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// 同一 tick 内继续派发下一条指令
    Continue,
    /// 本 tick 到此为止，下一 tick 重入
    Suspend,
}

/// 异步命令的轮询结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    /// 尚未完成，保持 AwaitingAsync
    Pending,
    /// 已完成，脚本下一 tick 恢复派发
    Done,
}

/// 单条指令的处理器
pub trait Command {
    /// 命令名（日志与诊断用）
    fn name(&self) -> &'static str;

    /// 执行一个工作单元
    ///
    /// 操作数通过 `ctx` 的读取方法从指令流获取；返回 `Suspend` 的
    /// 命令负责先把上下文置入相应状态（通常是 `wait_on`）。
    fn execute(
        &self,
        ctx: &mut ScriptContext,
        vars: &mut dyn VariableResolver,
    ) -> Result<Control, ScriptError>;
}

/// 在途异步命令
///
/// `AwaitingAsync` 状态下每 tick 恰好轮询一次。
pub trait PendingCommand {
    /// 轮询外部操作是否完成
    fn poll(&mut self, ctx: &mut ScriptContext, vars: &mut dyn VariableResolver) -> PollStatus;
}

/// 命令表
///
/// 按 opcode 索引的稠密表，脚本家族加载时构建一次，派发期间不可变。
/// `opcode >= len()` 视为越界；范围内的空槽与未知 opcode 同样处理。
pub struct CommandTable {
    slots: Vec<Option<Box<dyn Command>>>,
}

impl CommandTable {
    /// 开始构建命令表
    pub fn builder() -> CommandTableBuilder {
        CommandTableBuilder { slots: Vec::new() }
    }

    /// 表长（最大已注册 opcode + 1）
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// 表是否为空
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// 查找 opcode 对应的处理器
    pub fn lookup(&self, opcode: u16) -> Option<&dyn Command> {
        self.slots
            .get(opcode as usize)
            .and_then(|slot| slot.as_deref())
    }
}

impl std::fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandTable")
            .field("len", &self.slots.len())
            .finish()
    }
}

/// 命令表构建器
///
/// 从 `(opcode, handler)` 对构建稠密表。
pub struct CommandTableBuilder {
    slots: Vec<Option<Box<dyn Command>>>,
}

impl CommandTableBuilder {
    /// 注册一个处理器
    ///
    /// 重复注册同一 opcode 时，后注册的覆盖先注册的。
    pub fn register<C: Command + 'static>(mut self, opcode: u16, command: C) -> Self {
        let index = opcode as usize;
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index] = Some(Box::new(command));
        self
    }

    /// 完成构建，得到家族内共享的不可变命令表
    pub fn build(self) -> Arc<CommandTable> {
        Arc::new(CommandTable { slots: self.slots })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe;

    impl Command for Probe {
        fn name(&self) -> &'static str {
            "probe"
        }

        fn execute(
            &self,
            _ctx: &mut ScriptContext,
            _vars: &mut dyn VariableResolver,
        ) -> Result<Control, ScriptError> {
            Ok(Control::Continue)
        }
    }

    #[test]
    fn test_lookup_registered() {
        let table = CommandTable::builder().register(0x0005, Probe).build();
        assert_eq!(table.len(), 6);
        assert!(table.lookup(0x0005).is_some());
    }

    #[test]
    fn test_lookup_hole_and_out_of_range() {
        let table = CommandTable::builder().register(0x0005, Probe).build();
        // 范围内的空槽
        assert!(table.lookup(0x0003).is_none());
        // 越界
        assert!(table.lookup(0x0006).is_none());
    }
}
