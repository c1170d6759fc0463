//! 标准字段命令集
//!
//! 每条命令一个处理器单元结构，opcode 编号与既有脚本数据对齐。
//! 消息类命令没有窗口系统协作方，采用局部槽位约定：文本 id 写入
//! `locals[14]`，`Message` 另置 `locals[MSG_WAIT_SLOT]` 为忙标记，
//! 由宿主清零表示收口。

use crate::runtime::command::{
    Command, CommandTable, Control, PendingCommand, PollStatus,
};
use crate::runtime::context::{ScriptContext, MSG_WAIT_SLOT};
use crate::runtime::error::ScriptError;
use crate::runtime::resolver::{VariableResolver, SAVED_VAR_BASE};
use std::sync::Arc;

/// 消息文本 id 所在的局部槽位
pub const MSG_TEXT_SLOT: usize = 14;

/// 标准命令集的 opcode 编号
pub mod opcodes {
    pub const NOP: u16 = 0x0000;
    pub const NOP2: u16 = 0x0001;
    pub const END: u16 = 0x0002;
    pub const WAIT_TICKS: u16 = 0x0003;
    pub const SET_LOCAL: u16 = 0x0004;
    pub const JUMP: u16 = 0x0022;
    pub const CALL: u16 = 0x0026;
    pub const RETURN: u16 = 0x0027;
    pub const SET_FLAG: u16 = 0x0030;
    pub const CLEAR_FLAG: u16 = 0x0031;
    pub const CHECK_FLAG: u16 = 0x0032;
    pub const SET_VAR: u16 = 0x0040;
    pub const COPY_VAR: u16 = 0x0041;
    pub const SET_VAR_FLEX: u16 = 0x0042;
    pub const MESSAGE_NO_WAIT: u16 = 0x0043;
    pub const MESSAGE: u16 = 0x0044;
}

/// 构建标准脚本家族的命令表
pub fn standard_table() -> Arc<CommandTable> {
    CommandTable::builder()
        .register(opcodes::NOP, Nop)
        .register(opcodes::NOP2, Nop)
        .register(opcodes::END, End)
        .register(opcodes::WAIT_TICKS, WaitTicks)
        .register(opcodes::SET_LOCAL, SetLocal)
        .register(opcodes::JUMP, Jump)
        .register(opcodes::CALL, Call)
        .register(opcodes::RETURN, Return)
        .register(opcodes::SET_FLAG, SetFlag)
        .register(opcodes::CLEAR_FLAG, ClearFlag)
        .register(opcodes::CHECK_FLAG, CheckFlag)
        .register(opcodes::SET_VAR, SetVar)
        .register(opcodes::COPY_VAR, CopyVar)
        .register(opcodes::SET_VAR_FLEX, SetVarFlex)
        .register(opcodes::MESSAGE_NO_WAIT, MessageNoWait)
        .register(opcodes::MESSAGE, Message)
        .build()
}

/// 空操作
pub struct Nop;

impl Command for Nop {
    fn name(&self) -> &'static str {
        "nop"
    }

    fn execute(
        &self,
        _ctx: &mut ScriptContext,
        _vars: &mut dyn VariableResolver,
    ) -> Result<Control, ScriptError> {
        Ok(Control::Continue)
    }
}

/// 结束脚本：清游标，派发循环随即终结
pub struct End;

impl Command for End {
    fn name(&self) -> &'static str {
        "end"
    }

    fn execute(
        &self,
        ctx: &mut ScriptContext,
        _vars: &mut dyn VariableResolver,
    ) -> Result<Control, ScriptError> {
        ctx.halt();
        Ok(Control::Continue)
    }
}

/// 等待 N 个 tick（u16 立即数），倒计时放在 locals[0]
pub struct WaitTicks;

struct Countdown;

impl PendingCommand for Countdown {
    fn poll(&mut self, ctx: &mut ScriptContext, _vars: &mut dyn VariableResolver) -> PollStatus {
        if ctx.locals[0] > 0 {
            ctx.locals[0] -= 1;
        }
        if ctx.locals[0] == 0 {
            PollStatus::Done
        } else {
            PollStatus::Pending
        }
    }
}

impl Command for WaitTicks {
    fn name(&self) -> &'static str {
        "wait_ticks"
    }

    fn execute(
        &self,
        ctx: &mut ScriptContext,
        _vars: &mut dyn VariableResolver,
    ) -> Result<Control, ScriptError> {
        let ticks = ctx.read_u16()?;
        ctx.locals[0] = u32::from(ticks);
        ctx.wait_on(Box::new(Countdown));
        Ok(Control::Suspend)
    }
}

/// 写局部槽位：u8 槽号，u8 值
pub struct SetLocal;

impl Command for SetLocal {
    fn name(&self) -> &'static str {
        "set_local"
    }

    fn execute(
        &self,
        ctx: &mut ScriptContext,
        _vars: &mut dyn VariableResolver,
    ) -> Result<Control, ScriptError> {
        let slot = ctx.read_u8()?;
        let value = ctx.read_u8()?;
        // 字节流可信；槽号越界时静默忽略
        if let Some(local) = ctx.locals.get_mut(usize::from(slot)) {
            *local = u32::from(value);
        }
        Ok(Control::Continue)
    }
}

/// 无条件相对跳转：不压帧
pub struct Jump;

impl Command for Jump {
    fn name(&self) -> &'static str {
        "jump"
    }

    fn execute(
        &self,
        ctx: &mut ScriptContext,
        _vars: &mut dyn VariableResolver,
    ) -> Result<Control, ScriptError> {
        let offset = ctx.read_i32()?;
        let target = ctx.relative_target(offset)?;
        ctx.jump(target)?;
        Ok(Control::Continue)
    }
}

/// 相对调用：当前游标位置成为返回地址
pub struct Call;

impl Command for Call {
    fn name(&self) -> &'static str {
        "call"
    }

    fn execute(
        &self,
        ctx: &mut ScriptContext,
        _vars: &mut dyn VariableResolver,
    ) -> Result<Control, ScriptError> {
        let offset = ctx.read_i32()?;
        let target = ctx.relative_target(offset)?;
        ctx.call(target)?;
        Ok(Control::Continue)
    }
}

/// 返回调用方
pub struct Return;

impl Command for Return {
    fn name(&self) -> &'static str {
        "return"
    }

    fn execute(
        &self,
        ctx: &mut ScriptContext,
        _vars: &mut dyn VariableResolver,
    ) -> Result<Control, ScriptError> {
        ctx.return_to_caller()?;
        Ok(Control::Continue)
    }
}

/// 置旗标（u16 id）
pub struct SetFlag;

impl Command for SetFlag {
    fn name(&self) -> &'static str {
        "set_flag"
    }

    fn execute(
        &self,
        ctx: &mut ScriptContext,
        vars: &mut dyn VariableResolver,
    ) -> Result<Control, ScriptError> {
        let id = ctx.read_u16()?;
        *vars.resolve(ctx.owner(), id) = 1;
        Ok(Control::Continue)
    }
}

/// 清旗标（u16 id）
pub struct ClearFlag;

impl Command for ClearFlag {
    fn name(&self) -> &'static str {
        "clear_flag"
    }

    fn execute(
        &self,
        ctx: &mut ScriptContext,
        vars: &mut dyn VariableResolver,
    ) -> Result<Control, ScriptError> {
        let id = ctx.read_u16()?;
        *vars.resolve(ctx.owner(), id) = 0;
        Ok(Control::Continue)
    }
}

/// 查旗标：结果（0/1）放入 locals[0]
pub struct CheckFlag;

impl Command for CheckFlag {
    fn name(&self) -> &'static str {
        "check_flag"
    }

    fn execute(
        &self,
        ctx: &mut ScriptContext,
        vars: &mut dyn VariableResolver,
    ) -> Result<Control, ScriptError> {
        let id = ctx.read_u16()?;
        let set = *vars.resolve(ctx.owner(), id) != 0;
        ctx.locals[0] = u32::from(set);
        Ok(Control::Continue)
    }
}

/// 写变量：u16 id，u16 立即数
pub struct SetVar;

impl Command for SetVar {
    fn name(&self) -> &'static str {
        "set_var"
    }

    fn execute(
        &self,
        ctx: &mut ScriptContext,
        vars: &mut dyn VariableResolver,
    ) -> Result<Control, ScriptError> {
        let id = ctx.read_u16()?;
        let value = ctx.read_u16()?;
        *vars.resolve(ctx.owner(), id) = value;
        Ok(Control::Continue)
    }
}

/// 变量间复制：u16 目标 id，u16 源 id
pub struct CopyVar;

impl Command for CopyVar {
    fn name(&self) -> &'static str {
        "copy_var"
    }

    fn execute(
        &self,
        ctx: &mut ScriptContext,
        vars: &mut dyn VariableResolver,
    ) -> Result<Control, ScriptError> {
        let dst = ctx.read_u16()?;
        let src = ctx.read_u16()?;
        let value = *vars.resolve(ctx.owner(), src);
        *vars.resolve(ctx.owner(), dst) = value;
        Ok(Control::Continue)
    }
}

/// 写变量（源可为变量或字面量）：u16 目标 id，u16 源
///
/// 源操作数达到持久层阈值时按变量 id 解引用，否则按字面量使用。
pub struct SetVarFlex;

impl Command for SetVarFlex {
    fn name(&self) -> &'static str {
        "set_var_flex"
    }

    fn execute(
        &self,
        ctx: &mut ScriptContext,
        vars: &mut dyn VariableResolver,
    ) -> Result<Control, ScriptError> {
        let dst = ctx.read_u16()?;
        let src = ctx.read_u16()?;
        let value = if src >= SAVED_VAR_BASE {
            *vars.resolve(ctx.owner(), src)
        } else {
            src
        };
        *vars.resolve(ctx.owner(), dst) = value;
        Ok(Control::Continue)
    }
}

/// 弹消息但不等待（u8 文本 id）
pub struct MessageNoWait;

impl Command for MessageNoWait {
    fn name(&self) -> &'static str {
        "message_no_wait"
    }

    fn execute(
        &self,
        ctx: &mut ScriptContext,
        _vars: &mut dyn VariableResolver,
    ) -> Result<Control, ScriptError> {
        let text_id = ctx.read_u8()?;
        ctx.locals[MSG_TEXT_SLOT] = u32::from(text_id);
        Ok(Control::Continue)
    }
}

/// 弹消息并等待宿主收口（u8 文本 id）
pub struct Message;

struct MessageWait;

impl PendingCommand for MessageWait {
    fn poll(&mut self, ctx: &mut ScriptContext, _vars: &mut dyn VariableResolver) -> PollStatus {
        if ctx.locals[MSG_WAIT_SLOT] == 0 {
            PollStatus::Done
        } else {
            PollStatus::Pending
        }
    }
}

impl Command for Message {
    fn name(&self) -> &'static str {
        "message"
    }

    fn execute(
        &self,
        ctx: &mut ScriptContext,
        _vars: &mut dyn VariableResolver,
    ) -> Result<Control, ScriptError> {
        let text_id = ctx.read_u8()?;
        ctx.locals[MSG_TEXT_SLOT] = u32::from(text_id);
        ctx.locals[MSG_WAIT_SLOT] = 1;
        ctx.wait_on(Box::new(MessageWait));
        Ok(Control::Suspend)
    }
}
