//! 脚本运行时上下文
//!
//! 每个正在运行的脚本持有一个 `ScriptContext`：指令游标、调用帧栈、
//! 归属实体、局部槽位与解释器状态。它只会被命令处理器和派发循环
//! 在 tick 处理期间修改。

use crate::runtime::command::{CommandTable, PendingCommand};
use crate::runtime::cursor::Cursor;
use crate::runtime::error::ScriptError;
use crate::runtime::frames::FrameStack;
use std::sync::Arc;

/// 局部槽位数量
pub const LOCAL_SLOTS: usize = 16;

/// 消息等待标记所在的局部槽位
///
/// `Message` 命令置 1，宿主的消息系统收口后清 0。
pub const MSG_WAIT_SLOT: usize = LOCAL_SLOTS - 1;

/// 脚本归属实体的不透明引用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(pub u32);

/// 解释器状态，驱动 tick 状态机
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStatus {
    /// 无脚本或脚本已结束（终态）
    Finished,
    /// 正常派发中
    Running,
    /// 等待在途异步命令完成
    AwaitingAsync,
}

/// 单个脚本的运行时状态
pub struct ScriptContext {
    /// 解释器状态
    status: ScriptStatus,
    /// 指令游标；`None` 表示没有加载脚本
    cursor: Option<Cursor>,
    /// 调用帧栈
    frames: FrameStack,
    /// 在途异步命令；当且仅当 `status == AwaitingAsync` 时存在
    pending: Option<Box<dyn PendingCommand>>,
    /// 归属实体
    owner: ActorId,
    /// 通用局部槽位（命令暂存用，与外部变量存储无关）
    pub locals: [u32; LOCAL_SLOTS],
    /// 消息通道 id（仅消息类命令解释）
    pub message_channel: u8,
    /// 当前脚本家族的命令表
    table: Arc<CommandTable>,
}

impl ScriptContext {
    /// 将脚本挂到实体上：游标指向字节流起点，状态 Running
    pub fn attach(owner: ActorId, code: Arc<[u8]>, table: Arc<CommandTable>) -> Self {
        ScriptContext {
            status: ScriptStatus::Running,
            cursor: Some(Cursor::new(code)),
            frames: FrameStack::new(),
            pending: None,
            owner,
            locals: [0; LOCAL_SLOTS],
            message_channel: 0,
            table,
        }
    }

    /// 创建未挂载的上下文（状态 Finished，tick 为 no-op）
    pub fn detached(owner: ActorId, table: Arc<CommandTable>) -> Self {
        ScriptContext {
            status: ScriptStatus::Finished,
            cursor: None,
            frames: FrameStack::new(),
            pending: None,
            owner,
            locals: [0; LOCAL_SLOTS],
            message_channel: 0,
            table,
        }
    }

    /// 当前解释器状态
    pub fn status(&self) -> ScriptStatus {
        self.status
    }

    /// 归属实体
    pub fn owner(&self) -> ActorId {
        self.owner
    }

    /// 当前帧深度
    pub fn frame_depth(&self) -> usize {
        self.frames.depth()
    }

    /// 当前游标位置（无脚本时为 `None`）
    pub fn cursor_position(&self) -> Option<usize> {
        self.cursor.as_ref().map(|c| c.position())
    }

    /// 自底向上的返回地址（跨存档恢复时需要连同游标与状态一起捕获）
    pub fn frame_positions(&self) -> &[usize] {
        self.frames.positions()
    }

    /// 是否有在途异步命令
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// 共享命令表的句柄
    pub fn table(&self) -> Arc<CommandTable> {
        Arc::clone(&self.table)
    }

    // ===== 指令流读取（命令处理器取操作数用） =====

    /// 读取 u8 操作数
    pub fn read_u8(&mut self) -> Result<u8, ScriptError> {
        self.cursor_mut()?.read_u8()
    }

    /// 读取 u16 操作数（小端）
    pub fn read_u16(&mut self) -> Result<u16, ScriptError> {
        self.cursor_mut()?.read_u16()
    }

    /// 读取 u32 操作数（小端）
    pub fn read_u32(&mut self) -> Result<u32, ScriptError> {
        self.cursor_mut()?.read_u32()
    }

    /// 读取有符号 32 位相对偏移
    pub fn read_i32(&mut self) -> Result<i32, ScriptError> {
        self.cursor_mut()?.read_i32()
    }

    /// 由相对偏移计算跳转目标
    ///
    /// 基准是偏移操作数之后的游标位置。字节流是可信的；越界的
    /// 目标会在下一次读取时以流耗尽的方式终止脚本。
    pub fn relative_target(&mut self, offset: i32) -> Result<usize, ScriptError> {
        let base = self.cursor_mut()?.position();
        Ok(base.wrapping_add_signed(offset as isize))
    }

    // ===== 控制转移 =====

    /// 无条件跳转：不压帧，无法返回
    pub fn jump(&mut self, target: usize) -> Result<(), ScriptError> {
        self.cursor_mut()?.set_position(target);
        Ok(())
    }

    /// 调用：当前游标位置成为返回地址，执行转到 `target`
    pub fn call(&mut self, target: usize) -> Result<(), ScriptError> {
        let cursor = self.cursor_mut()?;
        let return_to = cursor.position();
        self.frames.push(return_to)?;
        // push 成功后才重定位，溢出时游标保持原位
        self.cursor_mut()?.set_position(target);
        Ok(())
    }

    /// 返回调用方：弹出最顶层帧并恢复游标
    pub fn return_to_caller(&mut self) -> Result<(), ScriptError> {
        let return_to = self.frames.pop()?;
        self.cursor_mut()?.set_position(return_to);
        Ok(())
    }

    // ===== 生命周期 =====

    /// 脚本正常终结：清游标，置 Finished
    pub fn halt(&mut self) {
        self.cursor = None;
        self.status = ScriptStatus::Finished;
    }

    /// 外部强制终止：无论处于派发中还是异步等待，全部放弃
    pub fn force_terminate(&mut self) {
        self.pending = None;
        self.frames.clear();
        self.halt();
    }

    /// 进入异步等待：登记在途命令，置 AwaitingAsync
    pub fn wait_on(&mut self, pending: Box<dyn PendingCommand>) {
        self.pending = Some(pending);
        self.status = ScriptStatus::AwaitingAsync;
    }

    // ===== 派发循环内部使用 =====

    pub(crate) fn set_status(&mut self, status: ScriptStatus) {
        self.status = status;
    }

    pub(crate) fn take_pending(&mut self) -> Option<Box<dyn PendingCommand>> {
        self.pending.take()
    }

    pub(crate) fn store_pending(&mut self, pending: Box<dyn PendingCommand>) {
        self.pending = Some(pending);
    }

    pub(crate) fn has_cursor(&self) -> bool {
        self.cursor.is_some()
    }

    /// 命令执行期间游标必定存在；脚本终结后的读取按流耗尽处理
    fn cursor_mut(&mut self) -> Result<&mut Cursor, ScriptError> {
        self.cursor
            .as_mut()
            .ok_or(ScriptError::StreamExhausted { offset: 0 })
    }
}

impl std::fmt::Debug for ScriptContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptContext")
            .field("status", &self.status)
            .field("cursor", &self.cursor)
            .field("frame_depth", &self.frames.depth())
            .field("pending", &self.pending.is_some())
            .field("owner", &self.owner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::command::CommandTable;

    fn context(code: &[u8]) -> ScriptContext {
        ScriptContext::attach(
            ActorId(1),
            Arc::from(code),
            CommandTable::builder().build(),
        )
    }

    #[test]
    fn test_attach_starts_running_at_origin() {
        let ctx = context(&[0x00, 0x00]);
        assert_eq!(ctx.status(), ScriptStatus::Running);
        assert_eq!(ctx.cursor_position(), Some(0));
        assert_eq!(ctx.frame_depth(), 0);
    }

    #[test]
    fn test_call_saves_return_address() {
        let mut ctx = context(&[0; 32]);
        ctx.jump(4).unwrap();
        ctx.call(16).unwrap();
        assert_eq!(ctx.cursor_position(), Some(16));
        assert_eq!(ctx.frame_depth(), 1);

        ctx.return_to_caller().unwrap();
        assert_eq!(ctx.cursor_position(), Some(4));
        assert_eq!(ctx.frame_depth(), 0);
    }

    #[test]
    fn test_call_overflow_keeps_cursor() {
        let mut ctx = context(&[0; 8]);
        for _ in 0..crate::runtime::frames::MAX_CALL_DEPTH {
            ctx.call(2).unwrap();
        }
        ctx.jump(5).unwrap();
        assert!(ctx.call(2).is_err());
        // 溢出的调用不得移动游标
        assert_eq!(ctx.cursor_position(), Some(5));
    }

    #[test]
    fn test_halt_clears_cursor() {
        let mut ctx = context(&[0; 4]);
        ctx.halt();
        assert_eq!(ctx.status(), ScriptStatus::Finished);
        assert_eq!(ctx.cursor_position(), None);
    }

    #[test]
    fn test_return_without_frame_fails() {
        let mut ctx = context(&[0; 4]);
        assert_eq!(ctx.return_to_caller(), Err(ScriptError::EmptyStack));
    }
}
