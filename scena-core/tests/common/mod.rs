//! 测试辅助工具
//!
//! 提供按小端手工拼装指令流的构建器（仅测试用，非公开汇编器）。

use scena_core::runtime::commands::opcodes;
use scena_core::{
    ActorId, CommandTable, Interpreter, ScriptContext, TwoTierStore, standard_table,
};
use std::sync::Arc;

/// 指令流构建器
#[derive(Default)]
pub struct StreamBuilder {
    bytes: Vec<u8>,
}

#[allow(dead_code)]
impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前写入位置（等于已写字节数）
    pub fn pos(&self) -> usize {
        self.bytes.len()
    }

    /// 写 opcode（u16 小端）
    pub fn op(mut self, opcode: u16) -> Self {
        self.bytes.extend_from_slice(&opcode.to_le_bytes());
        self
    }

    pub fn u8(mut self, value: u8) -> Self {
        self.bytes.push(value);
        self
    }

    pub fn u16(mut self, value: u16) -> Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn i32(mut self, value: i32) -> Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// 写 Jump 指令，目标为绝对位置（偏移在写入时换算）
    pub fn jump_to(self, target: usize) -> Self {
        let with_op = self.op(opcodes::JUMP);
        let after_operand = with_op.pos() + 4;
        let offset = target as i64 - after_operand as i64;
        with_op.i32(offset as i32)
    }

    /// 写 Call 指令，目标为绝对位置
    pub fn call_to(self, target: usize) -> Self {
        let with_op = self.op(opcodes::CALL);
        let after_operand = with_op.pos() + 4;
        let offset = target as i64 - after_operand as i64;
        with_op.i32(offset as i32)
    }

    pub fn build(self) -> Arc<[u8]> {
        Arc::from(self.bytes)
    }
}

/// 脚本归属实体（测试统一用 7 号）
pub const OWNER: ActorId = ActorId(7);

/// 用标准命令表挂载一段指令流
#[allow(dead_code)]
pub fn attach(code: Arc<[u8]>) -> ScriptContext {
    ScriptContext::attach(OWNER, code, standard_table())
}

/// 用自定义命令表挂载一段指令流
#[allow(dead_code)]
pub fn attach_with(code: Arc<[u8]>, table: Arc<CommandTable>) -> ScriptContext {
    ScriptContext::attach(OWNER, code, table)
}

/// 测试默认的解释器与存储
#[allow(dead_code)]
pub fn harness() -> (Interpreter, TwoTierStore) {
    (Interpreter::new(), TwoTierStore::new())
}
