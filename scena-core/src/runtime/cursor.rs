//! 指令流游标
//!
//! 对脚本字节流的只进读取视图。所有多字节读取都是小端序，
//! 每次读取将游标前移对应宽度。不提供随机访问；回退只能
//! 通过帧栈恢复或显式 `set_position`（无条件跳转用）。

use crate::runtime::error::ScriptError;
use std::sync::Arc;

/// 指令流游标
#[derive(Clone)]
pub struct Cursor {
    /// 指令字节流（脚本家族内共享）
    code: Arc<[u8]>,
    /// 当前读取位置
    pos: usize,
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("pos", &self.pos)
            .field("len", &self.code.len())
            .finish()
    }
}

impl Cursor {
    /// 在字节流起点创建游标
    pub fn new(code: Arc<[u8]>) -> Self {
        Cursor { code, pos: 0 }
    }

    /// 当前读取位置
    pub fn position(&self) -> usize {
        self.pos
    }

    /// 无条件重定位游标（Jump 语义）
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// 剩余可读字节数
    pub fn remaining(&self) -> usize {
        self.code.len().saturating_sub(self.pos)
    }

    /// 读取一个字节
    pub fn read_u8(&mut self) -> Result<u8, ScriptError> {
        let bytes = self.take(1)?;
        Ok(bytes[0])
    }

    /// 读取两个字节（小端）
    pub fn read_u16(&mut self) -> Result<u16, ScriptError> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// 读取四个字节（小端）
    pub fn read_u32(&mut self) -> Result<u32, ScriptError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// 读取有符号 32 位相对偏移
    pub fn read_i32(&mut self) -> Result<i32, ScriptError> {
        Ok(self.read_u32()? as i32)
    }

    /// 前移游标并返回读到的字节片
    fn take(&mut self, width: usize) -> Result<&[u8], ScriptError> {
        let start = self.pos;
        let end = start
            .checked_add(width)
            .filter(|&end| end <= self.code.len())
            .ok_or(ScriptError::StreamExhausted { offset: start })?;
        self.pos = end;
        Ok(&self.code[start..end])
    }
}
