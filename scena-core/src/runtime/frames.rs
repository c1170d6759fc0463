//! 调用帧栈
//!
//! 有界 LIFO，只保存游标位置。每个脚本的局部槽位是全脚本共享的，
//! 帧里不做局部变量作用域。

use crate::runtime::error::ScriptError;

/// 调用帧栈容量
pub const MAX_CALL_DEPTH: usize = 20;

/// 保存的游标位置栈
#[derive(Debug, Default)]
pub struct FrameStack {
    frames: Vec<usize>,
}

impl FrameStack {
    /// 创建空帧栈
    pub fn new() -> Self {
        FrameStack {
            frames: Vec::with_capacity(MAX_CALL_DEPTH),
        }
    }

    /// 当前帧深度
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// 压入一个返回地址
    ///
    /// 超过容量时失败且不改动栈内容。
    pub fn push(&mut self, position: usize) -> Result<(), ScriptError> {
        if self.frames.len() >= MAX_CALL_DEPTH {
            return Err(ScriptError::StackOverflow {
                max: MAX_CALL_DEPTH,
            });
        }
        self.frames.push(position);
        Ok(())
    }

    /// 弹出最顶层的返回地址
    pub fn pop(&mut self) -> Result<usize, ScriptError> {
        self.frames.pop().ok_or(ScriptError::EmptyStack)
    }

    /// 清空帧栈（脚本强制终止时用）
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// 自底向上的已保存位置（存档快照用）
    pub fn positions(&self) -> &[usize] {
        &self.frames
    }
}
