//! 脚本级错误
//!
//! 所有变体都对单个脚本致命：派发循环捕获后终止该脚本，
//! 不向宿主 tick 循环传播。

/// 脚本运行时错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    /// 调用帧栈超过上限（20 层）
    #[error("call stack overflow (max depth {max})")]
    StackOverflow {
        /// 帧栈容量
        max: usize,
    },

    /// 没有调用帧可以返回
    #[error("return with no caller frame")]
    EmptyStack,

    /// 读取越过指令流末尾
    #[error("instruction stream exhausted at offset {offset}")]
    StreamExhausted {
        /// 发生越界读取时的游标位置
        offset: usize,
    },
}
