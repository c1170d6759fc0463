//! API 错误类型
//!
//! 提供统一的错误类型。脚本内部故障不在此列：按核心策略它们
//! 终止单个脚本而不上抛，宿主只会看到 `Terminated`。

use thiserror::Error;

/// Scena 错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScenaError {
    /// 空指令流无法挂载
    #[error("script stream is empty")]
    EmptyScript,

    /// 运行超出 tick 预算（脚本可能等待一个永不完成的外部操作）
    #[error("tick budget exceeded after {ticks} ticks")]
    TickBudgetExceeded {
        /// 已消耗的 tick 数
        ticks: u64,
    },
}

impl ScenaError {
    /// 获取错误阶段名称
    pub fn phase(&self) -> &'static str {
        match self {
            ScenaError::EmptyScript => "loader",
            ScenaError::TickBudgetExceeded { .. } => "vm",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScenaError::TickBudgetExceeded { ticks: 42 };
        assert_eq!(err.to_string(), "tick budget exceeded after 42 ticks");
        assert_eq!(err.phase(), "vm");
    }
}
