//! API 类型定义
//!
//! 运行驱动的输出类型。

use scena_core::runtime::context::LOCAL_SLOTS;

/// 运行输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    /// 消耗的 tick 数
    pub ticks: u64,
    /// 持久层变量快照（非零项，按 id 升序）
    pub saved_vars: Vec<(u16, u16)>,
    /// 脚本终结时的局部槽位（诊断用）
    pub locals: [u32; LOCAL_SLOTS],
}

impl RunOutput {
    /// 按 id 查询持久层快照
    pub fn saved(&self, id: u16) -> Option<u16> {
        self.saved_vars
            .iter()
            .find(|(var, _)| *var == id)
            .map(|(_, value)| *value)
    }
}
