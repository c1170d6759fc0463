//! 变量/旗标解析
//!
//! 核心只通过 `resolve` 返回的 16 位槽位引用读写，不关心存储落在
//! 哪一层。16 位 id 空间在 16384 处分层：低于阈值的是归属实体的
//! 临时暂存层，达到或高于阈值的是全局持久层。旗标建模为同一地址
//! 空间里的 0/1 变量。

use std::collections::HashMap;

use crate::runtime::context::ActorId;

/// 持久层起始 id（1 << 14）
pub const SAVED_VAR_BASE: u16 = 16384;

/// 变量解析器（外部协作方）
///
/// 合法 id 的解析总是成功；核心不定义失败路径。
pub trait VariableResolver {
    /// 将 (owner, id) 映射到可变的 16 位存储槽
    fn resolve(&mut self, owner: ActorId, id: u16) -> &mut u16;
}

/// 默认的双层内存存储
///
/// 暂存层按 (owner, id) 稀疏存放，持久层全局共享。未写过的槽读出 0。
#[derive(Debug, Default)]
pub struct TwoTierStore {
    /// 临时暂存层（随脚本/实体生命周期丢弃）
    scratch: HashMap<(ActorId, u16), u16>,
    /// 持久层（存档范围）
    saved: HashMap<u16, u16>,
}

impl TwoTierStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 读旗标（0/1 变量）
    pub fn flag(&mut self, owner: ActorId, id: u16) -> bool {
        *self.resolve(owner, id) != 0
    }

    /// 丢弃某个实体的全部暂存变量（脚本脱离时）
    pub fn clear_scratch(&mut self, owner: ActorId) {
        self.scratch.retain(|(o, _), _| *o != owner);
    }

    /// 持久层快照（诊断/存档输出用），按 id 升序
    pub fn saved_snapshot(&self) -> Vec<(u16, u16)> {
        let mut entries: Vec<(u16, u16)> = self
            .saved
            .iter()
            .filter(|(_, v)| **v != 0)
            .map(|(k, v)| (*k, *v))
            .collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries
    }
}

impl VariableResolver for TwoTierStore {
    fn resolve(&mut self, owner: ActorId, id: u16) -> &mut u16 {
        if id < SAVED_VAR_BASE {
            self.scratch.entry((owner, id)).or_insert(0)
        } else {
            self.saved.entry(id).or_insert(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_boundary() {
        let mut store = TwoTierStore::new();
        let owner = ActorId(1);

        // 16383 与 16384 必须落在不同层
        *store.resolve(owner, SAVED_VAR_BASE - 1) = 7;
        *store.resolve(owner, SAVED_VAR_BASE) = 9;

        store.clear_scratch(owner);
        assert_eq!(*store.resolve(owner, SAVED_VAR_BASE - 1), 0);
        assert_eq!(*store.resolve(owner, SAVED_VAR_BASE), 9);
    }

    #[test]
    fn test_scratch_is_per_owner() {
        let mut store = TwoTierStore::new();
        *store.resolve(ActorId(1), 5) = 11;
        assert_eq!(*store.resolve(ActorId(2), 5), 0);
    }

    #[test]
    fn test_saved_tier_is_shared() {
        let mut store = TwoTierStore::new();
        *store.resolve(ActorId(1), SAVED_VAR_BASE + 3) = 42;
        assert_eq!(*store.resolve(ActorId(2), SAVED_VAR_BASE + 3), 42);
    }

    #[test]
    fn test_flags_are_value_writes() {
        let mut store = TwoTierStore::new();
        let owner = ActorId(0);
        assert!(!store.flag(owner, SAVED_VAR_BASE + 1));
        *store.resolve(owner, SAVED_VAR_BASE + 1) = 1;
        assert!(store.flag(owner, SAVED_VAR_BASE + 1));
    }

    #[test]
    fn test_saved_snapshot_sorted_nonzero() {
        let mut store = TwoTierStore::new();
        *store.resolve(ActorId(0), SAVED_VAR_BASE + 5) = 1;
        *store.resolve(ActorId(0), SAVED_VAR_BASE + 2) = 3;
        *store.resolve(ActorId(0), SAVED_VAR_BASE + 9) = 0;

        assert_eq!(
            store.saved_snapshot(),
            vec![(SAVED_VAR_BASE + 2, 3), (SAVED_VAR_BASE + 5, 1)]
        );
    }
}
