//! 在途请求登记表
//!
//! 每次发起按分类等逻辑键区分的请求前先登记，拿到带代次号的票据；
//! 响应回来后只有票据仍是该槽位的最新代次时才应用结果，慢响应不会覆盖新结果。

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::debug;

/// 请求票据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<S> {
    slot: S,
    generation: u64,
    key: String,
}

impl<S: Copy> Ticket<S> {
    pub fn slot(&self) -> S {
        self.slot
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 发起请求时使用的逻辑键（例如分类 ID）
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[derive(Debug)]
struct SlotState {
    generation: u64,
    key: String,
}

/// 在途请求登记表，`S` 是槽位类型（同一槽位同一时刻只有一个有效请求）
#[derive(Debug)]
pub struct InflightRegistry<S> {
    slots: Mutex<HashMap<S, SlotState>>,
    next_generation: AtomicU64,
}

impl<S> InflightRegistry<S>
where
    S: Copy + Eq + Hash + std::fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(1),
        }
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<S, SlotState>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 登记新请求，同一槽位之前的票据随即过期
    pub fn begin(&self, slot: S, key: impl Into<String>) -> Ticket<S> {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        let key = key.into();
        self.slots().insert(
            slot,
            SlotState {
                generation,
                key: key.clone(),
            },
        );
        debug!(
            "[Inflight] 登记请求 {:?}#{}，键: {}",
            slot, generation, key
        );
        Ticket {
            slot,
            generation,
            key,
        }
    }

    /// 票据是否仍是该槽位的最新请求
    pub fn is_current(&self, ticket: &Ticket<S>) -> bool {
        self.slots()
            .get(&ticket.slot)
            .map(|state| state.generation == ticket.generation)
            .unwrap_or(false)
    }

    /// 槽位当前有效请求的逻辑键
    pub fn current_key(&self, slot: S) -> Option<String> {
        self.slots().get(&slot).map(|state| state.key.clone())
    }

    /// 作废槽位上的请求（例如切换到另一类数据时）
    pub fn invalidate(&self, slot: S) {
        if let Some(state) = self.slots().remove(&slot) {
            debug!(
                "[Inflight] 作废请求 {:?}#{}，键: {}",
                slot, state.generation, state.key
            );
        }
    }
}

impl<S> Default for InflightRegistry<S>
where
    S: Copy + Eq + Hash + std::fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Slot {
        Menu,
        Other,
    }

    #[test]
    fn newer_ticket_supersedes_older() {
        let registry = InflightRegistry::new();
        let first = registry.begin(Slot::Menu, "10");
        let second = registry.begin(Slot::Menu, "20");

        assert!(!registry.is_current(&first));
        assert!(registry.is_current(&second));
        assert!(second.generation() > first.generation());
        assert_eq!(registry.current_key(Slot::Menu).as_deref(), Some("20"));
    }

    #[test]
    fn slots_are_independent() {
        let registry = InflightRegistry::new();
        let menu = registry.begin(Slot::Menu, "10");
        let other = registry.begin(Slot::Other, "10");
        assert!(registry.is_current(&menu));
        assert!(registry.is_current(&other));
    }

    #[test]
    fn invalidate_expires_ticket() {
        let registry = InflightRegistry::new();
        let ticket = registry.begin(Slot::Menu, "10");
        registry.invalidate(Slot::Menu);
        assert!(!registry.is_current(&ticket));
        assert_eq!(registry.current_key(Slot::Menu), None);
    }
}
