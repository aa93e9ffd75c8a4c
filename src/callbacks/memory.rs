//! # Per-callback scratch memory.
//!
//! Every registered callback owns one [`Memory`]. It is created empty the
//! first time the callback is dispatched and dropped when the callback is
//! removed. Two areas are kept apart:
//!
//! - **counters**: `u64` values addressed by key (used by the decorators);
//! - **slots**: arbitrary typed values (`T: Any + Send`) addressed by key.
//!
//! Keys starting with `__` are reserved for decorators.

use std::any::Any;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

type Key = Cow<'static, str>;

/// Prefix of keys reserved for decorators.
pub(crate) const RESERVED_PREFIX: &str = "__";

/// Typed key/value scratchpad private to one callback.
#[derive(Default)]
pub struct Memory {
    counters: HashMap<Key, u64>,
    slots: HashMap<Key, Box<dyn Any + Send>>,
}

impl Memory {
    /// Creates an empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the counter stored under `key`, or `0` if absent.
    pub fn counter(&self, key: &str) -> u64 {
        self.counters.get(key).copied().unwrap_or(0)
    }

    /// Returns `true` if a counter exists under `key`.
    pub fn has_counter(&self, key: &str) -> bool {
        self.counters.contains_key(key)
    }

    /// Increments the counter under `key` (absent counts as `0`) and returns the new value.
    pub fn bump(&mut self, key: impl Into<Key>) -> u64 {
        let c = self.counters.entry(key.into()).or_insert(0);
        *c = c.saturating_add(1);
        *c
    }

    /// Sets the counter under `key`.
    pub fn set_counter(&mut self, key: impl Into<Key>, value: u64) {
        self.counters.insert(key.into(), value);
    }

    /// Stores a typed value, returning `true` if it replaced an existing slot.
    pub fn insert<T: Any + Send>(&mut self, key: impl Into<Key>, value: T) -> bool {
        self.slots.insert(key.into(), Box::new(value)).is_some()
    }

    /// Returns the value under `key` if present and of type `T`.
    pub fn get<T: Any + Send>(&self, key: &str) -> Option<&T> {
        self.slots.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Mutable variant of [`Memory::get`].
    pub fn get_mut<T: Any + Send>(&mut self, key: &str) -> Option<&mut T> {
        self.slots.get_mut(key).and_then(|v| v.downcast_mut::<T>())
    }

    /// Returns the value under `key`, inserting `init()` first if absent.
    ///
    /// A slot holding a different type is replaced.
    pub fn get_or_insert_with<T: Any + Send>(
        &mut self,
        key: impl Into<Key>,
        init: impl FnOnce() -> T,
    ) -> &mut T {
        let key = key.into();
        let fresh = !matches!(self.slots.get(&key), Some(v) if v.is::<T>());
        if fresh {
            self.slots.insert(key.clone(), Box::new(init()));
        }
        match self.slots.get_mut(&key).and_then(|v| v.downcast_mut::<T>()) {
            Some(v) => v,
            None => unreachable!("slot holds a T after the check above"),
        }
    }

    /// Removes both the counter and the slot stored under `key`.
    pub fn remove(&mut self, key: &str) -> bool {
        let c = self.counters.remove(key).is_some();
        let s = self.slots.remove(key).is_some();
        c || s
    }

    /// Returns all keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .counters
            .keys()
            .chain(self.slots.keys())
            .map(|k| &**k)
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    /// Returns keys not reserved by decorators, sorted.
    pub fn user_keys(&self) -> Vec<&str> {
        self.keys()
            .into_iter()
            .filter(|k| !k.starts_with(RESERVED_PREFIX))
            .collect()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty() && self.slots.is_empty()
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut slots: Vec<&str> = self.slots.keys().map(|k| &**k).collect();
        slots.sort_unstable();
        f.debug_struct("Memory")
            .field("counters", &self.counters)
            .field("slots", &slots)
            .finish()
    }
}
