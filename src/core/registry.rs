//! # Callback registry - schedule index, callback table and memory table.
//!
//! ## Architecture
//! ```text
//! timers:    Window(period, offset) → StepPattern → {CallbackId}
//! callbacks: CallbackId → Entry { CallbackRef, generation }
//! memory:    CallbackId → Memory            (created on first dispatch)
//! ```
//!
//! ## Rules
//! - `insert` is atomic: on error nothing is stored.
//! - Every leaf id-set is non-empty; empty sets and empty pattern maps are
//!   pruned on removal.
//! - `remove` is idempotent and tears down all three tables for the id.
//! - While a callback runs, its memory is checked out; it is checked back in
//!   only if the same registration (generation) is still present.
//! - A `FromNow` registration is never due in the second it was inserted;
//!   its first hit is one full period later.
//! - The index is keyed by schedule, not by id: removal scans every window.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::callbacks::{CallbackId, CallbackRef, Memory};
use crate::error::RegistryError;
use crate::schedule::{Phase, Schedule, StepPattern, Window};

/// Locks the registry, recovering from poisoning.
///
/// Every registry operation leaves the tables consistent before it can panic,
/// and callbacks never run with the lock held.
pub(crate) fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registered callback with the generation of its registration.
struct Entry {
    callback: CallbackRef,
    generation: u64,
    /// Registration second of a `FromNow` schedule; not due until after it.
    armed_after: Option<u64>,
}

impl Entry {
    fn is_armed(&self, now: u64) -> bool {
        self.armed_after.map_or(true, |t| now > t)
    }
}

/// Callback checked out of the registry for one invocation.
pub(crate) struct Checkout {
    pub callback: CallbackRef,
    pub generation: u64,
    pub memory: Memory,
}

/// Index of registered callbacks by schedule.
#[derive(Default)]
pub struct Registry {
    timers: BTreeMap<Window, BTreeMap<StepPattern, BTreeSet<CallbackId>>>,
    callbacks: HashMap<CallbackId, Entry>,
    memory: HashMap<CallbackId, Memory>,
    next_generation: u64,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` under `id`; `now` resolves [`Phase::FromNow`](crate::Phase::FromNow).
    pub fn insert(
        &mut self,
        id: &str,
        schedule: Schedule,
        callback: CallbackRef,
        now: u64,
    ) -> Result<Window, RegistryError> {
        if self.callbacks.contains_key(id) {
            return Err(RegistryError::DuplicateCallbackId { id: id.to_string() });
        }
        let armed_after = (schedule.phase() == Phase::FromNow).then_some(now);
        let (window, steps) = schedule.resolve(now)?;

        let id: CallbackId = id.into();
        self.next_generation += 1;
        self.callbacks.insert(
            id.clone(),
            Entry {
                callback,
                generation: self.next_generation,
                armed_after,
            },
        );
        self.timers
            .entry(window)
            .or_default()
            .entry(steps)
            .or_default()
            .insert(id);
        Ok(window)
    }

    /// Deregisters `id`, pruning empty index entries. No-op if absent.
    pub fn remove(&mut self, id: &str) -> bool {
        self.memory.remove(id);
        if self.callbacks.remove(id).is_none() {
            return false;
        }

        self.timers.retain(|_, patterns| {
            patterns.retain(|_, ids| {
                ids.remove(id);
                !ids.is_empty()
            });
            !patterns.is_empty()
        });
        true
    }

    /// Deregisters every callback. Returns how many were removed.
    pub fn remove_all(&mut self) -> usize {
        let n = self.callbacks.len();
        self.timers.clear();
        self.callbacks.clear();
        self.memory.clear();
        n
    }

    /// Lazily yields the ids due at `now`, once per matching pattern.
    pub fn due_callbacks(&self, now: u64) -> impl Iterator<Item = &CallbackId> + '_ {
        self.timers
            .iter()
            .flat_map(move |(window, patterns)| {
                let pointer = window.pointer(now);
                patterns
                    .iter()
                    .filter(move |(steps, _)| steps.matches(pointer))
                    .flat_map(|(_, ids)| ids.iter())
            })
            .filter(move |id| self.callbacks.get(*id).is_some_and(|e| e.is_armed(now)))
    }

    /// Returns `true` if `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.callbacks.contains_key(id)
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Returns the sorted list of registered ids.
    pub fn list(&self) -> Vec<CallbackId> {
        let mut ids: Vec<CallbackId> = self.callbacks.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of `(period, offset)` windows in the index.
    #[cfg(test)]
    pub fn windows(&self) -> usize {
        self.timers.len()
    }

    /// Memory of `id`, if it has been dispatched at least once.
    pub fn memory(&self, id: &str) -> Option<&Memory> {
        self.memory.get(id)
    }

    /// Takes the callback and its memory (created if absent) out for one invocation.
    pub(crate) fn checkout(&mut self, id: &str) -> Option<Checkout> {
        let entry = self.callbacks.get(id)?;
        Some(Checkout {
            callback: entry.callback.clone(),
            generation: entry.generation,
            memory: self.memory.remove(id).unwrap_or_default(),
        })
    }

    /// Returns memory after an invocation; dropped if the registration is gone.
    pub(crate) fn checkin(&mut self, id: &CallbackId, generation: u64, memory: Memory) {
        match self.callbacks.get(id) {
            Some(entry) if entry.generation == generation => {
                self.memory.insert(id.clone(), memory);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::CallbackFn;
    use crate::schedule::PERIOD_MINUTE;

    fn noop() -> CallbackRef {
        CallbackFn::arc(|_ctx| Ok(true))
    }

    fn due(reg: &Registry, now: u64) -> Vec<String> {
        reg.due_callbacks(now).map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_insert_and_due() {
        let mut reg = Registry::new();
        reg.insert(
            "m15",
            Schedule::new(PERIOD_MINUTE, StepPattern::range(0, 60, 15)),
            noop(),
            0,
        )
        .unwrap();

        assert_eq!(due(&reg, 120), vec!["m15"]);
        assert!(due(&reg, 121).is_empty());
        assert_eq!(due(&reg, 165), vec!["m15"]);
    }

    #[test]
    fn test_duplicate_id_is_atomic() {
        let mut reg = Registry::new();
        reg.insert("a", Schedule::new(60, StepPattern::at(0)), noop(), 0)
            .unwrap();
        let err = reg
            .insert("a", Schedule::new(10, StepPattern::at(5)), noop(), 0)
            .unwrap_err();

        assert_eq!(err, RegistryError::DuplicateCallbackId { id: "a".into() });
        assert_eq!(reg.windows(), 1);
        assert!(due(&reg, 5).is_empty());
    }

    #[test]
    fn test_invalid_schedule_stores_nothing() {
        let mut reg = Registry::new();
        let err = reg
            .insert("a", Schedule::new(0, StepPattern::at(0)), noop(), 0)
            .unwrap_err();
        assert_eq!(err.as_label(), "registry_invalid_schedule");
        assert!(reg.is_empty());
        assert_eq!(reg.windows(), 0);
    }

    #[test]
    fn test_shared_pattern_keeps_other_ids() {
        let mut reg = Registry::new();
        let s = || Schedule::new(60, StepPattern::range(0, 60, 5));
        reg.insert("a", s(), noop(), 0).unwrap();
        reg.insert("b", s(), noop(), 0).unwrap();
        assert_eq!(due(&reg, 10), vec!["a", "b"]);

        assert!(reg.remove("a"));
        assert_eq!(due(&reg, 10), vec!["b"]);
        assert_eq!(reg.windows(), 1);

        assert!(reg.remove("b"));
        assert_eq!(reg.windows(), 0);
    }

    #[test]
    fn test_remove_is_idempotent_and_leaves_no_residue() {
        let mut reg = Registry::new();
        reg.insert("x", Schedule::new(60, StepPattern::at(0)), noop(), 0)
            .unwrap();
        let c = reg.checkout("x").unwrap();
        reg.checkin(&CallbackId::from("x"), c.generation, c.memory);
        assert!(reg.memory("x").is_some());

        assert!(reg.remove("x"));
        assert!(!reg.remove("x"));
        assert!(reg.is_empty());
        assert_eq!(reg.windows(), 0);
        assert!(reg.memory("x").is_none());
    }

    #[test]
    fn test_checkin_after_reinsert_is_dropped() {
        let mut reg = Registry::new();
        reg.insert("x", Schedule::new(60, StepPattern::at(0)), noop(), 0)
            .unwrap();
        let mut c = reg.checkout("x").unwrap();
        c.memory.bump("n");

        reg.remove("x");
        reg.insert("x", Schedule::new(60, StepPattern::at(0)), noop(), 0)
            .unwrap();
        reg.checkin(&CallbackId::from("x"), c.generation, c.memory);
        assert!(reg.memory("x").is_none());
    }

    #[test]
    fn test_windows_are_visited_in_order() {
        let mut reg = Registry::new();
        reg.insert("x", Schedule::new(60, StepPattern::at(0)), noop(), 0)
            .unwrap();
        reg.insert("y", Schedule::new(30, StepPattern::at(0)), noop(), 0)
            .unwrap();
        assert_eq!(due(&reg, 60), vec!["y", "x"]);
        assert_eq!(due(&reg, 30), vec!["y"]);
    }

    #[test]
    fn test_from_now_is_not_due_in_its_insert_second() {
        let mut reg = Registry::new();
        let t = 1_608_790_000;
        reg.insert("x", Schedule::new(11, StepPattern::at(0)).from_now(), noop(), t)
            .unwrap();
        reg.insert("y", Schedule::new(1, StepPattern::at(0)).from_now(), noop(), t)
            .unwrap();

        assert!(due(&reg, t).is_empty());
        assert_eq!(due(&reg, t + 1), vec!["y"]);
        assert_eq!(due(&reg, t + 11), vec!["y", "x"]);
        assert_eq!(due(&reg, t + 22), vec!["y", "x"]);
    }

    #[test]
    fn test_fixed_phase_is_due_in_its_insert_second() {
        let mut reg = Registry::new();
        reg.insert("x", Schedule::new(60, StepPattern::at(0)), noop(), 120)
            .unwrap();
        assert_eq!(due(&reg, 120), vec!["x"]);
    }

    #[test]
    fn test_remove_all_clears_everything() {
        let mut reg = Registry::new();
        for id in ["a", "b", "c"] {
            reg.insert(id, Schedule::new(60, StepPattern::at(1)), noop(), 0)
                .unwrap();
        }
        assert_eq!(reg.list().len(), 3);
        assert_eq!(reg.remove_all(), 3);
        assert!(reg.is_empty());
        assert_eq!(reg.windows(), 0);
    }
}
