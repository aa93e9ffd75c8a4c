//! # Invocation context handed to a callback.
//!
//! [`CallContext`] carries the three values every callback is called with
//! (its identifier, the current time, its private memory) plus a handle to
//! the registry so a callback, or a decorator around it, can deregister
//! itself or others while the dispatch pass is running.
//!
//! ## Rules
//! - Removal is applied immediately; ids removed here and not yet visited
//!   in the current pass are skipped.
//! - The registry lock is **not** held while the callback runs; every
//!   removal takes it briefly.

use std::sync::Mutex;

use crate::callbacks::Memory;
use crate::core::{lock, Registry};

/// What a callback sees during one invocation.
pub struct CallContext<'a> {
    id: &'a str,
    now: u64,
    memory: &'a mut Memory,
    registry: &'a Mutex<Registry>,
}

impl<'a> CallContext<'a> {
    pub(crate) fn new(
        id: &'a str,
        now: u64,
        memory: &'a mut Memory,
        registry: &'a Mutex<Registry>,
    ) -> Self {
        Self {
            id,
            now,
            memory,
            registry,
        }
    }

    /// Identifier the callback was registered under.
    pub fn id(&self) -> &str {
        self.id
    }

    /// Time (seconds) of the tick being dispatched.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Private memory of this callback.
    pub fn memory(&mut self) -> &mut Memory {
        self.memory
    }

    /// Read-only view of the private memory.
    pub fn memory_ref(&self) -> &Memory {
        &*self.memory
    }

    /// Deregisters `id`. Returns `false` if it was not registered.
    pub fn remove(&self, id: &str) -> bool {
        lock(self.registry).remove(id)
    }

    /// Deregisters the running callback; this invocation still completes.
    pub fn remove_self(&self) -> bool {
        self.remove(self.id)
    }

    /// Deregisters every callback. Returns how many were removed.
    pub fn remove_all(&self) -> usize {
        lock(self.registry).remove_all()
    }

    /// Returns `true` if `id` is currently registered.
    pub fn is_registered(&self, id: &str) -> bool {
        lock(self.registry).contains(id)
    }
}
