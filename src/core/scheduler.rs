//! # Scheduler: owns the registry, the processor chain and the tick loop.
//!
//! The [`Scheduler`] is the single owned instance the tick source talks to.
//! It is shared as `Arc<Scheduler>`; every method takes `&self`.
//!
//! ## Key responsibilities
//! - register/deregister callbacks ([`Scheduler::insert`], [`Scheduler::remove`])
//! - run one tick on demand ([`Scheduler::tick`], [`Scheduler::tick_at`])
//! - drive ticks from a tokio interval until stopped ([`Scheduler::run`],
//!   [`Scheduler::run_until`])
//! - route callback failures and overruns to the exception processors
//!
//! ## High-level architecture
//! ```text
//! tick source (Scheduler::run / external timer ISR)
//!     └──► Scheduler::tick() ── clock.now() ──► TickCoordinator::tick(now)
//!                                                  ├─ dedup same second
//!                                                  ├─ dispatch(registry, processors, now)
//!                                                  │     └─► Callback::call(ctx)
//!                                                  │           └─ ctx.remove_self() ──► Registry
//!                                                  └─ overrun ──► ProcessorSet::emit
//!
//! Locks: pass (TickCoordinator) ⊃ registry (short, never held across a callback)
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tickcron::{CallbackFn, Config, ManualClock, Schedule, Scheduler, StepPattern, PERIOD_MINUTE};
//!
//! let clock = Arc::new(ManualClock::new(1_608_823_800));
//! let sched = Scheduler::builder(Config::default())
//!     .with_clock(clock.clone())
//!     .build();
//!
//! sched
//!     .insert(
//!         "m15",
//!         Schedule::new(PERIOD_MINUTE, StepPattern::range(0, PERIOD_MINUTE, 15)),
//!         CallbackFn::arc(|ctx| {
//!             ctx.memory().bump("runs");
//!             Ok(true)
//!         }),
//!     )
//!     .unwrap();
//!
//! let report = sched.tick().unwrap();
//! assert_eq!(report.due.len(), 1);
//! assert!(sched.tick().is_none()); // same second
//! ```

use std::future::{self, Future};
use std::io;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::callbacks::{CallbackId, CallbackRef, Memory};
use crate::core::builder::SchedulerBuilder;
use crate::core::clock::Clock;
use crate::core::config::Config;
use crate::core::registry::{lock, Registry};
use crate::core::ticker::{TickCoordinator, TickReport};
use crate::error::{RegistryError, RuntimeError};
use crate::processors::{ProcessorRef, ProcessorSet};
use crate::schedule::{Schedule, Window};

/// Periodic callback dispatcher.
pub struct Scheduler {
    cfg: Config,
    clock: Arc<dyn Clock>,
    registry: Mutex<Registry>,
    processors: RwLock<ProcessorSet>,
    pass: Mutex<TickCoordinator>,
    token: CancellationToken,
}

impl Scheduler {
    /// Creates a builder.
    pub fn builder(cfg: Config) -> SchedulerBuilder {
        SchedulerBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        clock: Arc<dyn Clock>,
        processors: ProcessorSet,
    ) -> Self {
        let pass = TickCoordinator::new(&cfg);
        Self {
            cfg,
            clock,
            registry: Mutex::new(Registry::new()),
            processors: RwLock::new(processors),
            pass: Mutex::new(pass),
            token: CancellationToken::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Current time according to the scheduler's clock.
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    // ---------------------------
    // Registry
    // ---------------------------

    /// Registers `callback` under `id`.
    ///
    /// A [`Phase::FromNow`](crate::Phase::FromNow) schedule is aligned to the
    /// clock's current time. Fails with [`RegistryError::DuplicateCallbackId`]
    /// or [`RegistryError::InvalidSchedule`]; nothing is stored on error.
    pub fn insert(
        &self,
        id: &str,
        schedule: Schedule,
        callback: CallbackRef,
    ) -> Result<Window, RegistryError> {
        let now = self.clock.now();
        lock(&self.registry).insert(id, schedule, callback, now)
    }

    /// Deregisters `id`, dropping its memory. No-op if absent.
    pub fn remove(&self, id: &str) -> bool {
        lock(&self.registry).remove(id)
    }

    /// Deregisters every callback. Returns how many were removed.
    pub fn remove_all(&self) -> usize {
        lock(&self.registry).remove_all()
    }

    /// Returns `true` if `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        lock(&self.registry).contains(id)
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        lock(&self.registry).len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        lock(&self.registry).is_empty()
    }

    /// Returns sorted list of registered ids.
    pub fn list(&self) -> Vec<CallbackId> {
        lock(&self.registry).list()
    }

    /// Ids due at `now` without invoking anything.
    pub fn due_callbacks(&self, now: u64) -> Vec<CallbackId> {
        lock(&self.registry).due_callbacks(now).cloned().collect()
    }

    /// Runs `f` on the memory of `id`, if it exists.
    ///
    /// Memory exists from the first dispatch until removal.
    pub fn with_memory<R>(&self, id: &str, f: impl FnOnce(&Memory) -> R) -> Option<R> {
        lock(&self.registry).memory(id).map(f)
    }

    // ---------------------------
    // Processors
    // ---------------------------

    /// Replaces the exception processor chain.
    pub fn configure_processors(&self, processors: Vec<ProcessorRef>) {
        *self
            .processors
            .write()
            .unwrap_or_else(PoisonError::into_inner) = ProcessorSet::new(processors);
    }

    /// Appends a processor to the chain.
    pub fn add_processor(&self, processor: ProcessorRef) {
        self.processors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(processor);
    }

    /// Names of the configured processors, in order.
    pub fn processor_names(&self) -> Vec<&'static str> {
        self.processor_set().names()
    }

    fn processor_set(&self) -> ProcessorSet {
        self.processors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ---------------------------
    // Ticks
    // ---------------------------

    /// Processes one tick at the clock's current time.
    ///
    /// Returns `None` if this second was already processed.
    pub fn tick(&self) -> Option<TickReport> {
        self.tick_at(self.clock.now())
    }

    /// Processes one tick at `now`.
    ///
    /// Only one pass runs at a time; concurrent callers wait.
    pub fn tick_at(&self, now: u64) -> Option<TickReport> {
        let processors = self.processor_set();
        let mut pass = self.pass.lock().unwrap_or_else(PoisonError::into_inner);
        pass.tick(now, &self.registry, &processors)
    }

    /// Last tick time that was processed.
    pub fn last_run_time(&self) -> Option<u64> {
        self.pass
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last_run_time()
    }

    /// Drives ticks every `tick_period` until [`Scheduler::stop`], then tears
    /// the registry down.
    ///
    /// No OS signal handlers are installed; use [`Scheduler::run_until`] to
    /// also stop on an external signal such as `tokio::signal::ctrl_c()`.
    pub async fn run(&self) -> Result<(), RuntimeError> {
        self.run_until(future::pending::<io::Result<()>>()).await
    }

    /// Like [`Scheduler::run`], but also returns once `signal` resolves.
    ///
    /// An `Err` from `signal` is returned as [`RuntimeError::Signal`]; the
    /// registry is torn down either way.
    pub async fn run_until<F>(&self, signal: F) -> Result<(), RuntimeError>
    where
        F: Future<Output = io::Result<()>>,
    {
        let period = self.cfg.tick_period_clamped();
        if self.cfg.may_skip_seconds() {
            warn!(
                tick_ms = period.as_millis() as u64,
                "tick period above 1s; due seconds may be skipped"
            );
        }
        info!(
            tick_ms = period.as_millis() as u64,
            budget_ms = self.cfg.processing_budget().as_millis() as u64,
            callbacks = self.len(),
            "scheduler started"
        );

        let mut ticks = interval(period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(signal);

        let res = loop {
            tokio::select! {
                _ = self.token.cancelled() => break Ok(()),
                r = &mut signal => {
                    info!("stop signal received");
                    break r.map_err(RuntimeError::from);
                }
                _ = ticks.tick() => {
                    self.tick();
                }
            }
        };

        self.shutdown();
        res
    }

    /// Requests [`Scheduler::run`] (or [`Scheduler::run_until`]) to return.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Returns `true` once [`Scheduler::stop`] was called.
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Teardown: clears the schedule, callback and memory tables.
    pub fn shutdown(&self) {
        let removed = self.remove_all();
        info!(removed, "scheduler shut down");
    }
}
