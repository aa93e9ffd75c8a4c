//! # Example: decorators
//!
//! Stack run-limiting decorators and watch callbacks deregister themselves.
//!
//! Demonstrates how to:
//! - Limit a callback to N invocations (`RunTimes`).
//! - Limit a callback to N successful runs (`SuccessfullyRunTimes`).
//! - Trace calls with `DebugCall` (visible with `RUST_LOG=debug`).
//! - Stop the run loop from a callback once the registry drains.
//!
//! ## Run
//! ```bash
//! RUST_LOG=tickcron=debug cargo run --example decorators
//! ```

use std::sync::Arc;

use tickcron::{
    CallbackFn, Config, DebugCall, RunTimes, Schedule, Scheduler, StepPattern,
    SuccessfullyRunTimes, PERIOD_MINUTE,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let sched = Scheduler::builder(Config::default()).build();
    let every_2s = || Schedule::new(PERIOD_MINUTE, StepPattern::range(0, PERIOD_MINUTE, 2));

    // Three calls, whatever they return.
    sched.insert(
        "three_calls",
        every_2s(),
        RunTimes::arc(
            3,
            DebugCall::arc(CallbackFn::arc(|ctx| {
                ctx.memory().bump("seen");
                Ok(false)
            })),
        ),
    )?;

    // Two successes; only seconds divisible by 4 succeed.
    sched.insert(
        "two_successes",
        every_2s(),
        SuccessfullyRunTimes::arc(
            2,
            CallbackFn::arc(|ctx| {
                let ok = ctx.now() % 4 == 0;
                println!("[{}] at {} -> {ok}", ctx.id(), ctx.now());
                Ok(ok)
            }),
        ),
    )?;

    // Stops the run loop once everything else is gone.
    let stopper = Arc::downgrade(&sched);
    sched.insert(
        "watchdog",
        Schedule::new(PERIOD_MINUTE, StepPattern::range(0, PERIOD_MINUTE, 1)),
        CallbackFn::arc(move |ctx| {
            let others = ["three_calls", "two_successes"];
            if others.iter().all(|id| !ctx.is_registered(id)) {
                if let Some(s) = stopper.upgrade() {
                    s.stop();
                }
                return Ok(ctx.remove_self());
            }
            Ok(true)
        }),
    )?;

    sched.run().await?;
    println!("all callbacks finished");
    Ok(())
}
