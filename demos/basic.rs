//! # Example: basic
//!
//! Register a few schedules and let [`Scheduler::run_until`] drive them from
//! a tokio interval until Ctrl-C.
//!
//! Demonstrates how to:
//! - Build a `Scheduler` with the default `LogWriter` processor.
//! - Register range, set and "from now" schedules.
//! - Keep state across calls in the callback's `Memory`.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► Scheduler::builder(cfg).build()
//!   ├─► insert("every_5s" | "quarter" | "in_7s")
//!   └─► Scheduler::run_until(ctrl_c())
//!         └─► every 250ms: tick() → due callbacks → Memory updated
//!
//! Ctrl-C → run_until() returns → registry cleared
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example basic
//! ```

use tickcron::{
    CallbackError, CallbackFn, Config, Schedule, Scheduler, StepPattern, PERIOD_HOUR,
    PERIOD_MINUTE,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 1) Four samples per second
    let sched = Scheduler::builder(Config::with_tick_ms(250)).build();

    // 2) Every 5 seconds, counting its own runs
    sched.insert(
        "every_5s",
        Schedule::new(PERIOD_MINUTE, StepPattern::range(0, PERIOD_MINUTE, 5)),
        CallbackFn::arc(|ctx| {
            let n = ctx.memory().bump("runs");
            println!("[{}] run #{n} at {}", ctx.id(), ctx.now());
            Ok(true)
        }),
    )?;

    // 3) On the quarter hour; fails every other time to show the processor chain
    sched.insert(
        "quarter",
        Schedule::new(PERIOD_HOUR, [0, 15 * 60, 30 * 60, 45 * 60]),
        CallbackFn::arc(|ctx| {
            if ctx.memory().bump("runs") % 2 == 0 {
                return Err(CallbackError::fail("even quarter"));
            }
            Ok(true)
        }),
    )?;

    // 4) Seven seconds from now, once
    sched.insert(
        "in_7s",
        Schedule::new(7, StepPattern::at(0)).from_now(),
        CallbackFn::arc(|ctx| {
            println!("[{}] one-shot fired at {}", ctx.id(), ctx.now());
            Ok(ctx.remove_self())
        }),
    )?;

    println!("registered: {:?}", sched.list());
    sched.run_until(tokio::signal::ctrl_c()).await?;
    Ok(())
}
