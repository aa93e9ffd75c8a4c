//! Run loop, exception processors and overrun reporting.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tickcron::{
    CallbackError, CallbackFn, Config, Event, EventKind, ManualClock, ProcessorFn, ProcessorRef,
    RuntimeError, Schedule, Scheduler, StepPattern, PERIOD_MINUTE,
};
use tokio::sync::oneshot;

const DAY0: u64 = 1_608_768_000;

fn every_second() -> Schedule {
    Schedule::new(PERIOD_MINUTE, StepPattern::range(0, PERIOD_MINUTE, 1))
}

fn collector() -> (Arc<Mutex<Vec<Event>>>, ProcessorRef) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();
    let collect: ProcessorRef =
        ProcessorFn::arc("collect", move |ev: &Event| s.lock().unwrap().push(ev.clone()));
    (seen, collect)
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn run_ticks_once_per_second_until_stopped() {
    let clock = Arc::new(ManualClock::new(DAY0));
    let sched = Scheduler::builder(Config::default())
        .with_clock(clock.clone())
        .build();

    let hits = Arc::new(AtomicUsize::new(0));
    let h = hits.clone();
    sched
        .insert(
            "each",
            every_second(),
            CallbackFn::arc(move |_| {
                h.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            }),
        )
        .unwrap();

    let runner = tokio::spawn({
        let sched = sched.clone();
        async move { sched.run().await }
    });

    // First interval tick fires immediately.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // Ticks at 250ms and 500ms fall in the same second.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    clock.advance(1);
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(sched.last_run_time(), Some(DAY0 + 1));

    sched.stop();
    runner.await.unwrap().unwrap();
    assert!(sched.is_stopped());
    assert!(sched.is_empty());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn run_until_returns_when_the_signal_fires() {
    let sched = Scheduler::builder(Config::default())
        .with_clock(Arc::new(ManualClock::new(DAY0)))
        .build();
    sched
        .insert("each", every_second(), CallbackFn::arc(|_| Ok(true)))
        .unwrap();

    let (tx, rx) = oneshot::channel::<()>();
    let runner = tokio::spawn({
        let sched = sched.clone();
        async move {
            sched
                .run_until(async move {
                    let _ = rx.await;
                    Ok(())
                })
                .await
        }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(sched.last_run_time(), Some(DAY0));
    assert!(!runner.is_finished());

    tx.send(()).unwrap();
    runner.await.unwrap().unwrap();
    assert!(!sched.is_stopped());
    assert!(sched.is_empty());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn run_until_surfaces_signal_errors() {
    let sched = Scheduler::builder(Config::default())
        .with_clock(Arc::new(ManualClock::new(DAY0)))
        .build();
    sched
        .insert("each", every_second(), CallbackFn::arc(|_| Ok(true)))
        .unwrap();

    let err = sched
        .run_until(async { Err(io::Error::other("no signal driver")) })
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Signal(_)));
    assert_eq!(err.as_label(), "runtime_signal");
    assert!(sched.is_empty());
}

#[test]
fn failures_reach_every_processor_in_order() {
    let sched = Scheduler::builder(Config::default())
        .with_clock(Arc::new(ManualClock::new(DAY0)))
        .build();
    let (seen, collect) = collector();
    let order = Arc::new(Mutex::new(Vec::new()));
    let (o1, o2) = (order.clone(), order.clone());
    sched.configure_processors(vec![
        ProcessorFn::arc("first", move |_: &Event| o1.lock().unwrap().push("first")),
        collect,
    ]);
    sched.add_processor(ProcessorFn::arc("last", move |_: &Event| {
        o2.lock().unwrap().push("last")
    }));

    sched
        .insert(
            "bad",
            every_second(),
            CallbackFn::arc(|_| Err(CallbackError::fail("sensor offline"))),
        )
        .unwrap();
    let report = sched.tick().unwrap();
    assert_eq!(report.due.len(), 1);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].kind, EventKind::CallbackFailed);
    assert_eq!(seen[0].callback.as_deref(), Some("bad"));
    assert_eq!(seen[0].time, Some(DAY0));
    assert_eq!(*order.lock().unwrap(), vec!["first", "last"]);

    // Failure does not deregister.
    assert!(sched.contains("bad"));
}

#[test]
fn panicking_processor_does_not_stop_the_chain() {
    let sched = Scheduler::builder(Config::default())
        .with_clock(Arc::new(ManualClock::new(DAY0)))
        .build();
    let (seen, collect) = collector();
    sched.configure_processors(vec![
        ProcessorFn::arc("broken", |_: &Event| panic!("processor bug")),
        collect,
    ]);

    let ran = Arc::new(AtomicUsize::new(0));
    let r = ran.clone();
    sched
        .insert("p", every_second(), CallbackFn::arc(|_| panic!("callback bug")))
        .unwrap();
    sched
        .insert(
            "q",
            every_second(),
            CallbackFn::arc(move |_| {
                r.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            }),
        )
        .unwrap();

    sched.tick().unwrap();
    assert_eq!(ran.load(Ordering::SeqCst), 1);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(
        seen[0].error,
        Some(CallbackError::Panicked {
            info: "callback bug".into()
        })
    );
    assert_eq!(seen[1].kind, EventKind::ProcessorPanicked);
    assert_eq!(
        seen[1].reason.as_deref(),
        Some("processor=broken info=processor bug")
    );
}

#[test]
fn overrun_reports_due_callbacks() {
    // 660ms ticks leave a 10ms budget.
    let sched = Scheduler::builder(Config::with_tick_ms(660))
        .with_clock(Arc::new(ManualClock::new(DAY0)))
        .build();
    let (seen, collect) = collector();
    sched.configure_processors(vec![collect]);

    for id in ["slow", "fast"] {
        let slow = id == "slow";
        sched
            .insert(
                id,
                every_second(),
                CallbackFn::arc(move |_| {
                    if slow {
                        std::thread::sleep(Duration::from_millis(30));
                    }
                    Ok(true)
                }),
            )
            .unwrap();
    }

    let report = sched.tick().unwrap();
    assert!(report.overrun);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let ev = &seen[0];
    assert!(ev.is_overrun());
    assert_eq!(ev.time, Some(DAY0));
    assert!(ev.elapsed.unwrap() > ev.budget.unwrap());
    let mut due: Vec<&str> = ev.due.as_deref().unwrap().iter().map(|id| &**id).collect();
    due.sort_unstable();
    assert_eq!(due, vec!["fast", "slow"]);
}

#[test]
fn callbacks_can_remove_each_other_mid_tick() {
    let sched = Scheduler::builder(Config::default())
        .with_clock(Arc::new(ManualClock::new(DAY0)))
        .build();
    let ran = Arc::new(Mutex::new(Vec::new()));

    for id in ["a", "b", "c"] {
        let ran = ran.clone();
        sched
            .insert(
                id,
                every_second(),
                CallbackFn::arc(move |ctx| {
                    ran.lock().unwrap().push(ctx.id().to_string());
                    let others: Vec<&str> =
                        ["a", "b", "c"].into_iter().filter(|o| *o != ctx.id()).collect();
                    for o in others {
                        ctx.remove(o);
                    }
                    Ok(true)
                }),
            )
            .unwrap();
    }

    sched.tick().unwrap();
    assert_eq!(ran.lock().unwrap().len(), 1);
    assert_eq!(sched.len(), 1);
}
