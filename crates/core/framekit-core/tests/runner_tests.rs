use std::cell::Cell;
use std::rc::Rc;

use framekit_core::{
    task_fn, KeyedTaskRunner, OneShot, RunnerError, Task, TaskContext, TaskStatus, Wait,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Host used by these tests: a log of which task ran on which frame.
#[derive(Default)]
struct Host {
    frames: Vec<&'static str>,
}

fn tagged(tag: &'static str) -> impl Task<Host> {
    task_fn(move |cx: &mut TaskContext<'_, Host>| {
        cx.host().frames.push(tag);
        TaskStatus::Pending
    })
}

/// it should register a task and count it
#[test]
fn add_coroutine_registers() {
    init_logging();
    let mut runner = KeyedTaskRunner::<Host>::new();
    runner.add_coroutine("TestCoroutine", Wait::seconds(1.0)).unwrap();
    assert_eq!(runner.len(), 1);
    assert!(runner.contains("TestCoroutine"));
}

/// it should reject a duplicate key and keep the original task running
#[test]
fn duplicate_key_keeps_original() {
    init_logging();
    let mut runner = KeyedTaskRunner::<Host>::new();
    let original = runner.add_coroutine("k", tagged("first")).unwrap();

    let err = runner.add_coroutine("k", tagged("second")).unwrap_err();
    assert_eq!(
        err,
        RunnerError::DuplicateKey {
            key: "k".to_string()
        }
    );
    assert_eq!(err.key(), "k");
    assert!(runner.is_running(&original));

    let mut host = Host::default();
    runner.tick(&mut host, 0.1);
    assert_eq!(host.frames, vec!["first"]);
}

/// it should treat removal of an absent key as a no-op
#[test]
fn remove_absent_key_is_noop() {
    let mut runner = KeyedTaskRunner::<Host>::new();
    runner.add_coroutine("present", tagged("p")).unwrap();
    assert!(!runner.remove_coroutine("missing"));
    assert_eq!(runner.len(), 1);
    assert!(runner.contains("present"));
}

/// it should cancel a removed task so it is never resumed again
#[test]
fn remove_coroutine_stops_resumption() {
    let mut runner = KeyedTaskRunner::<Host>::new();
    runner.add_coroutine("a", tagged("a")).unwrap();
    let mut host = Host::default();
    runner.tick(&mut host, 0.1);
    assert!(runner.remove_coroutine("a"));
    assert!(runner.is_empty());
    runner.tick(&mut host, 0.1);
    assert_eq!(host.frames, vec!["a"]);
}

/// it should replace the task under a key, keeping one entry
#[test]
fn start_or_replace_cancels_previous() {
    let mut runner = KeyedTaskRunner::<Host>::new();
    let old = runner.add_coroutine("k", tagged("old")).unwrap();
    let new = runner.start_or_replace("k", tagged("new"));
    assert_eq!(runner.len(), 1);
    assert!(!runner.is_running(&old));
    assert!(runner.is_running(&new));

    let mut host = Host::default();
    runner.tick(&mut host, 0.1);
    runner.tick(&mut host, 0.1);
    assert_eq!(host.frames, vec!["new", "new"]);
}

/// it should empty the map and be safe on an empty runner
#[test]
fn remove_all_coroutines_empties() {
    let mut runner = KeyedTaskRunner::<Host>::new();
    assert_eq!(runner.remove_all_coroutines(), 0);
    runner.add_coroutine("TestCoroutine1", Wait::seconds(1.0)).unwrap();
    runner.add_coroutine("TestCoroutine2", Wait::seconds(1.0)).unwrap();
    runner.add_coroutine("TestCoroutine3", Wait::seconds(1.0)).unwrap();
    assert_eq!(runner.len(), 3);
    assert_eq!(runner.remove_all_coroutines(), 3);
    assert!(runner.is_empty());
    assert_eq!(runner.remove_all_coroutines(), 0);
}

/// it should resume each task once per tick and drop finished ones
#[test]
fn tasks_interleave_per_tick() {
    let mut runner = KeyedTaskRunner::<Host>::new();
    runner.add_coroutine("a", tagged("a")).unwrap();
    runner
        .add_coroutine("once", OneShot::new(|h: &mut Host| h.frames.push("once")))
        .unwrap();
    let mut host = Host::default();

    let report = runner.tick(&mut host, 0.1);
    assert_eq!(report.resumed, 2);
    let report = runner.tick(&mut host, 0.1);
    assert_eq!(report.completed, vec!["once".to_string()]);
    assert_eq!(runner.len(), 1);

    let mut sorted = host.frames.clone();
    sorted.sort();
    assert_eq!(sorted, vec!["a", "a", "once"]);
}

/// it should let a task stop itself from inside its resume
#[test]
fn task_can_stop_itself() {
    let mut runner = KeyedTaskRunner::<Host>::new();
    runner.add_coroutine(
        "self-stop",
        task_fn(|cx: &mut TaskContext<'_, Host>| {
            cx.host().frames.push("ran");
            let own = cx.key().to_string();
            cx.stop(own);
            TaskStatus::Pending
        }),
    )
    .unwrap();
    let mut host = Host::default();
    let report = runner.tick(&mut host, 0.1);
    assert_eq!(report.cancelled, vec!["self-stop".to_string()]);
    assert!(runner.is_empty());
    runner.tick(&mut host, 0.1);
    assert_eq!(host.frames, vec!["ran"]);
}

/// it should tolerate a task clearing the whole runner mid-iteration
#[test]
fn stop_all_from_task_is_safe() {
    let mut runner = KeyedTaskRunner::<Host>::new();
    for key in ["a", "b", "c", "d"] {
        runner.add_coroutine(key, tagged("sibling")).unwrap();
    }
    runner.add_coroutine(
        "reaper",
        task_fn(|cx: &mut TaskContext<'_, Host>| {
            cx.stop_all();
            TaskStatus::Pending
        }),
    )
    .unwrap();
    let mut host = Host::default();
    let report = runner.tick(&mut host, 0.1);
    assert!(runner.is_empty());
    // Siblings resumed before the reaper ran once, the rest never ran.
    assert_eq!(host.frames.len() + 1, report.resumed);
    assert_eq!(report.cancelled.len(), 5);
    runner.tick(&mut host, 0.1);
    assert_eq!(host.frames.len() + 1, report.resumed);
}

/// it should defer tasks started from inside a tick to the next tick
#[test]
fn tasks_started_mid_tick_run_next_tick() {
    let mut runner = KeyedTaskRunner::<Host>::new();
    let spawned = Rc::new(Cell::new(false));
    let flag = spawned.clone();
    runner.add_coroutine(
        "spawner",
        task_fn(move |cx: &mut TaskContext<'_, Host>| {
            if !flag.get() {
                flag.set(true);
                cx.start_or_replace("child", tagged("child"));
            }
            TaskStatus::Complete
        }),
    )
    .unwrap();
    let mut host = Host::default();

    runner.tick(&mut host, 0.1);
    assert!(spawned.get());
    assert!(runner.contains("child"));
    assert!(!runner.contains("spawner"));
    assert!(host.frames.is_empty());

    runner.tick(&mut host, 0.1);
    assert_eq!(host.frames, vec!["child"]);
}

/// it should let a completing task chain a successor under its own key
#[test]
fn completed_task_can_restart_own_key() {
    let mut runner = KeyedTaskRunner::<Host>::new();
    runner.add_coroutine(
        "stage",
        task_fn(|cx: &mut TaskContext<'_, Host>| {
            cx.host().frames.push("stage-1");
            cx.start_or_replace("stage", tagged("stage-2"));
            TaskStatus::Complete
        }),
    )
    .unwrap();
    let mut host = Host::default();
    let report = runner.tick(&mut host, 0.1);
    assert_eq!(report.completed, vec!["stage".to_string()]);
    assert!(runner.contains("stage"));
    runner.tick(&mut host, 0.1);
    assert_eq!(host.frames, vec!["stage-1", "stage-2"]);
}

/// it should keep a never-ending task alive across many ticks until removed
#[test]
fn endless_task_runs_until_removed() {
    let mut runner = KeyedTaskRunner::<u64>::new();
    runner.add_coroutine(
        "forever",
        task_fn(|cx: &mut TaskContext<'_, u64>| {
            *cx.host() += 1;
            TaskStatus::Pending
        }),
    )
    .unwrap();
    let mut ticks = 0u64;
    for _ in 0..10_000 {
        runner.tick(&mut ticks, 1.0 / 60.0);
    }
    assert_eq!(ticks, 10_000);
    assert!(runner.contains("forever"));
    assert!(runner.remove_coroutine("forever"));
    runner.tick(&mut ticks, 1.0 / 60.0);
    assert_eq!(ticks, 10_000);
}
