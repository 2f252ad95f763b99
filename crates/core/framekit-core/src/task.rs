//! Cooperative tasks resumed once per frame by a [`KeyedTaskRunner`].
//!
//! A task owns its own progress cursor (elapsed time, remaining delay, ...)
//! and reports whether it wants another frame through [`TaskStatus`]. It
//! reaches the host object and its runner only through the [`TaskContext`]
//! handed to [`Task::resume`].
//!
//! [`KeyedTaskRunner`]: crate::runner::KeyedTaskRunner

/// Result of resuming a task for one frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    /// Resume again on the next tick.
    Pending,
    /// Finished; the runner deregisters the task.
    Complete,
}

impl TaskStatus {
    #[inline]
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// A unit of per-frame work driven by a runner over host context `C`.
pub trait Task<C> {
    /// Advance the task by one frame.
    fn resume(&mut self, cx: &mut TaskContext<'_, C>) -> TaskStatus;
}

/// Runner mutations requested by a task while it is being resumed.
pub(crate) enum Command<C> {
    Stop(String),
    StopAll,
    StartOrReplace(String, Box<dyn Task<C>>),
}

/// Per-resume view of the host, the frame delta and the owning runner.
pub struct TaskContext<'a, C> {
    host: &'a mut C,
    dt: f32,
    key: &'a str,
    commands: &'a mut Vec<Command<C>>,
}

impl<'a, C> TaskContext<'a, C> {
    pub(crate) fn new(
        host: &'a mut C,
        dt: f32,
        key: &'a str,
        commands: &'a mut Vec<Command<C>>,
    ) -> Self {
        Self {
            host,
            dt,
            key,
            commands,
        }
    }

    /// Mutable access to the object this runner drives.
    #[inline]
    pub fn host(&mut self) -> &mut C {
        &mut *self.host
    }

    #[inline]
    pub fn host_ref(&self) -> &C {
        &*self.host
    }

    /// Sanitized frame delta in seconds.
    #[inline]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Key the running task is registered under.
    #[inline]
    pub fn key(&self) -> &str {
        self.key
    }

    /// Ask the runner to cancel the task under `key` once this resume returns.
    /// Stopping an absent key is a no-op, stopping the own key cancels self.
    pub fn stop(&mut self, key: impl Into<String>) {
        self.commands.push(Command::Stop(key.into()));
    }

    /// Ask the runner to cancel every task, including this one.
    pub fn stop_all(&mut self) {
        self.commands.push(Command::StopAll);
    }

    /// Ask the runner to (re)start `task` under `key` once this resume returns.
    /// The new task is first resumed on the next tick.
    pub fn start_or_replace<T>(&mut self, key: impl Into<String>, task: T)
    where
        T: Task<C> + 'static,
    {
        self.commands
            .push(Command::StartOrReplace(key.into(), Box::new(task)));
    }
}

/// Closure-backed task; see [`task_fn`].
pub struct FnTask<F>(F);

/// Wrap a closure as a task.
///
/// ```
/// use framekit_core::{task_fn, KeyedTaskRunner, TaskContext, TaskStatus};
///
/// let mut runner: KeyedTaskRunner<u32> = KeyedTaskRunner::new();
/// runner.start_or_replace(
///     "count",
///     task_fn(|cx: &mut TaskContext<'_, u32>| {
///         *cx.host() += 1;
///         TaskStatus::Pending
///     }),
/// );
/// let mut frames = 0u32;
/// runner.tick(&mut frames, 1.0 / 60.0);
/// runner.tick(&mut frames, 1.0 / 60.0);
/// assert_eq!(frames, 2);
/// ```
pub fn task_fn<C, F>(f: F) -> FnTask<F>
where
    F: FnMut(&mut TaskContext<'_, C>) -> TaskStatus,
{
    FnTask(f)
}

impl<C, F> Task<C> for FnTask<F>
where
    F: FnMut(&mut TaskContext<'_, C>) -> TaskStatus,
{
    fn resume(&mut self, cx: &mut TaskContext<'_, C>) -> TaskStatus {
        (self.0)(cx)
    }
}

/// Runs an action against the host on its first resume, then waits `delay`
/// seconds before completing. Without a delay it completes on the next frame.
pub struct OneShot<F> {
    action: Option<F>,
    remaining: f32,
}

impl<F> OneShot<F> {
    pub fn new(action: F) -> Self {
        Self::with_delay(action, 0.0)
    }

    pub fn with_delay(action: F, delay_seconds: f32) -> Self {
        Self {
            action: Some(action),
            remaining: delay_seconds.max(0.0),
        }
    }
}

impl<C, F> Task<C> for OneShot<F>
where
    F: FnOnce(&mut C),
{
    fn resume(&mut self, cx: &mut TaskContext<'_, C>) -> TaskStatus {
        if let Some(action) = self.action.take() {
            action(cx.host());
            return TaskStatus::Pending;
        }
        self.remaining -= cx.dt();
        if self.remaining <= 0.0 {
            TaskStatus::Complete
        } else {
            TaskStatus::Pending
        }
    }
}

/// Completes once `seconds` of frame time have been accumulated.
#[derive(Clone, Debug)]
pub struct Wait {
    remaining: f32,
}

impl Wait {
    pub fn seconds(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
        }
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

impl<C> Task<C> for Wait {
    fn resume(&mut self, cx: &mut TaskContext<'_, C>) -> TaskStatus {
        self.remaining -= cx.dt();
        if self.remaining <= 0.0 {
            TaskStatus::Complete
        } else {
            TaskStatus::Pending
        }
    }
}
