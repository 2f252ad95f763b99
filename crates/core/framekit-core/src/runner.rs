//! Keyed cooperative task runner.
//!
//! A runner belongs to a single owner and maps string keys to running tasks.
//! At most one task runs per key. `tick` resumes every task once per frame
//! and deregisters those that complete.
//!
//! Bulk operations work on a snapshot of keys, and tasks mutate the runner
//! only through deferred requests on their [`TaskContext`], so a task can
//! stop or restart siblings (or itself) while the runner is iterating.

use std::fmt;

use hashbrown::HashMap;

use crate::config::Config;
use crate::error::RunnerError;
use crate::task::{Command, Task, TaskContext, TaskStatus};

/// Identifies one particular task registered under a key.
/// A replaced task keeps its key but gets a new id, so stale handles never
/// match the replacement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    key: String,
    id: u64,
}

impl TaskHandle {
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// What happened during one [`KeyedTaskRunner::tick`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Number of task resumptions performed.
    pub resumed: usize,
    /// Keys whose task finished on its own this tick.
    pub completed: Vec<String>,
    /// Keys cancelled by requests issued from running tasks.
    pub cancelled: Vec<String>,
    /// Keys started by running tasks, with whether a task was replaced.
    pub started: Vec<(String, bool)>,
}

struct Entry<C> {
    id: u64,
    task: Box<dyn Task<C>>,
}

/// Registry of running tasks for one owner, keyed by string.
pub struct KeyedTaskRunner<C> {
    tasks: HashMap<String, Entry<C>>,
    next_id: u64,
    config: Config,
}

impl<C> Default for KeyedTaskRunner<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for KeyedTaskRunner<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedTaskRunner")
            .field("keys", &self.tasks.keys().collect::<Vec<_>>())
            .field("next_id", &self.next_id)
            .field("config", &self.config)
            .finish()
    }
}

impl<C> KeyedTaskRunner<C> {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            tasks: HashMap::with_capacity(config.task_capacity),
            next_id: 0,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register and start `task` under `key`.
    ///
    /// Fails with [`RunnerError::DuplicateKey`] when the key is taken; the
    /// task already registered keeps running.
    pub fn add_coroutine<T>(
        &mut self,
        key: impl Into<String>,
        task: T,
    ) -> Result<TaskHandle, RunnerError>
    where
        T: Task<C> + 'static,
    {
        let key = key.into();
        if self.tasks.contains_key(&key) {
            log::debug!("rejecting duplicate task key '{key}'");
            return Err(RunnerError::DuplicateKey { key });
        }
        Ok(self.insert_boxed(key, Box::new(task)))
    }

    /// Cancel and deregister the task under `key`.
    /// Returns whether a task was removed; an absent key is a no-op.
    pub fn remove_coroutine(&mut self, key: &str) -> bool {
        match self.tasks.remove(key) {
            Some(entry) => {
                log::debug!("stopped task '{key}' (id {})", entry.id);
                true
            }
            None => false,
        }
    }

    /// Cancel and deregister every task. Returns how many were removed.
    pub fn remove_all_coroutines(&mut self) -> usize {
        self.cancel_all().len()
    }

    /// Cancel whatever runs under `key` (if anything) and start `task` in its
    /// place. Both happen before the next tick.
    pub fn start_or_replace<T>(&mut self, key: impl Into<String>, task: T) -> TaskHandle
    where
        T: Task<C> + 'static,
    {
        self.replace_boxed(key.into(), Box::new(task))
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.tasks.contains_key(key)
    }

    /// Whether the exact task behind `handle` is still registered.
    pub fn is_running(&self, handle: &TaskHandle) -> bool {
        self.tasks
            .get(handle.key.as_str())
            .is_some_and(|entry| entry.id == handle.id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    /// Resume every task registered when the tick starts, once, against `host`.
    ///
    /// Tasks started during the tick are first resumed on the next one.
    /// Tasks cancelled by an earlier task in the same tick are not resumed.
    pub fn tick(&mut self, host: &mut C, dt: f32) -> TickReport {
        let dt = self.config.clamp_delta(dt);
        let snapshot: Vec<(String, u64)> = self
            .tasks
            .iter()
            .map(|(key, entry)| (key.clone(), entry.id))
            .collect();

        let mut report = TickReport::default();
        let mut commands = Vec::new();
        for (key, id) in snapshot {
            let still_current = self.tasks.get(&key).is_some_and(|e| e.id == id);
            if !still_current {
                continue;
            }
            let Some(mut entry) = self.tasks.remove(&key) else {
                continue;
            };

            let status = {
                let mut cx = TaskContext::new(&mut *host, dt, &key, &mut commands);
                entry.task.resume(&mut cx)
            };
            report.resumed += 1;

            match status {
                TaskStatus::Pending => {
                    self.tasks.insert(key, entry);
                }
                TaskStatus::Complete => {
                    log::trace!("task '{key}' (id {}) completed", entry.id);
                    report.completed.push(key);
                }
            }

            for command in commands.drain(..) {
                self.apply(command, &mut report);
            }
        }
        report
    }

    fn apply(&mut self, command: Command<C>, report: &mut TickReport) {
        match command {
            Command::Stop(key) => {
                if self.remove_coroutine(&key) {
                    report.cancelled.push(key);
                }
            }
            Command::StopAll => {
                let keys = self.cancel_all();
                report.cancelled.extend(keys);
            }
            Command::StartOrReplace(key, task) => {
                let replaced = self.tasks.contains_key(&key);
                self.replace_boxed(key.clone(), task);
                report.started.push((key, replaced));
            }
        }
    }

    fn cancel_all(&mut self) -> Vec<String> {
        let keys: Vec<String> = self.tasks.keys().cloned().collect();
        for key in &keys {
            self.tasks.remove(key.as_str());
        }
        if !keys.is_empty() {
            log::debug!("stopped {} task(s)", keys.len());
        }
        keys
    }

    fn replace_boxed(&mut self, key: String, task: Box<dyn Task<C>>) -> TaskHandle {
        if let Some(old) = self.tasks.remove(&key) {
            log::debug!("replacing task '{key}' (id {})", old.id);
        }
        self.insert_boxed(key, task)
    }

    fn insert_boxed(&mut self, key: String, task: Box<dyn Task<C>>) -> TaskHandle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        log::debug!("started task '{key}' (id {id})");
        self.tasks.insert(key.clone(), Entry { id, task });
        TaskHandle { key, id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{task_fn, Wait};

    fn counter() -> impl Task<u32> {
        task_fn(|cx: &mut TaskContext<'_, u32>| {
            *cx.host() += 1;
            TaskStatus::Pending
        })
    }

    #[test]
    fn handles_distinguish_replacements() {
        let mut runner = KeyedTaskRunner::<u32>::new();
        let first = runner.start_or_replace("k", counter());
        let second = runner.start_or_replace("k", counter());
        assert_eq!(first.key(), second.key());
        assert_ne!(first.id(), second.id());
        assert!(!runner.is_running(&first));
        assert!(runner.is_running(&second));
        assert_eq!(runner.len(), 1);
    }

    #[test]
    fn tick_deregisters_completed_tasks() {
        let mut runner = KeyedTaskRunner::<u32>::new();
        runner.add_coroutine("wait", Wait::seconds(0.5)).unwrap();
        let mut host = 0;
        let report = runner.tick(&mut host, 0.25);
        assert!(report.completed.is_empty());
        let report = runner.tick(&mut host, 0.25);
        assert_eq!(report.completed, vec!["wait".to_string()]);
        assert!(runner.is_empty());
    }

    #[test]
    fn clamped_delta_reaches_tasks() {
        let cfg = Config {
            max_delta_time: Some(0.1),
            ..Config::default()
        };
        let mut runner = KeyedTaskRunner::<f32>::with_config(cfg);
        runner.start_or_replace(
            "dt",
            task_fn(|cx: &mut TaskContext<'_, f32>| {
                let dt = cx.dt();
                *cx.host() += dt;
                TaskStatus::Pending
            }),
        );
        let mut total = 0.0f32;
        runner.tick(&mut total, 5.0);
        runner.tick(&mut total, -1.0);
        assert!((total - 0.1).abs() < 1e-6);
    }

    #[test]
    fn negative_delta_bound_never_reaches_tasks() {
        let cfg: Config = serde_json::from_str(r#"{ "max_delta_time": -0.5 }"#).unwrap();
        let mut runner = KeyedTaskRunner::<f32>::with_config(cfg);
        runner.start_or_replace(
            "dt",
            task_fn(|cx: &mut TaskContext<'_, f32>| {
                let dt = cx.dt();
                *cx.host() += dt;
                TaskStatus::Pending
            }),
        );
        let mut total = 0.0f32;
        runner.tick(&mut total, 0.1);
        assert!((total - 0.1).abs() < 1e-6);
    }

    #[test]
    fn report_lists_tasks_started_mid_tick() {
        let mut runner = KeyedTaskRunner::<u32>::new();
        runner.start_or_replace("busy", counter());
        runner.start_or_replace(
            "starter",
            task_fn(|cx: &mut TaskContext<'_, u32>| {
                cx.start_or_replace("busy", Wait::seconds(1.0));
                cx.start_or_replace("fresh", Wait::seconds(1.0));
                TaskStatus::Complete
            }),
        );
        let mut host = 0;
        let report = runner.tick(&mut host, 0.1);
        let mut started = report.started.clone();
        started.sort();
        assert_eq!(
            started,
            vec![("busy".to_string(), true), ("fresh".to_string(), false)]
        );
        assert!(runner.contains("fresh"));
    }
}
