//! framekit core (engine-agnostic)
//!
//! Frame-driven building blocks shared by the animation crate and by hosts:
//! a keyed cooperative task runner, a lifecycle object pool, stock tasks and
//! a handful of collection/bitmask helpers. Nothing here knows about
//! transforms or curves; hosts plug their own context type into the runner.

pub mod collections;
pub mod config;
pub mod error;
pub mod layers;
pub mod pool;
pub mod runner;
pub mod task;

// Re-exports for consumers (hosts and the animation crate)
pub use collections::VecExt;
pub use config::Config;
pub use error::RunnerError;
pub use layers::{LayerMask, LayerNames};
pub use pool::{Factory, FnFactory, Pool};
pub use runner::{KeyedTaskRunner, TaskHandle, TickReport};
pub use task::{task_fn, FnTask, OneShot, Task, TaskContext, TaskStatus, Wait};
