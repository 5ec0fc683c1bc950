//! # Task System Core Traits
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method runs on a worker thread, or on the
//!    calling thread when the manager has no workers
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` runs on the thread that polls the manager
//! 5. The result may hand back follow-up tasks, which are published in turn
//!
//! Tasks never wait on each other: work that depends on another task is
//! expressed as a follow-up returned from that task's result.

/// A unit of work that can run on a background worker.
///
/// Tasks should own everything they read. Shared data is copied into the
/// task (for instance with [`MtResource::snapshot`](crate::core::MtResource::snapshot))
/// before it is published, so concurrent writers cannot change what the task
/// sees.
pub trait Task: Send {
    /// Performs the work and returns its result.
    ///
    /// Runs on a worker thread; panics are caught and reported by the worker.
    fn process(self: Box<Self>) -> Box<dyn TaskResult>;
}

/// The outcome of a processed `Task`.
pub trait TaskResult: Send {
    /// Applies the result on the polling thread.
    ///
    /// # Returns
    /// Follow-up tasks to publish (usually empty).
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task>>;
}

/// Result reported in place of a task that panicked.
pub(crate) struct PanickedTask;

impl TaskResult for PanickedTask {
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task>> {
        Vec::new()
    }
}
