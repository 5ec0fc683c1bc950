//! # Task Management System
//!
//! Runs mesh generation and other self-contained work off the calling thread.
//!
//! ## Architecture Overview
//! - `TaskManager`: distributes tasks over its workers and collects results
//! - `Task`: a unit of work that owns its data
//! - `TaskResult`: the outcome of a task, which can spawn follow-up tasks
//! - `TaskChannel`: the channel pair and thread of one worker
//!
//! ## Modes
//!
//! A manager created with one or more workers spawns a dedicated, named
//! thread per worker and hands tasks out round robin. A manager created with
//! zero workers keeps published tasks in a queue until the owner drains them
//! with [`TaskManager::run_queued_tasks`], which is the mode to use where
//! threads are unavailable or deterministic ordering matters (tests).
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. Workers process them and send results back
//! 3. `process_completed_tasks()` handles results on the owner's thread
//! 4. Follow-up tasks returned by results are published again
//!
//! ## Example Usage
//! ```
//! use voxel_space::task_management::{task::{Task, TaskResult}, TaskManager};
//!
//! struct Noop;
//! impl Task for Noop {
//!     fn process(self: Box<Self>) -> Box<dyn TaskResult> {
//!         Box::new(Done)
//!     }
//! }
//!
//! struct Done;
//! impl TaskResult for Done {
//!     fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task>> {
//!         Vec::new()
//!     }
//! }
//!
//! let mut task_manager = TaskManager::new(2).unwrap();
//! task_manager.publish_task(Box::new(Noop));
//! task_manager.wait_until_idle();
//! assert_eq!(task_manager.num_jobs(), 0);
//! ```

pub mod task;

use std::{
    collections::VecDeque,
    io,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc::{channel, Receiver, RecvTimeoutError, Sender},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use log::{debug, error, info, warn};
use task::{PanickedTask, Task, TaskResult};

/// How long `wait_until_idle` blocks on one worker before polling the next.
const WAIT_SLICE: Duration = Duration::from_millis(2);

static NEXT_WORKER_ID: AtomicUsize = AtomicUsize::new(0);

/// Runs a task, turning a panic into a `PanickedTask` result.
fn process_task(task: Box<dyn Task>) -> Box<dyn TaskResult> {
    panic::catch_unwind(AssertUnwindSafe(|| task.process())).unwrap_or_else(|_| {
        error!("Task panicked on thread {:?}", thread::current().name());
        Box::new(PanickedTask)
    })
}

/// A communication channel between the owning thread and one worker thread.
///
/// Dropping the channel closes the task side and joins the worker once it
/// has finished its current task.
pub struct TaskChannel {
    task_sender: Option<Sender<Box<dyn Task>>>,
    result_receiver: Receiver<Box<dyn TaskResult>>,
    num_tasks_in_flight: usize,
    worker: Option<JoinHandle<()>>,
}

impl TaskChannel {
    /// Spawns a worker thread named `TaskChannel{n}`.
    pub fn spawn() -> io::Result<Self> {
        let (task_tx, task_rx) = channel::<Box<dyn Task>>();
        let (result_tx, result_rx) = channel::<Box<dyn TaskResult>>();

        let name = format!("TaskChannel{}", NEXT_WORKER_ID.fetch_add(1, Ordering::Relaxed));
        let worker = thread::Builder::new().name(name).spawn(move || {
            while let Ok(task) = task_rx.recv() {
                if result_tx.send(process_task(task)).is_err() {
                    break;
                }
            }
        })?;

        Ok(TaskChannel {
            task_sender: Some(task_tx),
            result_receiver: result_rx,
            num_tasks_in_flight: 0,
            worker: Some(worker),
        })
    }

    /// Hands a task to the worker, giving it back if the worker is gone.
    fn send(&mut self, task: Box<dyn Task>) -> Result<(), Box<dyn Task>> {
        let Some(sender) = &self.task_sender else {
            return Err(task);
        };
        sender.send(task).map_err(|e| e.0)?;
        self.num_tasks_in_flight += 1;
        Ok(())
    }

    fn try_recv(&mut self) -> Option<Box<dyn TaskResult>> {
        let result = self.result_receiver.try_recv().ok()?;
        self.num_tasks_in_flight -= 1;
        Some(result)
    }

    fn recv_timeout(&mut self, timeout: Duration) -> Option<Box<dyn TaskResult>> {
        match self.result_receiver.recv_timeout(timeout) {
            Ok(result) => {
                self.num_tasks_in_flight -= 1;
                Some(result)
            }
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                if self.num_tasks_in_flight > 0 {
                    warn!("Worker exited with {} tasks in flight", self.num_tasks_in_flight);
                    self.num_tasks_in_flight = 0;
                }
                None
            }
        }
    }

    /// Tasks sent to this worker whose results have not been collected.
    pub fn num_tasks_in_flight(&self) -> usize {
        self.num_tasks_in_flight
    }
}

impl Drop for TaskChannel {
    fn drop(&mut self) {
        self.task_sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Worker thread panicked while shutting down");
            }
        }
    }
}

/// Distributes tasks over a pool of workers and collects their results.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task>>,
    current_channel: usize,
}

impl TaskManager {
    /// Creates a manager with `num_workers` worker threads.
    ///
    /// With `num_workers == 0` no thread is spawned and tasks run when the
    /// owner calls [`run_queued_tasks`](Self::run_queued_tasks).
    ///
    /// # Errors
    /// Returns the OS error if a worker thread cannot be spawned.
    pub fn new(num_workers: usize) -> io::Result<Self> {
        let channels = (0..num_workers)
            .map(|_| TaskChannel::spawn())
            .collect::<io::Result<Vec<_>>>()?;

        info!(
            "Started {} task workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        Ok(TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        })
    }

    /// A manager without workers.
    pub fn synchronous() -> Self {
        TaskManager {
            channels: Vec::new(),
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.channels.len()
    }

    /// Publishes a task.
    ///
    /// # Returns
    /// - `true` if the task was handed to a worker
    /// - `false` if it was queued, either because there are no workers or
    ///   because the chosen worker is gone
    pub fn publish_task(&mut self, task: Box<dyn Task>) -> bool {
        if self.channels.is_empty() {
            self.queued_tasks.push_back(task);
            return false;
        }

        let channel_idx = self.current_channel;
        self.current_channel = (channel_idx + 1) % self.channels.len();
        match self.channels[channel_idx].send(task) {
            Ok(()) => true,
            Err(task) => {
                warn!("Worker {} is gone, queueing task", channel_idx);
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Runs queued tasks on the calling thread until the queue is empty,
    /// including follow-ups they produce.
    ///
    /// # Returns
    /// The number of tasks run.
    pub fn run_queued_tasks(&mut self) -> usize {
        let mut processed = 0;
        while let Some(task) = self.queued_tasks.pop_front() {
            let follow_ups = process_task(task).handle_result();
            self.queued_tasks.extend(follow_ups);
            processed += 1;
        }
        if processed > 0 {
            debug!("Ran {} queued tasks inline", processed);
        }
        processed
    }

    /// Handles every result the workers have finished so far, without
    /// blocking. Follow-up tasks are published.
    ///
    /// # Returns
    /// The number of results handled.
    pub fn process_completed_tasks(&mut self) -> usize {
        let mut tasks_to_publish = Vec::new();
        let mut handled = 0;
        for channel in &mut self.channels {
            while let Some(result) = channel.try_recv() {
                tasks_to_publish.extend(result.handle_result());
                handled += 1;
            }
        }

        for task in tasks_to_publish {
            self.publish_task(task);
        }
        handled
    }

    /// Blocks until every published task and all of their follow-ups have
    /// been processed and handled.
    pub fn wait_until_idle(&mut self) {
        loop {
            self.run_queued_tasks();
            self.process_completed_tasks();
            if self.num_jobs() == 0 {
                return;
            }

            let mut tasks_to_publish = Vec::new();
            for channel in self.channels.iter_mut().filter(|c| c.num_tasks_in_flight > 0) {
                if let Some(result) = channel.recv_timeout(WAIT_SLICE) {
                    tasks_to_publish.extend(result.handle_result());
                }
            }
            for task in tasks_to_publish {
                self.publish_task(task);
            }
        }
    }

    /// Tasks queued or in flight.
    pub fn num_jobs(&self) -> usize {
        let in_flight: usize = self.channels.iter().map(TaskChannel::num_tasks_in_flight).sum();
        self.queued_tasks.len() + in_flight
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    struct Record {
        value: u32,
        spawn: u32,
        log: Arc<Mutex<Vec<u32>>>,
    }

    struct Recorded {
        value: u32,
        spawn: u32,
        log: Arc<Mutex<Vec<u32>>>,
    }

    impl Task for Record {
        fn process(self: Box<Self>) -> Box<dyn TaskResult> {
            Box::new(Recorded {
                value: self.value,
                spawn: self.spawn,
                log: self.log,
            })
        }
    }

    impl TaskResult for Recorded {
        fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task>> {
            self.log.lock().unwrap().push(self.value);
            (0..self.spawn)
                .map(|i| {
                    Box::new(Record {
                        value: self.value * 10 + i,
                        spawn: 0,
                        log: self.log.clone(),
                    }) as Box<dyn Task>
                })
                .collect()
        }
    }

    struct Panics;

    impl Task for Panics {
        fn process(self: Box<Self>) -> Box<dyn TaskResult> {
            panic!("boom");
        }
    }

    #[test]
    fn synchronous_manager_runs_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut manager = TaskManager::synchronous();
        for value in 1..=3 {
            assert!(!manager.publish_task(Box::new(Record {
                value,
                spawn: 0,
                log: log.clone(),
            })));
        }
        assert_eq!(manager.num_jobs(), 3);
        assert_eq!(manager.run_queued_tasks(), 3);
        assert_eq!(*log.lock().unwrap(), vec![1, 2, 3]);
        assert_eq!(manager.num_jobs(), 0);
    }

    #[test]
    fn follow_ups_are_processed() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut manager = TaskManager::new(3).unwrap();
        for value in 1..=4 {
            manager.publish_task(Box::new(Record {
                value,
                spawn: 2,
                log: log.clone(),
            }));
        }
        manager.wait_until_idle();

        let mut seen = log.lock().unwrap().clone();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4, 10, 11, 20, 21, 30, 31, 40, 41]);
        assert_eq!(manager.num_jobs(), 0);
    }

    #[test]
    fn panicking_tasks_do_not_stall_the_pool() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut manager = TaskManager::new(1).unwrap();
        manager.publish_task(Box::new(Panics));
        manager.publish_task(Box::new(Record {
            value: 7,
            spawn: 0,
            log: log.clone(),
        }));
        manager.wait_until_idle();
        assert_eq!(*log.lock().unwrap(), vec![7]);
    }
}
