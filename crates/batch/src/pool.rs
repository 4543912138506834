//! Fixed-size worker pool with a shared FIFO queue.
//!
//! Workers block on a condition variable until a task arrives or the pool
//! shuts down. Dropping the pool drains the queue: workers only exit once it
//! is empty, and every worker is joined.

use std::any::Any;
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};
use thiserror::Error;
use tracing::{debug, warn};

/// Pool size used when the platform cannot report its parallelism.
pub const FALLBACK_POOL_SIZE: usize = 4;

type Task = Box<dyn FnOnce() + Send + 'static>;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Task panicked: {0}")]
    Panicked(String),

    #[error("Task was dropped before completing")]
    Disconnected,
}

struct Queue {
    tasks: VecDeque<Task>,
    shutdown: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    available: Condvar,
}

/// Number of hardware threads, or [`FALLBACK_POOL_SIZE`].
pub fn default_pool_size() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(FALLBACK_POOL_SIZE)
}

pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Start `size` workers (at least one).
    pub fn new(size: usize) -> Result<Self, PoolError> {
        let size = size.max(1);
        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                tasks: VecDeque::new(),
                shutdown: false,
            }),
            available: Condvar::new(),
        });

        let mut pool = Self {
            shared,
            workers: Vec::with_capacity(size),
        };
        for index in 0..size {
            let shared = Arc::clone(&pool.shared);
            // On error the partially built pool is dropped, which joins the
            // workers started so far.
            let handle = thread::Builder::new()
                .name(format!("render-worker-{}", index))
                .spawn(move || worker_loop(shared))?;
            pool.workers.push(handle);
        }

        debug!(workers = size, "Worker pool started");
        Ok(pool)
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queue a task. The returned handle yields its result.
    pub fn submit<F, T>(&self, f: F) -> TaskHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(1);
        let task: Task = Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(f));
            // The handle may have been dropped; nobody is waiting then.
            let _ = tx.send(outcome);
        });

        self.shared.queue.lock().tasks.push_back(task);
        self.shared.available.notify_one();
        TaskHandle { rx }
    }

    /// Wait for every queued task and stop the workers.
    pub fn join(self) {
        drop(self);
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shared.queue.lock().shutdown = true;
        self.shared.available.notify_all();

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("Worker thread exited abnormally");
            }
        }
    }
}

fn worker_loop(shared: Arc<Shared>) {
    loop {
        let task = {
            let mut queue = shared.queue.lock();
            loop {
                if let Some(task) = queue.tasks.pop_front() {
                    break Some(task);
                }
                if queue.shutdown {
                    break None;
                }
                shared.available.wait(&mut queue);
            }
        };

        match task {
            Some(task) => task(),
            None => return,
        }
    }
}

/// Completion handle for a submitted task.
pub struct TaskHandle<T> {
    rx: mpsc::Receiver<thread::Result<T>>,
}

impl<T> TaskHandle<T> {
    /// Block until the task finishes.
    pub fn join(self) -> Result<T, PoolError> {
        match self.rx.recv() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(payload)) => Err(PoolError::Panicked(panic_message(payload.as_ref()))),
            Err(_) => Err(PoolError::Disconnected),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
