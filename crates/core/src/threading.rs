//! Fixed-size worker pool for frame tasks
//!
//! The renderer parallelizes rasterization by submitting independent tasks
//! (one per screen band) and joining them before the frame is handed out.
//! The pool interface is intentionally small: `submit` and `wait_all`.
//! No priorities, no cancellation - a frame either completes all of its
//! tasks or the caller never observes it.
//!
//! Tasks must be independent: no task may block on another task's progress,
//! otherwise `wait_all` can deadlock with more tasks than workers.

use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Count of submitted-but-unfinished jobs, shared by callers and workers.
struct Pending {
    count: Mutex<usize>,
    done: Condvar,
}

/// Fixed-size worker thread pool.
///
/// Workers are spawned once at construction and live until the pool is
/// dropped. Dropping the pool closes the job channel and joins all workers.
pub struct ThreadPool {
    sender: Option<Sender<Job>>,
    workers: Vec<thread::JoinHandle<()>>,
    pending: Arc<Pending>,
}

impl ThreadPool {
    /// Spawn a pool with `workers` threads.
    ///
    /// # Panics
    ///
    /// Panics if `workers` is zero.
    pub fn new(workers: usize) -> Self {
        assert!(workers > 0, "thread pool needs at least one worker");

        let (sender, receiver) = channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));
        let pending = Arc::new(Pending {
            count: Mutex::new(0),
            done: Condvar::new(),
        });

        let mut handles = Vec::with_capacity(workers);
        for i in 0..workers {
            let receiver = Arc::clone(&receiver);
            let pending = Arc::clone(&pending);
            let handle = thread::Builder::new()
                .name(format!("raster-worker-{}", i))
                .spawn(move || loop {
                    // Holding the receiver lock only while picking up a job
                    let job = match receiver.lock().unwrap().recv() {
                        Ok(job) => job,
                        Err(_) => break, // channel closed, pool is shutting down
                    };
                    job();
                    let mut count = pending.count.lock().unwrap();
                    *count -= 1;
                    if *count == 0 {
                        pending.done.notify_all();
                    }
                })
                .expect("spawn worker thread");
            handles.push(handle);
        }

        Self {
            sender: Some(sender),
            workers: handles,
            pending,
        }
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    /// Submit a task for execution on some worker.
    pub fn submit<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut count = self.pending.count.lock().unwrap();
            *count += 1;
        }
        self.sender
            .as_ref()
            .expect("pool is shutting down")
            .send(Box::new(task))
            .expect("worker channel closed");
    }

    /// Block until every submitted task has finished.
    pub fn wait_all(&self) {
        let mut count = self.pending.count.lock().unwrap();
        while *count > 0 {
            count = self.pending.done.wait(count).unwrap();
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        // Closing the channel makes every worker's recv fail and exit
        self.sender.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}
