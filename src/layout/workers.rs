//! Fixed pool of long-lived worker threads.
//!
//! Every worker owns a private start channel and a private completion channel,
//! both bounded to one message: one assignment in, one result out. The pool never
//! creates threads after construction.
use std::ops::Range;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, trace};

use crate::utils::LayoutError;

/// Work that can be split into disjoint index ranges and run on a worker.
///
/// The job is shared read-only between workers; each call only sees its own range.
pub trait RangeJob: Send + Sync + 'static {
    type Output: Send + 'static;

    fn run(&self, range: Range<usize>) -> Self::Output;
}

/// A finished assignment.
#[derive(Debug)]
pub struct Completed<T> {
    pub range: Range<usize>,
    pub output: T,
}

struct Assignment<J> {
    job: Arc<J>,
    range: Range<usize>,
}

struct Worker<J: RangeJob> {
    id: usize,
    start: Option<Sender<Assignment<J>>>,
    done: Receiver<Completed<J::Output>>,
    handle: Option<JoinHandle<()>>,
    busy: bool,
}

/// Splits `len` items into `parts` contiguous ranges. The last range takes the remainder.
///
/// # Examples
///
/// ```
/// use force_layout::layout::split_ranges;
///
/// assert_eq!(split_ranges(10, 4), vec![0..2, 2..4, 4..6, 6..10]);
/// assert_eq!(split_ranges(2, 4), vec![0..0, 0..0, 0..0, 0..2]);
/// ```
pub fn split_ranges(len: usize, parts: usize) -> Vec<Range<usize>> {
    let chunk = len / parts.max(1);
    (0..parts)
        .map(|i| {
            let start = i * chunk;
            let end = if i + 1 == parts { len } else { (i + 1) * chunk };
            start..end
        })
        .collect()
}

/// The worker pool.
///
/// # Examples
///
/// ```
/// use std::ops::Range;
/// use std::sync::Arc;
/// use force_layout::layout::{RangeJob, WorkerPool};
///
/// struct SumJob(Vec<u64>);
///
/// impl RangeJob for SumJob {
///     type Output = u64;
///     fn run(&self, range: Range<usize>) -> u64 {
///         self.0[range].iter().sum()
///     }
/// }
///
/// let mut pool = WorkerPool::new(2).expect("Failed to start workers");
/// pool.dispatch(Arc::new(SumJob((1..=10).collect())), 10).expect("worker failed");
/// let total: u64 = pool.harvest().expect("worker failed").iter().map(|c| c.output).sum();
/// assert_eq!(total, 55);
/// ```
pub struct WorkerPool<J: RangeJob> {
    workers: Vec<Worker<J>>,
}

impl<J: RangeJob> WorkerPool<J> {
    /// Starts `count` named worker threads, each blocked on its start channel.
    pub fn new(count: usize) -> Result<Self, LayoutError> {
        if count == 0 {
            return Err(LayoutError::InvalidWorkerCount);
        }
        let mut workers = Vec::with_capacity(count);
        for id in 0..count {
            let (start_tx, start_rx) = bounded::<Assignment<J>>(1);
            let (done_tx, done_rx) = bounded::<Completed<J::Output>>(1);
            let handle = thread::Builder::new()
                .name(format!("layout-worker-{}", id))
                .spawn(move || worker_loop(id, start_rx, done_tx))
                .map_err(|e| LayoutError::WorkerSpawn(e.to_string()))?;
            workers.push(Worker {
                id,
                start: Some(start_tx),
                done: done_rx,
                handle: Some(handle),
                busy: false,
            });
        }
        debug!("started {} layout workers", count);
        Ok(WorkerPool { workers })
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// True while `worker` has an assignment whose result has not been collected.
    pub fn is_busy(&self, worker: usize) -> bool {
        self.workers.get(worker).is_some_and(|w| w.busy)
    }

    /// Hands `range` of `job` to `worker` and wakes it.
    ///
    /// The caller must collect the previous result with
    /// [`WorkerPool::await_completion`] before assigning the same worker again.
    pub fn assign(&mut self, worker: usize, job: Arc<J>, range: Range<usize>) -> Result<(), LayoutError> {
        let w = self.workers.get_mut(worker).ok_or(LayoutError::WorkerDisconnected(worker))?;
        debug_assert!(!w.busy, "worker {} assigned twice", w.id);
        let start = w.start.as_ref().ok_or(LayoutError::WorkerDisconnected(w.id))?;
        trace!("worker {} assigned {:?}", w.id, range);
        start
            .send(Assignment { job, range })
            .map_err(|_| LayoutError::WorkerDisconnected(w.id))?;
        w.busy = true;
        Ok(())
    }

    /// Blocks until `worker` finishes its current assignment.
    ///
    /// Returns `Ok(None)` if the worker has nothing outstanding.
    pub fn await_completion(&mut self, worker: usize) -> Result<Option<Completed<J::Output>>, LayoutError> {
        let w = self.workers.get_mut(worker).ok_or(LayoutError::WorkerDisconnected(worker))?;
        if !w.busy {
            return Ok(None);
        }
        let completed = w.done.recv().map_err(|_| LayoutError::WorkerDisconnected(w.id))?;
        w.busy = false;
        Ok(Some(completed))
    }

    /// Splits `len` items across all workers and assigns every worker its range.
    pub fn dispatch(&mut self, job: Arc<J>, len: usize) -> Result<(), LayoutError> {
        let ranges = split_ranges(len, self.workers.len());
        for (worker, range) in ranges.into_iter().enumerate() {
            self.assign(worker, Arc::clone(&job), range)?;
        }
        Ok(())
    }

    /// Waits for every busy worker and returns their results in worker order.
    pub fn harvest(&mut self) -> Result<Vec<Completed<J::Output>>, LayoutError> {
        let mut results = Vec::with_capacity(self.workers.len());
        for worker in 0..self.workers.len() {
            if let Some(completed) = self.await_completion(worker)? {
                results.push(completed);
            }
        }
        Ok(results)
    }

    /// Releases every worker permanently and joins its thread.
    pub fn shutdown(&mut self) {
        for w in &mut self.workers {
            w.start.take();
        }
        for w in &mut self.workers {
            if let Some(handle) = w.handle.take() {
                if handle.join().is_err() {
                    debug!("worker {} panicked before shutdown", w.id);
                }
            }
            w.busy = false;
        }
    }
}

impl<J: RangeJob> Drop for WorkerPool<J> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop<J: RangeJob>(id: usize, start: Receiver<Assignment<J>>, done: Sender<Completed<J::Output>>) {
    while let Ok(Assignment { job, range }) = start.recv() {
        let output = job.run(range.clone());
        // Let go of the job before signalling so the owner can reclaim it.
        drop(job);
        if done.send(Completed { range, output }).is_err() {
            break;
        }
    }
    trace!("worker {} exiting", id);
}
