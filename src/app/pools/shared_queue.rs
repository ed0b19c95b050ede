use super::{check_unit, collect_completed, Checker};
use crate::core::primality::is_prime;
use crate::domain::model::{Backend, BatchRun};
use crate::domain::ports::WorkerPool;
use crate::utils::error::{PrimeError, Result};
use crate::utils::validation::validate_positive_number;
use crossbeam_channel::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// `workers` OS threads pulling jobs from one shared queue.
///
/// Dropping the pool closes the queue and joins every thread, so jobs already
/// queued still run to completion.
pub struct SharedQueueThreadPool {
    sender: Option<Sender<Job>>,
    handles: Vec<JoinHandle<()>>,
    check: Checker,
}

impl SharedQueueThreadPool {
    pub fn new(workers: usize) -> Result<Self> {
        Self::with_checker(workers, is_prime)
    }

    pub fn with_checker(workers: usize, check: Checker) -> Result<Self> {
        validate_positive_number("workers", workers, 1)?;

        let (sender, receiver) = crossbeam_channel::unbounded::<Job>();
        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let receiver = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("prime-worker-{}", id))
                .spawn(move || run_worker(id, receiver))?;
            handles.push(handle);
        }

        tracing::debug!("Spawned {} pool threads", workers);

        Ok(Self {
            sender: Some(sender),
            handles,
            check,
        })
    }

    pub fn spawn<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or_else(|| PrimeError::RuntimeError {
            message: "thread pool is shut down".to_string(),
        })?;
        sender
            .send(Box::new(job))
            .map_err(|_| PrimeError::RuntimeError {
                message: "all pool threads have exited".to_string(),
            })
    }
}

fn run_worker(id: usize, receiver: Receiver<Job>) {
    // 每個 job 自己攔截 panic，執行緒不會因此結束
    for job in receiver.iter() {
        job();
    }
    tracing::trace!("Pool thread {} exiting", id);
}

impl WorkerPool for SharedQueueThreadPool {
    fn backend(&self) -> Backend {
        Backend::Thread
    }

    fn workers(&self) -> usize {
        self.handles.len()
    }

    fn run_batch(&self, inputs: &[i64]) -> Result<BatchRun> {
        let started = Instant::now();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();

        for (index, &value) in inputs.iter().enumerate() {
            let result_tx = result_tx.clone();
            let check = self.check;
            self.spawn(move || {
                let _ = result_tx.send(check_unit(check, index, value));
            })?;
        }
        drop(result_tx);
        let submitted_in = started.elapsed();

        let outcomes = collect_completed(result_rx.iter(), inputs.len())?;
        Ok(BatchRun {
            outcomes,
            submitted_in,
        })
    }
}

impl Drop for SharedQueueThreadPool {
    fn drop(&mut self) {
        drop(self.sender.take());
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("A pool thread panicked during shutdown");
            }
        }
    }
}
