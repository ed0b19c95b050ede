use super::{check_unit, collect_completed, Checker};
use crate::core::primality::is_prime;
use crate::domain::model::{Backend, BatchRun};
use crate::domain::ports::WorkerPool;
use crate::utils::error::{PrimeError, Result};
use crate::utils::validation::validate_positive_number;
use std::time::Instant;
use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinSet;

/// One tokio task per input on a runtime with `workers` worker threads.
///
/// Results come back through `JoinSet::join_next`, first done first returned.
/// `run_batch` blocks the caller and must not be called from inside another
/// tokio runtime.
pub struct TokioPool {
    runtime: Runtime,
    workers: usize,
    check: Checker,
}

impl TokioPool {
    pub fn new(workers: usize) -> Result<Self> {
        Self::with_checker(workers, is_prime)
    }

    pub fn with_checker(workers: usize, check: Checker) -> Result<Self> {
        validate_positive_number("workers", workers, 1)?;

        let runtime = Builder::new_multi_thread()
            .worker_threads(workers)
            .thread_name("prime-tokio")
            .build()?;

        Ok(Self {
            runtime,
            workers,
            check,
        })
    }
}

impl WorkerPool for TokioPool {
    fn backend(&self) -> Backend {
        Backend::Tokio
    }

    fn workers(&self) -> usize {
        self.workers
    }

    fn run_batch(&self, inputs: &[i64]) -> Result<BatchRun> {
        let check = self.check;
        let started = Instant::now();
        let (results, submitted_in) = self.runtime.block_on(async move {
            let mut set = JoinSet::new();
            for (index, &value) in inputs.iter().enumerate() {
                set.spawn(async move { check_unit(check, index, value) });
            }
            let submitted_in = started.elapsed();

            let mut results = Vec::with_capacity(inputs.len());
            while let Some(joined) = set.join_next().await {
                results.push(joined.unwrap_or_else(|e| {
                    Err(PrimeError::RuntimeError {
                        message: format!("task failed to complete: {}", e),
                    })
                }));
            }
            (results, submitted_in)
        });

        Ok(BatchRun {
            outcomes: collect_completed(results, inputs.len())?,
            submitted_in,
        })
    }
}
