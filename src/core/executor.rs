use crate::app::pools::{ProcessPool, SequentialPool, SharedQueueThreadPool, TokioPool, WorkerCommand};
use crate::domain::model::{Backend, BatchReport};
use crate::domain::ports::{ConfigProvider, WorkerPool};
use crate::utils::error::Result;
use crate::utils::monitor::available_cores;
use crate::utils::validation::{validate_path, validate_range, Validate};
use std::time::Instant;

/// 單一批次允許的最大 worker 數
pub const MAX_WORKERS: usize = 1024;

#[derive(Debug, Clone)]
pub struct ExecutorOptions {
    pub workers: usize,
    pub backend: Backend,
    /// Return primes in input order instead of completion order.
    pub preserve_input_order: bool,
    /// Process backend only; defaults to the running binary.
    pub worker_command: Option<WorkerCommand>,
}

impl ExecutorOptions {
    pub fn new(backend: Backend, workers: usize) -> Self {
        Self {
            workers,
            backend,
            preserve_input_order: false,
            worker_command: None,
        }
    }

    /// Backend, worker count and ordering from any configuration source.
    pub fn from_config(config: &impl ConfigProvider) -> Self {
        Self::new(config.backend(), config.max_workers())
            .with_input_order(config.preserve_input_order())
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_input_order(mut self, preserve: bool) -> Self {
        self.preserve_input_order = preserve;
        self
    }

    pub fn with_worker_command(mut self, command: WorkerCommand) -> Self {
        self.worker_command = Some(command);
        self
    }
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self::new(Backend::default(), available_cores())
    }
}

impl Validate for ExecutorOptions {
    fn validate(&self) -> Result<()> {
        validate_range("workers", self.workers, 1, MAX_WORKERS)?;
        if let Some(command) = &self.worker_command {
            validate_path("worker_command.program", &command.program.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Applies the primality check to every input through a bounded worker pool.
pub struct FanOutExecutor {
    options: ExecutorOptions,
}

impl FanOutExecutor {
    pub fn new(options: ExecutorOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn build_pool(&self) -> Result<Box<dyn WorkerPool>> {
        let workers = self.options.workers;
        let pool: Box<dyn WorkerPool> = match self.options.backend {
            Backend::Sequential => Box::new(SequentialPool::new()),
            Backend::Thread => Box::new(SharedQueueThreadPool::new(workers)?),
            Backend::Tokio => Box::new(TokioPool::new(workers)?),
            Backend::Process => {
                let command = match &self.options.worker_command {
                    Some(command) => command.clone(),
                    None => WorkerCommand::current_exe()?,
                };
                Box::new(ProcessPool::new(workers, command)?)
            }
        };
        Ok(pool)
    }

    /// Builds a pool, runs one batch and releases the pool on every exit path.
    pub fn run(&self, inputs: &[i64]) -> Result<BatchReport> {
        let started = Instant::now();
        let pool = self.build_pool()?;
        tracing::info!(
            "🚀 Started {} pool with {} worker(s) in {:.2?}",
            pool.backend(),
            pool.workers(),
            started.elapsed()
        );

        let result = self.run_with_pool(pool.as_ref(), inputs);

        let released = Instant::now();
        drop(pool);
        tracing::debug!("Pool released in {:.2?}", released.elapsed());

        result.map(|mut report| {
            report.elapsed = started.elapsed();
            report
        })
    }

    /// Runs one batch on a caller-owned pool.
    pub fn run_with_pool(&self, pool: &dyn WorkerPool, inputs: &[i64]) -> Result<BatchReport> {
        let started = Instant::now();
        tracing::debug!("Submitting {} input(s) to {} pool", inputs.len(), pool.backend());

        let run = pool.run_batch(inputs)?;
        let submitted_in = run.submitted_in;
        let drained_in = started.elapsed().saturating_sub(submitted_in);
        tracing::debug!("All {} input(s) submitted in {:.2?}", inputs.len(), submitted_in);

        let mut outcomes = run.outcomes;
        if self.options.preserve_input_order {
            outcomes.sort_unstable_by_key(|o| o.index);
        }

        let primes: Vec<i64> = outcomes
            .iter()
            .filter(|o| o.is_prime)
            .map(|o| o.value)
            .collect();
        let elapsed = started.elapsed();

        tracing::info!(
            "✅ Drained {} pool: {} of {} input(s) prime, drained in {:.2?}, took {:.2?}",
            pool.backend(),
            primes.len(),
            inputs.len(),
            drained_in,
            elapsed
        );

        Ok(BatchReport {
            backend: pool.backend(),
            workers: pool.workers(),
            checked: outcomes.len(),
            primes,
            submitted_in,
            drained_in,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::primality::is_prime;
    use crate::utils::error::PrimeError;
    use std::time::Duration;

    #[test]
    fn test_invalid_worker_counts_are_rejected() {
        for workers in [0, MAX_WORKERS + 1] {
            let options = ExecutorOptions::new(Backend::Thread, workers);
            assert!(matches!(
                FanOutExecutor::new(options),
                Err(PrimeError::InvalidConfigValueError { .. })
            ));
        }
    }

    #[test]
    fn test_preserve_input_order_filters_in_place() {
        let inputs: Vec<i64> = (1..500).rev().collect();
        let options = ExecutorOptions::new(Backend::Thread, 4).with_input_order(true);
        let report = FanOutExecutor::new(options).unwrap().run(&inputs).unwrap();

        let expected: Vec<i64> = inputs.iter().copied().filter(|&x| is_prime(x)).collect();
        assert_eq!(report.primes, expected);
        assert_eq!(report.checked, inputs.len());
        assert_eq!(report.workers, 4);
    }

    #[test]
    fn test_run_with_caller_owned_pool() {
        let pool = SequentialPool::new();
        let executor = FanOutExecutor::new(ExecutorOptions::new(Backend::Sequential, 1)).unwrap();
        let report = executor.run_with_pool(&pool, &[4, 5, 6, 7]).unwrap();
        assert_eq!(report.primes, vec![5, 7]);
        assert_eq!(report.backend, Backend::Sequential);
    }

    #[test]
    fn test_report_splits_submit_and_drain_time() {
        let inputs: Vec<i64> = (1_000_000..1_002_000).collect();
        let executor = FanOutExecutor::new(ExecutorOptions::new(Backend::Tokio, 2)).unwrap();
        let report = executor.run(&inputs).unwrap();

        assert!(report.submitted_in + report.drained_in <= report.elapsed);
        assert!(report.drained_in > Duration::ZERO);
    }

    #[test]
    fn test_options_from_config_provider() {
        struct Fixed;
        impl ConfigProvider for Fixed {
            fn start(&self) -> i64 {
                0
            }
            fn count(&self) -> usize {
                10
            }
            fn max_workers(&self) -> usize {
                3
            }
            fn backend(&self) -> Backend {
                Backend::Process
            }
            fn preserve_input_order(&self) -> bool {
                true
            }
        }

        let options = ExecutorOptions::from_config(&Fixed);
        assert_eq!(options.backend, Backend::Process);
        assert_eq!(options.workers, 3);
        assert!(options.preserve_input_order);
        assert!(options.worker_command.is_none());
    }

    #[test]
    fn test_default_options_use_all_cores() {
        let options = ExecutorOptions::default();
        assert_eq!(options.backend, Backend::Thread);
        assert!(options.workers >= 1);
        assert!(!options.preserve_input_order);
    }
}
