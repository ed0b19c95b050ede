use crate::core::executor::{ExecutorOptions, FanOutExecutor};
use crate::domain::model::SweepRound;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use crate::utils::validation::validate_positive_number;

/// Runs the same input once per worker count in `1..=max_workers`.
pub fn run_sweep(
    options: &ExecutorOptions,
    inputs: &[i64],
    max_workers: usize,
    monitor: &SystemMonitor,
) -> Result<Vec<SweepRound>> {
    validate_positive_number("max_workers", max_workers, 1)?;

    let mut rounds = Vec::with_capacity(max_workers);
    for workers in 1..=max_workers {
        tracing::info!("Solving with {} worker(s).", workers);

        let executor = FanOutExecutor::new(options.clone().with_workers(workers))?;
        let report = executor.run(inputs)?;
        monitor.log_stats(&format!("{} worker(s)", workers));

        tracing::info!("{}", "_".repeat(20));
        rounds.push(SweepRound {
            workers,
            primes_found: report.primes.len(),
            submitted_in: report.submitted_in,
            drained_in: report.drained_in,
            elapsed: report.elapsed,
        });
    }

    Ok(rounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Backend;

    #[test]
    fn test_sweep_runs_every_worker_count() {
        let inputs: Vec<i64> = (0..300).collect();
        let options = ExecutorOptions::new(Backend::Thread, 1);
        let rounds = run_sweep(&options, &inputs, 4, &SystemMonitor::default()).unwrap();

        assert_eq!(
            rounds.iter().map(|r| r.workers).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        // 62 primes below 300
        assert!(rounds.iter().all(|r| r.primes_found == 62));
        assert!(rounds
            .iter()
            .all(|r| r.submitted_in + r.drained_in <= r.elapsed));
    }

    #[test]
    fn test_sweep_rejects_zero_max_workers() {
        let options = ExecutorOptions::new(Backend::Sequential, 1);
        assert!(run_sweep(&options, &[2, 3], 0, &SystemMonitor::default()).is_err());
    }
}
