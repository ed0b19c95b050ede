use prime_pool::{Backend, ExecutorOptions, FanOutExecutor, PrimeError};
use std::collections::BTreeSet;

const IN_PROCESS: [Backend; 3] = [Backend::Sequential, Backend::Thread, Backend::Tokio];

fn run(backend: Backend, workers: usize, inputs: &[i64]) -> Vec<i64> {
    let options = ExecutorOptions::new(backend, workers);
    FanOutExecutor::new(options)
        .unwrap()
        .run(inputs)
        .unwrap()
        .primes
}

fn as_set(values: &[i64]) -> BTreeSet<i64> {
    values.iter().copied().collect()
}

#[test]
fn test_empty_input_returns_empty_for_every_worker_count() {
    for backend in IN_PROCESS {
        for workers in [1, 2, 8] {
            assert!(run(backend, workers, &[]).is_empty(), "{} x{}", backend, workers);
        }
    }
}

#[test]
fn test_reference_inputs_with_four_workers() {
    let inputs = [2, 193, 323, 1327, 433_785_907];
    let expected = as_set(&[2, 193, 1327, 433_785_907]);

    for backend in IN_PROCESS {
        assert_eq!(as_set(&run(backend, 4, &inputs)), expected, "{}", backend);
    }
}

#[test]
fn test_repeated_runs_find_the_same_primes() {
    let inputs: Vec<i64> = (10_000_000_000_000..10_000_000_000_200).collect();
    let first = as_set(&run(Backend::Thread, 4, &inputs));
    let second = as_set(&run(Backend::Thread, 4, &inputs));

    assert_eq!(first, second);
    assert_eq!(
        first,
        as_set(&[
            10_000_000_000_037,
            10_000_000_000_051,
            10_000_000_000_099,
            10_000_000_000_129,
            10_000_000_000_183,
        ])
    );
}

#[test]
fn test_worker_count_never_changes_the_result() {
    let inputs: Vec<i64> = (-50..5_000).collect();
    let baseline = as_set(&run(Backend::Sequential, 1, &inputs));

    for backend in [Backend::Thread, Backend::Tokio] {
        for workers in 1..=6 {
            assert_eq!(
                as_set(&run(backend, workers, &inputs)),
                baseline,
                "{} x{}",
                backend,
                workers
            );
        }
    }
}

#[test]
fn test_ordered_output_matches_sequential_order() {
    let inputs: Vec<i64> = vec![1327, 4, 2, 433_785_907, 323, 193, 193];
    let sequential = run(Backend::Sequential, 1, &inputs);
    assert_eq!(sequential, vec![1327, 2, 433_785_907, 193, 193]);

    for backend in [Backend::Thread, Backend::Tokio] {
        let options = ExecutorOptions::new(backend, 3).with_input_order(true);
        let report = FanOutExecutor::new(options).unwrap().run(&inputs).unwrap();
        assert_eq!(report.primes, sequential, "{}", backend);
    }
}

#[test]
fn test_zero_workers_is_a_configuration_error() {
    let err = FanOutExecutor::new(ExecutorOptions::new(Backend::Tokio, 0))
        .err()
        .unwrap();
    assert!(matches!(err, PrimeError::InvalidConfigValueError { .. }));
}
