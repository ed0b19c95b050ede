// Worker pool backends behind `WorkerPool`.

pub mod process_pool;
pub mod sequential;
pub mod shared_queue;
pub mod tokio_pool;

pub use process_pool::{ProcessPool, WorkerCommand};
pub use sequential::SequentialPool;
pub use shared_queue::SharedQueueThreadPool;
pub use tokio_pool::TokioPool;

use crate::domain::model::CheckOutcome;
use crate::utils::error::{PrimeError, Result};
use std::any::Any;
use std::panic;

/// Checker run by in-process pools.
pub type Checker = fn(i64) -> bool;

/// Runs one unit, turning a checker panic into `WorkerPanicked`.
pub(crate) fn check_unit(check: Checker, index: usize, value: i64) -> Result<CheckOutcome> {
    panic::catch_unwind(move || check(value))
        .map(|is_prime| CheckOutcome {
            index,
            value,
            is_prime,
        })
        .map_err(|payload| PrimeError::WorkerPanicked {
            index,
            value,
            message: panic_message(payload.as_ref()),
        })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// 收集已完成的單元：全部排空後，回報第一個錯誤
pub(crate) fn collect_completed<I>(results: I, expected: usize) -> Result<Vec<CheckOutcome>>
where
    I: IntoIterator<Item = Result<CheckOutcome>>,
{
    let mut outcomes = Vec::with_capacity(expected);
    let mut first_error = None;

    for result in results {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                tracing::debug!("Work unit failed: {}", e);
                first_error.get_or_insert(e);
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }

    if outcomes.len() != expected {
        return Err(PrimeError::RuntimeError {
            message: format!(
                "pool drained with {} of {} results",
                outcomes.len(),
                expected
            ),
        });
    }

    Ok(outcomes)
}
