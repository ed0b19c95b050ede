use super::{check_unit, collect_completed, Checker};
use crate::core::primality::is_prime;
use crate::domain::model::{Backend, BatchRun};
use crate::domain::ports::WorkerPool;
use crate::utils::error::Result;

/// 不開執行緒，在呼叫端依序檢查
pub struct SequentialPool {
    check: Checker,
}

impl SequentialPool {
    pub fn new() -> Self {
        Self::with_checker(is_prime)
    }

    pub fn with_checker(check: Checker) -> Self {
        Self { check }
    }
}

impl Default for SequentialPool {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerPool for SequentialPool {
    fn backend(&self) -> Backend {
        Backend::Sequential
    }

    fn workers(&self) -> usize {
        1
    }

    // 沒有提交階段，submitted_in 為 0
    fn run_batch(&self, inputs: &[i64]) -> Result<BatchRun> {
        let results = inputs
            .iter()
            .enumerate()
            .map(|(index, &value)| check_unit(self.check, index, value));
        Ok(BatchRun {
            outcomes: collect_completed(results, inputs.len())?,
            ..Default::default()
        })
    }
}
