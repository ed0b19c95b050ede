use crate::domain::model::{Backend, BatchRun};
use crate::utils::error::Result;

pub trait ConfigProvider: Send + Sync {
    fn start(&self) -> i64;
    fn count(&self) -> usize;
    fn max_workers(&self) -> usize;
    fn backend(&self) -> Backend;
    fn preserve_input_order(&self) -> bool;
}

/// A bounded set of workers that checks a batch of inputs.
///
/// `run_batch` returns one outcome per input in completion order and only
/// returns after every submitted unit has finished. The first failed unit
/// fails the whole batch; the pool stays usable for the next one.
pub trait WorkerPool: Send + Sync {
    fn backend(&self) -> Backend;
    fn workers(&self) -> usize;
    fn run_batch(&self, inputs: &[i64]) -> Result<BatchRun>;
}
