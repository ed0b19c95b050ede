pub mod detached;
pub mod executor;
pub mod primality;
pub mod sweep;

pub use crate::domain::model::{Backend, BatchReport, BatchRun, CheckOutcome, SweepRound};
pub use crate::domain::ports::{ConfigProvider, WorkerPool};
pub use crate::utils::error::Result;
