pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{RunSettings, TomlConfig};

pub use crate::app::pools::{ProcessPool, SequentialPool, SharedQueueThreadPool, TokioPool, WorkerCommand};
pub use crate::core::executor::{ExecutorOptions, FanOutExecutor};
pub use crate::core::primality::is_prime;
pub use crate::domain::model::{Backend, BatchReport, BatchRun, CheckOutcome, InputRange};
pub use crate::utils::error::{PrimeError, Result};
