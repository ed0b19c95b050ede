use crate::utils::error::{PrimeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// 參考腳本的預設輸入：[10^13, 10^13 + 10^4)
pub const DEFAULT_START: i64 = 10_000_000_000_000;
pub const DEFAULT_COUNT: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Sequential,
    #[default]
    Thread,
    Tokio,
    Process,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Sequential => "sequential",
            Backend::Thread => "thread",
            Backend::Tokio => "tokio",
            Backend::Process => "process",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = PrimeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(Backend::Sequential),
            "thread" => Ok(Backend::Thread),
            "tokio" => Ok(Backend::Tokio),
            "process" => Ok(Backend::Process),
            other => Err(PrimeError::InvalidConfigValueError {
                field: "backend".to_string(),
                value: other.to_string(),
                reason: "Valid backends: sequential, thread, tokio, process".to_string(),
            }),
        }
    }
}

/// 連續輸入區間 [start, start + count)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRange {
    pub start: i64,
    pub count: usize,
}

impl InputRange {
    pub fn new(start: i64, count: usize) -> Self {
        Self { start, count }
    }

    /// Exclusive end; fails when `start + count` does not fit in an `i64`.
    pub fn end(&self) -> Result<i64> {
        i64::try_from(self.count)
            .ok()
            .and_then(|count| self.start.checked_add(count))
            .ok_or_else(|| self.overflow())
    }

    pub fn values(&self) -> Result<Vec<i64>> {
        Ok((self.start..self.end()?).collect())
    }

    fn overflow(&self) -> PrimeError {
        PrimeError::InvalidConfigValueError {
            field: "range.count".to_string(),
            value: self.count.to_string(),
            reason: format!("start {} + count overflows a 64-bit integer", self.start),
        }
    }
}

impl Default for InputRange {
    fn default() -> Self {
        Self::new(DEFAULT_START, DEFAULT_COUNT)
    }
}

/// 單一工作單元的結果，附帶提交時的索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub index: usize,
    pub value: i64,
    pub is_prime: bool,
}

/// 一個批次的原始結果，依完成順序
#[derive(Debug, Clone, Default)]
pub struct BatchRun {
    pub outcomes: Vec<CheckOutcome>,
    /// Time spent handing every unit to the pool.
    pub submitted_in: Duration,
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub backend: Backend,
    pub workers: usize,
    pub checked: usize,
    pub primes: Vec<i64>,
    pub submitted_in: Duration,
    pub drained_in: Duration,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct SweepRound {
    pub workers: usize,
    pub primes_found: usize,
    pub submitted_in: Duration,
    pub drained_in: Duration,
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("Process".parse::<Backend>().unwrap(), Backend::Process);
        assert_eq!(" tokio ".parse::<Backend>().unwrap(), Backend::Tokio);
        assert!("fibers".parse::<Backend>().is_err());
    }

    #[test]
    fn test_input_range_values() {
        let range = InputRange::new(10, 5);
        assert_eq!(range.values().unwrap(), vec![10, 11, 12, 13, 14]);
        assert!(InputRange::new(0, 0).values().unwrap().is_empty());
    }

    #[test]
    fn test_input_range_overflow_is_config_error() {
        let range = InputRange::new(i64::MAX - 1, 5);
        let err = range.values().unwrap_err();
        assert!(matches!(err, PrimeError::InvalidConfigValueError { .. }));
    }
}
