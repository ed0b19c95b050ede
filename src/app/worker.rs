//! Child side of the process pool.
//!
//! Requests and responses are newline-delimited JSON objects; one response is
//! written and flushed per request until the reader hits EOF.

use crate::core::primality::is_prime;
use crate::utils::error::{PrimeError, Result};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRequest {
    pub index: usize,
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkResponse {
    pub index: usize,
    pub value: i64,
    pub is_prime: bool,
}

/// Serves requests from `reader` until EOF. Returns how many were answered.
pub fn serve_worker<R: BufRead, W: Write>(reader: R, mut writer: W) -> Result<usize> {
    let mut served = 0;

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let request: WorkRequest =
            serde_json::from_str(&line).map_err(|e| PrimeError::ProtocolError {
                message: format!("malformed request {:?}: {}", line, e),
            })?;

        let response = WorkResponse {
            index: request.index,
            value: request.value,
            is_prime: is_prime(request.value),
        };

        serde_json::to_writer(&mut writer, &response)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        served += 1;
    }

    tracing::debug!("Worker served {} request(s)", served);
    Ok(served)
}
