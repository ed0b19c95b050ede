//! Legacy fire-and-forget demonstration.
//!
//! One unmanaged OS thread per input, never joined. The caller gets no result
//! and no completion guarantee: if the process exits first, reports are lost.
//! Use `FanOutExecutor` for anything that needs the answers.

use crate::core::primality::is_prime;
use crate::utils::error::Result;
use std::sync::Arc;
use std::thread;

/// Spawns a detached thread per input; each hands its own verdict to
/// `reporter`. Returns the number of threads spawned.
pub fn spawn_detached<F>(inputs: &[i64], reporter: F) -> Result<usize>
where
    F: Fn(i64, bool) + Send + Sync + 'static,
{
    let reporter = Arc::new(reporter);

    for &value in inputs {
        let reporter = Arc::clone(&reporter);
        // JoinHandle 直接丟棄
        thread::Builder::new()
            .name(format!("detached-{}", value))
            .spawn(move || reporter(value, is_prime(value)))?;
    }

    tracing::debug!("Spawned {} detached thread(s)", inputs.len());
    Ok(inputs.len())
}
