use super::collect_completed;
use crate::app::worker::{WorkRequest, WorkResponse};
use crate::domain::model::{Backend, BatchRun, CheckOutcome};
use crate::domain::ports::WorkerPool;
use crate::utils::error::{PrimeError, Result};
use crate::utils::validation::validate_positive_number;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::Mutex;
use std::thread;
use std::time::Instant;

/// 啟動 worker 子行程的命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl WorkerCommand {
    /// `<program> worker`
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: vec!["worker".to_string()],
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// The running binary re-executed as a worker.
    pub fn current_exe() -> Result<Self> {
        Ok(Self::new(std::env::current_exe()?))
    }

    fn spawn(&self) -> std::io::Result<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
    }
}

struct WorkerProcess {
    id: usize,
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    line: String,
    poisoned: bool,
}

impl WorkerProcess {
    fn spawn(id: usize, command: &WorkerCommand) -> Result<Self> {
        let mut child = command.spawn().map_err(|e| PrimeError::WorkerProcessError {
            worker: id,
            message: format!("failed to start {}: {}", command.program.display(), e),
        })?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(PrimeError::WorkerProcessError {
                    worker: id,
                    message: "worker pipes were not captured".to_string(),
                });
            }
        };

        tracing::debug!("Started worker process {} (pid {})", id, child.id());

        Ok(Self {
            id,
            child,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout),
            line: String::new(),
            poisoned: false,
        })
    }

    fn check(&mut self, request: &WorkRequest) -> Result<CheckOutcome> {
        let id = self.id;
        let io_failure = |e: std::io::Error| PrimeError::WorkerProcessError {
            worker: id,
            message: format!("pipe error on input #{}: {}", request.index, e),
        };

        let mut payload = serde_json::to_string(request)?;
        payload.push('\n');

        let stdin = self.stdin.as_mut().ok_or_else(|| PrimeError::WorkerProcessError {
            worker: id,
            message: "stdin already closed".to_string(),
        })?;
        stdin.write_all(payload.as_bytes()).map_err(io_failure)?;
        stdin.flush().map_err(io_failure)?;

        self.line.clear();
        if self.stdout.read_line(&mut self.line).map_err(io_failure)? == 0 {
            return Err(PrimeError::WorkerProcessError {
                worker: id,
                message: format!("exited before answering input #{}", request.index),
            });
        }

        let response: WorkResponse =
            serde_json::from_str(self.line.trim()).map_err(|e| PrimeError::ProtocolError {
                message: format!("worker {} sent {:?}: {}", id, self.line.trim(), e),
            })?;

        if response.index != request.index || response.value != request.value {
            return Err(PrimeError::ProtocolError {
                message: format!(
                    "worker {} answered #{} ({}) for request #{} ({})",
                    id, response.index, response.value, request.index, request.value
                ),
            });
        }

        Ok(CheckOutcome {
            index: response.index,
            value: response.value,
            is_prime: response.is_prime,
        })
    }

    /// 關閉 stdin 讓子行程讀到 EOF，然後等待結束
    fn shutdown(&mut self) -> Result<()> {
        drop(self.stdin.take());
        let status = self.child.wait()?;
        if !status.success() {
            return Err(PrimeError::WorkerProcessError {
                worker: self.id,
                message: format!("exited with {}", status),
            });
        }
        Ok(())
    }

    fn kill(&mut self) {
        drop(self.stdin.take());
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// `workers` long-lived child processes fed from one shared request queue.
///
/// A worker that fails mid-batch is killed and replaced at the start of the
/// next batch. Dropping the pool closes every child's stdin and reaps it.
pub struct ProcessPool {
    command: WorkerCommand,
    workers: Vec<Mutex<WorkerProcess>>,
}

impl ProcessPool {
    pub fn new(workers: usize, command: WorkerCommand) -> Result<Self> {
        validate_positive_number("workers", workers, 1)?;

        let mut processes = Vec::with_capacity(workers);
        for id in 0..workers {
            match WorkerProcess::spawn(id, &command) {
                Ok(process) => processes.push(Mutex::new(process)),
                Err(e) => {
                    for process in &mut processes {
                        lock_worker(process).kill();
                    }
                    return Err(e);
                }
            }
        }

        Ok(Self {
            command,
            workers: processes,
        })
    }
}

fn lock_worker(slot: &Mutex<WorkerProcess>) -> std::sync::MutexGuard<'_, WorkerProcess> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl WorkerPool for ProcessPool {
    fn backend(&self) -> Backend {
        Backend::Process
    }

    fn workers(&self) -> usize {
        self.workers.len()
    }

    fn run_batch(&self, inputs: &[i64]) -> Result<BatchRun> {
        let started = Instant::now();
        let (job_tx, job_rx) = crossbeam_channel::unbounded();
        for (index, &value) in inputs.iter().enumerate() {
            job_tx
                .send(WorkRequest { index, value })
                .map_err(|_| PrimeError::RuntimeError {
                    message: "request queue closed".to_string(),
                })?;
        }
        drop(job_tx);
        let submitted_in = started.elapsed();

        let (result_tx, result_rx) = crossbeam_channel::unbounded();

        thread::scope(|scope| {
            for slot in &self.workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                let command = &self.command;

                scope.spawn(move || {
                    let mut worker = lock_worker(slot);

                    if worker.poisoned {
                        let id = worker.id;
                        worker.kill();
                        match WorkerProcess::spawn(id, command) {
                            Ok(fresh) => *worker = fresh,
                            Err(e) => {
                                let _ = result_tx.send(Err(e));
                                return;
                            }
                        }
                    }

                    for request in job_rx.iter() {
                        let result = worker.check(&request);
                        let failed = result.is_err();
                        let _ = result_tx.send(result);
                        if failed {
                            worker.poisoned = true;
                            break;
                        }
                    }
                });
            }
        });
        drop(result_tx);

        Ok(BatchRun {
            outcomes: collect_completed(result_rx.iter(), inputs.len())?,
            submitted_in,
        })
    }
}

impl Drop for ProcessPool {
    fn drop(&mut self) {
        for slot in &self.workers {
            let mut worker = lock_worker(slot);
            if worker.poisoned {
                worker.kill();
            } else if let Err(e) = worker.shutdown() {
                tracing::warn!("Worker shutdown failed: {}", e);
            }
        }
    }
}
