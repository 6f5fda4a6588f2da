// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job record (C2, §3): a per-job runtime handle — name, dir, executor,
//! timer, thread-of-control.

use std::path::PathBuf;
use std::sync::Arc;

use fleet_core::{Clock, Stopwatch, SystemClock};
use tokio::task::JoinHandle;

use crate::executor::Executor;

/// Runtime state of one running job. Created in `prepare`, the runner is
/// started in `run_job`, and `clear_job` joins the runner, reads the
/// elapsed time once, and drops this record — returning working-dir
/// ownership to the worker.
pub struct JobRecord<C: Clock = SystemClock> {
    pub job_name: String,
    pub working_dir: PathBuf,
    pub executor: Arc<dyn Executor>,
    runner: Option<JoinHandle<Result<(), String>>>,
    clock: Option<Stopwatch<C>>,
}

impl<C: Clock> JobRecord<C> {
    pub fn new(job_name: String, working_dir: PathBuf, executor: Arc<dyn Executor>) -> Self {
        Self { job_name, working_dir, executor, runner: None, clock: None }
    }

    /// Start the runner and the clock. A second call while a runner is
    /// already running is a no-op (§8 property 2: at most one runner per
    /// name).
    pub fn start(&mut self, clock: C) -> bool {
        if self.runner.is_some() {
            return false;
        }
        let executor = self.executor.clone();
        let working_dir = self.working_dir.clone();
        self.runner = Some(tokio::spawn(async move { executor.run(working_dir).await }));
        self.clock = Some(Stopwatch::start(clock));
        true
    }

    pub fn is_running(&self) -> bool {
        self.runner.is_some()
    }

    /// Signal the executor to stop accepting new work. Advisory only —
    /// does not join the runner (§5 "Cancellation & timeouts").
    pub async fn stop(&self) {
        self.executor.stop().await;
    }

    /// Join the runner and read the elapsed time once. Consumes `self`.
    pub async fn clear(mut self) -> f64 {
        if let Some(runner) = self.runner.take() {
            if let Err(e) = runner.await {
                tracing::warn!(job = %self.job_name, error = %e, "job runner task panicked");
            }
        }
        self.clock.as_ref().map(Stopwatch::elapsed_secs).unwrap_or(0.0)
    }
}

#[cfg(test)]
#[path = "job_record_tests.rs"]
mod tests;
