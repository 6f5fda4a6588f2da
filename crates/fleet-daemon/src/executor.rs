// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The inner job executor (out of scope per §1: the `Job` type
//! that actually runs user code). A `Worker` holds one per running job and
//! drives it through this contract only; it never inspects what's inside.

use async_trait::async_trait;
use std::path::PathBuf;

/// An opaque unit of running work, addressed by the job's working directory.
#[async_trait]
pub trait Executor: Send + Sync + 'static {
    /// Run to completion (or until stopped), writing any output under
    /// `working_dir`. Errors propagate to the caller, which packs them via
    /// the zip handler.
    async fn run(&self, working_dir: PathBuf) -> Result<(), String>;

    /// Request cooperative termination of an in-progress run.
    async fn stop(&self);

    /// Terminate unconditionally, releasing whatever the executor holds.
    /// Called once per running job during `Worker::shutdown` (§4.1 step 2).
    async fn shutdown(&self) {
        self.stop().await;
    }

    /// Notify the executor that a peer node joined the fleet.
    async fn add_node(&self, addr: &str) {
        let _ = addr;
    }

    /// Notify the executor that a peer node left the fleet.
    async fn remove_node(&self, addr: &str) {
        let _ = addr;
    }
}

/// An executor that completes immediately without doing anything — used by
/// tests that only care about worker lifecycle bookkeeping.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullExecutor;

#[async_trait]
impl Executor for NullExecutor {
    async fn run(&self, _working_dir: PathBuf) -> Result<(), String> {
        Ok(())
    }

    async fn stop(&self) {}
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
