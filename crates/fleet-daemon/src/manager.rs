// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The process manager (out of scope per §1: a collaborator that
//! owns shared OS-level resources a worker hands off on shutdown).
//! Modeled here as the narrow contract `Worker::shutdown` needs.

use async_trait::async_trait;

#[async_trait]
pub trait Manager: Send + Sync + 'static {
    /// Release whatever the manager owns. Called once, at the end of
    /// `Worker::shutdown`.
    async fn shutdown(&self) -> std::io::Result<()>;
}

/// A manager with nothing to release — the default for workers that don't
/// run in local (single-process, multi-worker) mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullManager;

#[async_trait]
impl Manager for NullManager {
    async fn shutdown(&self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
