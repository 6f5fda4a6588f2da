// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker context (C1, §3): addresses, fleet-view, working dirs — the
//! shared reference every executor and RPC handler reads from.

use std::path::PathBuf;
use std::sync::Arc;

use fleet_core::{Address, FleetView};

use crate::counter::CounterClient;
use crate::manager::Manager;

/// Shared state passed by reference to every JobRecord's executor.
/// Mutations (fleet view updates) are published by whole-sequence
/// replacement (§9) so readers never observe a torn view.
///
/// Carries the C6 counter client so a running job's code can record
/// metrics without threading a separate handle through the executor
/// factory (§2: "each executing job's code calls C6 to record metrics").
pub struct WorkerContext {
    pub addr: Address,
    pub ip: String,
    pub master_addr: Address,
    pub working_dir: PathBuf,
    pub fleet: FleetView,
    pub is_local_mode: bool,
    pub manager: Arc<dyn Manager>,
    pub counters: Arc<CounterClient>,
}

impl WorkerContext {
    pub fn new(
        addr: Address,
        ip: String,
        master_addr: Address,
        working_dir: PathBuf,
        is_local_mode: bool,
        manager: Arc<dyn Manager>,
        counters: Arc<CounterClient>,
    ) -> Self {
        Self { addr, ip, master_addr, working_dir, fleet: FleetView::default(), is_local_mode, manager, counters }
    }

    /// The shard id for the current epoch: the index of the local IP
    /// within the fleet-view IP sequence.
    pub fn job_offset(&self) -> fleet_core::Result<usize> {
        self.fleet.local_offset(&self.ip)
    }

    /// Filesystem-safe key for this worker's addr, used for on-disk
    /// layout under `<global_working_dir>/worker/<addr_key>/`.
    pub fn addr_key(&self) -> String {
        self.addr.fs_key()
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
