// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{DaemonError, Result};

/// Fixed heartbeat cadence from §6; overridable for tests.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);

/// Resolve the global working directory: `FLEET_WORKING_DIR` > `HOME`/.local/state/fleet.
pub fn working_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("FLEET_WORKING_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").map_err(|_| DaemonError::NoWorkingDir)?;
    Ok(PathBuf::from(home).join(".local/state/fleet"))
}

/// Heartbeat interval override, in milliseconds (`FLEET_HEARTBEAT_INTERVAL_MS`).
pub fn heartbeat_interval() -> Duration {
    std::env::var("FLEET_HEARTBEAT_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_HEARTBEAT_INTERVAL)
}

/// Counter client sync interval override, in milliseconds
/// (`FLEET_COUNTER_SYNC_INTERVAL_MS`). Not fixed; defaults to a
/// fraction of the heartbeat cadence so counters settle faster than fleet
/// membership does.
pub fn counter_sync_interval() -> Duration {
    std::env::var("FLEET_COUNTER_SYNC_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
