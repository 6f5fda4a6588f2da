// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The fleet view: the worker roster as last reported by the master.
//!
//! Addresses and IPs are index-aligned parallel sequences (§3 invariant).
//! Published via whole-sequence replacement so readers never observe a
//! torn view (§5, §9).

use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Roster {
    addrs: Vec<String>,
    ips: Vec<String>,
}

/// Shared, atomically-replaceable fleet roster.
///
/// Cheap to clone: internally an `Arc<RwLock<Roster>>`, so every clone
/// observes the same underlying view.
#[derive(Clone, Default)]
pub struct FleetView {
    inner: Arc<RwLock<Roster>>,
}

impl FleetView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole addrs/ips pair atomically. Called only by the
    /// heartbeat loop.
    pub fn replace(&self, addrs: Vec<String>, ips: Vec<String>) -> Result<()> {
        if addrs.len() != ips.len() {
            return Err(CoreError::FleetViewMismatch { addrs: addrs.len(), ips: ips.len() });
        }
        *self.inner.write() = Roster { addrs, ips };
        Ok(())
    }

    pub fn addrs(&self) -> Vec<String> {
        self.inner.read().addrs.clone()
    }

    pub fn ips(&self) -> Vec<String> {
        self.inner.read().ips.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().addrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The job offset: index of `local_ip` in the IP sequence. This is the
    /// stable shard id for the current epoch (§3, §4.1 step 4).
    pub fn local_offset(&self, local_ip: &str) -> Result<usize> {
        self.inner
            .read()
            .ips
            .iter()
            .position(|ip| ip == local_ip)
            .ok_or_else(|| CoreError::LocalIpNotInFleetView(local_ip.to_string()))
    }
}

#[cfg(test)]
#[path = "fleet_view_tests.rs"]
mod tests;
