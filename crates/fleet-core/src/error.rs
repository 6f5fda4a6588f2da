// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error type for the fleet-core crate.

use thiserror::Error;

/// Errors surfaced by core domain operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid address `{0}`: expected host:port")]
    InvalidAddress(String),

    #[error("fleet view addrs/ips length mismatch: {addrs} addrs, {ips} ips")]
    FleetViewMismatch { addrs: usize, ips: usize },

    #[error("local ip `{0}` not present in fleet view")]
    LocalIpNotInFleetView(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
