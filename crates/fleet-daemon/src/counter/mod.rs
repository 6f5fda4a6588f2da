// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The distributed counter subsystem: C5 [`CounterServer`] holds the
//! process-wide authoritative aggregate, C6 [`CounterClient`] is the
//! per-worker staging buffer that periodically syncs into it.

mod client;
mod server;

pub use client::{CounterClient, Server};
pub use server::CounterServer;

/// Build the RPC name prefix for an application's counter functions —
/// `"{app_name}_counter_"`, or bare `"counter_"` when unnamed.
pub fn rpc_prefix(app_name: Option<&str>) -> String {
    match app_name {
        Some(name) if !name.is_empty() => format!("{name}_counter_"),
        _ => "counter_".to_string(),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
