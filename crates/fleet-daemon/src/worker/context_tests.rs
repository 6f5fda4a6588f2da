// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::counter::{CounterClient, Server};
use crate::manager::NullManager;

fn ctx(ip: &str) -> WorkerContext {
    WorkerContext::new(
        Address::try_from("10.0.0.1:9000").unwrap(),
        ip.to_string(),
        Address::try_from("10.0.0.1:9100").unwrap(),
        PathBuf::from("/tmp/fleet-worker"),
        false,
        Arc::new(NullManager),
        Arc::new(CounterClient::new(Server::Remote { addr: "10.0.0.1:9100".to_string(), prefix: String::new() })),
    )
}

#[test]
fn job_offset_before_any_heartbeat_errors() {
    let context = ctx("10.0.0.1");
    assert!(context.job_offset().is_err());
}

#[test]
fn job_offset_matches_local_ip_index_after_fleet_update() {
    let context = ctx("10.0.0.2");
    context
        .fleet
        .replace(
            vec!["10.0.0.1:9000".to_string(), "10.0.0.2:9000".to_string()],
            vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()],
        )
        .unwrap();
    assert_eq!(context.job_offset().unwrap(), 1);
}

#[test]
fn addr_key_normalizes_dots_and_colons() {
    let context = ctx("10.0.0.1");
    assert_eq!(context.addr_key(), "10_0_0_1_9000");
}
