// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn working_dir_prefers_explicit_override() {
    std::env::set_var("FLEET_WORKING_DIR", "/tmp/fleet-test-dir");
    assert_eq!(working_dir().unwrap(), PathBuf::from("/tmp/fleet-test-dir"));
    std::env::remove_var("FLEET_WORKING_DIR");
}

#[test]
#[serial]
fn heartbeat_interval_defaults_to_twenty_seconds() {
    std::env::remove_var("FLEET_HEARTBEAT_INTERVAL_MS");
    assert_eq!(heartbeat_interval(), DEFAULT_HEARTBEAT_INTERVAL);
}

#[test]
#[serial]
fn heartbeat_interval_override_is_honored() {
    std::env::set_var("FLEET_HEARTBEAT_INTERVAL_MS", "500");
    assert_eq!(heartbeat_interval(), Duration::from_millis(500));
    std::env::remove_var("FLEET_HEARTBEAT_INTERVAL_MS");
}

#[test]
#[serial]
fn counter_sync_interval_override_is_honored() {
    std::env::set_var("FLEET_COUNTER_SYNC_INTERVAL_MS", "250");
    assert_eq!(counter_sync_interval(), Duration::from_millis(250));
    std::env::remove_var("FLEET_COUNTER_SYNC_INTERVAL_MS");
}
