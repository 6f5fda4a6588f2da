// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fleet_core::GLOBAL_GROUP;
use proptest::prelude::*;

#[test]
fn inc_accumulates_into_global_row() {
    let dir = tempfile::tempdir().unwrap();
    let server = CounterServer::new(dir.path()).unwrap();
    server.inc(GLOBAL_GROUP, "pages", CounterValue::Number(3.0));
    server.inc(GLOBAL_GROUP, "pages", CounterValue::Number(2.0));
    let global = server.get_global();
    assert_eq!(global.get("pages").and_then(CounterValue::as_number), Some(5.0));
}

#[test]
fn inc_merge_applies_staged_container() {
    let dir = tempfile::tempdir().unwrap();
    let server = CounterServer::new(dir.path()).unwrap();
    let mut staged = RawContainer::new();
    staged.entry(GLOBAL_GROUP.to_string()).or_default().insert("pages".to_string(), CounterValue::Number(7.0));
    server.inc_merge(&staged);
    assert_eq!(server.get_global().get("pages").and_then(CounterValue::as_number), Some(7.0));
}

#[test]
fn acc_merge_concatenates_sequences() {
    let dir = tempfile::tempdir().unwrap();
    let server = CounterServer::new(dir.path()).unwrap();
    let a = CounterValue::Sequence(vec![CounterValue::Number(1.0)]);
    let b = CounterValue::Sequence(vec![CounterValue::Number(2.0)]);
    server.acc(GLOBAL_GROUP, "errs", a);
    server.acc(GLOBAL_GROUP, "errs", b);
    match server.get_acc(GLOBAL_GROUP, "errs", CounterValue::default()) {
        CounterValue::Sequence(items) => assert_eq!(items.len(), 2),
        other => panic!("expected sequence, got {other:?}"),
    }
}

#[test]
fn save_then_new_restores_both_containers() {
    let dir = tempfile::tempdir().unwrap();
    {
        let server = CounterServer::new(dir.path()).unwrap();
        server.inc(GLOBAL_GROUP, "pages", CounterValue::Number(5.0));
        server.acc(GLOBAL_GROUP, "errs", CounterValue::Sequence(vec![CounterValue::Number(1.0)]));
        server.save().unwrap();
    }

    let restarted = CounterServer::new(dir.path()).unwrap();
    assert_eq!(restarted.get_global().get("pages").and_then(CounterValue::as_number), Some(5.0));
    match restarted.get_acc(GLOBAL_GROUP, "errs", CounterValue::default()) {
        CounterValue::Sequence(items) => assert_eq!(items.len(), 1),
        other => panic!("expected sequence, got {other:?}"),
    }
}

#[test]
fn new_without_existing_status_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let server = CounterServer::new(dir.path()).unwrap();
    assert!(server.get_global().is_empty());
}

proptest! {
    // §8 property 6: save then a fresh load restores both containers
    // element-for-element equal to the pre-save state.
    #[test]
    fn save_load_roundtrips_arbitrary_global_counters(
        pages in 0u32..10_000,
        errors in 0u32..10_000,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let before = {
            let server = CounterServer::new(dir.path()).unwrap();
            server.inc(GLOBAL_GROUP, "pages", CounterValue::Number(pages as f64));
            server.acc(GLOBAL_GROUP, "errors", CounterValue::Number(errors as f64));
            server.save().unwrap();
            (server.get_global(), server.get_acc(GLOBAL_GROUP, "errors", CounterValue::default()))
        };

        let restarted = CounterServer::new(dir.path()).unwrap();
        let after = (restarted.get_global(), restarted.get_acc(GLOBAL_GROUP, "errors", CounterValue::default()));
        prop_assert_eq!(before, after);
    }
}
