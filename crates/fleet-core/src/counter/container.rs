// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Two-level group -> item -> value map parameterized by an aggregator
//! (C4, §4.2). The distinguished group `"global"` holds cluster-wide
//! aggregates; per-worker groups have the form `"<addr>#<instance_id>"`.

use std::collections::BTreeMap;

use super::aggregator::Aggregator;
use super::value::{CounterValue, RawContainer};

/// The distinguished group holding cluster-wide aggregates.
pub const GLOBAL_GROUP: &str = "global";

/// Build the per-worker-per-instance group key `"<addr>#<instance_id>"`.
pub fn local_group(addr: &str, instance_id: &str) -> String {
    format!("{addr}#{instance_id}")
}

#[derive(Debug, Clone)]
pub struct CounterContainer<A: Aggregator> {
    agg: A,
    map: RawContainer,
}

impl<A: Aggregator> CounterContainer<A> {
    pub fn new(agg: A) -> Self {
        Self { agg, map: BTreeMap::new() }
    }

    pub fn aggregator(&self) -> &A {
        &self.agg
    }

    /// Combine `val` into the existing cell via the aggregator; a missing
    /// cell starts from the aggregator's identity.
    pub fn inc(&mut self, group: &str, item: &str, val: CounterValue) {
        let items = self.map.entry(group.to_string()).or_default();
        let existing = items.remove(item).unwrap_or_else(|| self.agg.identity());
        items.insert(item.to_string(), self.agg.combine(existing, val));
    }

    /// Pure read; returns `default` if the cell is absent.
    pub fn get(&self, group: &str, item: &str, default: CounterValue) -> CounterValue {
        self.map.get(group).and_then(|items| items.get(item)).cloned().unwrap_or(default)
    }

    /// For every cell in `other`, `inc(group, item, other[group][item])`.
    pub fn merge(&mut self, other: &RawContainer) {
        for (group, items) in other {
            for (item, val) in items {
                self.inc(group, item, val.clone());
            }
        }
    }

    /// Replace the backing map; with `None`, empty it.
    pub fn reset(&mut self, container: Option<RawContainer>) {
        self.map = container.unwrap_or_default();
    }

    /// The raw backing map, required for the RPC wire form.
    pub fn container(&self) -> &RawContainer {
        &self.map
    }

    pub fn into_container(self) -> RawContainer {
        self.map
    }
}

#[cfg(test)]
#[path = "container_tests.rs"]
mod tests;
