// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tagged sum type for counter cell values.
//!
//! The Merge aggregator dispatches on value kind (number / sequence / set /
//! mapping); this type makes that dispatch explicit instead of reflecting
//! on a dynamically-typed value, and fixes the serialization contract used
//! for the RPC wire form and the persistence file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One counter cell's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CounterValue {
    Number(f64),
    Sequence(Vec<CounterValue>),
    /// Deduplicated by `PartialEq`; insertion order is otherwise
    /// unspecified (convergence for sets is up to element-set, §5).
    Set(Vec<CounterValue>),
    Mapping(BTreeMap<String, CounterValue>),
}

impl CounterValue {
    pub fn number(v: f64) -> Self {
        CounterValue::Number(v)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CounterValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl Default for CounterValue {
    fn default() -> Self {
        CounterValue::Number(0.0)
    }
}

/// Raw two-level group -> item -> value map, the RPC/persistence wire form
/// required by §4.2's `container` accessor.
pub type RawContainer = BTreeMap<String, BTreeMap<String, CounterValue>>;
