// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Counter server (C5, §4.3): process-wide authoritative aggregate and
//! persistence.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fleet_core::{CounterContainer, CounterValue, GLOBAL_GROUP, IncrementAggregator, MergeAggregator, RawContainer};
use fleet_wire::{arg, RpcServer};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{DaemonError, Result};

const STATUS_FILE: &str = "counter.status";

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedCounters {
    inc: RawContainer,
    acc: RawContainer,
}

struct State {
    inc: CounterContainer<IncrementAggregator>,
    acc: CounterContainer<MergeAggregator>,
}

/// Holds `inc_counter` (Increment) and `acc_counter` (Merge); guarded by a
/// single mutex per §5 ("Counter containers in C5: guarded by a single
/// mutex covering inc_merge/acc_merge/inc/acc/output/save").
pub struct CounterServer {
    working_dir: PathBuf,
    state: Mutex<State>,
}

impl CounterServer {
    /// Ensure `working_dir` exists and, if `counter.status` is present,
    /// restore both containers from it.
    pub fn new(working_dir: impl Into<PathBuf>) -> Result<Arc<Self>> {
        let working_dir = working_dir.into();
        std::fs::create_dir_all(&working_dir)?;

        let mut inc = CounterContainer::new(IncrementAggregator);
        let mut acc = CounterContainer::new(MergeAggregator);

        let status_path = working_dir.join(STATUS_FILE);
        if status_path.exists() {
            let persisted = load(&status_path)?;
            inc.reset(Some(persisted.inc));
            acc.reset(Some(persisted.acc));
        }

        Ok(Arc::new(Self { working_dir, state: Mutex::new(State { inc, acc }) }))
    }

    pub fn inc(&self, group: &str, item: &str, val: CounterValue) {
        self.state.lock().inc.inc(group, item, val);
    }

    pub fn acc(&self, group: &str, item: &str, val: CounterValue) {
        self.state.lock().acc.inc(group, item, val);
    }

    pub fn inc_merge(&self, staged: &RawContainer) {
        self.state.lock().inc.merge(staged);
    }

    pub fn acc_merge(&self, staged: &RawContainer) {
        self.state.lock().acc.merge(staged);
    }

    /// The `"global"` row of the Increment container, for UI/reporting.
    pub fn get_global(&self) -> std::collections::BTreeMap<String, CounterValue> {
        self.state.lock().inc.container().get(GLOBAL_GROUP).cloned().unwrap_or_default()
    }

    /// Read a single cell of the Merge-aggregator container. Not part of
    /// the RPC surface (§4.3 only exposes `get_global`); exists so callers
    /// with an in-process reference can inspect merged state.
    pub fn get_acc(&self, group: &str, item: &str, default: CounterValue) -> CounterValue {
        self.state.lock().acc.get(group, item, default)
    }

    /// Write `(inc_container, acc_container)` to `counter.status` in a
    /// single atomic file write.
    pub fn save(&self) -> Result<()> {
        let state = self.state.lock();
        let persisted = PersistedCounters {
            inc: state.inc.container().clone(),
            acc: state.acc.container().clone(),
        };
        drop(state);
        save(&self.working_dir.join(STATUS_FILE), &persisted)
    }

    pub fn shutdown(&self) -> Result<()> {
        self.save()
    }

    /// Register the `inc`/`acc`/`inc_merge`/`acc_merge`/`get_global` RPC
    /// surface, decorated with `prefix`.
    pub fn register(self: &Arc<Self>, rpc: &Arc<RpcServer>, prefix: &str) {
        let this = self.clone();
        rpc.register_function("inc", Some(prefix), move |args| {
            let this = this.clone();
            async move {
                let group: String = arg(&args, 0)?;
                let item: String = arg(&args, 1)?;
                let val: f64 = args.get(2).and_then(|v| v.as_f64()).unwrap_or(1.0);
                this.inc(&group, &item, CounterValue::Number(val));
                Ok(serde_json::Value::Bool(true))
            }
        });

        let this = self.clone();
        rpc.register_function("acc", Some(prefix), move |args| {
            let this = this.clone();
            async move {
                let group: String = arg(&args, 0)?;
                let item: String = arg(&args, 1)?;
                let val: CounterValue = arg(&args, 2)?;
                this.acc(&group, &item, val);
                Ok(serde_json::Value::Bool(true))
            }
        });

        let this = self.clone();
        rpc.register_function("inc_merge", Some(prefix), move |args| {
            let this = this.clone();
            async move {
                let staged: RawContainer = arg(&args, 0)?;
                this.inc_merge(&staged);
                Ok(serde_json::Value::Bool(true))
            }
        });

        let this = self.clone();
        rpc.register_function("acc_merge", Some(prefix), move |args| {
            let this = this.clone();
            async move {
                let staged: RawContainer = arg(&args, 0)?;
                this.acc_merge(&staged);
                Ok(serde_json::Value::Bool(true))
            }
        });

        let this = self.clone();
        rpc.register_function("get_global", Some(prefix), move |_args| {
            let this = this.clone();
            async move {
                serde_json::to_value(this.get_global()).map_err(|e| e.to_string())
            }
        });
    }
}

fn load(path: &Path) -> Result<PersistedCounters> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(DaemonError::from)
}

fn save(path: &Path, persisted: &PersistedCounters) -> Result<()> {
    let text = serde_json::to_string(persisted)?;
    let tmp = path.with_extension("status.tmp");
    std::fs::write(&tmp, text)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
