// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Counter client (C6, §4.4): per-worker staging buffer paired with a
//! mutex, periodically synced into the server.

use std::collections::HashMap;
use std::sync::Arc;

use fleet_core::{local_group, CounterContainer, CounterValue, IncrementAggregator, MergeAggregator, GLOBAL_GROUP};
use fleet_wire::client_call;
use tokio::sync::Mutex;
use tracing::warn;

use super::server::CounterServer;

/// Where staged counters land on `sync`: an in-process reference (the
/// client and server share a worker process) or a remote RPC endpoint.
#[derive(Clone)]
pub enum Server {
    InProcess(Arc<CounterServer>),
    Remote { addr: String, prefix: String },
}

struct Staging {
    inc: CounterContainer<IncrementAggregator>,
    acc: CounterContainer<MergeAggregator>,
}

pub struct CounterClient {
    server: Server,
    staging: Mutex<Staging>,
}

impl CounterClient {
    pub fn new(server: Server) -> Self {
        Self {
            server,
            staging: Mutex::new(Staging {
                inc: CounterContainer::new(IncrementAggregator),
                acc: CounterContainer::new(MergeAggregator),
            }),
        }
    }

    pub async fn local_inc(&self, addr: &str, instance_id: &str, item: &str, val: f64) {
        let group = local_group(addr, instance_id);
        self.staging.lock().await.inc.inc(&group, item, CounterValue::Number(val));
    }

    pub async fn global_inc(&self, item: &str, val: f64) {
        self.staging.lock().await.inc.inc(GLOBAL_GROUP, item, CounterValue::Number(val));
    }

    pub async fn local_acc(&self, addr: &str, instance_id: &str, item: &str, val: CounterValue) {
        let group = local_group(addr, instance_id);
        self.staging.lock().await.acc.inc(&group, item, val);
    }

    pub async fn global_acc(&self, item: &str, val: CounterValue) {
        self.staging.lock().await.acc.inc(GLOBAL_GROUP, item, val);
    }

    /// Apply a named bag of item->val pairs atomically under the staging
    /// mutex.
    pub async fn multi_local_inc(&self, addr: &str, instance_id: &str, items: HashMap<String, f64>) {
        let group = local_group(addr, instance_id);
        let mut staging = self.staging.lock().await;
        for (item, val) in items {
            staging.inc.inc(&group, &item, CounterValue::Number(val));
        }
    }

    pub async fn multi_global_inc(&self, items: HashMap<String, f64>) {
        let mut staging = self.staging.lock().await;
        for (item, val) in items {
            staging.inc.inc(GLOBAL_GROUP, &item, CounterValue::Number(val));
        }
    }

    pub async fn multi_local_acc(&self, addr: &str, instance_id: &str, items: HashMap<String, CounterValue>) {
        let group = local_group(addr, instance_id);
        let mut staging = self.staging.lock().await;
        for (item, val) in items {
            staging.acc.inc(&group, &item, val);
        }
    }

    pub async fn multi_global_acc(&self, items: HashMap<String, CounterValue>) {
        let mut staging = self.staging.lock().await;
        for (item, val) in items {
            staging.acc.inc(GLOBAL_GROUP, &item, val);
        }
    }

    /// Read from the local staging buffer only — never a remote call.
    pub async fn get_local_inc(&self, addr: &str, instance_id: &str, item: &str, default: f64) -> f64 {
        let group = local_group(addr, instance_id);
        self.staging.lock().await.inc.get(&group, item, CounterValue::Number(default)).as_number().unwrap_or(default)
    }

    pub async fn get_global_inc(&self, item: &str, default: f64) -> f64 {
        self.staging
            .lock()
            .await
            .inc
            .get(GLOBAL_GROUP, item, CounterValue::Number(default))
            .as_number()
            .unwrap_or(default)
    }

    pub async fn get_local_acc(&self, addr: &str, instance_id: &str, item: &str, default: CounterValue) -> CounterValue {
        let group = local_group(addr, instance_id);
        self.staging.lock().await.acc.get(&group, item, default)
    }

    pub async fn get_global_acc(&self, item: &str, default: CounterValue) -> CounterValue {
        self.staging.lock().await.acc.get(GLOBAL_GROUP, item, default)
    }

    /// Drain staging into the server. Best-effort: on partial failure the
    /// side whose RPC succeeded is applied, and staging is cleared
    /// regardless — no per-call atomicity across the two containers (§9).
    pub async fn sync(&self) {
        let mut staging = self.staging.lock().await;

        if let Err(e) = self.send_inc(staging.inc.container()).await {
            warn!(error = %e, "counter client: inc_merge failed, staged values may be re-sent next sync");
        }
        if let Err(e) = self.send_acc(staging.acc.container()).await {
            warn!(error = %e, "counter client: acc_merge failed, staged values may be re-sent next sync");
        }

        staging.inc.reset(None);
        staging.acc.reset(None);
    }

    async fn send_inc(&self, container: &fleet_core::RawContainer) -> Result<(), String> {
        match &self.server {
            Server::InProcess(server) => {
                server.inc_merge(container);
                Ok(())
            }
            Server::Remote { addr, prefix } => {
                let args = vec![serde_json::to_value(container).map_err(|e| e.to_string())?];
                client_call(addr, &format!("{prefix}inc_merge"), args).await.map_err(|e| e.to_string())?;
                Ok(())
            }
        }
    }

    async fn send_acc(&self, container: &fleet_core::RawContainer) -> Result<(), String> {
        match &self.server {
            Server::InProcess(server) => {
                server.acc_merge(container);
                Ok(())
            }
            Server::Remote { addr, prefix } => {
                let args = vec![serde_json::to_value(container).map_err(|e| e.to_string())?];
                client_call(addr, &format!("{prefix}acc_merge"), args).await.map_err(|e| e.to_string())?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
