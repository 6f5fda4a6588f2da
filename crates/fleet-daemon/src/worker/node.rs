// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker node (C3, §4.1): RPC-exposed job lifecycle plus the heartbeat
//! loop.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fleet_core::SystemClock;
use fleet_wire::{arg, client_call, FileTransportClient, RpcServer};
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::executor::Executor;
use crate::job_desc::JobDescriptor;
use crate::zip_handler::ZipHandler;

use super::context::WorkerContext;
use super::job_record::JobRecord;

/// Everything a job needs from its environment to build its executor:
/// the worker context, the job directory, the per-run working directory,
/// the RPC server, and the job offset (§4.1 step 6 — the manager is
/// reached through `context.manager`).
pub struct ExecutorBuildArgs {
    pub context: Arc<WorkerContext>,
    pub rpc: Arc<RpcServer>,
    pub job_name: String,
    pub job_code_dir: PathBuf,
    pub working_dir: PathBuf,
    pub job_offset: usize,
}

pub type ExecutorFactory = Arc<dyn Fn(ExecutorBuildArgs) -> Arc<dyn Executor> + Send + Sync>;

/// Parameters accepted by the `prepare` RPC (§4.1).
#[derive(Debug, Clone, Default)]
pub struct PrepareArgs {
    pub unzip: bool,
    pub overwrite: bool,
    pub settings: Option<serde_json::Value>,
}

pub struct Worker {
    pub context: Arc<WorkerContext>,
    rpc: Arc<RpcServer>,
    job_code_dir: PathBuf,
    zip_dir: PathBuf,
    executor_factory: ExecutorFactory,
    running: Mutex<HashMap<String, JobRecord>>,
    heartbeat_started: AtomicBool,
    heartbeat_stop: Arc<Notify>,
    heartbeat_handle: Mutex<Option<JoinHandle<()>>>,
    counter_sync_started: AtomicBool,
    counter_sync_stop: Arc<Notify>,
    counter_sync_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Worker {
    pub fn new(context: Arc<WorkerContext>, rpc: Arc<RpcServer>, executor_factory: ExecutorFactory) -> Arc<Self> {
        let job_code_dir = context.working_dir.join("jobs");
        let zip_dir = context.working_dir.join("zip");
        Arc::new(Self {
            context,
            rpc,
            job_code_dir,
            zip_dir,
            executor_factory,
            running: Mutex::new(HashMap::new()),
            heartbeat_started: AtomicBool::new(false),
            heartbeat_stop: Arc::new(Notify::new()),
            heartbeat_handle: Mutex::new(None),
            counter_sync_started: AtomicBool::new(false),
            counter_sync_stop: Arc::new(Notify::new()),
            counter_sync_handle: Mutex::new(None),
        })
    }

    /// `prepare(job_name, unzip?, overwrite?, settings?)` — §4.1 algorithm.
    pub async fn prepare(&self, job_name: &str, args: PrepareArgs) -> Result<bool> {
        let job_code_dir = self.job_code_dir.join(job_name);

        if args.unzip {
            if job_code_dir.exists() {
                std::fs::remove_dir_all(&job_code_dir)?;
            }
            let zip_path = self.zip_dir.join(format!("{job_name}.zip"));
            if zip_path.exists() {
                ZipHandler::uncompress(&zip_path, &self.job_code_dir)?;
            }
        }

        if !job_code_dir.exists() {
            return Ok(false);
        }

        let mut descriptor = JobDescriptor::load(&job_code_dir)?;
        if let Some(overrides) = &args.settings {
            descriptor.update_settings(overrides);
        }

        let job_offset = self.context.job_offset()?;

        let working_dir = self.pick_working_dir(job_name, args.overwrite, descriptor.settings.job.clear)?;

        let executor = (self.executor_factory)(ExecutorBuildArgs {
            context: self.context.clone(),
            rpc: self.rpc.clone(),
            job_name: job_name.to_string(),
            job_code_dir,
            working_dir: working_dir.clone(),
            job_offset,
        });

        let record = JobRecord::new(job_name.to_string(), working_dir, executor);
        self.running.lock().await.insert(job_name.to_string(), record);
        Ok(true)
    }

    /// Step 5 of `prepare`: compute the per-run working dir, resolving
    /// overwrite/clear/collision per §4.1.
    fn pick_working_dir(&self, job_name: &str, overwrite: bool, clear_in_local_mode: bool) -> Result<PathBuf> {
        let base = self.context.working_dir.join(job_name);
        let should_clear = overwrite || (clear_in_local_mode && self.context.is_local_mode);

        if should_clear {
            if base.exists() {
                std::fs::remove_dir_all(&base)?;
            }
            return Ok(base);
        }

        if !base.exists() {
            return Ok(base);
        }

        let mut suffix = 1usize;
        loop {
            let candidate = self.context.working_dir.join(format!("{job_name}_{suffix}"));
            if !candidate.exists() {
                return Ok(candidate);
            }
            suffix += 1;
        }
    }

    /// `run_job(job_name)` — starts the runner and the clock.
    pub async fn run_job(&self, job_name: &str) -> bool {
        match self.running.lock().await.get_mut(job_name) {
            Some(record) => record.start(SystemClock),
            None => false,
        }
    }

    pub async fn has_job(&self, job_name: &str) -> bool {
        self.running.lock().await.contains_key(job_name)
    }

    /// `stop_job(job_name)` — advisory, does not join the runner.
    pub async fn stop_job(&self, job_name: &str) {
        if let Some(record) = self.running.lock().await.get(job_name) {
            record.stop().await;
        }
    }

    /// `clear_job(job_name)` — joins the runner, removes the record, frees
    /// working-dir ownership. `None` if the name is unknown (no-op, §7).
    pub async fn clear_job(&self, job_name: &str) -> Option<f64> {
        let record = self.running.lock().await.remove(job_name)?;
        Some(record.clear().await)
    }

    /// `pack_job_error(job_name)` — zips the job's error directory and
    /// pushes it to the master via the file-transport client. Push
    /// failures are logged and swallowed (§7).
    pub async fn pack_job_error(&self, job_name: &str) -> Result<()> {
        let working_dir = {
            let running = self.running.lock().await;
            running.get(job_name).map(|r| r.working_dir.clone())
        };
        let Some(working_dir) = working_dir else { return Ok(()) };

        let errors_dir = working_dir.join("errors");
        if !errors_dir.exists() {
            return Ok(());
        }

        std::fs::create_dir_all(&self.zip_dir)?;
        let zip_name = format!("{}_{job_name}_errors.zip", self.context.addr_key());
        let zip_path = self.zip_dir.join(&zip_name);
        ZipHandler::compress(&zip_path, &errors_dir)?;

        if let Err(e) = FileTransportClient::send_file(self.context.master_addr.as_str(), &zip_path).await {
            warn!(job = job_name, error = %e, "failed to push error bundle to master");
        }
        Ok(())
    }

    /// `add_node(worker_addr)` / `remove_node(worker_addr)` — forward a
    /// fleet membership change to every running executor.
    ///
    /// Only `worker_addr` is supplied, not its paired IP, so these do not
    /// touch `context.fleet`: mutating one side of the addrs/ips pair
    /// without the other would violate the index-alignment invariant
    /// (§3). The fleet view itself is refreshed exclusively by the
    /// heartbeat loop's master reply.
    pub async fn add_node(&self, worker_addr: &str) {
        for record in self.running.lock().await.values() {
            record.executor.add_node(worker_addr).await;
        }
    }

    pub async fn remove_node(&self, worker_addr: &str) {
        for record in self.running.lock().await.values() {
            record.executor.remove_node(worker_addr).await;
        }
    }

    /// Start the background heartbeat loop. A no-op if already started.
    pub fn start_heartbeat(self: &Arc<Self>, interval: std::time::Duration) {
        if self.heartbeat_started.swap(true, Ordering::SeqCst) {
            return;
        }
        let this = self.clone();
        let stop = self.heartbeat_stop.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stop.notified() => {
                        info!("heartbeat loop stopping");
                        return;
                    }
                    _ = tokio::time::sleep(interval) => {
                        if let Err(e) = this.heartbeat_tick().await {
                            warn!(error = %e, "heartbeat tick failed, retrying next interval");
                        }
                    }
                }
            }
        });
        if let Ok(mut guard) = self.heartbeat_handle.try_lock() {
            *guard = Some(handle);
        }
    }

    /// Start the background counter-sync loop, draining staged counters
    /// (C6) into the server (C5) every `interval`. A no-op if already
    /// started.
    pub fn start_counter_sync(self: &Arc<Self>, interval: std::time::Duration) {
        if self.counter_sync_started.swap(true, Ordering::SeqCst) {
            return;
        }
        let this = self.clone();
        let stop = self.counter_sync_stop.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stop.notified() => {
                        info!("counter sync loop stopping");
                        return;
                    }
                    _ = tokio::time::sleep(interval) => {
                        this.context.counters.sync().await;
                    }
                }
            }
        });
        if let Ok(mut guard) = self.counter_sync_handle.try_lock() {
            *guard = Some(handle);
        }
    }

    async fn heartbeat_tick(&self) -> Result<()> {
        let reply = client_call(
            self.context.master_addr.as_str(),
            "register_heartbeat",
            vec![serde_json::Value::String(self.context.addr.as_str().to_string())],
        )
        .await?;
        let addrs: Vec<String> = serde_json::from_value(reply)?;
        let ips: Vec<String> = addrs.iter().map(|a| fix_ip(a)).collect();
        self.context.fleet.replace(addrs, ips)?;
        Ok(())
    }

    /// `shutdown()` — exact ordering per §4.1.
    pub async fn shutdown(self: &Arc<Self>) {
        if !self.heartbeat_started.load(Ordering::SeqCst) {
            return;
        }

        let mut running = self.running.lock().await;
        let drained: Vec<(String, JobRecord)> = running.drain().collect();
        drop(running);
        for (name, record) in drained {
            record.executor.shutdown().await;
            record.clear().await;
            info!(job = %name, "job shut down");
        }

        if let Err(e) = self.context.manager.shutdown().await {
            warn!(error = %e, "manager shutdown failed, continuing");
        }

        // `notify_one`, not `notify_waiters`: the loop may be parked in
        // `heartbeat_tick().await` rather than on `stop.notified()`, and
        // `notify_waiters` stores no permit for a later call to pick up.
        self.heartbeat_stop.notify_one();
        if let Some(handle) = self.heartbeat_handle.lock().await.take() {
            if let Err(e) = handle.await {
                error!(error = %e, "heartbeat loop task panicked");
            }
        }

        // Not one of §4.1's five named steps, but must run before the RPC
        // server stops: a final drain gives staged counters one last
        // chance to reach the server instead of being dropped on exit.
        if self.counter_sync_started.swap(false, Ordering::SeqCst) {
            self.counter_sync_stop.notify_one();
            if let Some(handle) = self.counter_sync_handle.lock().await.take() {
                if let Err(e) = handle.await {
                    error!(error = %e, "counter sync loop task panicked");
                }
            }
            self.context.counters.sync().await;
        }

        self.rpc.shutdown();
    }

    /// Register the worker's RPC surface on `rpc`.
    pub fn register(self: &Arc<Self>, rpc: &Arc<RpcServer>) {
        let this = self.clone();
        rpc.register_function("prepare", None, move |args| {
            let this = this.clone();
            async move {
                let job_name: String = arg(&args, 0)?;
                let unzip: bool = args.get(1).and_then(|v| v.as_bool()).unwrap_or(true);
                let overwrite: bool = args.get(2).and_then(|v| v.as_bool()).unwrap_or(false);
                let settings = args.get(3).cloned();
                let ok = this.prepare(&job_name, PrepareArgs { unzip, overwrite, settings }).await.map_err(|e| e.to_string())?;
                Ok(serde_json::Value::Bool(ok))
            }
        });

        let this = self.clone();
        rpc.register_function("run_job", None, move |args| {
            let this = this.clone();
            async move {
                let job_name: String = arg(&args, 0)?;
                Ok(serde_json::Value::Bool(this.run_job(&job_name).await))
            }
        });

        let this = self.clone();
        rpc.register_function("has_job", None, move |args| {
            let this = this.clone();
            async move {
                let job_name: String = arg(&args, 0)?;
                Ok(serde_json::Value::Bool(this.has_job(&job_name).await))
            }
        });

        let this = self.clone();
        rpc.register_function("stop_job", None, move |args| {
            let this = this.clone();
            async move {
                let job_name: String = arg(&args, 0)?;
                this.stop_job(&job_name).await;
                Ok(serde_json::Value::Null)
            }
        });

        let this = self.clone();
        rpc.register_function("clear_job", None, move |args| {
            let this = this.clone();
            async move {
                let job_name: String = arg(&args, 0)?;
                let elapsed = this.clear_job(&job_name).await.unwrap_or(0.0);
                Ok(serde_json::json!(elapsed))
            }
        });

        let this = self.clone();
        rpc.register_function("pack_job_error", None, move |args| {
            let this = this.clone();
            async move {
                let job_name: String = arg(&args, 0)?;
                this.pack_job_error(&job_name).await.map_err(|e| e.to_string())?;
                Ok(serde_json::Value::Null)
            }
        });

        let this = self.clone();
        rpc.register_function("add_node", None, move |args| {
            let this = this.clone();
            async move {
                let addr: String = arg(&args, 0)?;
                this.add_node(&addr).await;
                Ok(serde_json::Value::Null)
            }
        });

        let this = self.clone();
        rpc.register_function("remove_node", None, move |args| {
            let this = this.clone();
            async move {
                let addr: String = arg(&args, 0)?;
                this.remove_node(&addr).await;
                Ok(serde_json::Value::Null)
            }
        });

        let this = self.clone();
        rpc.register_function("shutdown", None, move |_args| {
            let this = this.clone();
            async move {
                this.shutdown().await;
                Ok(serde_json::Value::Null)
            }
        });
    }
}

/// Normalize a master-reported address into its bare IP (the wire form
/// here is already `host:port`; this strips the port).
fn fix_ip(addr: &str) -> String {
    addr.rsplit_once(':').map(|(host, _)| host.to_string()).unwrap_or_else(|| addr.to_string())
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
