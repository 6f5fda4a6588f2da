// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fleetd`: starts one fleet node — either the Master or a Worker — and
//! wires up RPC, counters, and logging (§1 — CLI, config parsing, and
//! logging setup are external collaborators, specified by contract only).

use std::collections::HashSet;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use fleet_core::Address;
use fleet_daemon::counter::{rpc_prefix, CounterClient, CounterServer, Server as CounterServerHandle};
use fleet_daemon::{env, manager::NullManager, ExecutorBuildArgs, NullExecutor, Worker, WorkerContext};
use fleet_wire::{arg, FileTransportServer, RpcServer};
use parking_lot::Mutex;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fleetd", about = "Distributed crawl/job execution cluster node")]
struct Cli {
    #[command(subcommand)]
    role: Role,
}

#[derive(Debug, Subcommand)]
enum Role {
    /// Run as the cluster master: heartbeat roster plus the authoritative
    /// counter server.
    Master {
        /// The master's RPC address (`host:port`).
        #[arg(long)]
        addr: String,
    },
    /// Run as a worker node.
    Worker {
        /// This worker's RPC address (`host:port`).
        #[arg(long)]
        addr: String,
        /// This worker's IP, used as the fleet-view identity.
        #[arg(long)]
        ip: String,
        /// The master's RPC address.
        #[arg(long)]
        master: String,
        /// Run in local mode (multiple workers sharing one process).
        #[arg(long, default_value_t = false)]
        local: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    match cli.role {
        Role::Master { addr } => run_master(addr).await?,
        Role::Worker { addr, ip, master, local } => run_worker(addr, ip, master, local).await?,
    }

    Ok(())
}

/// Minimal heartbeat-roster collaborator plus the C5 counter server.
async fn run_master(addr: String) -> anyhow::Result<()> {
    let working_dir = env::working_dir()?.join("master");
    std::fs::create_dir_all(&working_dir)?;

    let rpc = RpcServer::new();
    FileTransportServer::register(&rpc, working_dir.join("errors"));

    let counters = CounterServer::new(working_dir.join("counters"))?;
    counters.register(&rpc, &rpc_prefix(None));

    let roster: Arc<Mutex<HashSet<String>>> = Arc::new(Mutex::new(HashSet::new()));
    let roster_for_handler = roster.clone();
    rpc.register_function("register_heartbeat", None, move |args| {
        let roster = roster_for_handler.clone();
        async move {
            let worker_addr: String = arg(&args, 0)?;
            let mut roster = roster.lock();
            roster.insert(worker_addr);
            let mut addrs: Vec<String> = roster.iter().cloned().collect();
            addrs.sort();
            Ok(json!(addrs))
        }
    });

    let bound = rpc.serve(&addr).await?;
    info!(%bound, "master rpc listening");

    tokio::signal::ctrl_c().await?;
    info!("shutting down master");
    counters.shutdown()?;
    rpc.shutdown();

    Ok(())
}

async fn run_worker(addr: String, ip: String, master: String, local: bool) -> anyhow::Result<()> {
    let address = Address::parse(addr.as_str())?;
    let master_addr = Address::parse(master.as_str())?;
    let working_dir = env::working_dir()?.join("worker").join(address.fs_key());
    std::fs::create_dir_all(&working_dir)?;

    let counters = Arc::new(CounterClient::new(CounterServerHandle::Remote {
        addr: master_addr.as_str().to_string(),
        prefix: rpc_prefix(None),
    }));

    let context = Arc::new(WorkerContext::new(
        address,
        ip,
        master_addr,
        working_dir.clone(),
        local,
        Arc::new(NullManager),
        counters,
    ));

    let rpc = RpcServer::new();
    FileTransportServer::register(&rpc, working_dir.join("zip"));

    let worker = Worker::new(
        context,
        rpc.clone(),
        Arc::new(|_args: ExecutorBuildArgs| Arc::new(NullExecutor) as Arc<dyn fleet_daemon::Executor>),
    );
    worker.register(&rpc);

    let bound = rpc.serve(&addr).await?;
    info!(%bound, "worker rpc listening");

    worker.start_heartbeat(env::heartbeat_interval());
    worker.start_counter_sync(env::counter_sync_interval());

    tokio::signal::ctrl_c().await?;
    info!("shutting down worker");
    worker.shutdown().await;

    Ok(())
}
