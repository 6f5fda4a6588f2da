// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fleet-daemon: worker lifecycle (C1-C3) and the distributed counter
//! subsystem (C4-C6, reusing `fleet_core`'s container and aggregators).
//!
//! The RPC transport and file-transport pair live in `fleet_wire`; the
//! zip packer/unpacker, job description loader, and inner `Job` executor
//! are modeled here as narrow collaborator traits/stand-ins (§1 — out of
//! scope beyond their contract).

pub mod counter;
pub mod env;
pub mod error;
pub mod executor;
pub mod job_desc;
pub mod manager;
pub mod worker;
pub mod zip_handler;

pub use error::{DaemonError, Result};
pub use executor::{Executor, NullExecutor};
pub use manager::{Manager, NullManager};
pub use worker::{ExecutorBuildArgs, ExecutorFactory, JobRecord, PrepareArgs, Worker, WorkerContext};
