// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error(transparent)]
    Core(#[from] fleet_core::CoreError),

    #[error(transparent)]
    Rpc(#[from] fleet_wire::RpcError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error("no state directory configured: set FLEET_WORKING_DIR or HOME")]
    NoWorkingDir,
}

pub type Result<T> = std::result::Result<T, DaemonError>;
