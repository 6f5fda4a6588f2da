// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The file-transport pair (§1, out of scope beyond its contract): push a
//! file to a remote directory by name.
//!
//! Piggybacks on the RPC transport as a `push_file(name, base64)` call so
//! workers and masters share one listening port.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;
use serde_json::json;

use crate::rpc::{arg, client_call, RpcError, RpcServer};

const PUSH_FILE_FUNC: &str = "push_file";

/// Server side: accepts a single file push into a fixed receive directory.
pub struct FileTransportServer;

impl FileTransportServer {
    /// Register the receiver on `server`; pushed files land under `recv_dir`.
    pub fn register(server: &Arc<RpcServer>, recv_dir: impl Into<PathBuf>) {
        let recv_dir = recv_dir.into();
        server.register_function(PUSH_FILE_FUNC, None, move |args| {
            let recv_dir = recv_dir.clone();
            async move {
                let name: String = arg(&args, 0)?;
                let encoded: String = arg(&args, 1)?;
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(encoded)
                    .map_err(|e| e.to_string())?;
                tokio::fs::create_dir_all(&recv_dir).await.map_err(|e| e.to_string())?;
                tokio::fs::write(recv_dir.join(&name), bytes)
                    .await
                    .map_err(|e| e.to_string())?;
                Ok(json!(true))
            }
        });
    }
}

/// Client side: uploads one file; the target name is the file's basename.
pub struct FileTransportClient;

impl FileTransportClient {
    pub async fn send_file(target_addr: &str, local_path: &Path) -> Result<(), RpcError> {
        let name = local_path
            .file_name()
            .ok_or_else(|| RpcError::BadArgs { index: 0, message: "path has no filename".into() })?
            .to_string_lossy()
            .to_string();
        let bytes = tokio::fs::read(local_path).await?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        client_call(target_addr, PUSH_FILE_FUNC, vec![json!(name), json!(encoded)]).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "file_transport_tests.rs"]
mod tests;
