// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-to-process RPC transport: request/response over TCP with
//! function registration by name and prefix.
//!
//! Dispatch is an explicit `Arc<RwLock<HashMap<String, Handler>>>` table,
//! keyed by `prefix + name`.

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tracing::{debug, warn};

use crate::framing::{read_value, write_value, WireError};

#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("remote call failed: {0}")]
    Remote(String),

    #[error("argument {index}: {message}")]
    BadArgs { index: usize, message: String },
}

pub type HandlerResult = std::result::Result<Value, String>;
type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send>>;
type Handler = Arc<dyn Fn(Vec<Value>) -> HandlerFuture + Send + Sync>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub func: String,
    pub args: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RpcResponse {
    Ok(Value),
    Err(String),
}

/// Decode positional argument `index` from `args`.
pub fn arg<T: DeserializeOwned>(args: &[Value], index: usize) -> std::result::Result<T, String> {
    let raw = args.get(index).ok_or_else(|| format!("missing argument {index}"))?;
    serde_json::from_value(raw.clone()).map_err(|e| format!("argument {index}: {e}"))
}

/// Build the decorated wire-level name: prefix + name, a plain string
/// concatenation (§9 "Dynamic RPC dispatch").
pub fn prefixed(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(p) if !p.is_empty() => format!("{p}{name}"),
        _ => name.to_string(),
    }
}

/// A TCP RPC server dispatching requests to registered handlers by name.
///
/// Each connection carries exactly one request/response pair, matching the
/// collaborator contract in §1 (out of scope: the transport
/// itself, specified by contract only).
#[derive(Default)]
pub struct RpcServer {
    handlers: RwLock<HashMap<String, Handler>>,
    local_addr: Mutex<Option<SocketAddr>>,
    shutdown: Notify,
}

impl RpcServer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register `name` (optionally decorated with `prefix`) to `handler`.
    pub fn register_function<F, Fut>(&self, name: &str, prefix: Option<&str>, handler: F)
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let key = prefixed(prefix, name);
        self.handlers.write().insert(key, Arc::new(move |args| Box::pin(handler(args))));
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock()
    }

    /// Bind `addr` and start accepting connections on a background task.
    /// Returns the bound address (useful when `addr` uses port 0).
    pub async fn serve(self: &Arc<Self>, addr: &str) -> std::result::Result<SocketAddr, RpcError> {
        let listener = TcpListener::bind(addr).await?;
        let local = listener.local_addr()?;
        *self.local_addr.lock() = Some(local);

        let this = self.clone();
        tokio::spawn(async move { this.accept_loop(listener).await });
        Ok(local)
    }

    async fn accept_loop(self: Arc<Self>, listener: TcpListener) {
        loop {
            tokio::select! {
                _ = self.shutdown.notified() => {
                    debug!("rpc server accept loop stopping");
                    return;
                }
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, _)) => {
                            let this = self.clone();
                            tokio::spawn(async move { this.handle_conn(stream).await });
                        }
                        Err(e) => warn!(error = %e, "rpc accept failed"),
                    }
                }
            }
        }
    }

    async fn handle_conn(self: Arc<Self>, mut stream: TcpStream) {
        let request: RpcRequest = match read_value(&mut stream).await {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "failed to read rpc request");
                return;
            }
        };
        let response = self.dispatch(request).await;
        if let Err(e) = write_value(&mut stream, &response).await {
            debug!(error = %e, "failed to write rpc response");
        }
    }

    async fn dispatch(&self, request: RpcRequest) -> RpcResponse {
        let handler = self.handlers.read().get(&request.func).cloned();
        match handler {
            Some(h) => match h(request.args).await {
                Ok(v) => RpcResponse::Ok(v),
                Err(e) => RpcResponse::Err(e),
            },
            None => RpcResponse::Err(format!("no such function: {}", request.func)),
        }
    }

    /// Stop accepting new connections. In-flight handlers are not
    /// cancelled; callers join whatever they need to before calling this.
    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

/// Call `func` on the RPC server at `addr` with positional `args`.
pub async fn client_call(
    addr: &str,
    func: &str,
    args: Vec<Value>,
) -> std::result::Result<Value, RpcError> {
    let mut stream = TcpStream::connect(addr).await?;
    write_value(&mut stream, &RpcRequest { func: func.to_string(), args }).await?;
    let response: RpcResponse = read_value(&mut stream).await?;
    match response {
        RpcResponse::Ok(v) => Ok(v),
        RpcResponse::Err(e) => Err(RpcError::Remote(e)),
    }
}

#[cfg(test)]
#[path = "rpc_tests.rs"]
mod tests;
