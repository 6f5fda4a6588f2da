// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fleet-wire: the RPC transport and file-transport pair.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload.

mod file_transport;
mod framing;
mod rpc;

pub use file_transport::{FileTransportClient, FileTransportServer};
pub use framing::{decode, encode, read_message, read_value, write_message, write_value, WireError};
pub use rpc::{arg, client_call, prefixed, HandlerResult, RpcError, RpcRequest, RpcResponse, RpcServer};
