// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::rpc::RpcServer;

#[tokio::test]
async fn pushed_file_lands_under_recv_dir_by_basename() {
    let recv_dir = tempfile::tempdir().unwrap();
    let server = RpcServer::new();
    FileTransportServer::register(&server, recv_dir.path());
    let addr = server.serve("127.0.0.1:0").await.unwrap();

    let src_dir = tempfile::tempdir().unwrap();
    let src_path = src_dir.path().join("demo.zip");
    tokio::fs::write(&src_path, b"zip-bytes").await.unwrap();

    FileTransportClient::send_file(&addr.to_string(), &src_path).await.unwrap();

    let landed = recv_dir.path().join("demo.zip");
    let contents = tokio::fs::read(&landed).await.unwrap();
    assert_eq!(contents, b"zip-bytes");
}

#[tokio::test]
async fn send_file_rejects_path_without_filename() {
    let err = FileTransportClient::send_file("127.0.0.1:1", Path::new("/")).await.unwrap_err();
    assert!(matches!(err, RpcError::BadArgs { .. }));
}
