// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn null_manager_shutdown_succeeds() {
    assert!(NullManager.shutdown().await.is_ok());
}
