// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `host:port` addresses and their filesystem-safe normalized form.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A `host:port` address, e.g. a worker's RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let (host, port) = raw.rsplit_once(':').ok_or_else(|| CoreError::InvalidAddress(raw.clone()))?;
        if host.is_empty() || port.parse::<u16>().is_err() {
            return Err(CoreError::InvalidAddress(raw));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn host(&self) -> &str {
        self.0.rsplit_once(':').map(|(h, _)| h).unwrap_or(&self.0)
    }

    /// Filesystem-safe key: dots and colons replaced with underscores.
    pub fn fs_key(&self) -> String {
        self.0.replace(['.', ':'], "_")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Address {
    type Error = CoreError;
    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[path = "address_tests.rs"]
mod tests;
