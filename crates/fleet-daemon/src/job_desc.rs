// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The user job description loader (out of scope per §1; this is
//! a minimal stand-in satisfying its contract: turn a directory into a
//! structured job descriptor with settings).

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

const DESCRIPTOR_FILE: &str = "job.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobSettings {
    #[serde(default)]
    pub job: JobSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobSection {
    /// Clear the per-run working directory before starting, when running
    /// in local mode (§4.1 step 5).
    #[serde(default)]
    pub clear: bool,
}

#[derive(Debug, Clone, Default)]
pub struct JobDescriptor {
    pub settings: JobSettings,
}

impl JobDescriptor {
    /// Turn `job_dir` into a structured descriptor. Missing `job.toml`
    /// yields defaults rather than an error — most test jobs carry none.
    pub fn load(job_dir: &Path) -> Result<Self> {
        let path = job_dir.join(DESCRIPTOR_FILE);
        let settings = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            toml::from_str(&text)?
        } else {
            JobSettings::default()
        };
        Ok(Self { settings })
    }

    /// Apply a settings override (e.g. from a `prepare` RPC call).
    pub fn update_settings(&mut self, overrides: &serde_json::Value) {
        if let Some(clear) = overrides.pointer("/job/clear").and_then(|v| v.as_bool()) {
            self.settings.job.clear = clear;
        }
    }
}

#[cfg(test)]
#[path = "job_desc_tests.rs"]
mod tests;
