// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Scale configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! num_threads = 4
//!
//! [scale]
//! interpolation_policy = "bilinear"
//! border_mode = "constant"
//! constant_border_value = 0.0
//! sampling_policy = "top-left"
//! align_corners = true
//! data_layout = "nhwc"
//! ```

use std::path::Path;

use cpu_kernels::{BorderMode, InterpolationPolicy, ScaleKernelInfo};
use scheduler::{Scheduler, SingleThreadScheduler, ThreadPoolScheduler};

use crate::OperatorError;

/// Kernel parameters plus how many workers run them.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScaleConfig {
    /// Worker threads (defaults to the number of available cores).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_threads: Option<usize>,
    pub scale: ScaleKernelInfo,
}

impl ScaleConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, OperatorError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            OperatorError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, OperatorError> {
        toml::from_str(toml_str).map_err(|e| OperatorError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, OperatorError> {
        toml::to_string_pretty(self).map_err(|e| OperatorError::Config(format!("TOML serialise error: {e}")))
    }

    /// Resolves the number of worker threads.
    pub fn resolve_threads(&self) -> usize {
        self.num_threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1)
    }

    /// Creates the scheduler for [`ScaleConfig::resolve_threads`] workers.
    pub fn create_scheduler(&self) -> Result<Box<dyn Scheduler>, OperatorError> {
        match self.resolve_threads() {
            1 => Ok(Box::new(SingleThreadScheduler::new())),
            n => Ok(Box::new(ThreadPoolScheduler::new(n)?)),
        }
    }
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            scale: ScaleKernelInfo::new(InterpolationPolicy::Bilinear, BorderMode::Replicate),
        }
    }
}
