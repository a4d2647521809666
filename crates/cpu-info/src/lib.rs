// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # cpu-info
//!
//! Describes the CPU the kernels run on: which SIMD extensions are present
//! ([`CpuIsaInfo`]) and how many cores are online.
//!
//! # Detection
//! On `aarch64` the ISA flags come from the standard library's runtime
//! feature detection. Elsewhere every flag is off and the portable kernels
//! are selected. [`CpuInfo::from_cpuinfo`] parses a `/proc/cpuinfo` dump
//! instead, which is how a recorded target can be replayed on another host.
//!
//! # Example
//! ```
//! use cpu_info::CpuInfo;
//!
//! let cpu = CpuInfo::get();
//! println!("{} cores, isa: {}", cpu.num_cores(), cpu.isa());
//! ```

mod error;
mod isa;
mod sysfs;

use std::path::Path;
use std::sync::OnceLock;

pub use error::CpuInfoError;
pub use isa::CpuIsaInfo;

/// Host CPU description.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CpuInfo {
    isa: CpuIsaInfo,
    num_cores: usize,
}

impl CpuInfo {
    /// Returns the process-wide description, detected on first use.
    pub fn get() -> &'static CpuInfo {
        static HOST: OnceLock<CpuInfo> = OnceLock::new();
        HOST.get_or_init(CpuInfo::detect)
    }

    /// Queries the running system. Never fails: unreadable sources degrade
    /// to a single core and the portable ISA.
    pub fn detect() -> Self {
        let isa = CpuIsaInfo::detect();
        let num_cores = sysfs::read_online_cores().unwrap_or_else(|e| {
            tracing::warn!("could not determine online cores, assuming 1: {e}");
            1
        });
        tracing::debug!(%isa, num_cores, "detected host CPU");
        Self { isa, num_cores }
    }

    /// Builds the ISA flags from a `/proc/cpuinfo`-formatted file.
    pub fn from_cpuinfo(path: &Path) -> Result<Self, CpuInfoError> {
        let isa = sysfs::read_cpuinfo_features(path)?;
        let num_cores = sysfs::read_online_cores()?;
        Ok(Self { isa, num_cores })
    }

    /// Reads the host's `/proc/cpuinfo`.
    pub fn from_proc() -> Result<Self, CpuInfoError> {
        Self::from_cpuinfo(Path::new(sysfs::PROC_CPUINFO))
    }

    /// A fixed description, for tests and benchmarks.
    pub fn synthetic(isa: CpuIsaInfo, num_cores: usize) -> Self {
        Self {
            isa,
            num_cores: num_cores.max(1),
        }
    }

    pub fn isa(&self) -> CpuIsaInfo {
        self.isa
    }

    pub fn num_cores(&self) -> usize {
        self.num_cores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_is_cached() {
        let a = CpuInfo::get() as *const CpuInfo;
        let b = CpuInfo::get() as *const CpuInfo;
        assert_eq!(a, b);
        assert!(CpuInfo::get().num_cores() >= 1);
    }

    #[test]
    fn test_synthetic() {
        let cpu = CpuInfo::synthetic(CpuIsaInfo::neon(), 0);
        assert_eq!(cpu.num_cores(), 1);
        assert!(cpu.isa().neon);
    }
}
