// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Instruction-set feature flags.

use std::fmt;

/// The SIMD extensions a kernel may rely on.
///
/// Fields are public so tests and benchmarks can describe any target,
/// independent of the host the code runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct CpuIsaInfo {
    /// Advanced SIMD (128-bit vectors).
    pub neon: bool,
    /// Half-precision vector arithmetic.
    pub fp16: bool,
    /// BFloat16 arithmetic.
    pub bf16: bool,
    /// 8-bit integer dot product.
    pub dot: bool,
    /// 8-bit integer matrix multiply.
    pub i8mm: bool,
    /// Scalable Vector Extension.
    pub sve: bool,
    pub sve2: bool,
}

impl CpuIsaInfo {
    /// No extensions: selects the portable kernels.
    pub fn portable() -> Self {
        Self::default()
    }

    /// Baseline ARMv8-A: NEON only.
    pub fn neon() -> Self {
        Self {
            neon: true,
            ..Self::default()
        }
    }

    /// Queries the running CPU.
    pub fn detect() -> Self {
        detect_host()
    }

    /// Builds the flags from the `Features` line of `/proc/cpuinfo`,
    /// e.g. `"fp asimd evtstrm aes crc32 asimdhp asimddp sve"`.
    pub fn from_hwcaps(features: &str) -> Self {
        let mut isa = Self::default();
        for cap in features.split_whitespace() {
            match cap {
                "asimd" => isa.neon = true,
                "asimdhp" | "fphp" => isa.fp16 = true,
                "bf16" => isa.bf16 = true,
                "asimddp" => isa.dot = true,
                "i8mm" => isa.i8mm = true,
                "sve" => isa.sve = true,
                "sve2" => isa.sve2 = true,
                _ => {}
            }
        }
        // Every SVE2 implementation also implements SVE.
        isa.sve |= isa.sve2;
        isa
    }
}

#[cfg(target_arch = "aarch64")]
fn detect_host() -> CpuIsaInfo {
    use std::arch::is_aarch64_feature_detected;
    CpuIsaInfo {
        neon: is_aarch64_feature_detected!("neon"),
        fp16: is_aarch64_feature_detected!("fp16"),
        bf16: is_aarch64_feature_detected!("bf16"),
        dot: is_aarch64_feature_detected!("dotprod"),
        i8mm: is_aarch64_feature_detected!("i8mm"),
        sve: is_aarch64_feature_detected!("sve"),
        sve2: is_aarch64_feature_detected!("sve2"),
    }
}

#[cfg(not(target_arch = "aarch64"))]
fn detect_host() -> CpuIsaInfo {
    CpuIsaInfo::portable()
}

impl fmt::Display for CpuIsaInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            ("neon", self.neon),
            ("fp16", self.fp16),
            ("bf16", self.bf16),
            ("dot", self.dot),
            ("i8mm", self.i8mm),
            ("sve", self.sve),
            ("sve2", self.sve2),
        ];
        let enabled: Vec<&str> = flags.iter().filter(|(_, on)| *on).map(|(n, _)| *n).collect();
        if enabled.is_empty() {
            f.write_str("portable")
        } else {
            f.write_str(&enabled.join(" "))
        }
    }
}
