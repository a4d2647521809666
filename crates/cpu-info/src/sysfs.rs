// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Readers for `/proc/cpuinfo` and `/sys/devices/system/cpu`.

use std::path::Path;

use crate::{CpuInfoError, CpuIsaInfo};

/// Base sysfs path for CPU information.
pub(crate) const CPU_BASE: &str = "/sys/devices/system/cpu";

pub(crate) const PROC_CPUINFO: &str = "/proc/cpuinfo";

/// Reads a sysfs/procfs file and returns its trimmed content.
pub(crate) fn read_sysfs_file(path: &Path) -> Result<String, CpuInfoError> {
    if !path.exists() {
        return Err(CpuInfoError::NotAvailable {
            path: path.display().to_string(),
        });
    }
    std::fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|e| CpuInfoError::ReadError {
            path: path.display().to_string(),
            source: e,
        })
}

/// Parses the first `Features` line of a `/proc/cpuinfo` dump.
pub(crate) fn read_cpuinfo_features(path: &Path) -> Result<CpuIsaInfo, CpuInfoError> {
    let content = read_sysfs_file(path)?;
    parse_cpuinfo_features(&content).ok_or_else(|| CpuInfoError::ParseError {
        path: path.display().to_string(),
        detail: "no 'Features' line".to_string(),
    })
}

fn parse_cpuinfo_features(content: &str) -> Option<CpuIsaInfo> {
    content.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        (key.trim() == "Features").then(|| CpuIsaInfo::from_hwcaps(value))
    })
}

/// Determines the number of online CPU cores.
///
/// Tries `/sys/devices/system/cpu/online` first (e.g., `"0-3"` → 4 cores),
/// then falls back to `std::thread::available_parallelism()`.
pub(crate) fn read_online_cores() -> Result<usize, CpuInfoError> {
    let online_path = format!("{CPU_BASE}/online");
    if let Ok(content) = read_sysfs_file(Path::new(&online_path)) {
        if let Some(count) = parse_cpu_range(&content) {
            return Ok(count);
        }
    }

    std::thread::available_parallelism()
        .map(|n| n.get())
        .map_err(|e| CpuInfoError::ReadError {
            path: CPU_BASE.to_string(),
            source: e,
        })
}

/// Parses a CPU range string like `"0-3"` → 4, `"0"` → 1, `"0,2-3"` → 3.
pub(crate) fn parse_cpu_range(s: &str) -> Option<usize> {
    let mut total = 0usize;
    for part in s.split(',') {
        let part = part.trim();
        if let Some((start_s, end_s)) = part.split_once('-') {
            let start: usize = start_s.trim().parse().ok()?;
            let end: usize = end_s.trim().parse().ok()?;
            total += end.checked_sub(start)? + 1;
        } else {
            let _: usize = part.parse().ok()?;
            total += 1;
        }
    }
    (total > 0).then_some(total)
}
