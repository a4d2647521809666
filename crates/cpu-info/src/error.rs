// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for CPU feature discovery.

/// Errors that can occur when reading CPU descriptions from the system.
#[derive(Debug, thiserror::Error)]
pub enum CpuInfoError {
    /// Failed to read a sysfs or procfs file.
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },

    /// A system file did not have the expected format.
    #[error("failed to parse {path}: {detail}")]
    ParseError { path: String, detail: String },

    /// The expected path does not exist on this host.
    #[error("system path not found: {path}")]
    NotAvailable { path: String },
}
