// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the schedulers.

use cpu_kernels::KernelError;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// The worker pool could not be created.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),

    /// The split axis does not exist in the window.
    #[error("cannot split a rank-{rank} window along axis {axis}")]
    InvalidSplitAxis { axis: usize, rank: usize },

    /// A worker's kernel invocation failed.
    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),
}
