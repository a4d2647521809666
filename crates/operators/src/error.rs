// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the operators.

/// Errors from operator configuration and execution.
#[derive(Debug, thiserror::Error)]
pub enum OperatorError {
    /// The kernel rejected the configuration or failed while running.
    #[error("kernel error: {0}")]
    Kernel(#[from] cpu_kernels::KernelError),

    /// The scheduler could not dispatch the kernel.
    #[error("scheduler error: {0}")]
    Scheduler(#[from] scheduler::SchedulerError),

    /// A tensor operation failed.
    #[error("tensor error: {0}")]
    Tensor(#[from] tensor_core::TensorError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A tensor passed to `run` does not match the configured description.
    #[error("invalid tensor: {0}")]
    InvalidTensor(String),
}
