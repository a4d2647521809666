// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for kernel validation, selection and execution.

use tensor_core::{DType, TensorError};

use crate::TensorSlot;

/// Errors produced by kernel `validate`, `configure` and `run_op`.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// The tensors or parameters do not describe a valid configuration.
    #[error("{kernel}: {reason}")]
    Validation { kernel: &'static str, reason: String },

    /// No registered micro-kernel accepts this data type on this CPU.
    #[error("{kernel}: no micro-kernel for dtype {dtype} with {detail}")]
    NoImplementation {
        kernel: &'static str,
        dtype: DType,
        detail: String,
    },

    /// A combination that passed validation has no code path.
    #[error("{kernel}: not implemented: {detail}")]
    NotImplemented { kernel: &'static str, detail: String },

    /// `run_op` was given a window that is not inside the configured one.
    #[error("{kernel}: execution window is not a sub-window of the configured window")]
    InvalidSubWindow { kernel: &'static str },

    /// A required tensor is missing from the pack.
    #[error("missing tensor in slot {0:?}")]
    MissingTensor(TensorSlot),

    #[error(transparent)]
    Tensor(#[from] TensorError),
}

impl KernelError {
    pub(crate) fn validation(kernel: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            kernel,
            reason: reason.into(),
        }
    }
}

/// Returns a [`KernelError::Validation`] from the enclosing function when
/// `cond` is true.
macro_rules! return_error_on {
    ($cond:expr, $kernel:expr, $($fmt:tt)+) => {
        if $cond {
            return Err($crate::KernelError::validation($kernel, format!($($fmt)+)));
        }
    };
}

pub(crate) use return_error_on;
