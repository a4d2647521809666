// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor construction and access.

use crate::{DType, Shape};

/// Errors that can occur while building or accessing tensors.
#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    /// The provided buffer size does not match the size implied by the tensor info.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Two tensors have incompatible shapes for the requested operation.
    #[error("incompatible shapes for {op}: {lhs} vs {rhs}")]
    ShapeMismatch {
        op: &'static str,
        lhs: Shape,
        rhs: Shape,
    },

    /// The requested data type is not supported for this operation.
    #[error("unsupported dtype {dtype} for operation {op}")]
    UnsupportedDType { op: &'static str, dtype: DType },

    /// The tensor does not have the rank the operation requires.
    #[error("{op} expects rank {expected}, got {actual}")]
    InvalidRank {
        op: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A coordinate lies outside the tensor shape.
    #[error("coordinates {coords:?} are out of bounds for shape {shape}")]
    OutOfBounds { coords: Vec<usize>, shape: Shape },

    /// A numeric computation failed (e.g., NaN or overflow).
    #[error("numeric error in {op}: {detail}")]
    Numeric { op: &'static str, detail: String },
}
