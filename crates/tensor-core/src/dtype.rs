// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Supported tensor element data types.

use std::fmt;

/// Enumerates the element types a [`crate::TensorInfo`] can describe.
///
/// Kernels use `DType` to pick a micro-kernel and to decide whether the
/// stored integers carry quantization parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DType {
    /// Unsigned 8-bit integer.
    U8,
    /// Signed 8-bit integer.
    S8,
    /// Unsigned 16-bit integer.
    U16,
    /// Signed 16-bit integer.
    S16,
    /// Signed 32-bit integer.
    S32,
    /// 16-bit IEEE 754 floating point.
    F16,
    /// 32-bit IEEE 754 floating point.
    F32,
    /// Asymmetric quantized unsigned 8-bit (scale + offset).
    QAsymm8,
    /// Asymmetric quantized signed 8-bit (scale + offset).
    QAsymm8Signed,
    /// Symmetric quantized signed 8-bit (scale only).
    QSymm8,
    /// Symmetric quantized signed 8-bit with one scale per channel.
    QSymm8PerChannel,
    /// Symmetric quantized signed 16-bit.
    QSymm16,
    /// Asymmetric quantized unsigned 16-bit.
    QAsymm16,
}

impl DType {
    /// Returns the size of a single element in bytes.
    pub fn size_bytes(self) -> usize {
        match self {
            DType::U8 | DType::S8 | DType::QAsymm8 | DType::QAsymm8Signed => 1,
            DType::QSymm8 | DType::QSymm8PerChannel => 1,
            DType::U16 | DType::S16 | DType::F16 | DType::QSymm16 | DType::QAsymm16 => 2,
            DType::S32 | DType::F32 => 4,
        }
    }

    /// Returns the conventional upper-case label for this data type.
    pub fn as_str(self) -> &'static str {
        match self {
            DType::U8 => "U8",
            DType::S8 => "S8",
            DType::U16 => "U16",
            DType::S16 => "S16",
            DType::S32 => "S32",
            DType::F16 => "F16",
            DType::F32 => "F32",
            DType::QAsymm8 => "QASYMM8",
            DType::QAsymm8Signed => "QASYMM8_SIGNED",
            DType::QSymm8 => "QSYMM8",
            DType::QSymm8PerChannel => "QSYMM8_PER_CHANNEL",
            DType::QSymm16 => "QSYMM16",
            DType::QAsymm16 => "QASYMM16",
        }
    }

    /// Returns `true` for types whose integers are mapped to reals through
    /// a [`crate::QuantizationInfo`].
    pub fn is_quantized(self) -> bool {
        matches!(
            self,
            DType::QAsymm8
                | DType::QAsymm8Signed
                | DType::QSymm8
                | DType::QSymm8PerChannel
                | DType::QSymm16
                | DType::QAsymm16
        )
    }

    /// Returns `true` for the asymmetric quantized types (those using an offset).
    pub fn is_asymmetric(self) -> bool {
        matches!(self, DType::QAsymm8 | DType::QAsymm8Signed | DType::QAsymm16)
    }

    /// Returns `true` for floating-point types.
    pub fn is_float(self) -> bool {
        matches!(self, DType::F16 | DType::F32)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
