// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Affine quantization: `real = (quantized - offset) * scale`.
//!
//! The generic [`quantize`] / [`dequantize`] pair works for every quantized
//! storage type. The named helpers (`quantize_qasymm8`, ...) fix the storage
//! type and, for the symmetric encodings, force the offset to zero.

use crate::{Element, RoundingPolicy};

/// A single `(scale, offset)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct UniformQuantizationInfo {
    pub scale: f32,
    pub offset: i32,
}

impl UniformQuantizationInfo {
    pub fn new(scale: f32, offset: i32) -> Self {
        Self { scale, offset }
    }

    /// `true` if both fields hold their zero defaults.
    pub fn is_empty(&self) -> bool {
        self.scale == 0.0 && self.offset == 0
    }
}

/// Quantization parameters attached to a tensor.
///
/// Holds one entry for per-tensor quantization, or one scale per channel
/// (offsets optional) for per-channel encodings.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct QuantizationInfo {
    scales: Vec<f32>,
    offsets: Vec<i32>,
}

impl QuantizationInfo {
    /// Per-tensor asymmetric parameters.
    pub fn new(scale: f32, offset: i32) -> Self {
        Self {
            scales: vec![scale],
            offsets: vec![offset],
        }
    }

    /// Per-tensor symmetric parameters (offset zero).
    pub fn symmetric(scale: f32) -> Self {
        Self::new(scale, 0)
    }

    /// One scale per channel, symmetric.
    pub fn per_channel(scales: Vec<f32>) -> Self {
        Self {
            scales,
            offsets: Vec::new(),
        }
    }

    /// One `(scale, offset)` pair per channel.
    pub fn per_channel_with_offsets(scales: Vec<f32>, offsets: Vec<i32>) -> Self {
        Self { scales, offsets }
    }

    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    pub fn offsets(&self) -> &[i32] {
        &self.offsets
    }

    /// Collapses to the first entry, or the zero default when empty.
    pub fn uniform(&self) -> UniformQuantizationInfo {
        UniformQuantizationInfo {
            scale: self.scales.first().copied().unwrap_or(0.0),
            offset: self.offsets.first().copied().unwrap_or(0),
        }
    }

    /// Parameters of channel `channel`, falling back to offset zero when no
    /// per-channel offsets are stored.
    pub fn channel(&self, channel: usize) -> UniformQuantizationInfo {
        UniformQuantizationInfo {
            scale: self.scales.get(channel).copied().unwrap_or(0.0),
            offset: self.offsets.get(channel).copied().unwrap_or(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty() && self.offsets.is_empty()
    }
}

impl From<UniformQuantizationInfo> for QuantizationInfo {
    fn from(q: UniformQuantizationInfo) -> Self {
        Self::new(q.scale, q.offset)
    }
}

/// An integer storage type of a quantized tensor.
pub trait Quantized: Element {
    const QMIN: i32;
    const QMAX: i32;

    fn to_i32(self) -> i32;

    /// Clamps `value` to `[QMIN, QMAX]` and narrows.
    fn saturate(value: i32) -> Self;
}

macro_rules! impl_quantized {
    ($t:ty) => {
        impl Quantized for $t {
            const QMIN: i32 = <$t>::MIN as i32;
            const QMAX: i32 = <$t>::MAX as i32;

            #[inline]
            fn to_i32(self) -> i32 {
                self as i32
            }

            #[inline]
            fn saturate(value: i32) -> Self {
                value.clamp(Self::QMIN, Self::QMAX) as $t
            }
        }
    };
}

impl_quantized!(u8);
impl_quantized!(i8);
impl_quantized!(u16);
impl_quantized!(i16);

/// `clamp(round(value / scale, policy) + offset)`.
///
/// `qinfo.scale` must be non-zero.
#[inline]
pub fn quantize<T: Quantized>(
    value: f32,
    qinfo: &UniformQuantizationInfo,
    policy: RoundingPolicy,
) -> T {
    let quantized = policy.round(value / qinfo.scale).saturating_add(qinfo.offset);
    T::saturate(quantized)
}

/// `(value - offset) * scale`.
#[inline]
pub fn dequantize<T: Quantized>(value: T, qinfo: &UniformQuantizationInfo) -> f32 {
    (value.to_i32() - qinfo.offset) as f32 * qinfo.scale
}

pub fn quantize_qasymm8(value: f32, qinfo: &UniformQuantizationInfo, policy: RoundingPolicy) -> u8 {
    quantize(value, qinfo, policy)
}

pub fn dequantize_qasymm8(value: u8, qinfo: &UniformQuantizationInfo) -> f32 {
    dequantize(value, qinfo)
}

pub fn quantize_qasymm8_signed(
    value: f32,
    qinfo: &UniformQuantizationInfo,
    policy: RoundingPolicy,
) -> i8 {
    quantize(value, qinfo, policy)
}

pub fn dequantize_qasymm8_signed(value: i8, qinfo: &UniformQuantizationInfo) -> f32 {
    dequantize(value, qinfo)
}

pub fn quantize_qasymm16(value: f32, qinfo: &UniformQuantizationInfo, policy: RoundingPolicy) -> u16 {
    quantize(value, qinfo, policy)
}

pub fn dequantize_qasymm16(value: u16, qinfo: &UniformQuantizationInfo) -> f32 {
    dequantize(value, qinfo)
}

/// Symmetric 8-bit: the offset of `qinfo` is ignored.
pub fn quantize_qsymm8(value: f32, qinfo: &UniformQuantizationInfo, policy: RoundingPolicy) -> i8 {
    quantize(value, &UniformQuantizationInfo::new(qinfo.scale, 0), policy)
}

pub fn dequantize_qsymm8(value: i8, qinfo: &UniformQuantizationInfo) -> f32 {
    value as f32 * qinfo.scale
}

/// Symmetric 16-bit: the offset of `qinfo` is ignored.
pub fn quantize_qsymm16(value: f32, qinfo: &UniformQuantizationInfo, policy: RoundingPolicy) -> i16 {
    quantize(value, &UniformQuantizationInfo::new(qinfo.scale, 0), policy)
}

pub fn dequantize_qsymm16(value: i16, qinfo: &UniformQuantizationInfo) -> f32 {
    value as f32 * qinfo.scale
}

/// Symmetric 8-bit with the scale of `channel`.
pub fn quantize_qsymm8_per_channel(
    value: f32,
    qinfo: &QuantizationInfo,
    channel: usize,
    policy: RoundingPolicy,
) -> i8 {
    quantize_qsymm8(value, &qinfo.channel(channel), policy)
}

pub fn dequantize_qsymm8_per_channel(value: i8, qinfo: &QuantizationInfo, channel: usize) -> f32 {
    dequantize_qsymm8(value, &qinfo.channel(channel))
}

/// Derives the direct transform `q_o = q_i / scale + offset` between two
/// quantized encodings of the same real values.
///
/// `scale = s_out / s_in`, `offset = z_out - trunc(z_in * s_in / s_out)`.
pub fn compute_requantization_scale_offset(
    input: &UniformQuantizationInfo,
    output: &UniformQuantizationInfo,
) -> UniformQuantizationInfo {
    let scale = output.scale / input.scale;
    let offset = output.offset - (input.offset as f32 * input.scale / output.scale) as i32;
    UniformQuantizationInfo { scale, offset }
}

/// Applies a transform from [`compute_requantization_scale_offset`] to a
/// quantized integer.
#[inline]
pub fn requantize<I: Quantized, O: Quantized>(
    value: I,
    requant: &UniformQuantizationInfo,
    policy: RoundingPolicy,
) -> O {
    quantize(value.to_i32() as f32, requant, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_quantize_qasymm8() {
        let q = UniformQuantizationInfo::new(0.5, 10);
        assert_eq!(quantize_qasymm8(1.0, &q, RoundingPolicy::ToNearestUp), 12);
        assert_eq!(quantize_qasymm8(1.25, &q, RoundingPolicy::ToNearestUp), 13);
        assert_eq!(quantize_qasymm8(1.25, &q, RoundingPolicy::ToNearestEven), 12);
        assert_eq!(quantize_qasymm8(1.25, &q, RoundingPolicy::ToZero), 12);
        assert_eq!(quantize_qasymm8(1000.0, &q, RoundingPolicy::ToNearestUp), 255);
        assert_eq!(quantize_qasymm8(-1000.0, &q, RoundingPolicy::ToNearestUp), 0);
    }

    #[test]
    fn test_dequantize_signed() {
        let q = UniformQuantizationInfo::new(0.25, -3);
        assert_eq!(dequantize_qasymm8_signed(5, &q), 2.0);
        assert_eq!(
            quantize_qasymm8_signed(2.0, &q, RoundingPolicy::ToNearestUp),
            5
        );
    }

    #[test]
    fn test_symmetric_ignores_offset() {
        let q = UniformQuantizationInfo::new(0.1, 42);
        assert_eq!(quantize_qsymm8(-1.0, &q, RoundingPolicy::ToNearestUp), -10);
        assert!(approx_eq(dequantize_qsymm16(-10, &q), -1.0, 1e-6));
        assert_eq!(quantize_qsymm16(100_000.0, &q, RoundingPolicy::ToNearestUp), i16::MAX);
    }

    #[test]
    fn test_per_channel() {
        let q = QuantizationInfo::per_channel(vec![0.5, 2.0]);
        assert_eq!(quantize_qsymm8_per_channel(4.0, &q, 0, RoundingPolicy::ToNearestUp), 8);
        assert_eq!(quantize_qsymm8_per_channel(4.0, &q, 1, RoundingPolicy::ToNearestUp), 2);
        assert_eq!(dequantize_qsymm8_per_channel(3, &q, 1), 6.0);
    }

    #[test]
    fn test_uniform_degrades_to_first_entry() {
        let q = QuantizationInfo::per_channel_with_offsets(vec![0.5, 2.0], vec![3, 4]);
        assert_eq!(q.uniform(), UniformQuantizationInfo::new(0.5, 3));
        assert!(QuantizationInfo::default().uniform().is_empty());
        assert!(QuantizationInfo::default().is_empty());
        assert!(!q.is_empty());
    }

    #[test]
    fn test_requantization_scale_offset() {
        let input = UniformQuantizationInfo::new(0.5, 10);
        let output = UniformQuantizationInfo::new(1.0, 0);
        let requant = compute_requantization_scale_offset(&input, &output);
        assert_eq!(requant.scale, 2.0);
        assert_eq!(requant.offset, -5);

        // q = 12 encodes 1.0 in the input scheme and 1 in the output scheme.
        let q: u8 = requantize(12u8, &requant, RoundingPolicy::ToNearestUp);
        assert_eq!(q, 1);
    }

    proptest! {
        #[test]
        fn test_quantize_dequantize_within_one_step(
            x in -60.0f32..60.0,
            scale in 0.25f32..2.0,
            offset in 0i32..16,
        ) {
            let q = UniformQuantizationInfo::new(scale, offset);
            let lo = (0 - offset) as f32 * scale;
            let hi = (255 - offset) as f32 * scale;
            prop_assume!(x >= lo && x <= hi);
            let back = dequantize_qasymm8(quantize_qasymm8(x, &q, RoundingPolicy::ToNearestUp), &q);
            prop_assert!((back - x).abs() <= scale);
        }
    }
}
