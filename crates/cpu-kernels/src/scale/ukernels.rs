// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-type scale micro-kernels.
//!
//! Each entry routes `(layout, policy)` to the planar or interleaved kernel
//! with the conversions of its element type. Backends share one body and
//! differ only in how many channels the interleaved bilinear loop handles
//! per block: 128-bit for NEON, 256-bit for SVE, one element for the
//! generic kernels.

use tensor_core::{
    dequantize, f16, quantize, DataLayout, Element, Quantized, RoundingPolicy, Window,
    VECTOR_CONVERT_ROUNDING,
};

use super::{area, nchw, nhwc, ScaleArgs, KERNEL};
use crate::{BorderMode, InterpolationPolicy, KernelError, OutputTile};

use DataLayout::{Nchw, Nhwc};
use InterpolationPolicy::{Area, Bilinear, NearestNeighbor};

fn not_implemented(args: &ScaleArgs<'_>) -> KernelError {
    KernelError::NotImplemented {
        kernel: KERNEL,
        detail: format!(
            "{} {} for {}",
            args.data_layout,
            args.policy,
            args.src.dtype()
        ),
    }
}

/// Integer conversion of the interleaved block body.
#[inline]
fn vector_convert<T: Element>(value: f32) -> T {
    T::from_f32(VECTOR_CONVERT_ROUNDING.apply(value))
}

fn float_scale<T: Element, const LANES: usize>(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    match (args.data_layout, args.policy) {
        (Nchw, NearestNeighbor) => nchw::nearest::<T>(args, dst, window),
        (Nchw, Bilinear) => nchw::bilinear(args, dst, window, T::to_f32, T::from_f32),
        (Nhwc, NearestNeighbor) => nhwc::nearest::<T>(args, dst, window),
        (Nhwc, Bilinear) => nhwc::bilinear::<T, LANES, _, _>(args, dst, window, T::to_f32, T::from_f32),
        _ => Err(not_implemented(args)),
    }
}

/// Output truncates, except for the interleaved REPLICATE body, which uses
/// the block conversion of the backend.
fn integer_scale<T: Element, const LANES: usize>(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    match (args.data_layout, args.policy, args.border_mode) {
        (Nchw, NearestNeighbor, _) => nchw::nearest::<T>(args, dst, window),
        (Nchw, Bilinear, _) => nchw::bilinear(args, dst, window, T::to_f32, T::from_f32),
        (Nhwc, NearestNeighbor, _) => nhwc::nearest::<T>(args, dst, window),
        (Nhwc, Bilinear, BorderMode::Replicate) => {
            nhwc::bilinear::<T, LANES, _, _>(args, dst, window, T::to_f32, vector_convert::<T>)
        }
        (Nhwc, Bilinear, _) => nhwc::bilinear::<T, LANES, _, _>(args, dst, window, T::to_f32, T::from_f32),
        _ => Err(not_implemented(args)),
    }
}

fn u8_scale<const LANES: usize>(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    match (args.data_layout, args.policy) {
        (Nchw, Area) => area::scale_area_nchw_u8(args, dst, window),
        _ => integer_scale::<u8, LANES>(args, dst, window),
    }
}

fn s8_scale<const LANES: usize>(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    match (args.data_layout, args.policy, args.border_mode) {
        (Nhwc, Bilinear, BorderMode::Replicate) => {
            nhwc::bilinear::<i8, LANES, _, _>(args, dst, window, i8::to_f32, vector_convert::<i8>)
        }
        _ => Err(not_implemented(args)),
    }
}

/// Dequantizes the taps, blends in `f32` and quantizes to the destination
/// parameters, rounding half away from zero. The interleaved REPLICATE body
/// rounds with `replicate_rounding` instead.
///
/// QASYMM8 passes `ToNearestUp` on every target, so its interleaved output
/// matches the planar output even where the signed path truncates.
fn quantized_scale<T: Quantized, const LANES: usize>(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
    replicate_rounding: RoundingPolicy,
) -> Result<(), KernelError> {
    let iq = args.src.info().quantization().uniform();
    let oq = dst.info().quantization().uniform();
    let load = |v: T| dequantize(v, &iq);
    let rounding = match args.border_mode {
        BorderMode::Replicate => replicate_rounding,
        _ => RoundingPolicy::ToNearestUp,
    };
    match (args.data_layout, args.policy) {
        (Nchw, NearestNeighbor) => nchw::nearest::<T>(args, dst, window),
        (Nchw, Bilinear) => nchw::bilinear(args, dst, window, load, |v| {
            quantize::<T>(v, &oq, RoundingPolicy::ToNearestUp)
        }),
        (Nhwc, NearestNeighbor) => nhwc::nearest::<T>(args, dst, window),
        (Nhwc, Bilinear) => nhwc::bilinear::<T, LANES, _, _>(args, dst, window, load, |v| {
            quantize::<T>(v, &oq, rounding)
        }),
        _ => Err(not_implemented(args)),
    }
}

// ── Channels per block ──────────────────────────────────────────

const NEON_BYTES: usize = 16;
const SVE_BYTES: usize = 32;

// ── SVE ─────────────────────────────────────────────────────────

pub(crate) fn fp16_sve_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    float_scale::<f16, { SVE_BYTES / 2 }>(args, dst, window)
}

pub(crate) fn fp32_sve_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    float_scale::<f32, { SVE_BYTES / 4 }>(args, dst, window)
}

pub(crate) fn qasymm8_sve_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    quantized_scale::<u8, SVE_BYTES>(args, dst, window, RoundingPolicy::ToNearestUp)
}

pub(crate) fn qasymm8_signed_sve_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    quantized_scale::<i8, SVE_BYTES>(args, dst, window, VECTOR_CONVERT_ROUNDING)
}

pub(crate) fn u8_sve_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    u8_scale::<SVE_BYTES>(args, dst, window)
}

pub(crate) fn s16_sve_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    integer_scale::<i16, { SVE_BYTES / 2 }>(args, dst, window)
}

// ── NEON ────────────────────────────────────────────────────────

pub(crate) fn fp16_neon_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    float_scale::<f16, { NEON_BYTES / 2 }>(args, dst, window)
}

pub(crate) fn fp32_neon_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    float_scale::<f32, { NEON_BYTES / 4 }>(args, dst, window)
}

pub(crate) fn qasymm8_neon_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    quantized_scale::<u8, NEON_BYTES>(args, dst, window, RoundingPolicy::ToNearestUp)
}

pub(crate) fn qasymm8_signed_neon_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    quantized_scale::<i8, NEON_BYTES>(args, dst, window, VECTOR_CONVERT_ROUNDING)
}

pub(crate) fn u8_neon_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    u8_scale::<NEON_BYTES>(args, dst, window)
}

pub(crate) fn s8_neon_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    s8_scale::<NEON_BYTES>(args, dst, window)
}

pub(crate) fn s16_neon_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    integer_scale::<i16, { NEON_BYTES / 2 }>(args, dst, window)
}

// ── Generic ─────────────────────────────────────────────────────

pub(crate) fn fp16_generic_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    float_scale::<f16, 1>(args, dst, window)
}

pub(crate) fn fp32_generic_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    float_scale::<f32, 1>(args, dst, window)
}

pub(crate) fn qasymm8_generic_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    quantized_scale::<u8, 1>(args, dst, window, RoundingPolicy::ToNearestUp)
}

pub(crate) fn qasymm8_signed_generic_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    quantized_scale::<i8, 1>(args, dst, window, VECTOR_CONVERT_ROUNDING)
}

pub(crate) fn u8_generic_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    u8_scale::<1>(args, dst, window)
}

pub(crate) fn s8_generic_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    s8_scale::<1>(args, dst, window)
}

pub(crate) fn s16_generic_scale(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    integer_scale::<i16, 1>(args, dst, window)
}
