// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! Tensor metadata and storage shared by the CPU kernels.
//!
//! This crate provides:
//! - [`TensorInfo`]: shape, [`DType`], [`DataLayout`], [`Padding`] and
//!   [`QuantizationInfo`], with byte strides and element offsets.
//! - [`Tensor`] / [`TensorView`]: an owned byte buffer and a borrowed view,
//!   with typed access through the [`Element`] trait.
//! - [`Window`]: per-axis iteration ranges that kernels execute over and
//!   schedulers split across workers.
//! - Quantization arithmetic ([`quantize`], [`dequantize`],
//!   [`compute_requantization_scale_offset`]) under a [`RoundingPolicy`].
//!
//! Axes are ordered outermost first; NCHW is `[batches, channels, height, width]`.

mod dtype;
mod element;
mod error;
mod info;
mod layout;
pub mod quantization;
mod rounding;
mod shape;
mod tensor;
mod window;

pub use dtype::DType;
pub use element::Element;
pub use error::TensorError;
pub use half::f16;
pub use info::{Addressing, TensorInfo};
pub use layout::{DataLayout, DataLayoutDimension, Padding};
pub use quantization::{
    compute_requantization_scale_offset, dequantize, quantize, requantize, QuantizationInfo,
    Quantized, UniformQuantizationInfo,
};
pub use rounding::{round_half_away_from_zero, round_half_even, RoundingPolicy, VECTOR_CONVERT_ROUNDING};
pub use shape::Shape;
pub use tensor::{Tensor, TensorView};
pub use window::{Dimension, Window};
