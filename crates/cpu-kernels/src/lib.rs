// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # cpu-kernels
//!
//! Stateless CPU kernels with per-ISA micro-kernel dispatch.
//!
//! A kernel is validated and configured once against [`TensorInfo`]s, then
//! run any number of times over sub-windows of its execution window:
//! ```text
//! validate(infos) → configure(infos) → run_op(inputs, tile, window) …
//! ```
//! Micro-kernels live in ordered tables ([`registry`]); the first entry
//! whose predicate accepts the data type and [`CpuIsaInfo`] is used.
//!
//! Kernels never allocate or reference tensors between runs. Writes go
//! through an [`OutputTile`], so a scheduler can hand disjoint windows of
//! one destination to several threads.
//!
//! [`TensorInfo`]: tensor_core::TensorInfo
//! [`CpuIsaInfo`]: cpu_info::CpuIsaInfo

mod error;
mod kernel;
mod pack;
mod types;

pub mod activation;
pub mod registry;
pub mod scale;

pub use activation::{ActivationFunction, ActivationLayerInfo, CpuActivationKernel};
pub use error::KernelError;
pub use kernel::CpuKernel;
pub use pack::{KernelInputs, OutputTile, SharedOutput, TensorPack, TensorSlot};
pub use scale::{CpuScaleKernel, ScaleArgs, ScaleKernelSelector, ScaleMicroKernel, ScaleUKernel};
pub use types::{BorderMode, InterpolationPolicy, PixelValue, SamplingPolicy, ScaleKernelInfo};
