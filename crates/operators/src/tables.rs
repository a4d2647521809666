// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-pixel coordinate tables consumed by the scale kernels.
//!
//! All three tables are `[out_height, out_width]`:
//! - `offsets` (S32): source column of the top-left tap, or the nearest
//!   source column.
//! - `dx` / `dy` (F32): fractional distance to the top-left tap along x / y.
//!   Zero for nearest-neighbour.

use cpu_kernels::scale::utils::{bilinear_source_coord, nearest_source_index};
use cpu_kernels::InterpolationPolicy;
use tensor_core::{DType, Shape, Tensor, TensorInfo};

use crate::OperatorError;

/// Geometry the tables are computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TableGeometry {
    pub policy: InterpolationPolicy,
    pub in_width: usize,
    pub width_ratio: f32,
    pub height_ratio: f32,
    pub sampling_offset: f32,
    pub align_corners: bool,
}

#[derive(Debug, Clone)]
pub struct SideTables {
    offsets: Tensor,
    dx: Tensor,
    dy: Tensor,
}

impl SideTables {
    /// Descriptions of `(offsets, dx, dy)` for an output of `out_height x out_width`.
    pub fn infos(out_height: usize, out_width: usize) -> (TensorInfo, TensorInfo, TensorInfo) {
        let shape = Shape::matrix(out_height, out_width);
        (
            TensorInfo::new(shape.clone(), DType::S32),
            TensorInfo::new(shape.clone(), DType::F32),
            TensorInfo::new(shape, DType::F32),
        )
    }

    /// Zero-filled tables.
    pub(crate) fn allocate(out_height: usize, out_width: usize) -> Self {
        let (offsets, dx, dy) = Self::infos(out_height, out_width);
        Self {
            offsets: Tensor::zeros(offsets),
            dx: Tensor::zeros(dx),
            dy: Tensor::zeros(dy),
        }
    }

    /// Fills every entry from `geometry`.
    pub(crate) fn populate(&mut self, geometry: &TableGeometry) -> Result<(), OperatorError> {
        let dims = self.offsets.shape().dims();
        let (out_height, out_width) = (dims[0], dims[1]);
        let off = geometry.sampling_offset;

        for y in 0..out_height {
            let (_, fy) = bilinear_source_coord(y, geometry.height_ratio, off);
            for x in 0..out_width {
                let (column, fx, fy) = match geometry.policy {
                    InterpolationPolicy::Bilinear => {
                        let (column, fx) = bilinear_source_coord(x, geometry.width_ratio, off);
                        (column, fx, fy)
                    }
                    _ => {
                        let column = nearest_source_index(
                            x,
                            geometry.width_ratio,
                            off,
                            geometry.align_corners,
                            geometry.in_width,
                        );
                        (column as i32, 0.0, 0.0)
                    }
                };
                self.offsets.set(&[y, x], column)?;
                self.dx.set(&[y, x], fx)?;
                self.dy.set(&[y, x], fy)?;
            }
        }
        tracing::debug!(
            policy = %geometry.policy,
            out_height,
            out_width,
            "populated scale side tables"
        );
        Ok(())
    }

    pub fn offsets(&self) -> &Tensor {
        &self.offsets
    }

    pub fn dx(&self) -> &Tensor {
        &self.dx
    }

    pub fn dy(&self) -> &Tensor {
        &self.dy
    }
}
