// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Planar (`[N, C, H, W]`) scale kernels, one destination pixel at a time.

use tensor_core::{Element, Window};

use super::border::BorderSampler;
use super::utils::{bilinear_source_coord, clamp_index, delta_bilinear, nearest_source_index};
use super::{Geometry, ScaleArgs, KERNEL};
use crate::{KernelError, OutputTile};

pub(crate) fn nearest<T: Element>(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    let g = Geometry::new(args, dst.info())?;
    let offsets = args.offsets()?;
    let offsets_at = offsets.info().addressing();
    let src_at = args.src.info().addressing();

    for n in window.dim(0).range() {
        for c in window.dim(1).range() {
            for y in window.dim(2).range() {
                let in_y = nearest_source_index(y, g.hr, args.sampling_offset, args.align_corners, g.in_h);
                for x in window.dim(3).range() {
                    let in_x = clamp_index(offsets.read::<i32>(offsets_at.offset(&[y, x])) as i64, g.in_w);
                    let value: T = args.src.read(src_at.offset(&[n, c, in_y, in_x]));
                    dst.store(&[n, c, y, x], value);
                }
            }
        }
    }
    Ok(())
}

/// Bilinear blend in `f32` of the values produced by `load`; `store` maps
/// the blended value back to `T`.
pub(crate) fn bilinear<T, L, S>(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
    load: L,
    store: S,
) -> Result<(), KernelError>
where
    T: Element,
    L: Fn(T) -> f32,
    S: Fn(f32) -> T,
{
    let g = Geometry::new(args, dst.info())?;
    let (offsets, dx, dy) = (args.offsets()?, args.dx()?, args.dy()?);
    let (offsets_at, dx_at, dy_at) = (
        offsets.info().addressing(),
        dx.info().addressing(),
        dy.info().addressing(),
    );
    let src_at = args.src.info().addressing();
    let sampler = BorderSampler::<T>::new(KERNEL, args.border_mode, args.constant_border_value)?;
    let border = sampler.border_value();

    for n in window.dim(0).range() {
        for c in window.dim(1).range() {
            let tap = |y: i32, x: i32| -> f32 {
                let value = sampler
                    .resolve(y, x, g.in_h, g.in_w)
                    .map_or(border, |(sy, sx)| args.src.read(src_at.offset(&[n, c, sy, sx])));
                load(value)
            };
            for y in window.dim(2).range() {
                let (in_y, _) = bilinear_source_coord(y, g.hr, args.sampling_offset);
                for x in window.dim(3).range() {
                    let in_x = offsets.read::<i32>(offsets_at.offset(&[y, x]));
                    let fx = dx.read::<f32>(dx_at.offset(&[y, x]));
                    let fy = dy.read::<f32>(dy_at.offset(&[y, x]));
                    let value = delta_bilinear(
                        tap(in_y, in_x),
                        tap(in_y, in_x + 1),
                        tap(in_y + 1, in_x),
                        tap(in_y + 1, in_x + 1),
                        fx,
                        fy,
                    );
                    dst.store(&[n, c, y, x], store(value));
                }
            }
        }
    }
    Ok(())
}
