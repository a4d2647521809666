// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Interleaved (`[N, H, W, C]`) scale kernels.
//!
//! Channels are contiguous, so every destination pixel resolves its source
//! taps once and then sweeps the channel axis: a body of `LANES`-wide
//! blocks followed by a scalar tail.

use tensor_core::{Element, Window};

use super::border::BorderSampler;
use super::utils::{bilinear_source_coord, bilinear_weights, clamp_index, delta_bilinear, nearest_source_index};
use super::{Geometry, ScaleArgs, KERNEL};
use crate::{KernelError, OutputTile};

/// Nearest-neighbour is a pure copy: each pixel's channel run is moved with
/// one byte copy.
pub(crate) fn nearest<T: Element>(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    let g = Geometry::new(args, dst.info())?;
    let offsets = args.offsets()?;
    let offsets_at = offsets.info().addressing();
    let src_at = args.src.info().addressing();
    let src_bytes = args.src.as_bytes();
    let channels = window.dim(3);

    for n in window.dim(0).range() {
        for y in window.dim(1).range() {
            let in_y = nearest_source_index(y, g.hr, args.sampling_offset, args.align_corners, g.in_h);
            for x in window.dim(2).range() {
                let in_x = clamp_index(offsets.read::<i32>(offsets_at.offset(&[y, x])) as i64, g.in_w);
                if channels.step() == 1 {
                    let start = src_at.offset(&[n, in_y, in_x, channels.start()]);
                    let end = start + (channels.end() - channels.start()) * T::SIZE;
                    dst.store_run(&[n, y, x, channels.start()], &src_bytes[start..end]);
                } else {
                    for c in channels.range() {
                        let value: T = args.src.read(src_at.offset(&[n, in_y, in_x, c]));
                        dst.store(&[n, y, x, c], value);
                    }
                }
            }
        }
    }
    Ok(())
}

/// Bilinear blend in `f32` of the values produced by `load`; `store` maps
/// the blended value back to `T`.
pub(crate) fn bilinear<T, const LANES: usize, L, S>(
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
    let border = load(sampler.border_value());
    let channels = window.dim(3);

    for n in window.dim(0).range() {
        for y in window.dim(1).range() {
            let (in_y, _) = bilinear_source_coord(y, g.hr, args.sampling_offset);
            for x in window.dim(2).range() {
                let in_x = offsets.read::<i32>(offsets_at.offset(&[y, x]));
                let fx = dx.read::<f32>(dx_at.offset(&[y, x]));
                let fy = dy.read::<f32>(dy_at.offset(&[y, x]));

                let taps = [(in_y, in_x), (in_y, in_x + 1), (in_y + 1, in_x), (in_y + 1, in_x + 1)]
                    .map(|(ty, tx)| {
                        sampler
                            .resolve(ty, tx, g.in_h, g.in_w)
                            .map(|(sy, sx)| src_at.offset(&[n, sy, sx, 0]))
                    });
                let read = |tap: Option<usize>, c: usize| -> f32 {
                    tap.map_or(border, |base| load(args.src.read(base + c * T::SIZE)))
                };

                let mut c = channels.start();
                if channels.step() == 1 {
                    let weights = bilinear_weights(fx, fy);
                    while c + LANES <= channels.end() {
                        let block = taps.map(|tap| {
                            let mut lanes = [0.0f32; LANES];
                            for (lane, value) in lanes.iter_mut().enumerate() {
                                *value = read(tap, c + lane);
                            }
                            lanes
                        });
                        for (lane, value) in blend_block(&block, &weights).into_iter().enumerate() {
                            dst.store(&[n, y, x, c + lane], store(value));
                        }
                        c += LANES;
                    }
                }
                while c < channels.end() {
                    let value = delta_bilinear(
                        read(taps[0], c),
                        read(taps[1], c),
                        read(taps[2], c),
                        read(taps[3], c),
                        fx,
                        fy,
                    );
                    dst.store(&[n, y, x, c], store(value));
                    c += channels.step();
                }
            }
        }
    }
    Ok(())
}

/// Weighted sum of four tap blocks, lane by lane, in the same order as
/// [`delta_bilinear`] so the body and the tail agree bit for bit.
#[inline]
fn blend_block<const LANES: usize>(taps: &[[f32; LANES]; 4], weights: &[f32; 4]) -> [f32; LANES] {
    let mut out = [0.0f32; LANES];
    for (lane, value) in out.iter_mut().enumerate() {
        *value = taps[0][lane] * weights[0]
            + taps[1][lane] * weights[1]
            + taps[2][lane] * weights[2]
            + taps[3][lane] * weights[3];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_block_matches_scalar() {
        let taps = [[1.0, 5.0], [2.0, 6.0], [3.0, 7.0], [4.0, 8.0]];
        let (fx, fy) = (0.3, 0.8);
        let out = blend_block(&taps, &bilinear_weights(fx, fy));
        assert_eq!(out[0], delta_bilinear(1.0, 2.0, 3.0, 4.0, fx, fy));
        assert_eq!(out[1], delta_bilinear(5.0, 6.0, 7.0, 8.0, fx, fy));
    }
}
