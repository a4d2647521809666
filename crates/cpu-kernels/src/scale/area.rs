// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Area (box-filter) downscaling for planar U8 images.

use tensor_core::Window;

use super::{Geometry, ScaleArgs, KERNEL};
use crate::{BorderMode, KernelError, OutputTile};

pub(crate) fn scale_area_nchw_u8(
    args: &ScaleArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    if args.border_mode == BorderMode::Replicate {
        return Err(KernelError::NotImplemented {
            kernel: KERNEL,
            detail: "AREA with REPLICATE border".to_string(),
        });
    }
    let g = Geometry::new(args, dst.info())?;
    let src_at = args.src.info().addressing();

    for n in window.dim(0).range() {
        for c in window.dim(1).range() {
            let pixel = |y: usize, x: usize| -> u8 { args.src.read(src_at.offset(&[n, c, y, x])) };
            for y in window.dim(2).range() {
                for x in window.dim(3).range() {
                    let value = pixel_area_c1u8_clamp(&pixel, g.in_w, g.in_h, g.wr, g.hr, x, y);
                    dst.store(&[n, c, y, x], value);
                }
            }
        }
    }
    Ok(())
}

/// Mean of the `width x height` source pixels covered by destination pixel
/// `(x, y)`, with every read clamped into the plane.
pub fn pixel_area_c1u8_clamp(
    pixel: impl Fn(usize, usize) -> u8,
    width: usize,
    height: usize,
    wr: f32,
    hr: f32,
    x: usize,
    y: usize,
) -> u8 {
    let (xf, yf) = (x as f32, y as f32);
    let (wf, hf) = (width as f32, height as f32);

    // Sampling position of the destination pixel centre.
    let in_x = (xf + 0.5) * wr - 0.5;
    let in_y = (yf + 0.5) * hr - 0.5;

    // Box edges relative to the sampling position.
    let mut x_from = (xf * wr - 0.5 - in_x).floor() as i32;
    let mut y_from = (yf * hr - 0.5 - in_y).floor() as i32;
    let mut x_to = ((xf + 1.0) * wr - 0.5 - in_x).ceil() as i32;
    let mut y_to = ((yf + 1.0) * hr - 0.5 - in_y).ceil() as i32;

    let in_x = in_x.clamp(-1.0, wf);
    let in_y = in_y.clamp(-1.0, hf);

    if in_x + (x_from as f32) < -1.0 {
        x_from = -1;
    }
    if in_y + (y_from as f32) < -1.0 {
        y_from = -1;
    }
    if in_x + (x_to as f32) > wf {
        x_to = (wf - in_x) as i32;
    }
    if in_y + (y_to as f32) > hf {
        y_to = (hf - in_y) as i32;
    }

    let xi = in_x.floor() as i32;
    let yi = in_y.floor() as i32;
    let x_elements = (x_to - x_from + 1).max(1);
    let y_elements = (y_to - y_from + 1).max(1);

    let clamp = |v: i32, size: usize| v.clamp(0, size as i32 - 1) as usize;
    let mut sum = 0u32;
    for j in (yi + y_from)..(yi + y_from + y_elements) {
        let row = clamp(j, height);
        for i in (xi + x_from)..(xi + x_from + x_elements) {
            sum += u32::from(pixel(row, clamp(i, width)));
        }
    }
    (sum / (x_elements * y_elements) as u32) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_plane_stays_uniform() {
        let pixel = |_: usize, _: usize| 77u8;
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(pixel_area_c1u8_clamp(pixel, 6, 4, 2.0, 2.0, x, y), 77);
            }
        }
    }

    #[test]
    fn test_box_mean_clamps_at_edges() {
        // Columns hold their own index; 4 -> 2 covers columns -1..=1 for the
        // first output pixel, and column -1 is clamped to 0.
        let pixel = |_: usize, x: usize| (x * 30) as u8;
        assert_eq!(pixel_area_c1u8_clamp(pixel, 4, 1, 2.0, 1.0, 0, 0), 10);
        // Columns 1..=3 for the second pixel: (30 + 60 + 90) / 3.
        assert_eq!(pixel_area_c1u8_clamp(pixel, 4, 1, 2.0, 1.0, 1, 0), 60);
    }
}
