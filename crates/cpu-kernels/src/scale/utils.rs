// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Coordinate transforms shared by the scale operator and its kernels.

use tensor_core::round_half_away_from_zero;

use crate::{InterpolationPolicy, SamplingPolicy};

/// Source pixels per destination pixel along one axis.
///
/// With `align_corners` the first and last pixels of both axes coincide, so
/// the ratio is `(in - 1) / (out - 1)`; a single-pixel output then has
/// ratio 0. Otherwise the ratio is `in / out`.
pub fn calculate_resize_ratio(input_size: usize, output_size: usize, align_corners: bool) -> f32 {
    let offset = usize::from(align_corners);
    let input = input_size.saturating_sub(offset);
    let output = output_size.saturating_sub(offset);
    if output == 0 {
        0.0
    } else {
        input as f32 / output as f32
    }
}

/// Align-corners is only defined when sampling from pixel corners.
pub fn is_align_corners_allowed_sampling_policy(sampling_policy: SamplingPolicy) -> bool {
    sampling_policy == SamplingPolicy::TopLeft
}

/// AREA degenerates to nearest-neighbour when neither axis is downscaled.
pub fn effective_policy(policy: InterpolationPolicy, wr: f32, hr: f32) -> InterpolationPolicy {
    if policy == InterpolationPolicy::Area && wr <= 1.0 && hr <= 1.0 {
        InterpolationPolicy::NearestNeighbor
    } else {
        policy
    }
}

/// Source index sampled by destination index `dst` under nearest-neighbour.
///
/// Rounds half away from zero with `align_corners`, floors otherwise, and
/// clamps into `[0, src_size - 1]`.
#[inline]
pub fn nearest_source_index(
    dst: usize,
    ratio: f32,
    sampling_offset: f32,
    align_corners: bool,
    src_size: usize,
) -> usize {
    let coord = (dst as f32 + sampling_offset) * ratio;
    let index = if align_corners {
        round_half_away_from_zero(coord)
    } else {
        coord.floor()
    };
    clamp_index(index as i64, src_size)
}

/// Source coordinate of destination index `dst` under bilinear sampling,
/// split into the top-left tap and the fractional distance from it.
#[inline]
pub fn bilinear_source_coord(dst: usize, ratio: f32, sampling_offset: f32) -> (i32, f32) {
    let coord = (dst as f32 + sampling_offset) * ratio - sampling_offset;
    let floor = coord.floor();
    (floor as i32, coord - floor)
}

/// Weights of the top-left, top-right, bottom-left and bottom-right taps.
#[inline]
pub fn bilinear_weights(dx: f32, dy: f32) -> [f32; 4] {
    let dx1 = 1.0 - dx;
    let dy1 = 1.0 - dy;
    [dx1 * dy1, dx * dy1, dx1 * dy, dx * dy]
}

/// Blends four taps with [`bilinear_weights`].
#[inline]
pub fn delta_bilinear(a00: f32, a01: f32, a10: f32, a11: f32, dx: f32, dy: f32) -> f32 {
    let [w00, w01, w10, w11] = bilinear_weights(dx, dy);
    a00 * w00 + a01 * w01 + a10 * w10 + a11 * w11
}

/// Clamps a signed index into `[0, size - 1]`.
#[inline]
pub(crate) fn clamp_index(index: i64, size: usize) -> usize {
    index.clamp(0, size.saturating_sub(1) as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_resize_ratio() {
        assert_eq!(calculate_resize_ratio(4, 2, false), 2.0);
        assert_eq!(calculate_resize_ratio(2, 4, false), 0.5);
        assert!(approx_eq(calculate_resize_ratio(4, 3, true), 1.5, 1e-6));
        assert_eq!(calculate_resize_ratio(5, 1, true), 0.0);
        assert_eq!(calculate_resize_ratio(5, 0, false), 0.0);
    }

    #[test]
    fn test_effective_policy() {
        assert_eq!(
            effective_policy(InterpolationPolicy::Area, 0.5, 0.5),
            InterpolationPolicy::NearestNeighbor
        );
        assert_eq!(
            effective_policy(InterpolationPolicy::Area, 1.0, 1.0),
            InterpolationPolicy::NearestNeighbor
        );
        assert_eq!(effective_policy(InterpolationPolicy::Area, 2.0, 0.5), InterpolationPolicy::Area);
        assert_eq!(
            effective_policy(InterpolationPolicy::Bilinear, 0.5, 0.5),
            InterpolationPolicy::Bilinear
        );
    }

    #[test]
    fn test_nearest_downscale_center() {
        // 4 -> 2 with centre sampling picks source columns 1 and 3.
        let picks: Vec<usize> = (0..2).map(|x| nearest_source_index(x, 2.0, 0.5, false, 4)).collect();
        assert_eq!(picks, vec![1, 3]);
    }

    #[test]
    fn test_nearest_align_corners() {
        let ratio = calculate_resize_ratio(3, 5, true);
        let picks: Vec<usize> = (0..5).map(|x| nearest_source_index(x, ratio, 0.0, true, 3)).collect();
        assert_eq!(picks, vec![0, 1, 1, 2, 2]);
    }

    #[test]
    fn test_nearest_clamps_last_pixel() {
        assert_eq!(nearest_source_index(3, 1.34, 0.5, false, 4), 3);
        assert_eq!(nearest_source_index(9, 1.0, 0.0, true, 4), 3);
    }

    #[test]
    fn test_bilinear_source_coord() {
        let (x, dx) = bilinear_source_coord(0, 0.5, 0.5);
        assert_eq!(x, -1);
        assert!(approx_eq(dx, 0.75, 1e-6));
        let (x, dx) = bilinear_source_coord(3, 0.5, 0.5);
        assert_eq!(x, 1);
        assert!(approx_eq(dx, 0.25, 1e-6));
    }

    #[test]
    fn test_delta_bilinear_corners() {
        assert_eq!(delta_bilinear(1.0, 2.0, 3.0, 4.0, 0.0, 0.0), 1.0);
        assert_eq!(delta_bilinear(1.0, 2.0, 3.0, 4.0, 1.0, 0.0), 2.0);
        assert_eq!(delta_bilinear(1.0, 2.0, 3.0, 4.0, 0.0, 1.0), 3.0);
        assert!(approx_eq(delta_bilinear(1.0, 2.0, 3.0, 4.0, 0.5, 0.5), 2.5, 1e-6));
    }

    proptest! {
        #[test]
        fn test_bilinear_weights_partition_unity(dx in 0.0f32..1.0, dy in 0.0f32..1.0) {
            let w = bilinear_weights(dx, dy);
            prop_assert!(w.iter().all(|&v| (0.0..=1.0).contains(&v)));
            prop_assert!((w.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        }

        #[test]
        fn test_nearest_index_in_bounds(
            dst in 0usize..64,
            src in 1usize..64,
            out in 1usize..64,
            align in any::<bool>(),
        ) {
            let ratio = calculate_resize_ratio(src, out, align);
            let offset = if align { 0.0 } else { 0.5 };
            prop_assert!(nearest_source_index(dst, ratio, offset, align, src) < src);
        }
    }
}
