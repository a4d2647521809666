// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Float-to-integer rounding policies.

/// How a real value is rounded to the nearest representable integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingPolicy {
    /// Truncate toward zero.
    ToZero,
    /// Round to nearest, ties away from zero.
    #[default]
    ToNearestUp,
    /// Round to nearest, ties to even.
    ToNearestEven,
}

impl RoundingPolicy {
    /// Rounds `value` to an integral `f32` according to this policy.
    #[inline]
    pub fn apply(self, value: f32) -> f32 {
        match self {
            RoundingPolicy::ToZero => value.trunc(),
            RoundingPolicy::ToNearestUp => round_half_away_from_zero(value),
            RoundingPolicy::ToNearestEven => round_half_even(value),
        }
    }

    /// Rounds `value` and converts to `i32`, saturating at the `i32` bounds.
    #[inline]
    pub fn round(self, value: f32) -> i32 {
        self.apply(value) as i32
    }
}

/// Round to nearest with ties away from zero: `2.5 -> 3`, `-2.5 -> -3`.
#[inline]
pub fn round_half_away_from_zero(value: f32) -> f32 {
    value.round()
}

/// Round to nearest with ties to even: `2.5 -> 2`, `3.5 -> 4`.
#[inline]
pub fn round_half_even(value: f32) -> f32 {
    value.round_ties_even()
}

/// Rounding used by the vectorised float-to-integer conversions.
///
/// AArch64 converts to nearest; other targets truncate.
#[cfg(target_arch = "aarch64")]
pub const VECTOR_CONVERT_ROUNDING: RoundingPolicy = RoundingPolicy::ToNearestUp;
#[cfg(not(target_arch = "aarch64"))]
pub const VECTOR_CONVERT_ROUNDING: RoundingPolicy = RoundingPolicy::ToZero;
