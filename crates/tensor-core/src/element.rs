// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Typed access to the raw bytes of a tensor buffer.

use std::fmt;

use half::f16;

use crate::DType;

/// A scalar type that can be stored in a tensor buffer.
///
/// Reads and writes go through native-endian byte copies, so buffers need
/// no particular alignment.
pub trait Element: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Size of one element in bytes.
    const SIZE: usize;

    /// Reads one element from the first [`Self::SIZE`] bytes of `bytes`.
    fn read(bytes: &[u8]) -> Self;

    /// Writes this element into the first [`Self::SIZE`] bytes of `bytes`.
    fn write(self, bytes: &mut [u8]);

    fn to_f32(self) -> f32;

    /// Converts with `as` semantics: truncation toward zero, saturating at
    /// the type bounds, NaN maps to zero.
    fn from_f32(value: f32) -> Self;

    /// Returns `true` if values of `dtype` are stored as `Self`.
    fn matches(dtype: DType) -> bool;
}

macro_rules! impl_element {
    ($t:ty, $dtypes:pat) => {
        impl Element for $t {
            const SIZE: usize = std::mem::size_of::<$t>();

            #[inline]
            fn read(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$t>()];
                raw.copy_from_slice(&bytes[..Self::SIZE]);
                <$t>::from_ne_bytes(raw)
            }

            #[inline]
            fn write(self, bytes: &mut [u8]) {
                bytes[..Self::SIZE].copy_from_slice(&self.to_ne_bytes());
            }

            #[inline]
            fn to_f32(self) -> f32 {
                self as f32
            }

            #[inline]
            fn from_f32(value: f32) -> Self {
                value as $t
            }

            fn matches(dtype: DType) -> bool {
                matches!(dtype, $dtypes)
            }
        }
    };
}

impl_element!(u8, DType::U8 | DType::QAsymm8);
impl_element!(i8, DType::S8 | DType::QAsymm8Signed | DType::QSymm8 | DType::QSymm8PerChannel);
impl_element!(u16, DType::U16 | DType::QAsymm16);
impl_element!(i16, DType::S16 | DType::QSymm16);
impl_element!(i32, DType::S32);
impl_element!(f32, DType::F32);

impl Element for f16 {
    const SIZE: usize = 2;

    #[inline]
    fn read(bytes: &[u8]) -> Self {
        f16::from_bits(u16::from_ne_bytes([bytes[0], bytes[1]]))
    }

    #[inline]
    fn write(self, bytes: &mut [u8]) {
        bytes[..2].copy_from_slice(&self.to_bits().to_ne_bytes());
    }

    #[inline]
    fn to_f32(self) -> f32 {
        f16::to_f32(self)
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        f16::from_f32(value)
    }

    fn matches(dtype: DType) -> bool {
        dtype == DType::F16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_unaligned() {
        let mut buf = [0u8; 9];
        1234.5f32.write(&mut buf[1..]);
        assert_eq!(f32::read(&buf[1..]), 1234.5);
        (-7i32).write(&mut buf[5..]);
        assert_eq!(i32::read(&buf[5..]), -7);
    }

    #[test]
    fn test_from_f32_truncates_and_saturates() {
        assert_eq!(u8::from_f32(2.9), 2);
        assert_eq!(u8::from_f32(300.0), 255);
        assert_eq!(u8::from_f32(-4.0), 0);
        assert_eq!(i8::from_f32(-2.9), -2);
        assert_eq!(i16::from_f32(f32::NAN), 0);
    }

    #[test]
    fn test_f16_roundtrip() {
        let mut buf = [0u8; 2];
        f16::from_f32(1.5).write(&mut buf);
        assert_eq!(f16::read(&buf).to_f32(), 1.5);
    }

    #[test]
    fn test_matches() {
        assert!(u8::matches(DType::QAsymm8));
        assert!(i8::matches(DType::QAsymm8Signed));
        assert!(!u8::matches(DType::S8));
        assert!(f16::matches(DType::F16));
        assert!(!f32::matches(DType::F16));
    }
}
