// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Resolution of bilinear taps that fall outside the source plane.

use tensor_core::Element;

use crate::{BorderMode, KernelError, PixelValue};

/// Border behaviour specialised to one element type.
#[derive(Debug, Clone, Copy)]
pub(crate) enum BorderSampler<T> {
    Constant(T),
    Replicate,
}

impl<T: Element> BorderSampler<T> {
    /// `Undefined` never reaches a kernel: configuration rewrites it to
    /// `Constant`.
    pub(crate) fn new(
        kernel: &'static str,
        mode: BorderMode,
        value: PixelValue,
    ) -> Result<Self, KernelError> {
        match mode {
            BorderMode::Constant => Ok(Self::Constant(value.get())),
            BorderMode::Replicate => Ok(Self::Replicate),
            BorderMode::Undefined => Err(KernelError::NotImplemented {
                kernel,
                detail: "border mode UNDEFINED".to_string(),
            }),
        }
    }

    /// Maps the tap `(y, x)` of a `height x width` plane to the pixel that is
    /// read, or `None` when the constant border value applies.
    #[inline]
    pub(crate) fn resolve(&self, y: i32, x: i32, height: usize, width: usize) -> Option<(usize, usize)> {
        match self {
            Self::Constant(_) => {
                let inside = y >= 0 && x >= 0 && (y as usize) < height && (x as usize) < width;
                inside.then(|| (y as usize, x as usize))
            }
            Self::Replicate => Some((
                y.clamp(0, height as i32 - 1) as usize,
                x.clamp(0, width as i32 - 1) as usize,
            )),
        }
    }

    pub(crate) fn border_value(&self) -> T {
        match self {
            Self::Constant(value) => *value,
            Self::Replicate => T::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_resolve() {
        let s = BorderSampler::<u8>::new("test", BorderMode::Constant, PixelValue(5.0)).unwrap();
        assert_eq!(s.resolve(0, 0, 2, 3), Some((0, 0)));
        assert_eq!(s.resolve(1, 2, 2, 3), Some((1, 2)));
        assert_eq!(s.resolve(-1, 0, 2, 3), None);
        assert_eq!(s.resolve(0, 3, 2, 3), None);
        assert_eq!(s.border_value(), 5);
    }

    #[test]
    fn test_replicate_resolve() {
        let s = BorderSampler::<f32>::new("test", BorderMode::Replicate, PixelValue(5.0)).unwrap();
        assert_eq!(s.resolve(-1, -4, 2, 3), Some((0, 0)));
        assert_eq!(s.resolve(7, 3, 2, 3), Some((1, 2)));
    }

    #[test]
    fn test_undefined_is_rejected() {
        assert!(matches!(
            BorderSampler::<u8>::new("test", BorderMode::Undefined, PixelValue(0.0)),
            Err(KernelError::NotImplemented { .. })
        ));
    }
}
