// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Image data layouts and border padding.

use std::fmt;

use crate::Shape;

/// Ordering of the image axes of a rank-4 tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataLayout {
    /// Not specified; consumers fall back to the layout of the tensor itself.
    #[default]
    Unknown,
    /// `[batches, channels, height, width]`, width contiguous.
    Nchw,
    /// `[batches, height, width, channels]`, channels contiguous.
    Nhwc,
}

/// A logical image axis, resolved to a shape index through a [`DataLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataLayoutDimension {
    Batches,
    Channel,
    Height,
    Width,
}

impl DataLayout {
    /// Returns the shape index of `dim` for a rank-4 tensor in this layout,
    /// or `None` when the layout is [`DataLayout::Unknown`].
    pub fn dimension_index(self, dim: DataLayoutDimension) -> Option<usize> {
        use DataLayoutDimension::*;
        match (self, dim) {
            (DataLayout::Unknown, _) => None,
            (_, Batches) => Some(0),
            (DataLayout::Nchw, Channel) => Some(1),
            (DataLayout::Nchw, Height) => Some(2),
            (DataLayout::Nchw, Width) => Some(3),
            (DataLayout::Nhwc, Height) => Some(1),
            (DataLayout::Nhwc, Width) => Some(2),
            (DataLayout::Nhwc, Channel) => Some(3),
        }
    }

    /// Builds the rank-4 shape of an `n x c x h x w` image in this layout.
    ///
    /// [`DataLayout::Unknown`] is treated as NCHW.
    pub fn shape(self, n: usize, c: usize, h: usize, w: usize) -> Shape {
        match self {
            DataLayout::Nhwc => Shape::new(vec![n, h, w, c]),
            DataLayout::Nchw | DataLayout::Unknown => Shape::new(vec![n, c, h, w]),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DataLayout::Unknown => "UNKNOWN",
            DataLayout::Nchw => "NCHW",
            DataLayout::Nhwc => "NHWC",
        }
    }
}

impl fmt::Display for DataLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra elements allocated around the two innermost axes of a tensor.
///
/// `left`/`right` pad the innermost axis, `top`/`bottom` the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Padding {
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
    pub left: usize,
}

impl Padding {
    pub fn new(top: usize, right: usize, bottom: usize, left: usize) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The same padding on all four sides.
    pub fn uniform(pad: usize) -> Self {
        Self::new(pad, pad, pad, pad)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}
