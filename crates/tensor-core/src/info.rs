// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor metadata: shape, element type, layout, quantization and padding.

use crate::{DType, DataLayout, Padding, QuantizationInfo, Shape};

/// Describes the memory a tensor occupies without owning it.
///
/// The buffer is row-major over the *padded* shape: the innermost axis is
/// widened by `left + right` elements and the one before it by
/// `top + bottom`. Element `coords` lives at
/// `offset_first_element_in_bytes() + sum(coords[i] * strides_in_bytes()[i])`.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorInfo {
    shape: Shape,
    dtype: DType,
    layout: DataLayout,
    quantization: QuantizationInfo,
    padding: Padding,
    num_channels: usize,
}

impl TensorInfo {
    /// An NCHW, unpadded, unquantized tensor description.
    pub fn new(shape: Shape, dtype: DType) -> Self {
        Self {
            shape,
            dtype,
            layout: DataLayout::Nchw,
            quantization: QuantizationInfo::default(),
            padding: Padding::default(),
            num_channels: 1,
        }
    }

    pub fn with_layout(mut self, layout: DataLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_quantization(mut self, quantization: impl Into<QuantizationInfo>) -> Self {
        self.quantization = quantization.into();
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Number of interleaved values per element (1 for plain tensors).
    pub fn with_num_channels(mut self, num_channels: usize) -> Self {
        self.num_channels = num_channels;
        self
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn data_layout(&self) -> DataLayout {
        self.layout
    }

    pub fn quantization(&self) -> &QuantizationInfo {
        &self.quantization
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Extent of `axis`; axes beyond the rank have extent 1.
    pub fn dimension(&self, axis: usize) -> usize {
        self.shape.dim(axis).unwrap_or(1)
    }

    /// Bytes per element, including interleaved channels.
    pub fn element_size(&self) -> usize {
        self.dtype.size_bytes() * self.num_channels
    }

    pub fn is_quantized(&self) -> bool {
        self.dtype.is_quantized()
    }

    /// Shape of the allocation, padding included.
    pub fn padded_dims(&self) -> Vec<usize> {
        let mut dims = self.shape.dims().to_vec();
        let rank = dims.len();
        if rank >= 1 {
            dims[rank - 1] += self.padding.left + self.padding.right;
        }
        if rank >= 2 {
            dims[rank - 2] += self.padding.top + self.padding.bottom;
        }
        dims
    }

    /// Byte stride of every axis, outermost first.
    pub fn strides_in_bytes(&self) -> Vec<usize> {
        let element_size = self.element_size();
        Shape::new(self.padded_dims())
            .strides()
            .into_iter()
            .map(|stride| stride * element_size)
            .collect()
    }

    /// Byte offset of element `[0, .., 0]` from the start of the buffer.
    pub fn offset_first_element_in_bytes(&self) -> usize {
        let strides = self.strides_in_bytes();
        let rank = strides.len();
        let mut offset = 0;
        if rank >= 1 {
            offset += self.padding.left * strides[rank - 1];
        }
        if rank >= 2 {
            offset += self.padding.top * strides[rank - 2];
        }
        offset
    }

    /// Size of the whole allocation in bytes.
    pub fn total_size_bytes(&self) -> usize {
        self.padded_dims().iter().product::<usize>() * self.element_size()
    }

    /// Byte offset of `coords`. The caller guarantees `coords` is in bounds.
    pub fn offset_of(&self, coords: &[usize]) -> usize {
        debug_assert!(self.shape.contains(coords), "{coords:?} outside {}", self.shape);
        self.addressing().offset(coords)
    }

    /// Precomputed strides for repeated offset computations in hot loops.
    pub fn addressing(&self) -> Addressing {
        Addressing {
            first: self.offset_first_element_in_bytes(),
            strides: self.strides_in_bytes(),
        }
    }

    /// The same metadata reshaped; padding and quantization are kept.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }
}

/// Byte strides and the first-element offset of a [`TensorInfo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addressing {
    first: usize,
    strides: Vec<usize>,
}

impl Addressing {
    #[inline]
    pub fn offset(&self, coords: &[usize]) -> usize {
        self.first + coords.iter().zip(&self.strides).map(|(c, s)| c * s).sum::<usize>()
    }

    #[inline]
    pub fn stride(&self, axis: usize) -> usize {
        self.strides[axis]
    }

    pub fn first(&self) -> usize {
        self.first
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpadded_strides() {
        let info = TensorInfo::new(Shape::new(vec![1, 2, 3, 4]), DType::F32);
        assert_eq!(info.strides_in_bytes(), vec![96, 48, 16, 4]);
        assert_eq!(info.offset_first_element_in_bytes(), 0);
        assert_eq!(info.total_size_bytes(), 96);
        assert_eq!(info.offset_of(&[0, 1, 2, 3]), 48 + 32 + 12);
    }

    #[test]
    fn test_padded_strides() {
        let info = TensorInfo::new(Shape::new(vec![1, 1, 2, 3]), DType::U8)
            .with_padding(Padding::new(1, 2, 1, 1));
        // Padded plane is 4 rows by 6 columns.
        assert_eq!(info.padded_dims(), vec![1, 1, 4, 6]);
        assert_eq!(info.strides_in_bytes(), vec![24, 24, 6, 1]);
        assert_eq!(info.offset_first_element_in_bytes(), 7);
        assert_eq!(info.offset_of(&[0, 0, 1, 2]), 7 + 6 + 2);
        assert_eq!(info.total_size_bytes(), 24);
        let addressing = info.addressing();
        assert_eq!(addressing.first(), 7);
        assert_eq!(addressing.stride(2), 6);
        assert_eq!(addressing.offset(&[0, 0, 1, 2]), info.offset_of(&[0, 0, 1, 2]));
    }

    #[test]
    fn test_dimension_beyond_rank() {
        let info = TensorInfo::new(Shape::matrix(2, 3), DType::S16);
        assert_eq!(info.dimension(1), 3);
        assert_eq!(info.dimension(7), 1);
        assert_eq!(info.element_size(), 2);
    }

    #[test]
    fn test_builders() {
        let info = TensorInfo::new(Shape::new(vec![1, 4, 4, 3]), DType::QAsymm8)
            .with_layout(DataLayout::Nhwc)
            .with_quantization(QuantizationInfo::new(0.5, 3));
        assert_eq!(info.data_layout(), DataLayout::Nhwc);
        assert!(info.is_quantized());
        assert_eq!(info.quantization().uniform().offset, 3);
        assert_eq!(info.num_channels(), 1);
    }
}
