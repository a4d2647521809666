// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Owned tensors and borrowed read-only views.

use crate::{DType, Element, Shape, TensorError, TensorInfo, Window};

/// An owned tensor: a [`TensorInfo`] plus the byte buffer it describes.
///
/// # Memory Layout
/// The buffer is `info.total_size_bytes()` long and laid out as described
/// by [`TensorInfo`]; padding bytes are zero-initialised and never read by
/// the typed accessors.
#[derive(Debug, Clone)]
pub struct Tensor {
    info: TensorInfo,
    data: Vec<u8>,
}

impl Tensor {
    /// Creates a zero-filled tensor for `info`.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{DType, Shape, Tensor, TensorInfo};
    /// let t = Tensor::zeros(TensorInfo::new(Shape::matrix(2, 3), DType::F32));
    /// assert_eq!(t.size_bytes(), 24);
    /// ```
    pub fn zeros(info: TensorInfo) -> Self {
        let data = vec![0u8; info.total_size_bytes()];
        Self { info, data }
    }

    /// Wraps an existing buffer, which must be exactly `info.total_size_bytes()` long.
    pub fn from_bytes(info: TensorInfo, data: Vec<u8>) -> Result<Self, TensorError> {
        let expected = info.total_size_bytes();
        if data.len() != expected {
            return Err(TensorError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { info, data })
    }

    /// Builds a tensor from logical values in row-major order, skipping padding.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{DType, Shape, Tensor, TensorInfo};
    /// let info = TensorInfo::new(Shape::matrix(2, 2), DType::U8);
    /// let t = Tensor::from_slice(info, &[1u8, 2, 3, 4]).unwrap();
    /// assert_eq!(t.get::<u8>(&[1, 0]).unwrap(), 3);
    /// ```
    pub fn from_slice<T: Element>(info: TensorInfo, values: &[T]) -> Result<Self, TensorError> {
        check_element::<T>("from_slice", &info)?;
        let expected = info.shape().num_elements();
        if values.len() != expected {
            return Err(TensorError::BufferSizeMismatch {
                expected: expected * T::SIZE,
                actual: values.len() * T::SIZE,
            });
        }
        let mut tensor = Self::zeros(info);
        let addressing = tensor.info.addressing();
        let mut next = values.iter();
        let data = &mut tensor.data;
        Window::max_window(tensor.info.shape()).for_each(|coords| {
            if let Some(value) = next.next() {
                value.write(&mut data[addressing.offset(coords)..]);
            }
        });
        Ok(tensor)
    }

    /// An unpadded NCHW `F32` tensor built from `values`.
    pub fn from_f32(shape: Shape, values: &[f32]) -> Result<Self, TensorError> {
        Self::from_slice(TensorInfo::new(shape, DType::F32), values)
    }

    pub fn info(&self) -> &TensorInfo {
        &self.info
    }

    pub fn shape(&self) -> &Shape {
        self.info.shape()
    }

    pub fn dtype(&self) -> DType {
        self.info.dtype()
    }

    /// Returns an immutable view over this tensor.
    pub fn view(&self) -> TensorView<'_> {
        TensorView {
            info: &self.info,
            data: &self.data,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Splits into the metadata and the mutable buffer.
    pub fn parts_mut(&mut self) -> (&TensorInfo, &mut [u8]) {
        (&self.info, &mut self.data)
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Reads the element at `coords`.
    pub fn get<T: Element>(&self, coords: &[usize]) -> Result<T, TensorError> {
        self.view().get(coords)
    }

    /// Writes the element at `coords`.
    pub fn set<T: Element>(&mut self, coords: &[usize], value: T) -> Result<(), TensorError> {
        check_element::<T>("set", &self.info)?;
        check_coords(&self.info, coords)?;
        let offset = self.info.offset_of(coords);
        value.write(&mut self.data[offset..]);
        Ok(())
    }

    /// Writes `value` to every logical element.
    pub fn fill<T: Element>(&mut self, value: T) -> Result<(), TensorError> {
        check_element::<T>("fill", &self.info)?;
        let addressing = self.info.addressing();
        let data = &mut self.data;
        Window::max_window(self.info.shape())
            .for_each(|coords| value.write(&mut data[addressing.offset(coords)..]));
        Ok(())
    }

    /// Copies the logical elements out in row-major order.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>, TensorError> {
        self.view().to_vec()
    }
}

/// A borrowed, read-only view over a tensor.
#[derive(Debug, Clone, Copy)]
pub struct TensorView<'a> {
    info: &'a TensorInfo,
    data: &'a [u8],
}

impl<'a> TensorView<'a> {
    /// Creates a view from raw parts; `data` must cover `info.total_size_bytes()`.
    pub fn from_parts(info: &'a TensorInfo, data: &'a [u8]) -> Result<Self, TensorError> {
        if data.len() < info.total_size_bytes() {
            return Err(TensorError::BufferSizeMismatch {
                expected: info.total_size_bytes(),
                actual: data.len(),
            });
        }
        Ok(Self { info, data })
    }

    pub fn info(&self) -> &'a TensorInfo {
        self.info
    }

    pub fn shape(&self) -> &'a Shape {
        self.info.shape()
    }

    pub fn dtype(&self) -> DType {
        self.info.dtype()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Reads one element at a raw byte offset.
    ///
    /// # Panics
    /// Panics if `offset + T::SIZE` exceeds the buffer.
    #[inline]
    pub fn read<T: Element>(&self, offset: usize) -> T {
        T::read(&self.data[offset..offset + T::SIZE])
    }

    pub fn get<T: Element>(&self, coords: &[usize]) -> Result<T, TensorError> {
        check_element::<T>("get", self.info)?;
        check_coords(self.info, coords)?;
        Ok(self.read(self.info.offset_of(coords)))
    }

    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>, TensorError> {
        check_element::<T>("to_vec", self.info)?;
        let addressing = self.info.addressing();
        let mut out = Vec::with_capacity(self.info.shape().num_elements());
        Window::max_window(self.info.shape())
            .for_each(|coords| out.push(self.read(addressing.offset(coords))));
        Ok(out)
    }
}

fn check_element<T: Element>(op: &'static str, info: &TensorInfo) -> Result<(), TensorError> {
    if T::matches(info.dtype()) && info.num_channels() == 1 {
        Ok(())
    } else {
        Err(TensorError::UnsupportedDType {
            op,
            dtype: info.dtype(),
        })
    }
}

fn check_coords(info: &TensorInfo, coords: &[usize]) -> Result<(), TensorError> {
    if info.shape().contains(coords) {
        Ok(())
    } else {
        Err(TensorError::OutOfBounds {
            coords: coords.to_vec(),
            shape: info.shape().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Padding;

    #[test]
    fn test_zeros() {
        let t = Tensor::zeros(TensorInfo::new(Shape::matrix(2, 3), DType::F32));
        assert_eq!(t.size_bytes(), 24);
        assert_eq!(t.shape(), &Shape::matrix(2, 3));
        assert_eq!(t.dtype(), DType::F32);
        assert!(t.to_vec::<f32>().unwrap().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_from_f32() {
        let data = vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let t = Tensor::from_f32(Shape::matrix(2, 3), &data).unwrap();
        assert_eq!(t.to_vec::<f32>().unwrap(), data);
        assert_eq!(t.get::<f32>(&[1, 2]).unwrap(), 6.0);
    }

    #[test]
    fn test_from_bytes_size_mismatch() {
        let info = TensorInfo::new(Shape::matrix(2, 3), DType::F32);
        assert!(matches!(
            Tensor::from_bytes(info, vec![0u8; 10]),
            Err(TensorError::BufferSizeMismatch { expected: 24, actual: 10 })
        ));
    }

    #[test]
    fn test_padded_tensor_skips_padding() {
        let info = TensorInfo::new(Shape::matrix(2, 2), DType::U8).with_padding(Padding::uniform(1));
        let t = Tensor::from_slice(info, &[1u8, 2, 3, 4]).unwrap();
        assert_eq!(t.size_bytes(), 16);
        assert_eq!(t.to_vec::<u8>().unwrap(), vec![1, 2, 3, 4]);
        // Row 1 of the padded 4x4 plane holds [pad, 1, 2, pad].
        assert_eq!(&t.as_bytes()[4..8], &[0, 1, 2, 0]);
    }

    #[test]
    fn test_type_checks() {
        let t = Tensor::zeros(TensorInfo::new(Shape::vector(3), DType::QAsymm8));
        assert!(t.get::<u8>(&[0]).is_ok());
        assert!(matches!(t.get::<i8>(&[0]), Err(TensorError::UnsupportedDType { .. })));
        assert!(matches!(t.get::<u8>(&[3]), Err(TensorError::OutOfBounds { .. })));
    }

    #[test]
    fn test_set_and_fill() {
        let mut t = Tensor::zeros(TensorInfo::new(Shape::vector(3), DType::S16));
        t.fill(7i16).unwrap();
        t.set(&[1], -2i16).unwrap();
        assert_eq!(t.to_vec::<i16>().unwrap(), vec![7, -2, 7]);
    }

    #[test]
    fn test_view_from_parts() {
        let t = Tensor::from_f32(Shape::vector(4), &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let v = TensorView::from_parts(t.info(), t.as_bytes()).unwrap();
        assert_eq!(v.get::<f32>(&[2]).unwrap(), 3.0);
        assert!(TensorView::from_parts(t.info(), &t.as_bytes()[..8]).is_err());
    }
}
