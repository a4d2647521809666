// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor packs and the output handle shared between workers.
//!
//! # Safety model
//! A [`SharedOutput`] wraps the destination buffer so that several workers
//! can write to it at once. Each worker gets an [`OutputTile`] bound to a
//! sub-window; the tile refuses writes outside that window and outside the
//! buffer. Two tiles therefore never touch the same bytes as long as their
//! windows are disjoint, which is the contract of [`SharedOutput::tile`].

use std::marker::PhantomData;

use tensor_core::{Addressing, Element, Tensor, TensorInfo, TensorView, Window};

use crate::KernelError;

/// Role of a tensor handed to a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TensorSlot {
    Src,
    Dst,
    /// Auxiliary tensors produced by the operator (side tables).
    Int0,
    Int1,
    Int2,
}

/// Read-only tensors of one kernel invocation, keyed by slot.
#[derive(Debug, Clone, Default)]
pub struct KernelInputs<'a> {
    tensors: Vec<(TensorSlot, TensorView<'a>)>,
}

impl<'a> KernelInputs<'a> {
    pub fn get(&self, slot: TensorSlot) -> Option<TensorView<'a>> {
        self.tensors.iter().find(|(s, _)| *s == slot).map(|(_, view)| *view)
    }

    /// Like [`KernelInputs::get`] but reports a missing slot as an error.
    pub fn require(&self, slot: TensorSlot) -> Result<TensorView<'a>, KernelError> {
        self.get(slot).ok_or(KernelError::MissingTensor(slot))
    }
}

/// The tensors of one kernel run: inputs plus the destination.
#[derive(Debug, Default)]
pub struct TensorPack<'a> {
    inputs: KernelInputs<'a>,
    dst: Option<&'a mut Tensor>,
}

impl<'a> TensorPack<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a read-only tensor.
    pub fn add_const_tensor(&mut self, slot: TensorSlot, tensor: &'a Tensor) {
        self.inputs.tensors.retain(|(s, _)| *s != slot);
        self.inputs.tensors.push((slot, tensor.view()));
    }

    pub fn set_dst(&mut self, tensor: &'a mut Tensor) {
        self.dst = Some(tensor);
    }

    pub fn inputs(&self) -> &KernelInputs<'a> {
        &self.inputs
    }

    /// Borrows the inputs and the destination at the same time.
    pub fn split_mut(&mut self) -> Result<(&KernelInputs<'a>, SharedOutput<'_>), KernelError> {
        let dst = self
            .dst
            .as_deref_mut()
            .ok_or(KernelError::MissingTensor(TensorSlot::Dst))?;
        Ok((&self.inputs, SharedOutput::new(dst)))
    }
}

/// A destination buffer that hands out per-window write handles.
pub struct SharedOutput<'t> {
    info: &'t TensorInfo,
    ptr: *mut u8,
    len: usize,
    _buffer: PhantomData<&'t mut [u8]>,
}

// SAFETY: the pointer comes from an exclusive borrow held for 't, and all
// writes go through tiles whose windows the creator guarantees are disjoint.
unsafe impl Send for SharedOutput<'_> {}
unsafe impl Sync for SharedOutput<'_> {}

impl<'t> SharedOutput<'t> {
    pub fn new(tensor: &'t mut Tensor) -> Self {
        let (info, data) = tensor.parts_mut();
        Self {
            info,
            ptr: data.as_mut_ptr(),
            len: data.len(),
            _buffer: PhantomData,
        }
    }

    pub fn info(&self) -> &TensorInfo {
        self.info
    }

    /// A write handle restricted to `window`.
    ///
    /// # Safety
    /// Tiles that are alive at the same time must have pairwise disjoint
    /// windows.
    pub unsafe fn tile(&self, window: Window) -> OutputTile<'_> {
        OutputTile {
            info: self.info,
            addressing: self.info.addressing(),
            ptr: self.ptr,
            len: self.len,
            window,
            _buffer: PhantomData,
        }
    }

    /// A write handle for `window` while no other tile exists.
    pub fn tile_mut(&mut self, window: Window) -> OutputTile<'_> {
        // SAFETY: `&mut self` rules out any other live tile.
        unsafe { self.tile(window) }
    }
}

/// Write access to the part of the destination covered by one window.
pub struct OutputTile<'t> {
    info: &'t TensorInfo,
    addressing: Addressing,
    ptr: *mut u8,
    len: usize,
    window: Window,
    _buffer: PhantomData<&'t [u8]>,
}

impl OutputTile<'_> {
    pub fn info(&self) -> &TensorInfo {
        self.info
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Byte offset of `coords` in the destination buffer.
    #[inline]
    pub fn offset_of(&self, coords: &[usize]) -> usize {
        self.addressing.offset(coords)
    }

    /// Writes `value` at `coords`.
    ///
    /// # Panics
    /// Panics if `coords` is outside the tile window.
    #[inline]
    pub fn store<T: Element>(&mut self, coords: &[usize], value: T) {
        assert!(
            self.window.contains(coords),
            "store at {coords:?} outside tile window {:?}",
            self.window
        );
        let offset = self.addressing.offset(coords);
        value.write(self.bytes_mut(offset, T::SIZE));
    }

    /// Copies `bytes` to a run of elements starting at `coords` along the
    /// innermost axis.
    ///
    /// # Panics
    /// Panics if the run leaves the tile window or is not a whole number of
    /// elements.
    pub fn store_run(&mut self, coords: &[usize], bytes: &[u8]) {
        let element_size = self.info.element_size();
        assert!(bytes.len() % element_size == 0, "partial element in run");
        let count = bytes.len() / element_size;
        if count == 0 {
            return;
        }
        let mut last = coords.to_vec();
        if let Some(inner) = last.last_mut() {
            *inner += count - 1;
        }
        assert!(
            self.window.contains(coords) && self.window.contains(&last),
            "run {coords:?}+{count} outside tile window {:?}",
            self.window
        );
        let offset = self.addressing.offset(coords);
        self.bytes_mut(offset, bytes.len()).copy_from_slice(bytes);
    }

    fn bytes_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        assert!(offset + len <= self.len, "write past the end of the destination");
        // SAFETY: the range is inside the buffer, and coordinates inside this
        // tile's window map to bytes no concurrently live tile can address.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.add(offset), len) }
    }
}
