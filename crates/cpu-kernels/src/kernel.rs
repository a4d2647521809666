// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The interface schedulers use to execute kernels.

use tensor_core::Window;

use crate::{KernelError, KernelInputs, OutputTile};

/// A configured kernel that can run over any sub-window of its window.
///
/// Implementations are immutable after configuration, so one kernel can be
/// executed from several workers at once.
pub trait CpuKernel: Send + Sync {
    /// Identifier including the selected micro-kernel.
    fn name(&self) -> &str;

    /// The full iteration space, over the destination shape.
    fn window(&self) -> &Window;

    /// Processes the coordinates of `window`, writing through `dst`.
    fn run_op(
        &self,
        inputs: &KernelInputs<'_>,
        dst: &mut OutputTile<'_>,
        window: &Window,
    ) -> Result<(), KernelError>;
}
