// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Runs the whole window on the calling thread.

use cpu_kernels::{CpuKernel, TensorPack};
use tensor_core::Window;

use crate::{check_split_axis, Scheduler, SchedulerError};

#[derive(Debug, Clone, Copy, Default)]
pub struct SingleThreadScheduler;

impl SingleThreadScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for SingleThreadScheduler {
    fn name(&self) -> &str {
        "single-thread"
    }

    fn num_threads(&self) -> usize {
        1
    }

    fn schedule(
        &self,
        kernel: &dyn CpuKernel,
        split_axis: usize,
        window: &Window,
        pack: &mut TensorPack<'_>,
    ) -> Result<(), SchedulerError> {
        check_split_axis(split_axis, window)?;
        let (inputs, mut output) = pack.split_mut()?;
        let mut tile = output.tile_mut(window.clone());
        tracing::debug!(kernel = kernel.name(), "running on the calling thread");
        kernel.run_op(inputs, &mut tile, window)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{expected, output, CoordKernel};
    use cpu_kernels::{KernelError, TensorSlot};
    use tensor_core::Shape;

    #[test]
    fn test_single_covers_window() {
        let kernel = CoordKernel::new(&Shape::matrix(3, 4));
        let mut dst = output(3, 4);
        let mut pack = TensorPack::new();
        pack.set_dst(&mut dst);
        SingleThreadScheduler::new()
            .schedule(&kernel, 0, kernel.window(), &mut pack)
            .unwrap();
        assert_eq!(dst.to_vec::<i32>().unwrap(), expected(3, 4));
    }

    #[test]
    fn test_single_requires_dst() {
        let kernel = CoordKernel::new(&Shape::matrix(2, 2));
        let mut pack = TensorPack::new();
        let err = SingleThreadScheduler::new()
            .schedule(&kernel, 0, kernel.window(), &mut pack)
            .unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::Kernel(KernelError::MissingTensor(TensorSlot::Dst))
        ));
    }

    #[test]
    fn test_single_rejects_bad_axis() {
        let kernel = CoordKernel::new(&Shape::matrix(2, 2));
        let mut dst = output(2, 2);
        let mut pack = TensorPack::new();
        pack.set_dst(&mut dst);
        let err = SingleThreadScheduler::new()
            .schedule(&kernel, 2, kernel.window(), &mut pack)
            .unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidSplitAxis { axis: 2, rank: 2 }));
    }
}
