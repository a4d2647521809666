// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # scheduler
//!
//! Runs a configured [`CpuKernel`] over its execution window, split along
//! one axis into contiguous sub-windows.
//!
//! | Scheduler | Workers | Use |
//! |---|---|---|
//! | [`SingleThreadScheduler`] | caller's thread | tests, tiny tensors |
//! | [`ThreadPoolScheduler`] | rayon pool | everything else |
//!
//! Each worker gets an [`OutputTile`](cpu_kernels::OutputTile) for its own
//! sub-window, so no two workers write the same output bytes. `schedule`
//! returns once every partition has finished.

mod error;
mod single;
mod thread_pool;

pub use error::SchedulerError;
pub use single::SingleThreadScheduler;
pub use thread_pool::ThreadPoolScheduler;

use cpu_kernels::{CpuKernel, TensorPack};
use tensor_core::Window;

/// Dispatches a kernel over partitions of a window.
pub trait Scheduler: Send + Sync {
    /// Human-readable name of this scheduler.
    fn name(&self) -> &str;

    /// Upper bound on the number of partitions per call.
    fn num_threads(&self) -> usize;

    /// Runs `kernel` once per partition of `window` along `split_axis`.
    ///
    /// The first error reported by any partition is returned.
    fn schedule(
        &self,
        kernel: &dyn CpuKernel,
        split_axis: usize,
        window: &Window,
        pack: &mut TensorPack<'_>,
    ) -> Result<(), SchedulerError>;
}

fn check_split_axis(split_axis: usize, window: &Window) -> Result<(), SchedulerError> {
    if split_axis >= window.rank() {
        return Err(SchedulerError::InvalidSplitAxis {
            axis: split_axis,
            rank: window.rank(),
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use cpu_kernels::{CpuKernel, KernelError, KernelInputs, OutputTile};
    use tensor_core::{DType, Shape, Tensor, TensorInfo, Window};

    /// Writes `row * 100 + col` to every point of its window.
    pub struct CoordKernel {
        pub window: Window,
        /// Partitions starting at this row fail.
        pub fail_at_row: Option<usize>,
    }

    impl CoordKernel {
        pub fn new(shape: &Shape) -> Self {
            Self {
                window: Window::max_window(shape),
                fail_at_row: None,
            }
        }
    }

    impl CpuKernel for CoordKernel {
        fn name(&self) -> &str {
            "CoordKernel"
        }

        fn window(&self) -> &Window {
            &self.window
        }

        fn run_op(
            &self,
            _inputs: &KernelInputs<'_>,
            dst: &mut OutputTile<'_>,
            window: &Window,
        ) -> Result<(), KernelError> {
            if Some(window.dim(0).start()) == self.fail_at_row {
                return Err(KernelError::NotImplemented {
                    kernel: "CoordKernel",
                    detail: "requested failure".into(),
                });
            }
            window.for_each(|c| dst.store(c, (c[0] * 100 + c[1]) as i32));
            Ok(())
        }
    }

    pub fn output(rows: usize, cols: usize) -> Tensor {
        Tensor::zeros(TensorInfo::new(Shape::matrix(rows, cols), DType::S32))
    }

    pub fn expected(rows: usize, cols: usize) -> Vec<i32> {
        (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (r * 100 + c) as i32))
            .collect()
    }
}
