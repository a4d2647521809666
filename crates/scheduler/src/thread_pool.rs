// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! A scheduler backed by a dedicated rayon thread pool.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use cpu_kernels::{CpuKernel, TensorPack};
use tensor_core::Window;

use crate::{check_split_axis, Scheduler, SchedulerError};

/// Splits the window into at most `num_threads` contiguous partitions and
/// runs them on its own pool.
pub struct ThreadPoolScheduler {
    pool: ThreadPool,
    num_threads: usize,
}

impl std::fmt::Debug for ThreadPoolScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPoolScheduler")
            .field("num_threads", &self.num_threads)
            .finish_non_exhaustive()
    }
}

impl ThreadPoolScheduler {
    /// Builds a pool with `num_threads` workers (at least one).
    pub fn new(num_threads: usize) -> Result<Self, SchedulerError> {
        let num_threads = num_threads.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("kernel-worker-{i}"))
            .build()
            .map_err(|e| SchedulerError::ThreadPool(e.to_string()))?;
        tracing::debug!(num_threads, "thread pool scheduler ready");
        Ok(Self { pool, num_threads })
    }
}

impl Scheduler for ThreadPoolScheduler {
    fn name(&self) -> &str {
        "thread-pool"
    }

    fn num_threads(&self) -> usize {
        self.num_threads
    }

    fn schedule(
        &self,
        kernel: &dyn CpuKernel,
        split_axis: usize,
        window: &Window,
        pack: &mut TensorPack<'_>,
    ) -> Result<(), SchedulerError> {
        check_split_axis(split_axis, window)?;
        let parts = window.split(split_axis, self.num_threads);
        let (inputs, mut output) = pack.split_mut()?;
        tracing::debug!(
            kernel = kernel.name(),
            split_axis,
            partitions = parts.len(),
            "dispatching kernel"
        );

        if let [only] = parts.as_slice() {
            let mut tile = output.tile_mut(only.clone());
            kernel.run_op(inputs, &mut tile, only)?;
            return Ok(());
        }

        let output = &output;
        self.pool.install(|| {
            parts.par_iter().try_for_each(|sub| {
                // SAFETY: `Window::split` returns pairwise disjoint windows,
                // and each one backs exactly one tile.
                let mut tile = unsafe { output.tile(sub.clone()) };
                kernel.run_op(inputs, &mut tile, sub)
            })
        })?;
        Ok(())
    }
}
