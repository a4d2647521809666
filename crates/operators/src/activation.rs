// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Element-wise activation operator.

use cpu_info::{CpuInfo, CpuIsaInfo};
use cpu_kernels::{ActivationLayerInfo, CpuActivationKernel, CpuKernel, TensorPack, TensorSlot};
use scheduler::Scheduler;
use tensor_core::{Tensor, TensorInfo};

use crate::OperatorError;

/// A configured activation; runs any number of times.
#[derive(Debug, Clone)]
pub struct CpuActivation {
    kernel: CpuActivationKernel,
    src_info: TensorInfo,
    dst_info: TensorInfo,
}

impl CpuActivation {
    pub fn validate(src: &TensorInfo, dst: &TensorInfo, info: &ActivationLayerInfo) -> Result<(), OperatorError> {
        CpuActivationKernel::validate(src, dst, info)?;
        Ok(())
    }

    pub fn configure(src: &TensorInfo, dst: &TensorInfo, info: &ActivationLayerInfo) -> Result<Self, OperatorError> {
        Self::configure_with_isa(src, dst, info, CpuInfo::get().isa())
    }

    pub fn configure_with_isa(
        src: &TensorInfo,
        dst: &TensorInfo,
        info: &ActivationLayerInfo,
        isa: CpuIsaInfo,
    ) -> Result<Self, OperatorError> {
        let kernel = CpuActivationKernel::configure_with_isa(src, dst, info, isa)?;
        tracing::info!(kernel = kernel.name(), "activation operator configured");
        Ok(Self {
            kernel,
            src_info: src.clone(),
            dst_info: dst.clone(),
        })
    }

    pub fn kernel(&self) -> &CpuActivationKernel {
        &self.kernel
    }

    /// Applies the activation to `src`, writing `dst`. Splits the outermost axis.
    pub fn run(&self, src: &Tensor, dst: &mut Tensor, scheduler: &dyn Scheduler) -> Result<(), OperatorError> {
        if src.info() != &self.src_info || dst.info() != &self.dst_info {
            return Err(OperatorError::InvalidTensor(format!(
                "activation configured for {} -> {}, got {} -> {}",
                self.src_info.shape(),
                self.dst_info.shape(),
                src.shape(),
                dst.shape()
            )));
        }
        let mut pack = TensorPack::new();
        pack.add_const_tensor(TensorSlot::Src, src);
        pack.set_dst(dst);
        scheduler.schedule(&self.kernel, 0, self.kernel.window(), &mut pack)?;
        Ok(())
    }
}
