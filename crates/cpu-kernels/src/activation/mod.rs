// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Element-wise activation kernel for F32 and 8-bit quantized tensors.
//!
//! Uses the same registry as the scale kernel. For QASYMM8 hard-swish on
//! NEON-capable CPUs the whole function is tabulated once at configure
//! time and the run is a 256-entry byte lookup.

mod ukernels;

use std::fmt;

use cpu_info::{CpuInfo, CpuIsaInfo};
use tensor_core::quantization::{dequantize_qasymm8, quantize_qasymm8};
use tensor_core::{DType, RoundingPolicy, TensorInfo, TensorView, Window};

use crate::error::return_error_on;
use crate::registry::{get_implementation, MicroKernel};
use crate::{CpuKernel, KernelError, KernelInputs, OutputTile, TensorSlot};

const KERNEL: &str = "CpuActivationKernel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivationFunction {
    /// `x`
    Identity,
    /// `max(0, x)`
    Relu,
    /// `min(a, max(0, x))`
    BoundedRelu,
    /// `min(a, max(b, x))`
    LuBoundedRelu,
    /// `1 / (1 + e^-x)`
    Logistic,
    /// `a * tanh(b * x)`
    Tanh,
    /// `x > 0 ? x : a * x`
    LeakyRelu,
    /// `x * min(max(x + 3, 0), 6) / 6`
    HardSwish,
}

impl fmt::Display for ActivationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActivationFunction::Identity => "IDENTITY",
            ActivationFunction::Relu => "RELU",
            ActivationFunction::BoundedRelu => "BOUNDED_RELU",
            ActivationFunction::LuBoundedRelu => "LU_BOUNDED_RELU",
            ActivationFunction::Logistic => "LOGISTIC",
            ActivationFunction::Tanh => "TANH",
            ActivationFunction::LeakyRelu => "LEAKY_RELU",
            ActivationFunction::HardSwish => "HARD_SWISH",
        })
    }
}

/// An activation function with its two parameters.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ActivationLayerInfo {
    pub function: ActivationFunction,
    #[serde(default)]
    pub a: f32,
    #[serde(default)]
    pub b: f32,
}

impl ActivationLayerInfo {
    pub fn new(function: ActivationFunction, a: f32, b: f32) -> Self {
        Self { function, a, b }
    }

    /// Evaluates the function on a real value.
    #[inline]
    pub fn apply(&self, x: f32) -> f32 {
        let (a, b) = (self.a, self.b);
        match self.function {
            ActivationFunction::Identity => x,
            ActivationFunction::Relu => x.max(0.0),
            ActivationFunction::BoundedRelu => a.min(x.max(0.0)),
            ActivationFunction::LuBoundedRelu => a.min(x.max(b)),
            ActivationFunction::Logistic => 1.0 / (1.0 + (-x).exp()),
            ActivationFunction::Tanh => a * (b * x).tanh(),
            ActivationFunction::LeakyRelu => {
                if x > 0.0 {
                    x
                } else {
                    a * x
                }
            }
            ActivationFunction::HardSwish => x * ((x + 3.0).max(0.0).min(6.0) * 0.166_666_67),
        }
    }

    /// Functions that are monotone clamps, evaluated without leaving the
    /// quantized domain.
    pub fn is_relu_family(&self) -> bool {
        matches!(
            self.function,
            ActivationFunction::Relu | ActivationFunction::BoundedRelu | ActivationFunction::LuBoundedRelu
        )
    }
}

/// Everything an activation micro-kernel needs besides the destination.
#[derive(Debug, Clone, Copy)]
pub struct ActivationArgs<'a> {
    pub src: TensorView<'a>,
    pub info: ActivationLayerInfo,
    pub lut: Option<&'a [u8; 256]>,
}

pub type ActivationFn = fn(&ActivationArgs<'_>, &mut OutputTile<'_>, &Window) -> Result<(), KernelError>;

/// How a micro-kernel evaluates the function.
#[derive(Debug, Clone, Copy)]
pub enum ActivationUKernel {
    /// Evaluates every element.
    Direct(ActivationFn),
    /// Reads a 256-entry table built at configure time.
    Lut(ActivationFn),
}

impl ActivationUKernel {
    pub fn uses_lut(&self) -> bool {
        matches!(self, ActivationUKernel::Lut(_))
    }

    fn run(&self, args: &ActivationArgs<'_>, dst: &mut OutputTile<'_>, window: &Window) -> Result<(), KernelError> {
        match self {
            ActivationUKernel::Direct(f) | ActivationUKernel::Lut(f) => f(args, dst, window),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationKernelSelector {
    pub dtype: DType,
    pub isa: CpuIsaInfo,
    pub function: ActivationFunction,
}

pub type ActivationMicroKernel = MicroKernel<ActivationKernelSelector, ActivationUKernel>;

static AVAILABLE_KERNELS: [ActivationMicroKernel; 4] = [
    MicroKernel {
        name: "neon_qu8_activation_lut",
        is_selected: |s: &ActivationKernelSelector| {
            s.isa.neon && s.dtype == DType::QAsymm8 && s.function == ActivationFunction::HardSwish
        },
        ukernel: ActivationUKernel::Lut(ukernels::qasymm8_lut_activation),
    },
    MicroKernel {
        name: "generic_qu8_activation",
        is_selected: |s: &ActivationKernelSelector| s.dtype == DType::QAsymm8,
        ukernel: ActivationUKernel::Direct(ukernels::qasymm8_activation),
    },
    MicroKernel {
        name: "generic_qs8_activation",
        is_selected: |s: &ActivationKernelSelector| s.dtype == DType::QAsymm8Signed,
        ukernel: ActivationUKernel::Direct(ukernels::qasymm8_signed_activation),
    },
    MicroKernel {
        name: "generic_fp32_activation",
        is_selected: |s: &ActivationKernelSelector| s.dtype == DType::F32,
        ukernel: ActivationUKernel::Direct(ukernels::fp32_activation),
    },
];

/// The activation kernel, fixed to one configuration.
#[derive(Debug, Clone)]
pub struct CpuActivationKernel {
    name: String,
    ukernel: &'static ActivationMicroKernel,
    info: ActivationLayerInfo,
    lut: Option<Box<[u8; 256]>>,
    window: Window,
}

impl CpuActivationKernel {
    pub fn validate(src: &TensorInfo, dst: &TensorInfo, info: &ActivationLayerInfo) -> Result<(), KernelError> {
        Self::validate_with_isa(src, dst, info, CpuInfo::get().isa())
    }

    pub fn validate_with_isa(
        src: &TensorInfo,
        dst: &TensorInfo,
        info: &ActivationLayerInfo,
        isa: CpuIsaInfo,
    ) -> Result<(), KernelError> {
        select_ukernel(src.dtype(), isa, info.function)?;
        return_error_on!(
            src.dtype() != dst.dtype(),
            KERNEL,
            "mismatching data types: {} and {}",
            src.dtype(),
            dst.dtype()
        );
        return_error_on!(
            src.shape() != dst.shape(),
            KERNEL,
            "mismatching shapes: {} and {}",
            src.shape(),
            dst.shape()
        );
        return_error_on!(src.rank() == 0, KERNEL, "scalar tensors are not supported");
        return_error_on!(
            src.num_channels() != 1 || dst.num_channels() != 1,
            KERNEL,
            "only single-channel elements are supported"
        );
        return_error_on!(
            src.is_quantized() && info.function == ActivationFunction::Identity,
            KERNEL,
            "{} is not supported for {}",
            info.function,
            src.dtype()
        );
        return_error_on!(
            src.is_quantized()
                && (src.quantization().uniform().scale == 0.0 || dst.quantization().uniform().scale == 0.0),
            KERNEL,
            "quantized tensors need a non-zero scale"
        );
        Ok(())
    }

    pub fn configure(src: &TensorInfo, dst: &TensorInfo, info: &ActivationLayerInfo) -> Result<Self, KernelError> {
        Self::configure_with_isa(src, dst, info, CpuInfo::get().isa())
    }

    pub fn configure_with_isa(
        src: &TensorInfo,
        dst: &TensorInfo,
        info: &ActivationLayerInfo,
        isa: CpuIsaInfo,
    ) -> Result<Self, KernelError> {
        Self::validate_with_isa(src, dst, info, isa)?;
        let ukernel = select_ukernel(src.dtype(), isa, info.function)?;

        let lut = ukernel.ukernel.uses_lut().then(|| {
            let iq = src.quantization().uniform();
            let oq = dst.quantization().uniform();
            let mut table = Box::new([0u8; 256]);
            for (q, slot) in table.iter_mut().enumerate() {
                let x = dequantize_qasymm8(q as u8, &iq);
                *slot = quantize_qasymm8(info.apply(x), &oq, RoundingPolicy::ToNearestUp);
            }
            table
        });

        let name = format!("{KERNEL}/{}_{}", ukernel.name, info.function);
        tracing::debug!(kernel = %name, "configured activation kernel");
        Ok(Self {
            name,
            ukernel,
            info: *info,
            lut,
            window: Window::max_window(dst.shape()),
        })
    }

    pub fn available_kernels() -> &'static [ActivationMicroKernel] {
        &AVAILABLE_KERNELS
    }

    pub fn ukernel_name(&self) -> &'static str {
        self.ukernel.name
    }

    pub fn info(&self) -> &ActivationLayerInfo {
        &self.info
    }
}

impl CpuKernel for CpuActivationKernel {
    fn name(&self) -> &str {
        &self.name
    }

    fn window(&self) -> &Window {
        &self.window
    }

    fn run_op(
        &self,
        inputs: &KernelInputs<'_>,
        dst: &mut OutputTile<'_>,
        window: &Window,
    ) -> Result<(), KernelError> {
        if !window.is_sub_window_of(&self.window) {
            return Err(KernelError::InvalidSubWindow { kernel: KERNEL });
        }
        let args = ActivationArgs {
            src: inputs.require(TensorSlot::Src)?,
            info: self.info,
            lut: self.lut.as_deref(),
        };
        self.ukernel.ukernel.run(&args, dst, window)
    }
}

fn select_ukernel(
    dtype: DType,
    isa: CpuIsaInfo,
    function: ActivationFunction,
) -> Result<&'static ActivationMicroKernel, KernelError> {
    let selector = ActivationKernelSelector { dtype, isa, function };
    get_implementation(&AVAILABLE_KERNELS, &selector).ok_or_else(|| KernelError::NoImplementation {
        kernel: KERNEL,
        dtype,
        detail: format!("{function} on isa [{isa}]"),
    })
}

#[cfg(test)]
mod tests;
