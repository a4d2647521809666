// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The scale (resize) kernel.
//!
//! [`CpuScaleKernel::configure`] validates the tensors, selects a
//! micro-kernel from [`CpuScaleKernel::available_kernels`] and freezes the
//! effective parameters. The result is immutable and can be run from any
//! number of workers, each over its own sub-window of the destination.
//!
//! Nearest and bilinear sampling read per-pixel side tables prepared by
//! the operator: `offsets` (S32, slot [`TensorSlot::Int2`]) holds the
//! source column of every destination pixel, `dx`/`dy` (F32, slots
//! [`TensorSlot::Int0`]/[`TensorSlot::Int1`]) the fractional distances to
//! the top-left tap. All three have shape `[out_height, out_width]`.

mod area;
mod border;
mod nchw;
mod nhwc;
mod ukernels;
pub mod utils;

use cpu_info::{CpuInfo, CpuIsaInfo};
use tensor_core::{
    DType, DataLayout, DataLayoutDimension, Shape, TensorInfo, TensorView, Window,
};

use crate::error::return_error_on;
use crate::registry::{get_implementation, MicroKernel};
use crate::{
    BorderMode, CpuKernel, InterpolationPolicy, KernelError, KernelInputs, OutputTile,
    PixelValue, ScaleKernelInfo, TensorSlot,
};
use utils::{calculate_resize_ratio, effective_policy, is_align_corners_allowed_sampling_policy};

pub(crate) const KERNEL: &str = "CpuScaleKernel";

/// Everything a scale micro-kernel needs besides the destination.
#[derive(Debug, Clone, Copy)]
pub struct ScaleArgs<'a> {
    pub src: TensorView<'a>,
    pub offsets: Option<TensorView<'a>>,
    pub dx: Option<TensorView<'a>>,
    pub dy: Option<TensorView<'a>>,
    /// Effective policy, after the AREA downgrade.
    pub policy: InterpolationPolicy,
    /// Effective border mode; never [`BorderMode::Undefined`].
    pub border_mode: BorderMode,
    pub constant_border_value: PixelValue,
    pub sampling_offset: f32,
    pub align_corners: bool,
    pub data_layout: DataLayout,
}

impl<'a> ScaleArgs<'a> {
    pub(crate) fn offsets(&self) -> Result<TensorView<'a>, KernelError> {
        self.offsets.ok_or(KernelError::MissingTensor(TensorSlot::Int2))
    }

    pub(crate) fn dx(&self) -> Result<TensorView<'a>, KernelError> {
        self.dx.ok_or(KernelError::MissingTensor(TensorSlot::Int0))
    }

    pub(crate) fn dy(&self) -> Result<TensorView<'a>, KernelError> {
        self.dy.ok_or(KernelError::MissingTensor(TensorSlot::Int1))
    }
}

/// Signature shared by every scale micro-kernel.
pub type ScaleUKernel =
    fn(&ScaleArgs<'_>, &mut OutputTile<'_>, &Window) -> Result<(), KernelError>;

/// Selection key for the scale micro-kernel table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleKernelSelector {
    pub dtype: DType,
    pub isa: CpuIsaInfo,
    pub interpolation_policy: InterpolationPolicy,
}

pub type ScaleMicroKernel = MicroKernel<ScaleKernelSelector, ScaleUKernel>;

fn sve_without_bilinear(s: &ScaleKernelSelector, dtype: DType) -> bool {
    s.isa.sve && s.dtype == dtype && s.interpolation_policy != InterpolationPolicy::Bilinear
}

static AVAILABLE_KERNELS: [ScaleMicroKernel; 20] = [
    MicroKernel {
        name: "sve_fp16_scale",
        is_selected: |s: &ScaleKernelSelector| s.isa.fp16 && sve_without_bilinear(s, DType::F16),
        ukernel: ukernels::fp16_sve_scale,
    },
    MicroKernel {
        name: "sve_fp32_scale",
        is_selected: |s: &ScaleKernelSelector| sve_without_bilinear(s, DType::F32),
        ukernel: ukernels::fp32_sve_scale,
    },
    MicroKernel {
        name: "sve_qu8_scale",
        is_selected: |s: &ScaleKernelSelector| sve_without_bilinear(s, DType::QAsymm8),
        ukernel: ukernels::qasymm8_sve_scale,
    },
    MicroKernel {
        name: "sve_qs8_scale",
        is_selected: |s: &ScaleKernelSelector| sve_without_bilinear(s, DType::QAsymm8Signed),
        ukernel: ukernels::qasymm8_signed_sve_scale,
    },
    MicroKernel {
        name: "sve_u8_scale",
        is_selected: |s: &ScaleKernelSelector| sve_without_bilinear(s, DType::U8),
        ukernel: ukernels::u8_sve_scale,
    },
    MicroKernel {
        name: "sve_s16_scale",
        is_selected: |s: &ScaleKernelSelector| sve_without_bilinear(s, DType::S16),
        ukernel: ukernels::s16_sve_scale,
    },
    MicroKernel {
        name: "neon_fp16_scale",
        is_selected: |s: &ScaleKernelSelector| s.isa.neon && s.isa.fp16 && s.dtype == DType::F16,
        ukernel: ukernels::fp16_neon_scale,
    },
    MicroKernel {
        name: "neon_fp32_scale",
        is_selected: |s: &ScaleKernelSelector| s.isa.neon && s.dtype == DType::F32,
        ukernel: ukernels::fp32_neon_scale,
    },
    MicroKernel {
        name: "neon_qu8_scale",
        is_selected: |s: &ScaleKernelSelector| s.isa.neon && s.dtype == DType::QAsymm8,
        ukernel: ukernels::qasymm8_neon_scale,
    },
    MicroKernel {
        name: "neon_qs8_scale",
        is_selected: |s: &ScaleKernelSelector| s.isa.neon && s.dtype == DType::QAsymm8Signed,
        ukernel: ukernels::qasymm8_signed_neon_scale,
    },
    MicroKernel {
        name: "neon_u8_scale",
        is_selected: |s: &ScaleKernelSelector| s.isa.neon && s.dtype == DType::U8,
        ukernel: ukernels::u8_neon_scale,
    },
    MicroKernel {
        name: "neon_s8_scale",
        is_selected: |s: &ScaleKernelSelector| s.isa.neon && s.dtype == DType::S8,
        ukernel: ukernels::s8_neon_scale,
    },
    MicroKernel {
        name: "neon_s16_scale",
        is_selected: |s: &ScaleKernelSelector| s.isa.neon && s.dtype == DType::S16,
        ukernel: ukernels::s16_neon_scale,
    },
    MicroKernel {
        name: "generic_fp16_scale",
        is_selected: |s: &ScaleKernelSelector| s.dtype == DType::F16,
        ukernel: ukernels::fp16_generic_scale,
    },
    MicroKernel {
        name: "generic_fp32_scale",
        is_selected: |s: &ScaleKernelSelector| s.dtype == DType::F32,
        ukernel: ukernels::fp32_generic_scale,
    },
    MicroKernel {
        name: "generic_qu8_scale",
        is_selected: |s: &ScaleKernelSelector| s.dtype == DType::QAsymm8,
        ukernel: ukernels::qasymm8_generic_scale,
    },
    MicroKernel {
        name: "generic_qs8_scale",
        is_selected: |s: &ScaleKernelSelector| s.dtype == DType::QAsymm8Signed,
        ukernel: ukernels::qasymm8_signed_generic_scale,
    },
    MicroKernel {
        name: "generic_u8_scale",
        is_selected: |s: &ScaleKernelSelector| s.dtype == DType::U8,
        ukernel: ukernels::u8_generic_scale,
    },
    MicroKernel {
        name: "generic_s8_scale",
        is_selected: |s: &ScaleKernelSelector| s.dtype == DType::S8,
        ukernel: ukernels::s8_generic_scale,
    },
    MicroKernel {
        name: "generic_s16_scale",
        is_selected: |s: &ScaleKernelSelector| s.dtype == DType::S16,
        ukernel: ukernels::s16_generic_scale,
    },
];

/// Width, height and channel axes of a rank-4 tensor in `layout`.
pub(crate) fn spatial_axes(layout: DataLayout) -> Option<(usize, usize, usize)> {
    Some((
        layout.dimension_index(DataLayoutDimension::Width)?,
        layout.dimension_index(DataLayoutDimension::Height)?,
        layout.dimension_index(DataLayoutDimension::Channel)?,
    ))
}

/// Source extents and resize ratios of one kernel invocation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Geometry {
    pub in_w: usize,
    pub in_h: usize,
    pub wr: f32,
    pub hr: f32,
}

impl Geometry {
    pub(crate) fn new(args: &ScaleArgs<'_>, dst: &TensorInfo) -> Result<Self, KernelError> {
        let (w, h, _) = spatial_axes(args.data_layout).ok_or_else(|| KernelError::NotImplemented {
            kernel: KERNEL,
            detail: format!("data layout {}", args.data_layout),
        })?;
        let src = args.src.info();
        Ok(Self {
            in_w: src.dimension(w),
            in_h: src.dimension(h),
            wr: calculate_resize_ratio(src.dimension(w), dst.dimension(w), args.align_corners),
            hr: calculate_resize_ratio(src.dimension(h), dst.dimension(h), args.align_corners),
        })
    }
}

/// The scale kernel, fixed to one configuration.
#[derive(Debug, Clone)]
pub struct CpuScaleKernel {
    name: String,
    ukernel: &'static ScaleMicroKernel,
    policy: InterpolationPolicy,
    border_mode: BorderMode,
    constant_border_value: PixelValue,
    sampling_offset: f32,
    align_corners: bool,
    data_layout: DataLayout,
    window: Window,
}

impl CpuScaleKernel {
    /// Checks whether [`CpuScaleKernel::configure`] would accept these
    /// arguments on the host CPU. Side tables may be `None`.
    pub fn validate(
        src: &TensorInfo,
        dx: Option<&TensorInfo>,
        dy: Option<&TensorInfo>,
        offsets: Option<&TensorInfo>,
        dst: &TensorInfo,
        info: &ScaleKernelInfo,
    ) -> Result<(), KernelError> {
        Self::validate_with_isa(src, dx, dy, offsets, dst, info, CpuInfo::get().isa())
    }

    /// [`CpuScaleKernel::validate`] for an explicit ISA.
    pub fn validate_with_isa(
        src: &TensorInfo,
        dx: Option<&TensorInfo>,
        dy: Option<&TensorInfo>,
        offsets: Option<&TensorInfo>,
        dst: &TensorInfo,
        info: &ScaleKernelInfo,
        isa: CpuIsaInfo,
    ) -> Result<(), KernelError> {
        select_ukernel(src.dtype(), isa, info.interpolation_policy)?;

        return_error_on!(std::ptr::eq(src, dst), KERNEL, "source and destination alias");
        return_error_on!(
            src.dtype() != dst.dtype(),
            KERNEL,
            "mismatching data types: {} and {}",
            src.dtype(),
            dst.dtype()
        );
        return_error_on!(
            src.num_channels() != 1 || dst.num_channels() != 1,
            KERNEL,
            "only single-channel elements are supported"
        );
        return_error_on!(info.use_padding, KERNEL, "padding is not supported");

        let layout = resolve_layout(info, src);
        let Some((w, h, c)) = spatial_axes(layout) else {
            return Err(KernelError::validation(KERNEL, "data layout is unknown"));
        };
        return_error_on!(
            src.rank() != 4 || dst.rank() != 4,
            KERNEL,
            "expected rank-4 tensors, got {} and {}",
            src.rank(),
            dst.rank()
        );
        return_error_on!(
            src.dimension(0) != dst.dimension(0) || src.dimension(c) != dst.dimension(c),
            KERNEL,
            "batch and channel dimensions differ: {} vs {}",
            src.shape(),
            dst.shape()
        );
        return_error_on!(
            dst.dimension(w) == 0 || dst.dimension(h) == 0,
            KERNEL,
            "output width and height must be non-zero"
        );
        return_error_on!(
            src.dimension(w) == 0 || src.dimension(h) == 0,
            KERNEL,
            "input width and height must be non-zero"
        );
        return_error_on!(
            info.align_corners && !is_align_corners_allowed_sampling_policy(info.sampling_policy),
            KERNEL,
            "align_corners requires TOP_LEFT sampling"
        );
        return_error_on!(
            src.dtype() == DType::S8
                && (layout != DataLayout::Nhwc
                    || info.interpolation_policy != InterpolationPolicy::Bilinear
                    || info.border_mode != BorderMode::Replicate),
            KERNEL,
            "S8 is only supported for NHWC bilinear with REPLICATE border"
        );

        let table_shape = Shape::matrix(dst.dimension(h), dst.dimension(w));
        match info.interpolation_policy {
            InterpolationPolicy::NearestNeighbor => {
                check_table("offsets", offsets, DType::S32, &table_shape)?;
            }
            InterpolationPolicy::Bilinear => {
                check_table("offsets", offsets, DType::S32, &table_shape)?;
                check_table("dx", dx, DType::F32, &table_shape)?;
                check_table("dy", dy, DType::F32, &table_shape)?;
            }
            InterpolationPolicy::Area => {
                return_error_on!(
                    layout != DataLayout::Nchw || src.dtype() != DType::U8,
                    KERNEL,
                    "AREA is only supported for NCHW U8, got {} {}",
                    layout,
                    src.dtype()
                );
                let wr = calculate_resize_ratio(src.dimension(w), dst.dimension(w), info.align_corners);
                let hr = calculate_resize_ratio(src.dimension(h), dst.dimension(h), info.align_corners);
                let effective = effective_policy(info.interpolation_policy, wr, hr);
                return_error_on!(
                    effective == InterpolationPolicy::Area && info.border_mode == BorderMode::Replicate,
                    KERNEL,
                    "AREA does not support REPLICATE border"
                );
                if effective == InterpolationPolicy::NearestNeighbor {
                    check_table("offsets", offsets, DType::S32, &table_shape)?;
                }
            }
        }
        Ok(())
    }

    /// Validates the arguments and builds the kernel for the host CPU.
    pub fn configure(
        src: &TensorInfo,
        dx: Option<&TensorInfo>,
        dy: Option<&TensorInfo>,
        offsets: Option<&TensorInfo>,
        dst: &TensorInfo,
        info: &ScaleKernelInfo,
    ) -> Result<Self, KernelError> {
        Self::configure_with_isa(src, dx, dy, offsets, dst, info, CpuInfo::get().isa())
    }

    /// [`CpuScaleKernel::configure`] for an explicit ISA.
    pub fn configure_with_isa(
        src: &TensorInfo,
        dx: Option<&TensorInfo>,
        dy: Option<&TensorInfo>,
        offsets: Option<&TensorInfo>,
        dst: &TensorInfo,
        info: &ScaleKernelInfo,
        isa: CpuIsaInfo,
    ) -> Result<Self, KernelError> {
        Self::validate_with_isa(src, dx, dy, offsets, dst, info, isa)?;
        let ukernel = select_ukernel(src.dtype(), isa, info.interpolation_policy)?;

        let data_layout = resolve_layout(info, src);
        let (w, h, _) = spatial_axes(data_layout)
            .ok_or_else(|| KernelError::validation(KERNEL, "data layout is unknown"))?;
        let wr = calculate_resize_ratio(src.dimension(w), dst.dimension(w), info.align_corners);
        let hr = calculate_resize_ratio(src.dimension(h), dst.dimension(h), info.align_corners);

        let policy = effective_policy(info.interpolation_policy, wr, hr);
        if policy != info.interpolation_policy {
            tracing::warn!(wr, hr, "AREA interpolation without downscaling, using {policy}");
        }

        let (border_mode, constant_border_value) = match info.border_mode {
            BorderMode::Undefined => {
                tracing::warn!("border mode UNDEFINED treated as CONSTANT 0");
                (BorderMode::Constant, PixelValue::default())
            }
            mode => (mode, info.constant_border_value),
        };

        let name = format!("{KERNEL}/{}_{policy}", ukernel.name);
        tracing::debug!(kernel = %name, layout = %data_layout, wr, hr, "configured scale kernel");

        Ok(Self {
            name,
            ukernel,
            policy,
            border_mode,
            constant_border_value,
            sampling_offset: info.sampling_policy.offset(),
            align_corners: info.align_corners,
            data_layout,
            window: Window::max_window(dst.shape()),
        })
    }

    /// The micro-kernel table, in selection order.
    pub fn available_kernels() -> &'static [ScaleMicroKernel] {
        &AVAILABLE_KERNELS
    }

    /// Name of the selected micro-kernel.
    pub fn ukernel_name(&self) -> &'static str {
        self.ukernel.name
    }

    /// Policy the kernel actually runs, after the AREA downgrade.
    pub fn policy(&self) -> InterpolationPolicy {
        self.policy
    }

    pub fn border_mode(&self) -> BorderMode {
        self.border_mode
    }

    pub fn constant_border_value(&self) -> PixelValue {
        self.constant_border_value
    }

    pub fn sampling_offset(&self) -> f32 {
        self.sampling_offset
    }

    pub fn align_corners(&self) -> bool {
        self.align_corners
    }

    pub fn data_layout(&self) -> DataLayout {
        self.data_layout
    }
}

impl CpuKernel for CpuScaleKernel {
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
        let args = ScaleArgs {
            src: inputs.require(TensorSlot::Src)?,
            dx: inputs.get(TensorSlot::Int0),
            dy: inputs.get(TensorSlot::Int1),
            offsets: inputs.get(TensorSlot::Int2),
            policy: self.policy,
            border_mode: self.border_mode,
            constant_border_value: self.constant_border_value,
            sampling_offset: self.sampling_offset,
            align_corners: self.align_corners,
            data_layout: self.data_layout,
        };
        (self.ukernel.ukernel)(&args, dst, window)
    }
}

fn select_ukernel(
    dtype: DType,
    isa: CpuIsaInfo,
    interpolation_policy: InterpolationPolicy,
) -> Result<&'static ScaleMicroKernel, KernelError> {
    let selector = ScaleKernelSelector {
        dtype,
        isa,
        interpolation_policy,
    };
    get_implementation(&AVAILABLE_KERNELS, &selector).ok_or_else(|| KernelError::NoImplementation {
        kernel: KERNEL,
        dtype,
        detail: format!("{interpolation_policy} on isa [{isa}]"),
    })
}

fn resolve_layout(info: &ScaleKernelInfo, src: &TensorInfo) -> DataLayout {
    match info.data_layout {
        DataLayout::Unknown => src.data_layout(),
        layout => layout,
    }
}

fn check_table(
    what: &str,
    table: Option<&TensorInfo>,
    dtype: DType,
    shape: &Shape,
) -> Result<(), KernelError> {
    let Some(table) = table else {
        return Ok(());
    };
    return_error_on!(
        table.dtype() != dtype || table.num_channels() != 1,
        KERNEL,
        "{what} must be single-channel {dtype}, got {}",
        table.dtype()
    );
    return_error_on!(
        table.shape() != shape,
        KERNEL,
        "{what} must have shape {shape}, got {}",
        table.shape()
    );
    Ok(())
}
