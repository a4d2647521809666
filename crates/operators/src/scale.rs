// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The scale operator with a type-state lifecycle.
//!
//! ```text
//! CpuScale<Unconfigured>
//!     │  .configure(src, dst, info)
//!     ▼
//! CpuScale<Configured>
//!     │  .prepare()          (or the first .run())
//!     ▼
//! CpuScale<Prepared>
//!     │  .run(src, dst, scheduler)   repeatable
//! ```
//!
//! Configuration validates, selects the micro-kernel and allocates the
//! side tables. Preparation fills them once; every later run only reads
//! them.

use cpu_info::{CpuInfo, CpuIsaInfo};
use cpu_kernels::scale::utils::calculate_resize_ratio;
use cpu_kernels::{
    BorderMode, CpuKernel, CpuScaleKernel, InterpolationPolicy, PixelValue, ScaleKernelInfo,
    TensorPack, TensorSlot,
};
use scheduler::Scheduler;
use tensor_core::{DataLayout, DataLayoutDimension, Tensor, TensorInfo};

use crate::tables::{SideTables, TableGeometry};
use crate::OperatorError;

// ── Type-state markers ─────────────────────────────────────────

/// No configuration yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

/// Kernel selected and side tables allocated but not filled.
#[derive(Debug, Clone)]
pub struct Configured {
    plan: ScalePlan,
}

/// Side tables filled; the operator can run.
#[derive(Debug, Clone)]
pub struct Prepared {
    plan: ScalePlan,
}

pub trait ScaleState: std::fmt::Debug {}
impl ScaleState for Unconfigured {}
impl ScaleState for Configured {}
impl ScaleState for Prepared {}

/// Everything `configure` decides, frozen for the lifetime of the operator.
#[derive(Debug, Clone)]
struct ScalePlan {
    kernel: CpuScaleKernel,
    /// `None` when the kernel runs AREA, which needs no tables.
    tables: Option<SideTables>,
    geometry: TableGeometry,
    src_info: TensorInfo,
    dst_info: TensorInfo,
    split_axis: usize,
}

// ── Operator ───────────────────────────────────────────────────

/// Resizes rank-4 NCHW or NHWC tensors.
///
/// # Example
/// ```
/// use cpu_kernels::{BorderMode, InterpolationPolicy, ScaleKernelInfo};
/// use operators::CpuScale;
/// use scheduler::SingleThreadScheduler;
/// use tensor_core::{DType, Shape, Tensor, TensorInfo};
///
/// let src_info = TensorInfo::new(Shape::new(vec![1, 1, 2, 2]), DType::F32);
/// let dst_info = TensorInfo::new(Shape::new(vec![1, 1, 4, 4]), DType::F32);
/// let info = ScaleKernelInfo::new(InterpolationPolicy::Bilinear, BorderMode::Replicate);
///
/// let scale = CpuScale::new().configure(&src_info, &dst_info, &info)?.prepare()?;
/// let src = Tensor::from_slice(src_info, &[1.0f32, 2.0, 3.0, 4.0])?;
/// let mut dst = Tensor::zeros(dst_info);
/// scale.run(&src, &mut dst, &SingleThreadScheduler::new())?;
/// # Ok::<(), operators::OperatorError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CpuScale<S: ScaleState = Unconfigured> {
    isa: CpuIsaInfo,
    state: S,
}

impl Default for CpuScale<Unconfigured> {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuScale<Unconfigured> {
    /// An operator that selects kernels for the host CPU.
    pub fn new() -> Self {
        Self::with_isa(CpuInfo::get().isa())
    }

    /// An operator that selects kernels as if running on `isa`.
    pub fn with_isa(isa: CpuIsaInfo) -> Self {
        Self {
            isa,
            state: Unconfigured,
        }
    }

    /// Checks `configure` would succeed on the host CPU, without allocating.
    pub fn validate(src: &TensorInfo, dst: &TensorInfo, info: &ScaleKernelInfo) -> Result<(), OperatorError> {
        Self::validate_with_isa(src, dst, info, CpuInfo::get().isa())
    }

    pub fn validate_with_isa(
        src: &TensorInfo,
        dst: &TensorInfo,
        info: &ScaleKernelInfo,
        isa: CpuIsaInfo,
    ) -> Result<(), OperatorError> {
        CpuScaleKernel::validate_with_isa(src, None, None, None, dst, info, isa)?;
        Ok(())
    }

    /// Validates, selects the micro-kernel and allocates the side tables.
    pub fn configure(
        self,
        src: &TensorInfo,
        dst: &TensorInfo,
        info: &ScaleKernelInfo,
    ) -> Result<CpuScale<Configured>, OperatorError> {
        Self::validate_with_isa(src, dst, info, self.isa)?;

        let layout = match info.data_layout {
            DataLayout::Unknown => src.data_layout(),
            layout => layout,
        };
        let (w, h) = spatial_axes(layout)?;
        let (out_w, out_h) = (dst.dimension(w), dst.dimension(h));

        let (offsets_info, dx_info, dy_info) = SideTables::infos(out_h, out_w);
        let kernel = CpuScaleKernel::configure_with_isa(
            src,
            Some(&dx_info),
            Some(&dy_info),
            Some(&offsets_info),
            dst,
            info,
            self.isa,
        )?;

        let policy = kernel.policy();
        let tables = (policy != InterpolationPolicy::Area).then(|| SideTables::allocate(out_h, out_w));
        let geometry = TableGeometry {
            policy,
            in_width: src.dimension(w),
            width_ratio: calculate_resize_ratio(src.dimension(w), out_w, info.align_corners),
            height_ratio: calculate_resize_ratio(src.dimension(h), out_h, info.align_corners),
            sampling_offset: kernel.sampling_offset(),
            align_corners: info.align_corners,
        };

        tracing::info!(
            kernel = kernel.name(),
            policy = %policy,
            border = %kernel.border_mode(),
            layout = %layout,
            "scale operator configured"
        );

        Ok(CpuScale {
            isa: self.isa,
            state: Configured {
                plan: ScalePlan {
                    kernel,
                    tables,
                    geometry,
                    src_info: src.clone(),
                    dst_info: dst.clone(),
                    split_axis: h,
                },
            },
        })
    }
}

impl CpuScale<Configured> {
    /// Fills the side tables.
    pub fn prepare(self) -> Result<CpuScale<Prepared>, OperatorError> {
        let mut plan = self.state.plan;
        if let Some(tables) = plan.tables.as_mut() {
            tables.populate(&plan.geometry)?;
        }
        Ok(CpuScale {
            isa: self.isa,
            state: Prepared { plan },
        })
    }

    /// Prepares, then runs once. Later runs go through the returned operator.
    pub fn run(
        self,
        src: &Tensor,
        dst: &mut Tensor,
        scheduler: &dyn Scheduler,
    ) -> Result<CpuScale<Prepared>, OperatorError> {
        let prepared = self.prepare()?;
        prepared.run(src, dst, scheduler)?;
        Ok(prepared)
    }

    pub fn kernel(&self) -> &CpuScaleKernel {
        &self.state.plan.kernel
    }

    pub fn policy(&self) -> InterpolationPolicy {
        self.state.plan.kernel.policy()
    }

    pub fn border_mode(&self) -> BorderMode {
        self.state.plan.kernel.border_mode()
    }
}

impl CpuScale<Prepared> {
    /// Resizes `src` into `dst`. Both must match the configured descriptions.
    pub fn run(&self, src: &Tensor, dst: &mut Tensor, scheduler: &dyn Scheduler) -> Result<(), OperatorError> {
        let plan = &self.state.plan;
        check_tensor("source", src.info(), &plan.src_info)?;
        check_tensor("destination", dst.info(), &plan.dst_info)?;

        let mut pack = TensorPack::new();
        pack.add_const_tensor(TensorSlot::Src, src);
        if let Some(tables) = &plan.tables {
            pack.add_const_tensor(TensorSlot::Int0, tables.dx());
            pack.add_const_tensor(TensorSlot::Int1, tables.dy());
            pack.add_const_tensor(TensorSlot::Int2, tables.offsets());
        }
        pack.set_dst(dst);

        tracing::debug!(kernel = plan.kernel.name(), scheduler = scheduler.name(), "running scale");
        scheduler.schedule(&plan.kernel, plan.split_axis, plan.kernel.window(), &mut pack)?;
        Ok(())
    }

    pub fn kernel(&self) -> &CpuScaleKernel {
        &self.state.plan.kernel
    }

    /// Policy after the AREA downgrade.
    pub fn policy(&self) -> InterpolationPolicy {
        self.state.plan.kernel.policy()
    }

    /// Border mode after UNDEFINED is normalised.
    pub fn border_mode(&self) -> BorderMode {
        self.state.plan.kernel.border_mode()
    }

    pub fn constant_border_value(&self) -> PixelValue {
        self.state.plan.kernel.constant_border_value()
    }

    /// The filled side tables, `None` for AREA.
    pub fn tables(&self) -> Option<&SideTables> {
        self.state.plan.tables.as_ref()
    }
}

impl<S: ScaleState> CpuScale<S> {
    pub fn isa(&self) -> CpuIsaInfo {
        self.isa
    }
}

fn spatial_axes(layout: DataLayout) -> Result<(usize, usize), OperatorError> {
    let axis = |dim| {
        layout
            .dimension_index(dim)
            .ok_or_else(|| OperatorError::Config(format!("data layout {layout} has no {dim:?} axis")))
    };
    Ok((axis(DataLayoutDimension::Width)?, axis(DataLayoutDimension::Height)?))
}

fn check_tensor(what: &str, actual: &TensorInfo, expected: &TensorInfo) -> Result<(), OperatorError> {
    if actual != expected {
        return Err(OperatorError::InvalidTensor(format!(
            "{what} is {} {} {}, configured for {} {} {}",
            actual.shape(),
            actual.dtype(),
            actual.data_layout(),
            expected.shape(),
            expected.dtype(),
            expected.data_layout()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpu_kernels::KernelError;
    use scheduler::SingleThreadScheduler;
    use tensor_core::{DType, Shape};

    fn nchw(h: usize, w: usize) -> TensorInfo {
        TensorInfo::new(Shape::new(vec![1, 1, h, w]), DType::F32)
    }

    #[test]
    fn test_configure_allocates_tables_except_for_area() {
        let bilinear = ScaleKernelInfo::new(InterpolationPolicy::Bilinear, BorderMode::Replicate);
        let op = CpuScale::with_isa(CpuIsaInfo::portable())
            .configure(&nchw(4, 4), &nchw(8, 6), &bilinear)
            .unwrap()
            .prepare()
            .unwrap();
        let tables = op.tables().unwrap();
        assert_eq!(tables.offsets().shape(), &Shape::matrix(8, 6));

        let u8_info = |h, w| TensorInfo::new(Shape::new(vec![1, 1, h, w]), DType::U8);
        let area = ScaleKernelInfo::new(InterpolationPolicy::Area, BorderMode::Constant);
        let op = CpuScale::with_isa(CpuIsaInfo::portable())
            .configure(&u8_info(8, 8), &u8_info(4, 4), &area)
            .unwrap()
            .prepare()
            .unwrap();
        assert!(op.tables().is_none());
        assert_eq!(op.policy(), InterpolationPolicy::Area);
    }

    #[test]
    fn test_configure_reports_validation_error() {
        let info = ScaleKernelInfo::new(InterpolationPolicy::Bilinear, BorderMode::Replicate).with_align_corners(true);
        let err = CpuScale::with_isa(CpuIsaInfo::portable())
            .configure(&nchw(4, 4), &nchw(8, 8), &info)
            .unwrap_err();
        assert!(matches!(err, OperatorError::Kernel(KernelError::Validation { .. })));
        assert!(CpuScale::validate_with_isa(&nchw(4, 4), &nchw(8, 8), &info, CpuIsaInfo::portable()).is_err());
    }

    #[test]
    fn test_run_rejects_mismatched_tensors() {
        let info = ScaleKernelInfo::new(InterpolationPolicy::NearestNeighbor, BorderMode::Replicate);
        let op = CpuScale::with_isa(CpuIsaInfo::portable())
            .configure(&nchw(4, 4), &nchw(2, 2), &info)
            .unwrap()
            .prepare()
            .unwrap();
        let src = Tensor::zeros(nchw(4, 5));
        let mut dst = Tensor::zeros(nchw(2, 2));
        let err = op.run(&src, &mut dst, &SingleThreadScheduler::new()).unwrap_err();
        assert!(matches!(err, OperatorError::InvalidTensor(_)));
    }

    #[test]
    fn test_configured_run_prepares() {
        let info = ScaleKernelInfo::new(InterpolationPolicy::NearestNeighbor, BorderMode::Replicate)
            .with_sampling_policy(cpu_kernels::SamplingPolicy::TopLeft);
        let configured = CpuScale::with_isa(CpuIsaInfo::portable())
            .configure(&nchw(2, 2), &nchw(2, 2), &info)
            .unwrap();
        assert_eq!(configured.kernel().ukernel_name(), "generic_fp32_scale");
        let src = Tensor::from_slice(nchw(2, 2), &[1.0f32, 2.0, 3.0, 4.0]).unwrap();
        let mut dst = Tensor::zeros(nchw(2, 2));
        let prepared = configured.run(&src, &mut dst, &SingleThreadScheduler::new()).unwrap();
        assert_eq!(dst.to_vec::<f32>().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);

        let mut again = Tensor::zeros(nchw(2, 2));
        prepared.run(&src, &mut again, &SingleThreadScheduler::new()).unwrap();
        assert_eq!(again.to_vec::<f32>().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
    }
}
