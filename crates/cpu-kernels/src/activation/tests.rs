// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

use super::*;
use crate::TensorPack;
use tensor_core::{Dimension, Element, QuantizationInfo, Shape, Tensor};

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() < eps
}

fn info_f32(len: usize) -> TensorInfo {
    TensorInfo::new(Shape::vector(len), DType::F32)
}

fn info_q(len: usize, dtype: DType, scale: f32, offset: i32) -> TensorInfo {
    TensorInfo::new(Shape::vector(len), dtype).with_quantization(QuantizationInfo::new(scale, offset))
}

fn apply<T: Element>(
    src_info: TensorInfo,
    dst_info: TensorInfo,
    act: ActivationLayerInfo,
    isa: CpuIsaInfo,
    values: &[T],
) -> (CpuActivationKernel, Vec<T>) {
    let kernel = CpuActivationKernel::configure_with_isa(&src_info, &dst_info, &act, isa).unwrap();
    let src = Tensor::from_slice(src_info, values).unwrap();
    let mut dst = Tensor::zeros(dst_info);
    {
        let mut pack = TensorPack::new();
        pack.add_const_tensor(TensorSlot::Src, &src);
        pack.set_dst(&mut dst);
        let (inputs, mut shared) = pack.split_mut().unwrap();
        let mut tile = shared.tile_mut(kernel.window().clone());
        kernel.run_op(inputs, &mut tile, kernel.window()).unwrap();
    }
    let out = dst.to_vec::<T>().unwrap();
    (kernel, out)
}

#[test]
fn test_apply_float_functions() {
    let relu = ActivationLayerInfo::new(ActivationFunction::Relu, 0.0, 0.0);
    assert_eq!(relu.apply(-1.0), 0.0);
    assert_eq!(relu.apply(2.5), 2.5);

    let bounded = ActivationLayerInfo::new(ActivationFunction::BoundedRelu, 6.0, 0.0);
    assert_eq!(bounded.apply(8.0), 6.0);
    assert_eq!(bounded.apply(-3.0), 0.0);

    let lu = ActivationLayerInfo::new(ActivationFunction::LuBoundedRelu, 1.0, -1.0);
    assert_eq!(lu.apply(-4.0), -1.0);
    assert_eq!(lu.apply(0.5), 0.5);

    let leaky = ActivationLayerInfo::new(ActivationFunction::LeakyRelu, 0.1, 0.0);
    assert!(approx_eq(leaky.apply(-2.0), -0.2, 1e-6));

    let logistic = ActivationLayerInfo::new(ActivationFunction::Logistic, 0.0, 0.0);
    assert!(approx_eq(logistic.apply(0.0), 0.5, 1e-6));

    let tanh = ActivationLayerInfo::new(ActivationFunction::Tanh, 2.0, 1.0);
    assert!(approx_eq(tanh.apply(100.0), 2.0, 1e-5));

    let hs = ActivationLayerInfo::new(ActivationFunction::HardSwish, 0.0, 0.0);
    assert!(approx_eq(hs.apply(1.0), 4.0 / 6.0, 1e-5));
    assert_eq!(hs.apply(-4.0), -0.0);
    assert!(approx_eq(hs.apply(4.0), 4.0, 1e-5));
}

#[test]
fn test_fp32_relu_kernel() {
    let act = ActivationLayerInfo::new(ActivationFunction::Relu, 0.0, 0.0);
    let (kernel, out) = apply(info_f32(4), info_f32(4), act, CpuIsaInfo::portable(), &[-1.0f32, 0.0, 2.5, -0.5]);
    assert_eq!(out, vec![0.0, 0.0, 2.5, 0.0]);
    assert_eq!(kernel.name(), "CpuActivationKernel/generic_fp32_activation_RELU");
}

#[test]
fn test_qasymm8_relu_same_encoding() {
    // Real values -5, 0, 5.
    let info = info_q(3, DType::QAsymm8, 0.5, 10);
    let act = ActivationLayerInfo::new(ActivationFunction::Relu, 0.0, 0.0);
    let (kernel, out) = apply(info.clone(), info, act, CpuIsaInfo::portable(), &[0u8, 10, 20]);
    assert_eq!(kernel.ukernel_name(), "generic_qu8_activation");
    assert_eq!(out, vec![10, 10, 20]);
}

#[test]
fn test_qasymm8_bounded_relu_requantizes() {
    let src = info_q(4, DType::QAsymm8, 0.5, 10);
    let dst = info_q(4, DType::QAsymm8, 1.0, 0);
    let act = ActivationLayerInfo::new(ActivationFunction::BoundedRelu, 3.0, 0.0);
    // Real values -5, 0, 2, 5.
    let (_, out) = apply(src, dst, act, CpuIsaInfo::portable(), &[0u8, 10, 14, 20]);
    assert_eq!(out, vec![0, 0, 2, 3]);
}

#[test]
fn test_qasymm8_signed_leaky_relu() {
    let info = info_q(3, DType::QAsymm8Signed, 0.1, 0);
    let act = ActivationLayerInfo::new(ActivationFunction::LeakyRelu, 0.5, 0.0);
    let (kernel, out) = apply(info.clone(), info, act, CpuIsaInfo::neon(), &[-20i8, 0, 30]);
    assert_eq!(kernel.ukernel_name(), "generic_qs8_activation");
    assert_eq!(out, vec![-10, 0, 30]);
}

#[test]
fn test_hard_swish_lut_matches_direct_path() {
    let info = info_q(256, DType::QAsymm8, 0.05, 128);
    let act = ActivationLayerInfo::new(ActivationFunction::HardSwish, 0.0, 0.0);
    let values: Vec<u8> = (0..=255).collect();

    let (lut_kernel, with_lut) = apply(info.clone(), info.clone(), act, CpuIsaInfo::neon(), &values);
    let (plain_kernel, direct) = apply(info.clone(), info, act, CpuIsaInfo::portable(), &values);

    assert_eq!(lut_kernel.ukernel_name(), "neon_qu8_activation_lut");
    assert_eq!(plain_kernel.ukernel_name(), "generic_qu8_activation");
    assert_eq!(with_lut, direct);
}

#[test]
fn test_only_lut_entry_builds_a_table() {
    let lut_entries: Vec<&str> = CpuActivationKernel::available_kernels()
        .iter()
        .filter(|uk| uk.ukernel.uses_lut())
        .map(|uk| uk.name)
        .collect();
    assert_eq!(lut_entries, vec!["neon_qu8_activation_lut"]);
}

#[test]
fn test_quantized_identity_rejected() {
    let info = info_q(4, DType::QAsymm8, 1.0, 0);
    let act = ActivationLayerInfo::new(ActivationFunction::Identity, 0.0, 0.0);
    let err = CpuActivationKernel::validate_with_isa(&info, &info, &act, CpuIsaInfo::portable()).unwrap_err();
    assert!(matches!(err, KernelError::Validation { .. }));

    let float = info_f32(4);
    assert!(CpuActivationKernel::validate_with_isa(&float, &float, &act, CpuIsaInfo::portable()).is_ok());
}

#[test]
fn test_validate_mismatches() {
    let act = ActivationLayerInfo::new(ActivationFunction::Relu, 0.0, 0.0);
    let isa = CpuIsaInfo::portable();

    let err = CpuActivationKernel::validate_with_isa(&info_f32(4), &info_f32(5), &act, isa).unwrap_err();
    assert!(err.to_string().contains("mismatching shapes"));

    let q = info_q(4, DType::QAsymm8, 1.0, 0);
    let err = CpuActivationKernel::validate_with_isa(&info_f32(4), &q, &act, isa).unwrap_err();
    assert!(err.to_string().contains("mismatching data types"));

    let u8_info = TensorInfo::new(Shape::vector(4), DType::U8);
    assert!(matches!(
        CpuActivationKernel::validate_with_isa(&u8_info, &u8_info, &act, isa),
        Err(KernelError::NoImplementation { dtype: DType::U8, .. })
    ));
}

#[test]
fn test_run_rejects_foreign_window() {
    let act = ActivationLayerInfo::new(ActivationFunction::Relu, 0.0, 0.0);
    let kernel = CpuActivationKernel::configure_with_isa(&info_f32(4), &info_f32(4), &act, CpuIsaInfo::portable())
        .unwrap();
    let src = Tensor::zeros(info_f32(4));
    let mut dst = Tensor::zeros(info_f32(4));
    let mut pack = TensorPack::new();
    pack.add_const_tensor(TensorSlot::Src, &src);
    pack.set_dst(&mut dst);
    let (inputs, mut shared) = pack.split_mut().unwrap();
    let too_big = Window::new(vec![Dimension::new(0, 8, 1)]);
    let mut tile = shared.tile_mut(too_big.clone());
    assert!(matches!(
        kernel.run_op(inputs, &mut tile, &too_big),
        Err(KernelError::InvalidSubWindow { .. })
    ));
}

#[test]
fn test_activation_info_from_json() {
    let info: ActivationLayerInfo = serde_json::from_str(r#"{"function": "bounded-relu", "a": 6.0}"#).unwrap();
    assert_eq!(info.function, ActivationFunction::BoundedRelu);
    assert_eq!(info.a, 6.0);
    assert_eq!(info.b, 0.0);
}
