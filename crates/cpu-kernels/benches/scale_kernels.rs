// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Single-threaded scale kernel throughput per layout and policy.

use cpu_info::CpuIsaInfo;
use cpu_kernels::scale::utils::{bilinear_source_coord, calculate_resize_ratio, nearest_source_index};
use cpu_kernels::{
    BorderMode, CpuKernel, CpuScaleKernel, InterpolationPolicy, ScaleKernelInfo, TensorPack, TensorSlot,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tensor_core::{DType, DataLayout, Shape, Tensor, TensorInfo};

const IN: (usize, usize) = (64, 64);
const OUT: (usize, usize) = (128, 96);
const CHANNELS: usize = 16;

fn info(layout: DataLayout, (w, h): (usize, usize)) -> TensorInfo {
    let shape = match layout {
        DataLayout::Nhwc => Shape::new(vec![1, h, w, CHANNELS]),
        _ => Shape::new(vec![1, CHANNELS, h, w]),
    };
    TensorInfo::new(shape, DType::F32).with_layout(layout)
}

fn side_tables(policy: InterpolationPolicy, offset: f32) -> (Tensor, Tensor, Tensor) {
    let (ow, oh) = OUT;
    let wr = calculate_resize_ratio(IN.0, ow, false);
    let hr = calculate_resize_ratio(IN.1, oh, false);
    let mut offsets = Tensor::zeros(TensorInfo::new(Shape::matrix(oh, ow), DType::S32));
    let mut dx = Tensor::zeros(TensorInfo::new(Shape::matrix(oh, ow), DType::F32));
    let mut dy = Tensor::zeros(TensorInfo::new(Shape::matrix(oh, ow), DType::F32));
    for y in 0..oh {
        let (_, fy) = bilinear_source_coord(y, hr, offset);
        for x in 0..ow {
            let (ix, fx) = match policy {
                InterpolationPolicy::Bilinear => bilinear_source_coord(x, wr, offset),
                _ => (nearest_source_index(x, wr, offset, false, IN.0) as i32, 0.0),
            };
            offsets.set(&[y, x], ix).unwrap();
            dx.set(&[y, x], fx).unwrap();
            dy.set(&[y, x], fy).unwrap();
        }
    }
    (dx, dy, offsets)
}

fn bench_scale_f32(c: &mut Criterion) {
    let mut group = c.benchmark_group("scale_f32");
    for layout in [DataLayout::Nchw, DataLayout::Nhwc] {
        for policy in [InterpolationPolicy::NearestNeighbor, InterpolationPolicy::Bilinear] {
            let cfg = ScaleKernelInfo::new(policy, BorderMode::Replicate);
            let (src_info, dst_info) = (info(layout, IN), info(layout, OUT));
            let kernel =
                CpuScaleKernel::configure_with_isa(&src_info, None, None, None, &dst_info, &cfg, CpuIsaInfo::neon())
                    .unwrap();
            let values: Vec<f32> = (0..src_info.shape().num_elements()).map(|v| (v % 255) as f32).collect();
            let src = Tensor::from_slice(src_info, &values).unwrap();
            let (dx, dy, offsets) = side_tables(policy, cfg.sampling_policy.offset());
            let mut dst = Tensor::zeros(dst_info);

            group.bench_with_input(BenchmarkId::new(layout.as_str(), policy), &policy, |b, _| {
                b.iter(|| {
                    let mut pack = TensorPack::new();
                    pack.add_const_tensor(TensorSlot::Src, &src);
                    pack.add_const_tensor(TensorSlot::Int0, &dx);
                    pack.add_const_tensor(TensorSlot::Int1, &dy);
                    pack.add_const_tensor(TensorSlot::Int2, &offsets);
                    pack.set_dst(&mut dst);
                    let (inputs, mut shared) = pack.split_mut().unwrap();
                    let mut tile = shared.tile_mut(kernel.window().clone());
                    kernel.run_op(inputs, &mut tile, black_box(kernel.window())).unwrap();
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_scale_f32);
criterion_main!(benches);
