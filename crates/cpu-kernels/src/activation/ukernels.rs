// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

use tensor_core::{quantize, Element, Quantized, RoundingPolicy, Window};

use super::{ActivationArgs, ActivationFunction};
use crate::{KernelError, OutputTile};

/// Maps every point of `window` through `f`.
#[inline]
fn map_window<I: Element, O: Element>(
    args: &ActivationArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
    f: impl Fn(I) -> O,
) -> Result<(), KernelError> {
    let src = args.src;
    let addressing = src.info().addressing();
    window.for_each(|coords| {
        let x: I = src.read(addressing.offset(coords));
        dst.store(coords, f(x));
    });
    Ok(())
}

pub(crate) fn fp32_activation(
    args: &ActivationArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    let info = args.info;
    map_window(args, dst, window, |x: f32| info.apply(x))
}

pub(crate) fn qasymm8_lut_activation(
    args: &ActivationArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    let Some(lut) = args.lut else {
        return Err(KernelError::NotImplemented {
            kernel: super::KERNEL,
            detail: "lookup table was not built".into(),
        });
    };
    map_window(args, dst, window, |x: u8| lut[x as usize])
}

pub(crate) fn qasymm8_activation(
    args: &ActivationArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    quantized_activation::<u8>(args, dst, window)
}

pub(crate) fn qasymm8_signed_activation(
    args: &ActivationArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    quantized_activation::<i8>(args, dst, window)
}

/// ReLU variants clamp in the input encoding and requantize with
/// `q * s + o` truncated; the rest go through real values.
fn quantized_activation<T: Quantized>(
    args: &ActivationArgs<'_>,
    dst: &mut OutputTile<'_>,
    window: &Window,
) -> Result<(), KernelError> {
    let info = args.info;
    let qi_in = args.src.info().quantization().uniform();
    let qi_out = dst.info().quantization().uniform();
    let policy = RoundingPolicy::ToNearestUp;

    if info.is_relu_family() {
        let a = quantize::<T>(info.a, &qi_in, policy).to_i32();
        let b = quantize::<T>(info.b, &qi_in, policy).to_i32();
        let zero = quantize::<T>(0.0, &qi_in, policy).to_i32();
        let s = qi_in.scale / qi_out.scale;
        let o = -(qi_in.offset as f32) * s + qi_out.offset as f32;
        let requant = move |q: i32| T::saturate((q as f32 * s + o) as i32);

        return match info.function {
            ActivationFunction::Relu => map_window(args, dst, window, |x: T| requant(x.to_i32().max(zero))),
            ActivationFunction::BoundedRelu => {
                map_window(args, dst, window, |x: T| requant(x.to_i32().max(zero).min(a)))
            }
            _ => map_window(args, dst, window, |x: T| requant(x.to_i32().max(b).min(a))),
        };
    }

    if info.function == ActivationFunction::Identity {
        return Err(KernelError::NotImplemented {
            kernel: super::KERNEL,
            detail: format!("{} on quantized input", info.function),
        });
    }

    map_window(args, dst, window, |x: T| {
        let real = tensor_core::dequantize(x, &qi_in);
        quantize::<T>(info.apply(real), &qi_out, policy)
    })
}
