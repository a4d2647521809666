// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Scale kernel parameters.

use std::fmt;

use tensor_core::{DataLayout, Element};

/// How destination pixels are computed from source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterpolationPolicy {
    /// Copy the closest source pixel.
    #[default]
    NearestNeighbor,
    /// Weighted blend of the four surrounding source pixels.
    Bilinear,
    /// Mean of the source pixels covered by the destination pixel.
    Area,
}

impl InterpolationPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            InterpolationPolicy::NearestNeighbor => "NEAREST_NEIGHBOUR",
            InterpolationPolicy::Bilinear => "BILINEAR",
            InterpolationPolicy::Area => "AREA",
        }
    }
}

impl fmt::Display for InterpolationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a read outside the source plane returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BorderMode {
    /// Unspecified; kernels treat it as [`BorderMode::Constant`] with value 0.
    #[default]
    Undefined,
    /// Out-of-range reads yield the constant border value.
    Constant,
    /// Out-of-range reads yield the nearest edge pixel.
    Replicate,
}

impl fmt::Display for BorderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BorderMode::Undefined => "UNDEFINED",
            BorderMode::Constant => "CONSTANT",
            BorderMode::Replicate => "REPLICATE",
        })
    }
}

/// Where inside a destination pixel its source coordinate is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SamplingPolicy {
    /// Pixel centres: sampling offset 0.5.
    #[default]
    Center,
    /// Pixel top-left corners: sampling offset 0.
    TopLeft,
}

impl SamplingPolicy {
    pub fn offset(self) -> f32 {
        match self {
            SamplingPolicy::Center => 0.5,
            SamplingPolicy::TopLeft => 0.0,
        }
    }
}

/// A border value in the raw element domain of the tensor it is used with.
///
/// For quantized tensors the value is the stored integer, not a real number.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PixelValue(pub f64);

impl PixelValue {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Converts to `T` with `as` semantics.
    pub fn get<T: Element>(self) -> T {
        T::from_f32(self.0 as f32)
    }
}

impl From<f64> for PixelValue {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

/// Parameters of a scale kernel.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ScaleKernelInfo {
    pub interpolation_policy: InterpolationPolicy,
    pub border_mode: BorderMode,
    #[serde(default)]
    pub constant_border_value: PixelValue,
    #[serde(default)]
    pub sampling_policy: SamplingPolicy,
    /// Unsupported; must be `false`.
    #[serde(default)]
    pub use_padding: bool,
    /// Only valid with [`SamplingPolicy::TopLeft`].
    #[serde(default)]
    pub align_corners: bool,
    /// [`DataLayout::Unknown`] inherits the layout of the source tensor.
    #[serde(default)]
    pub data_layout: DataLayout,
}

impl ScaleKernelInfo {
    pub fn new(interpolation_policy: InterpolationPolicy, border_mode: BorderMode) -> Self {
        Self {
            interpolation_policy,
            border_mode,
            ..Self::default()
        }
    }

    pub fn with_constant_border_value(mut self, value: impl Into<PixelValue>) -> Self {
        self.constant_border_value = value.into();
        self
    }

    pub fn with_sampling_policy(mut self, sampling_policy: SamplingPolicy) -> Self {
        self.sampling_policy = sampling_policy;
        self
    }

    pub fn with_align_corners(mut self, align_corners: bool) -> Self {
        self.align_corners = align_corners;
        self
    }

    pub fn with_data_layout(mut self, data_layout: DataLayout) -> Self {
        self.data_layout = data_layout;
        self
    }

    pub fn with_use_padding(mut self, use_padding: bool) -> Self {
        self.use_padding = use_padding;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let info = ScaleKernelInfo::new(InterpolationPolicy::Bilinear, BorderMode::Replicate);
        assert_eq!(info.constant_border_value, PixelValue(0.0));
        assert_eq!(info.sampling_policy, SamplingPolicy::Center);
        assert!(!info.use_padding);
        assert!(!info.align_corners);
        assert_eq!(info.data_layout, DataLayout::Unknown);
    }

    #[test]
    fn test_sampling_offset() {
        assert_eq!(SamplingPolicy::Center.offset(), 0.5);
        assert_eq!(SamplingPolicy::TopLeft.offset(), 0.0);
    }

    #[test]
    fn test_pixel_value_conversion() {
        assert_eq!(PixelValue(300.0).get::<u8>(), 255);
        assert_eq!(PixelValue(-3.7).get::<i16>(), -3);
        assert_eq!(PixelValue(0.25).get::<f32>(), 0.25);
    }

    #[test]
    fn test_serde_roundtrip() {
        let info = ScaleKernelInfo::new(InterpolationPolicy::Area, BorderMode::Constant)
            .with_constant_border_value(7.0)
            .with_sampling_policy(SamplingPolicy::TopLeft)
            .with_data_layout(DataLayout::Nchw);
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("\"area\""));
        assert!(json.contains("\"top-left\""));
        let back: ScaleKernelInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
    }

    #[test]
    fn test_serde_optional_fields() {
        let info: ScaleKernelInfo =
            serde_json::from_str(r#"{"interpolation_policy":"bilinear","border_mode":"replicate"}"#)
                .unwrap();
        assert_eq!(info, ScaleKernelInfo::new(InterpolationPolicy::Bilinear, BorderMode::Replicate));
    }
}
