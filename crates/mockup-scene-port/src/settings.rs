// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Renderer construction options and output settings.

/// Tone mapping operator applied to linear radiance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToneMapping {
    /// Clamp only.
    None,
    /// ACES filmic curve (Narkowicz fit).
    AcesFilmic,
}

/// Transfer function of the output buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorSpace {
    /// Write linear values.
    Linear,
    /// Encode with the sRGB transfer function.
    Srgb,
}

/// Output settings of a renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    /// Tone mapping operator.
    pub tone_mapping: ToneMapping,
    /// Exposure multiplier applied before tone mapping.
    pub exposure: f32,
    /// Output transfer function.
    pub output_color_space: ColorSpace,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            tone_mapping: ToneMapping::None,
            exposure: 1.0,
            output_color_space: ColorSpace::Srgb,
        }
    }
}

impl RenderSettings {
    /// High-dynamic-range settings used for captures.
    pub fn capture(exposure: f32) -> Self {
        Self {
            tone_mapping: ToneMapping::AcesFilmic,
            exposure,
            output_color_space: ColorSpace::Srgb,
        }
    }
}

/// Options fixed when a renderer is created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RendererOptions {
    /// Enable antialiasing.
    pub antialias: bool,
    /// Allocate an alpha channel in the target.
    pub alpha: bool,
    /// Keep the drawing buffer after presentation so it can be read back.
    pub preserve_drawing_buffer: bool,
    /// Device pixel ratio (supersampling factor for offscreen targets).
    pub pixel_ratio: f32,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            antialias: true,
            alpha: true,
            preserve_drawing_buffer: true,
            pixel_ratio: 2.0,
        }
    }
}
