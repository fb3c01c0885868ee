// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene description handed to renderers.
//!
//! Geometry is owned by the external model loader; the port only carries what
//! a capture needs: the background, the device body and the screen texture.

/// RGBA color with 8-bit components (sRGB encoded).
pub type ColorRgba8 = [u8; 4];

/// RGBA8 raster shown on the device screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Texture {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA bytes.
    pub pixels: Vec<u8>,
}

impl Texture {
    /// Sample the texel nearest to normalized coordinates `(u, v)`.
    ///
    /// Returns transparent black for an empty or inconsistent texture.
    pub fn sample_nearest(&self, u: f32, v: f32) -> ColorRgba8 {
        if self.width == 0 || self.height == 0 {
            return [0; 4];
        }
        let x = ((u.clamp(0.0, 1.0) * self.width as f32) as u32).min(self.width - 1);
        let y = ((v.clamp(0.0, 1.0) * self.height as f32) as u32).min(self.height - 1);
        let i = (y as usize * self.width as usize + x as usize) * 4;
        match self.pixels.get(i..i + 4) {
            Some(px) => [px[0], px[1], px[2], px[3]],
            None => [0; 4],
        }
    }
}

/// Device body surrounding the screen.
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceFrame {
    /// Screen width divided by screen height.
    pub screen_aspect: f32,
    /// World-space height of the screen.
    pub screen_height: f32,
    /// Bezel thickness as a fraction of the screen height.
    pub bezel: f32,
    /// Case color.
    pub case_color: ColorRgba8,
    /// Matte screen finish (no glare).
    pub matte: bool,
}

impl Default for DeviceFrame {
    fn default() -> Self {
        Self {
            screen_aspect: 16.0 / 10.0,
            screen_height: 1.0,
            bezel: 0.04,
            case_color: [46, 46, 50, 255],
            matte: true,
        }
    }
}

/// Everything a renderer reads to draw the mockup.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Scene {
    /// Clear color; `None` renders a transparent background.
    pub background: Option<ColorRgba8>,
    /// Device body parameters.
    pub device: DeviceFrame,
    /// Content shown on the screen, if any.
    pub screen: Option<Texture>,
}
