// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! CPU renderer for headless captures.
//!
//! Draws the device as a flat card facing the camera: the case (bezel ring)
//! and the screen texture. Surfaces are shaded in linear space, exposed and
//! tone mapped; the background is written untouched. Antialiasing is an
//! ordered-grid supersample of `pixel_ratio` x `pixel_ratio` per pixel.

use std::future::{ready, Future};

use mockup_scene_port::{
    CameraState, ColorRgba8, ColorSpace, Frame, OffscreenRenderer, RenderError, RenderSettings,
    RendererFactory, RendererOptions, Scene, ToneMapping,
};

/// Largest edge a software target accepts.
const MAX_EDGE: u32 = 16_384;
/// Screen glass color behind transparent texels.
const GLASS: ColorRgba8 = [8, 8, 10, 255];

/// sRGB-encoded 8-bit channel to linear `0.0..=1.0`.
pub fn srgb_to_linear(c: u8) -> f32 {
    let c = f32::from(c) / 255.0;
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear value to an sRGB-encoded 8-bit channel.
pub fn linear_to_srgb(v: f32) -> u8 {
    let v = v.clamp(0.0, 1.0);
    let s = if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    (s * 255.0).round() as u8
}

/// ACES filmic tone curve (Narkowicz 2015 fit), clamped to `0.0..=1.0`.
pub fn aces_filmic(x: f32) -> f32 {
    let x = x.max(0.0);
    ((x * (2.51 * x + 0.03)) / (x * (2.43 * x + 0.59) + 0.14)).clamp(0.0, 1.0)
}

/// Creates [`SoftwareRenderer`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct SoftwareFactory;

impl RendererFactory for SoftwareFactory {
    type Renderer = SoftwareRenderer;

    fn create(
        &self,
        width: u32,
        height: u32,
        options: &RendererOptions,
    ) -> Result<SoftwareRenderer, RenderError> {
        if width == 0 || height == 0 || width > MAX_EDGE || height > MAX_EDGE {
            return Err(RenderError::Unavailable(format!(
                "unsupported target size {width}x{height}"
            )));
        }
        let samples = if options.antialias && options.pixel_ratio.is_finite() {
            (options.pixel_ratio.round() as u32).clamp(1, 4)
        } else {
            1
        };
        Ok(SoftwareRenderer {
            width,
            height,
            samples,
            alpha: options.alpha,
            settings: RenderSettings::default(),
            target: None,
            disposed: false,
        })
    }
}

/// What a sample ray hits.
enum Hit {
    Background,
    Case,
    Screen(f32, f32),
}

/// CPU implementation of [`OffscreenRenderer`].
#[derive(Debug)]
pub struct SoftwareRenderer {
    width: u32,
    height: u32,
    samples: u32,
    alpha: bool,
    settings: RenderSettings,
    target: Option<Vec<u8>>,
    disposed: bool,
}

impl SoftwareRenderer {
    /// Samples per pixel edge.
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// True once `dispose` has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn shade_surface(&self, color: ColorRgba8) -> [f32; 3] {
        let map = |c: u8| {
            let exposed = srgb_to_linear(c) * self.settings.exposure;
            match self.settings.tone_mapping {
                ToneMapping::None => exposed.clamp(0.0, 1.0),
                ToneMapping::AcesFilmic => aces_filmic(exposed),
            }
        };
        [map(color[0]), map(color[1]), map(color[2])]
    }

    fn encode(&self, v: f32) -> u8 {
        match self.settings.output_color_space {
            ColorSpace::Srgb => linear_to_srgb(v),
            ColorSpace::Linear => (v.clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }
}

fn hit_test(scene: &Scene, x: f32, y: f32) -> Hit {
    let device = &scene.device;
    let half_h = device.screen_height * 0.5;
    let half_w = half_h * device.screen_aspect;
    let bezel = device.bezel * device.screen_height;
    if x.abs() <= half_w && y.abs() <= half_h {
        let u = (x + half_w) / (2.0 * half_w);
        let v = (half_h - y) / (2.0 * half_h);
        Hit::Screen(u, v)
    } else if x.abs() <= half_w + bezel && y.abs() <= half_h + bezel {
        Hit::Case
    } else {
        Hit::Background
    }
}

fn over(top: ColorRgba8, bottom: ColorRgba8) -> ColorRgba8 {
    let a = f32::from(top[3]) / 255.0;
    let mix = |t: u8, b: u8| (f32::from(t) * a + f32::from(b) * (1.0 - a)).round() as u8;
    [mix(top[0], bottom[0]), mix(top[1], bottom[1]), mix(top[2], bottom[2]), 255]
}

impl OffscreenRenderer for SoftwareRenderer {
    fn configure(&mut self, settings: &RenderSettings) {
        self.settings = *settings;
    }

    fn render(&mut self, scene: &Scene, camera: &CameraState) -> Result<(), RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }
        let visible_h = camera.visible_height();
        if !visible_h.is_finite() || visible_h <= 0.0 {
            return Err(RenderError::Render("degenerate camera".into()));
        }
        let (w, h) = (self.width as usize, self.height as usize);
        let aspect = self.width as f32 / self.height as f32;
        let half_vh = visible_h * 0.5;
        let half_vw = half_vh * aspect;
        let n = self.samples;
        let per_pixel = (n * n) as f32;
        let background = scene.background.map(|c| {
            [srgb_to_linear(c[0]), srgb_to_linear(c[1]), srgb_to_linear(c[2])]
        });

        let mut out = vec![0u8; w * h * 4];
        for py in 0..h {
            for px in 0..w {
                // premultiplied accumulation in linear space
                let mut acc = [0.0f32; 4];
                for sy in 0..n {
                    for sx in 0..n {
                        let fx = (px as f32 + (sx as f32 + 0.5) / n as f32) / w as f32;
                        let fy = (py as f32 + (sy as f32 + 0.5) / n as f32) / h as f32;
                        let x = camera.target[0] + (fx * 2.0 - 1.0) * half_vw;
                        let y = camera.target[1] + (1.0 - fy * 2.0) * half_vh;
                        let (rgb, a) = match hit_test(scene, x, y) {
                            Hit::Background => match background {
                                Some(bg) => (bg, 1.0),
                                None => ([0.0; 3], 0.0),
                            },
                            Hit::Case => (self.shade_surface(scene.device.case_color), 1.0),
                            Hit::Screen(u, v) => {
                                let texel = scene
                                    .screen
                                    .as_ref()
                                    .map_or(GLASS, |t| over(t.sample_nearest(u, v), GLASS));
                                (self.shade_surface(texel), 1.0)
                            }
                        };
                        acc[0] += rgb[0] * a;
                        acc[1] += rgb[1] * a;
                        acc[2] += rgb[2] * a;
                        acc[3] += a;
                    }
                }
                let i = (py * w + px) * 4;
                let coverage = acc[3] / per_pixel;
                if acc[3] > 0.0 {
                    out[i] = self.encode(acc[0] / acc[3]);
                    out[i + 1] = self.encode(acc[1] / acc[3]);
                    out[i + 2] = self.encode(acc[2] / acc[3]);
                }
                out[i + 3] = if self.alpha {
                    (coverage * 255.0).round() as u8
                } else {
                    255
                };
            }
        }
        self.target = Some(out);
        Ok(())
    }

    fn read_pixels(&mut self) -> impl Future<Output = Result<Frame, RenderError>> {
        let result = if self.disposed {
            Err(RenderError::Disposed)
        } else {
            match &self.target {
                Some(pixels) => Ok(Frame {
                    width: self.width,
                    height: self.height,
                    pixels: pixels.clone(),
                }),
                None => Err(RenderError::Readback("nothing rendered".into())),
            }
        };
        ready(result)
    }

    fn dispose(&mut self) {
        self.target = None;
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use approx::assert_relative_eq;
    use mockup_scene_port::Texture;

    fn renderer(w: u32, h: u32, antialias: bool) -> SoftwareRenderer {
        let options = RendererOptions {
            antialias,
            ..RendererOptions::default()
        };
        SoftwareFactory.create(w, h, &options).unwrap()
    }

    async fn frame(r: &mut SoftwareRenderer) -> Frame {
        r.read_pixels().await.unwrap()
    }

    #[test]
    fn transfer_functions_round_trip_endpoints() {
        assert_eq!(linear_to_srgb(srgb_to_linear(0)), 0);
        assert_eq!(linear_to_srgb(srgb_to_linear(255)), 255);
        assert_eq!(linear_to_srgb(srgb_to_linear(128)), 128);
        assert_relative_eq!(srgb_to_linear(255), 1.0);
    }

    #[test]
    fn aces_is_monotonic_and_bounded() {
        assert_relative_eq!(aces_filmic(0.0), 0.0);
        assert_relative_eq!(aces_filmic(1.0), 0.803_797, epsilon = 1e-4);
        assert!(aces_filmic(0.5) < aces_filmic(0.6));
        assert!(aces_filmic(1000.0) <= 1.0);
    }

    #[test]
    fn factory_rejects_empty_targets_and_picks_sample_count() {
        assert!(SoftwareFactory
            .create(0, 10, &RendererOptions::default())
            .is_err());
        assert_eq!(renderer(4, 4, true).samples(), 2);
        assert_eq!(renderer(4, 4, false).samples(), 1);
    }

    #[tokio::test]
    async fn screen_texture_lands_in_the_center() {
        let mut r = renderer(40, 40, false);
        let scene = Scene {
            background: Some([0, 0, 255, 255]),
            screen: Some(Texture {
                width: 1,
                height: 1,
                pixels: vec![255, 255, 255, 255],
            }),
            ..Scene::default()
        };
        r.render(&scene, &CameraState::default()).unwrap();
        let f = frame(&mut r).await;
        assert!(f.is_consistent());
        // background passes through untouched
        assert_eq!(f.pixel(0, 0), Some([0, 0, 255, 255]));
        // screen white, exposure 1 without tone mapping stays white
        assert_eq!(f.pixel(20, 20), Some([255, 255, 255, 255]));
    }

    #[tokio::test]
    async fn tone_mapping_compresses_highlights() {
        let mut r = renderer(16, 16, false);
        r.configure(&RenderSettings::capture(1.5));
        let scene = Scene {
            screen: Some(Texture {
                width: 1,
                height: 1,
                pixels: vec![255, 255, 255, 255],
            }),
            ..Scene::default()
        };
        r.render(&scene, &CameraState::default()).unwrap();
        let center = frame(&mut r).await.pixel(8, 8).unwrap();
        assert!(center[0] < 255);
        assert_eq!(center[3], 255);
    }

    #[tokio::test]
    async fn disposed_renderer_refuses_work() {
        let mut r = renderer(4, 4, true);
        r.dispose();
        assert!(r.is_disposed());
        assert_eq!(
            r.render(&Scene::default(), &CameraState::default()),
            Err(RenderError::Disposed)
        );
        assert_eq!(r.read_pixels().await, Err(RenderError::Disposed));
    }

    #[tokio::test]
    async fn readback_before_render_fails() {
        let mut r = renderer(4, 4, true);
        assert!(matches!(
            r.read_pixels().await,
            Err(RenderError::Readback(_))
        ));
    }
}
