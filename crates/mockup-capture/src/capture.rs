// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Offscreen screenshot capture.
//!
//! A capture acquires a fresh renderer from the factory, renders the scene
//! with its background cleared, reads the frame back and encodes it as PNG.
//! Two scoped guards hold the invariants on every exit path, including early
//! `?` returns and a dropped future:
//!
//! - the scene's background is restored before the call returns;
//! - the renderer is disposed before the call returns.

use std::ops::{Deref, DerefMut};

use mockup_scene_port::{
    CameraState, ColorRgba8, OffscreenRenderer, RenderError, RenderSettings, RendererFactory,
    RendererOptions, Scene,
};
use thiserror::Error;
use tracing::debug;

use crate::codec::{encode_png, CodecError};

/// Capture failure. Carries the underlying error; callers decide what the
/// user sees.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Acquiring, drawing or reading back failed.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// The frame could not be encoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Capture parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureRequest {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Exposure applied before tone mapping.
    pub exposure: f32,
    /// Supersampling factor.
    pub pixel_ratio: f32,
}

impl Default for CaptureRequest {
    fn default() -> Self {
        Self {
            width: 2000,
            height: 2000,
            exposure: 1.5,
            pixel_ratio: 2.0,
        }
    }
}

impl CaptureRequest {
    /// Default parameters at a given resolution.
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

/// Owns a renderer and disposes it on drop.
struct Disposing<R: OffscreenRenderer>(R);

impl<R: OffscreenRenderer> Deref for Disposing<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.0
    }
}

impl<R: OffscreenRenderer> DerefMut for Disposing<R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.0
    }
}

impl<R: OffscreenRenderer> Drop for Disposing<R> {
    fn drop(&mut self) {
        self.0.dispose();
    }
}

/// Clears the scene background and puts the saved value back on drop.
struct TransparentBackground<'a> {
    scene: &'a mut Scene,
    saved: Option<ColorRgba8>,
}

impl<'a> TransparentBackground<'a> {
    fn clear(scene: &'a mut Scene) -> Self {
        let saved = scene.background.take();
        Self { scene, saved }
    }
}

impl Deref for TransparentBackground<'_> {
    type Target = Scene;

    fn deref(&self) -> &Scene {
        self.scene
    }
}

impl Drop for TransparentBackground<'_> {
    fn drop(&mut self) {
        self.scene.background = self.saved;
    }
}

/// Render `scene` from `camera` offscreen and return PNG bytes.
///
/// The caller's visible renderer is never touched: all device state lives in
/// the renderer created here. The background is transparent only for the
/// duration of the render.
pub async fn capture_screenshot<F>(
    factory: &F,
    scene: &mut Scene,
    camera: &CameraState,
    request: &CaptureRequest,
) -> Result<Vec<u8>, CaptureError>
where
    F: RendererFactory,
{
    let options = RendererOptions {
        antialias: true,
        alpha: true,
        preserve_drawing_buffer: true,
        pixel_ratio: request.pixel_ratio,
    };
    let mut renderer = Disposing(factory.create(request.width, request.height, &options)?);
    renderer.configure(&RenderSettings::capture(request.exposure));

    let frame = {
        let transparent = TransparentBackground::clear(scene);
        renderer.render(&transparent, camera)?;
        renderer.read_pixels().await?
    };
    drop(renderer);

    let png = encode_png(&frame)?;
    debug!(
        width = frame.width,
        height = frame.height,
        bytes = png.len(),
        "screenshot captured"
    );
    Ok(png)
}
