// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Offscreen renderer port traits.

use std::future::Future;

use crate::{CameraState, Frame, RenderError, RenderSettings, RendererOptions, Scene};

/// An offscreen render target with its own device state.
///
/// Implementors must not write to the scene and must not share GPU state
/// with any visible surface.
pub trait OffscreenRenderer {
    /// Apply output settings (tone mapping, exposure, color space).
    fn configure(&mut self, settings: &RenderSettings);

    /// Draw the scene from the camera into the target.
    fn render(&mut self, scene: &Scene, camera: &CameraState) -> Result<(), RenderError>;

    /// Read the last rendered frame back as RGBA8.
    fn read_pixels(&mut self) -> impl Future<Output = Result<Frame, RenderError>>;

    /// Release all resources. Further calls fail with [`RenderError::Disposed`].
    fn dispose(&mut self);
}

/// Creates renderers on demand, one per capture.
pub trait RendererFactory {
    /// Renderer type produced by this factory.
    type Renderer: OffscreenRenderer;

    /// Allocate a renderer whose output frame is `width` x `height`.
    fn create(
        &self,
        width: u32,
        height: u32,
        options: &RendererOptions,
    ) -> Result<Self::Renderer, RenderError>;
}
