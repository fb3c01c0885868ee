// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Renderer port contract for the mockup bridge.
//!
//! The 3D scene and the GPU calls that draw it live outside this workspace.
//! This crate is the boundary: the domain hands a [`Scene`] and a
//! [`CameraState`] to an [`OffscreenRenderer`] obtained from a
//! [`RendererFactory`] and reads back an RGBA [`Frame`]. Encoding lives in
//! `mockup-capture`.
//!
//! # Design Principles
//!
//! - **Renderers are short-lived**: one per capture, never shared.
//! - **Renderers never touch the scene**: they only read it.
//! - **Readback is asynchronous**: GPU backends map buffers before the
//!   pixels are available.

use thiserror::Error;

/// Error type for renderer acquisition, drawing and readback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The backend could not allocate a renderer or its targets.
    #[error("renderer unavailable: {0}")]
    Unavailable(String),
    /// Drawing the scene failed.
    #[error("render failed: {0}")]
    Render(String),
    /// Reading pixels back from the target failed.
    #[error("readback failed: {0}")]
    Readback(String),
    /// The renderer was used after `dispose`.
    #[error("renderer disposed")]
    Disposed,
}

mod camera;
mod frame;
mod port;
mod scene;
mod settings;

pub use camera::CameraState;
pub use frame::Frame;
pub use port::{OffscreenRenderer, RendererFactory};
pub use scene::{ColorRgba8, DeviceFrame, Scene, Texture};
pub use settings::{ColorSpace, RenderSettings, RendererOptions, ToneMapping};
