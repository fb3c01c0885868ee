// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Screenshot capture for the mockup bridge.
//!
//! This crate provides:
//! - [`capture_screenshot`]: one offscreen render pass → PNG bytes
//! - PNG encode/decode between [`Frame`](mockup_scene_port::Frame) and bytes
//! - [`SoftwareRenderer`]: a CPU implementation of the renderer port
//! - [`MockFactory`]: a renderer double for headless tests

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    // single-threaded runtime; futures need not be Send
    clippy::future_not_send
)]

mod capture;
mod codec;
mod mock_renderer;
mod software;

pub use capture::{capture_screenshot, CaptureError, CaptureRequest};
pub use codec::{decode_png, encode_png, CodecError};
pub use mock_renderer::{MockFactory, MockFailure, MockProbe, MockRenderer};
pub use software::{aces_filmic, linear_to_srgb, srgb_to_linear, SoftwareFactory, SoftwareRenderer};
