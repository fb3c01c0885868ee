// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Plugin-host half of the mockup bridge.
//!
//! The host owns the design document. It reports selection and theme changes
//! to the UI, exports the selected shape, and applies the images the UI sends
//! back (screenshots, pixelated fills, layer removal). Document access goes
//! through [`DocumentPort`]; [`InMemoryDocument`] is a headless adapter for
//! tests and tooling.

// single-threaded runtime; futures need not be Send
#![allow(clippy::future_not_send)]

pub mod document;
pub mod handler;
pub mod memory;

pub use document::{DocumentError, DocumentPort, ExportedImage, Rect, Shape};
pub use handler::{HostError, HostHandler};
pub use memory::InMemoryDocument;
