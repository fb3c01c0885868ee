// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! UI side of the mockup bridge.
//!
//! The UI surface receives protocol records from the plugin host on a single
//! ordered channel. [`MessageHandler`] is the only writer of the [`Store`]:
//! every record is decoded, dispatched and applied inside one failure
//! boundary, and every local user action goes through the same handler.
//!
//! - [`state`]: selection/theme state and the message reducers
//! - [`ui_state`]: local user actions (pixelate, apply fill) as pure transitions
//! - [`handler`]: decode + dispatch + failure boundary
//! - [`viewer`]: the 3D viewer surface and its capture signal
//! - [`runtime`]: drives handler, viewer and effects for one channel

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    // single-threaded runtime; futures need not be Send
    clippy::future_not_send
)]

pub mod handler;
pub mod models;
pub mod pixelate;
pub mod ports;
pub mod runtime;
pub mod state;
pub mod ui_effects;
pub mod ui_state;
pub mod viewer;

pub use handler::{Disposition, HandlerError, MessageHandler};
pub use ports::{HostPort, ViewerPort};
pub use runtime::UiRuntime;
pub use state::{ImageBuffer, ReduceError, SelectionState, Store, ThemeState};
pub use ui_state::{UiEffect, UiEvent};
pub use viewer::{Viewer, ViewerEvent, ViewerHandle};
