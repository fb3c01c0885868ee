// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for the mockup bridge crates.
#![forbid(unsafe_code)]
//!
//! - [`config`] - in-memory config store with call counters and injectable failures
//! - [`messages`] - protocol records and images for handler/host tests

pub mod config;
pub mod messages;

pub use config::InMemoryConfigStore;
pub use messages::{
    image_fill, loaded_message, loaded_record, selection_message, selection_record, solid_png,
};
