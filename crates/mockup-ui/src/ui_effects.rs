// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Effect runner for UiEffect -> concrete ports; includes a simple fake for tests.

use tracing::warn;

use crate::pixelate::Pixelator;
use crate::ports::HostPort;
use crate::ui_state::{UiEffect, UiEvent};

/// Runs effects against real ports.
pub trait UiEffectsRunner {
    /// Run effects, possibly emitting follow-up events (results, failures).
    fn run(&mut self, effects: Vec<UiEffect>, host: &mut dyn HostPort) -> Vec<UiEvent>;
}

/// Posts to the host and pixelates in-process.
#[derive(Debug, Default)]
pub struct RealEffectsRunner {
    pixelator: Pixelator,
}

impl UiEffectsRunner for RealEffectsRunner {
    fn run(&mut self, effects: Vec<UiEffect>, host: &mut dyn HostPort) -> Vec<UiEvent> {
        let mut followups = Vec::new();
        for eff in effects {
            match eff {
                UiEffect::Send(msg) => host.post(msg),
                UiEffect::RunPixelate {
                    selection_id,
                    exported,
                    original,
                    pixel_size,
                } => match self.pixelator.run(&exported, original.as_ref(), pixel_size) {
                    Ok(out) => {
                        followups.push(UiEvent::OriginalDecoded {
                            selection_id: selection_id.clone(),
                            image: out.original,
                        });
                        followups.push(UiEvent::PixelateFinished {
                            selection_id,
                            preview: out.preview,
                        });
                    }
                    Err(err) => {
                        warn!(error = %err, selection = %selection_id, "pixelation failed");
                        followups.push(UiEvent::PixelateFailed {
                            selection_id,
                            detail: err.to_string(),
                        });
                    }
                },
            }
        }
        followups
    }
}

/// Test fake: records effects and lets tests inject pixelation failures.
#[derive(Debug, Default)]
pub struct FakeEffectsRunner {
    /// Every effect seen, in order.
    pub calls: Vec<UiEffect>,
    /// Answer `RunPixelate` with `PixelateFailed`.
    pub fail_pixelate: bool,
}

impl UiEffectsRunner for FakeEffectsRunner {
    fn run(&mut self, effects: Vec<UiEffect>, host: &mut dyn HostPort) -> Vec<UiEvent> {
        let mut followups = Vec::new();
        for eff in effects {
            match &eff {
                UiEffect::Send(msg) => host.post(msg.clone()),
                UiEffect::RunPixelate { selection_id, .. } if self.fail_pixelate => {
                    followups.push(UiEvent::PixelateFailed {
                        selection_id: selection_id.clone(),
                        detail: "injected".into(),
                    });
                }
                UiEffect::RunPixelate { .. } => {}
            }
            self.calls.push(eff);
        }
        followups
    }
}
