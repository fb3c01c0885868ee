// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Drives one UI surface: handler, viewer and effects over a single ordered channel.
//!
//! Each inbound record is handled to completion before the next one: the
//! handler applies it, the viewer is brought in line with the store, and any
//! capture the record asked for runs and reports back as a separate message.

use std::collections::VecDeque;

use mockup_capture::CaptureRequest;
use mockup_proto::{Inbound, Message, Source};
use mockup_scene_port::{ColorRgba8, RendererFactory};
use tracing::{debug, error, info, warn};

use crate::handler::MessageHandler;
use crate::state::{ImageBuffer, Store};
use crate::ui_effects::{RealEffectsRunner, UiEffectsRunner};
use crate::ui_state::UiEvent;
use crate::viewer::{Viewer, ViewerEvent, ViewerHandle};

/// Source tag for records the UI loops back to itself.
pub const CAPTURE_SOURCE: &str = "capture";

/// Viewer background for a theme token.
pub fn theme_background(token: &str) -> ColorRgba8 {
    if token.eq_ignore_ascii_case("dark") {
        [24, 24, 27, 255]
    } else {
        [242, 242, 245, 255]
    }
}

/// One UI surface and everything it owns.
#[derive(Debug)]
pub struct UiRuntime<F, R = RealEffectsRunner> {
    handler: MessageHandler<ViewerHandle>,
    viewer: Viewer,
    factory: F,
    request: CaptureRequest,
    effects: R,
    shown: Option<ImageBuffer>,
    theme: String,
}

impl<F: RendererFactory, R: UiEffectsRunner> UiRuntime<F, R> {
    /// Wire `viewer` to a fresh handler over `store`.
    pub fn new(store: Store, viewer: Viewer, factory: F, request: CaptureRequest, effects: R) -> Self {
        let mut handler = MessageHandler::new(store);
        handler.attach_viewer(viewer.handle());
        let mut rt = Self {
            handler,
            viewer,
            factory,
            request,
            effects,
            shown: None,
            theme: String::new(),
        };
        rt.sync_viewer();
        rt
    }

    /// Current observable state.
    pub fn store(&self) -> &Store {
        self.handler.store()
    }

    /// The viewer surface.
    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// The effects runner.
    pub fn effects(&self) -> &R {
        &self.effects
    }

    /// Tear down the viewer's signal path; later capture requests are dropped.
    pub fn close_viewer(&mut self) {
        self.handler.detach_viewer();
    }

    /// Handle one inbound record and return what must be posted to the host.
    pub async fn on_record(&mut self, inbound: &Inbound) -> Vec<Message> {
        let mut outbox = Vec::new();
        let disposition = self.handler.handle(inbound);
        debug!(?disposition, "inbound record handled");
        self.sync_viewer();
        self.run_captures(&mut outbox).await;
        outbox
    }

    /// Apply a local user event and return what must be posted to the host.
    pub fn on_ui_event(&mut self, event: UiEvent) -> Vec<Message> {
        let mut outbox = Vec::new();
        self.apply_ui(event, &mut outbox);
        outbox
    }

    fn apply_ui(&mut self, event: UiEvent, outbox: &mut Vec<Message>) {
        let mut queue = VecDeque::from([event]);
        while let Some(ev) = queue.pop_front() {
            let fx = self.handler.dispatch_ui(ev);
            if fx.is_empty() {
                continue;
            }
            queue.extend(self.effects.run(fx, outbox));
        }
        self.sync_viewer();
    }

    async fn run_captures(&mut self, outbox: &mut Vec<Message>) {
        for event in self.viewer.drain_events() {
            match event {
                ViewerEvent::CaptureRequested => {
                    match self.viewer.capture(&self.factory, &self.request).await {
                        Ok(png) => {
                            info!(bytes = png.len(), "screenshot captured");
                            self.apply_ui(UiEvent::CaptureSucceeded { image_data: png }, outbox);
                        }
                        Err(err) => {
                            error!(error = %err, "screenshot capture failed");
                            self.handler.handle_message(
                                &Source::Other(CAPTURE_SOURCE.to_owned()),
                                &Message::ExportError {
                                    error: err.to_string(),
                                },
                            );
                        }
                    }
                }
            }
        }
    }

    fn sync_viewer(&mut self) {
        let store = self.handler.store();
        if store.theme.token != self.theme {
            self.theme.clone_from(&store.theme.token);
            self.viewer.scene_mut().background = Some(theme_background(&self.theme));
        }
        let current = store.selection.display_image();
        if current == self.shown.as_ref() {
            return;
        }
        let next = current.cloned();
        if let Err(err) = self.viewer.show_image(next.as_ref()) {
            warn!(error = %err, "viewer could not show the selection image");
        }
        self.shown = next;
    }
}
