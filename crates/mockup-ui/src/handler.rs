// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Inbound message dispatch for the UI surface.
//!
//! [`MessageHandler::handle`] is the single entry point for records arriving
//! from the host. It never fails: decoding, dispatch and reduction run inside
//! one boundary, and any error is logged and turned into a forced
//! `is_loading = false`. The store is only replaced when a reducer succeeds.

use mockup_proto::wire::{decode_value, Decoded, WireError};
use mockup_proto::{Direction, Inbound, Message, Source};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::ports::ViewerPort;
use crate::state::{reduce, ReduceError, Reduced, Store};
use crate::ui_state::{self, UiEffect, UiEvent};

/// Errors caught by the handler's failure boundary.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Record could not be decoded.
    #[error(transparent)]
    Wire(#[from] WireError),
    /// Reducer rejected the message.
    #[error(transparent)]
    Reduce(#[from] ReduceError),
}

/// What happened to one inbound record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// A reducer ran and the store was replaced.
    Applied(&'static str),
    /// `selection-loaded` for a selection that is no longer current.
    Stale(String),
    /// Capture forwarded to the viewer.
    CaptureRequested,
    /// Capture from a source other than the host; ignored.
    CaptureRejected,
    /// Capture accepted but no viewer is attached.
    CaptureDropped,
    /// Known kind that only flows UI → host; ignored.
    Misdirected(&'static str),
    /// Tag this surface does not know; ignored.
    Unknown(String),
    /// Decode or reduce error; logged and `is_loading` cleared.
    Failed,
}

/// Owns the [`Store`] and applies every inbound record and local event to it.
#[derive(Debug)]
pub struct MessageHandler<V> {
    store: Store,
    viewer: Option<V>,
}

impl<V: ViewerPort> MessageHandler<V> {
    /// Handler over `store` with no viewer attached yet.
    pub fn new(store: Store) -> Self {
        Self {
            store,
            viewer: None,
        }
    }

    /// Attach the viewer that receives capture signals. Replaces any previous one.
    pub fn attach_viewer(&mut self, viewer: V) {
        self.viewer = Some(viewer);
    }

    /// Detach the viewer; later capture requests are dropped.
    pub fn detach_viewer(&mut self) -> Option<V> {
        self.viewer.take()
    }

    /// Current observable state.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Handle one inbound record. Never fails.
    pub fn handle(&mut self, event: &Inbound) -> Disposition {
        let result = decode_value(event.data.clone())
            .map_err(HandlerError::from)
            .and_then(|decoded| match decoded {
                Decoded::Known(msg) => self.dispatch(&event.source, &msg),
                Decoded::Unknown(tag) => {
                    warn!(kind = %tag, "unhandled message type");
                    Ok(Disposition::Unknown(tag))
                }
            });
        self.settle(result)
    }

    /// Handle an already decoded message, e.g. a locally generated `export-error`.
    pub fn handle_message(&mut self, source: &Source, msg: &Message) -> Disposition {
        let result = self.dispatch(source, msg);
        self.settle(result)
    }

    /// Apply a local user event; returns the effects the runtime must run.
    pub fn dispatch_ui(&mut self, event: UiEvent) -> Vec<UiEffect> {
        let (selection, effects) = ui_state::reduce(&self.store.selection, event);
        self.store.selection = selection;
        effects
    }

    fn settle(&mut self, result: Result<Disposition, HandlerError>) -> Disposition {
        match result {
            Ok(disposition) => disposition,
            Err(err) => {
                error!(error = %err, "message handler error");
                self.store.selection.is_loading = false;
                Disposition::Failed
            }
        }
    }

    fn dispatch(&mut self, source: &Source, msg: &Message) -> Result<Disposition, HandlerError> {
        match msg {
            Message::CaptureScreenshot => Ok(self.request_capture(source)),
            _ if msg.direction() == Direction::UiToHost => {
                warn!(kind = msg.kind(), "host-bound message received by UI; ignoring");
                Ok(Disposition::Misdirected(msg.kind()))
            }
            _ => {
                if let Message::ExportError { error } = msg {
                    error!(detail = %error, "export error");
                }
                match reduce(&self.store, msg)? {
                    Reduced::Applied(next) => {
                        self.store = next;
                        Ok(Disposition::Applied(msg.kind()))
                    }
                    Reduced::Stale { selection_id } => {
                        debug!(
                            stale = %selection_id,
                            current = %self.store.selection.id,
                            "dropping export for superseded selection"
                        );
                        Ok(Disposition::Stale(selection_id))
                    }
                }
            }
        }
    }

    fn request_capture(&self, source: &Source) -> Disposition {
        if *source != Source::Parent {
            debug!(?source, "ignoring capture-screenshot from non-host source");
            return Disposition::CaptureRejected;
        }
        match &self.viewer {
            Some(viewer) if viewer.request_capture() => {
                debug!("capture-screenshot forwarded to viewer");
                Disposition::CaptureRequested
            }
            _ => {
                warn!("capture-screenshot received with no active viewer; dropping");
                Disposition::CaptureDropped
            }
        }
    }
}
