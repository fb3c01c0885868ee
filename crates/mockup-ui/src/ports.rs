// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Port traits at the UI's two outward edges: the viewer surface and the host channel.

use mockup_proto::Message;

/// Viewer-facing port; lets the handler signal a capture without owning the renderer.
pub trait ViewerPort {
    /// Ask the viewer to capture its current view. Returns `false` when the
    /// viewer surface is gone and the request was dropped.
    fn request_capture(&self) -> bool;
}

/// Host-facing port; posts UI-to-host records on the outbound channel.
pub trait HostPort {
    /// Post one record. Best effort: delivery failures are the port's to log.
    fn post(&mut self, msg: Message);
}

/// Outbox that simply collects posted records in order.
impl HostPort for Vec<Message> {
    fn post(&mut self, msg: Message) {
        self.push(msg);
    }
}
