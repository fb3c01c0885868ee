// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Host-side message handling.
//!
//! Every method returns the records to post to the UI, in order. Failures
//! never escape: document errors become `export-error` (with the detail only
//! logged on the UI side), and an upload always ends with
//! `fill-upload-complete` so the UI never stays in its uploading state.

use mockup_proto::wire::{decode_value, Decoded};
use mockup_proto::{Direction, Fill, Fills, Inbound, Message, SelectionContent};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::document::{DocumentError, DocumentPort, Shape};

/// Asset name used for captured screenshots.
pub const SCREENSHOT_ASSET_NAME: &str = "mockup-screenshot";
/// Asset name used for edited fills.
pub const FILL_ASSET_NAME: &str = "mockup-fill";

/// Failures while applying a UI request.
#[derive(Debug, Error)]
pub enum HostError {
    /// Document rejected an operation.
    #[error(transparent)]
    Document(#[from] DocumentError),
    /// A fill edit needs exactly one selected shape.
    #[error("fill edit needs one selected shape, found {0}")]
    NoTarget(usize),
}

/// Host-side bridge endpoint over a design document.
#[derive(Debug)]
pub struct HostHandler<D> {
    document: D,
    added_layers: Vec<String>,
}

impl<D: DocumentPort> HostHandler<D> {
    /// Wrap `document`.
    pub fn new(document: D) -> Self {
        Self {
            document,
            added_layers: Vec::new(),
        }
    }

    /// The wrapped document.
    pub fn document(&self) -> &D {
        &self.document
    }

    /// Mutable access to the wrapped document.
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// Layers this handler created, oldest first.
    pub fn added_layers(&self) -> &[String] {
        &self.added_layers
    }

    /// Theme token changed in the host.
    pub fn theme_changed(&self, token: &str) -> Message {
        Message::Theme {
            content: token.to_owned(),
        }
    }

    /// Ask the UI to capture its viewer.
    pub fn request_capture(&self) -> Message {
        Message::CaptureScreenshot
    }

    /// Selection changed in the host: describe it and, for a single shape
    /// with an image fill, export it.
    pub async fn selection_changed(&mut self) -> Vec<Message> {
        let shapes = self.document.selection();
        let Some(content) = describe_selection(&shapes) else {
            return vec![Message::Selection { content: None }];
        };
        let exportable = shapes.len() == 1 && content.fills.editable_image_fill().is_some();
        let id = content.id.clone();
        let mut out = vec![Message::Selection {
            content: Some(content),
        }];
        if !exportable {
            return out;
        }
        out.push(Message::SelectionLoading { is_loading: true });
        match self.document.export_png(&id).await {
            Ok(img) => {
                debug!(shape = %id, width = img.width, height = img.height, "selection exported");
                out.push(Message::SelectionLoaded {
                    image_data: img.data,
                    width: img.width,
                    height: img.height,
                    selection_id: id,
                });
            }
            Err(err) => {
                error!(shape = %id, error = %err, "selection export failed");
                out.push(Message::ExportError {
                    error: err.to_string(),
                });
            }
        }
        out
    }

    /// Handle one record from the UI. Never fails.
    pub async fn handle(&mut self, event: &Inbound) -> Vec<Message> {
        let msg = match decode_value(event.data.clone()) {
            Ok(Decoded::Known(msg)) => msg,
            Ok(Decoded::Unknown(tag)) => {
                warn!(kind = %tag, "unhandled message type");
                return Vec::new();
            }
            Err(err) => {
                error!(error = %err, "undecodable record from UI");
                return Vec::new();
            }
        };
        self.handle_message(msg).await
    }

    /// Handle an already decoded record from the UI.
    pub async fn handle_message(&mut self, msg: Message) -> Vec<Message> {
        if msg.direction() == Direction::HostToUi {
            warn!(kind = msg.kind(), "UI-bound message received by host; ignoring");
            return Vec::new();
        }
        match msg {
            Message::UploadScreenshot { image_data } => {
                let result = self.place_screenshot(&image_data).await;
                upload_outcome("upload-screenshot", result)
            }
            Message::UpdateImageFill {
                image_data,
                add_new_layer,
                original_fill,
                should_delete_first,
            } => {
                let result = self
                    .update_fill(&image_data, add_new_layer, &original_fill, should_delete_first)
                    .await;
                upload_outcome("update-image-fill", result)
            }
            Message::DeleteTopLayer => {
                if let Err(err) = self.delete_top_layer() {
                    error!(error = %err, "delete-top-layer failed");
                    return vec![Message::ExportError {
                        error: err.to_string(),
                    }];
                }
                Vec::new()
            }
            other => {
                warn!(kind = other.kind(), "no host handler for message kind");
                Vec::new()
            }
        }
    }

    async fn place_screenshot(&mut self, png: &[u8]) -> Result<(), HostError> {
        let image = self.document.upload_image(SCREENSHOT_ASSET_NAME, png).await?;
        let above = self.document.selection().first().map(|s| s.id.clone());
        let layer = self.document.create_image_layer(&image, above.as_deref())?;
        info!(layer = %layer, image = %image.id, "screenshot placed");
        self.added_layers.push(layer);
        Ok(())
    }

    async fn update_fill(
        &mut self,
        png: &[u8],
        add_new_layer: bool,
        original: &Fill,
        delete_first: bool,
    ) -> Result<(), HostError> {
        if delete_first {
            self.delete_top_layer()?;
        }
        let image = self.document.upload_image(FILL_ASSET_NAME, png).await?;
        let selection = self.document.selection();
        if add_new_layer {
            let above = selection.first().map(|s| s.id.as_str());
            let layer = self.document.create_image_layer(&image, above)?;
            info!(layer = %layer, image = %image.id, "fill added as new layer");
            self.added_layers.push(layer);
            return Ok(());
        }
        let [target] = selection.as_slice() else {
            return Err(HostError::NoTarget(selection.len()));
        };
        let replacement = Fill {
            fill_image: Some(image),
            ..original.clone()
        };
        let fills = replace_fill(&target.fills, original, replacement);
        self.document.set_fills(&target.id, fills)?;
        info!(shape = %target.id, "image fill replaced");
        Ok(())
    }

    fn delete_top_layer(&mut self) -> Result<(), DocumentError> {
        let Some(layer) = self.added_layers.pop() else {
            debug!("delete-top-layer with no added layers");
            return Ok(());
        };
        match self.document.remove_shape(&layer) {
            Ok(()) => {
                info!(layer = %layer, "added layer removed");
                Ok(())
            }
            // already gone from the document; nothing left to undo
            Err(DocumentError::ShapeNotFound(_)) => Ok(()),
            Err(err) => {
                self.added_layers.push(layer);
                Err(err)
            }
        }
    }
}

fn upload_outcome(kind: &str, result: Result<(), HostError>) -> Vec<Message> {
    match result {
        Ok(()) => vec![Message::FillUploadComplete],
        Err(err) => {
            error!(kind, error = %err, "host failed to apply UI request");
            vec![
                Message::ExportError {
                    error: err.to_string(),
                },
                Message::FillUploadComplete,
            ]
        }
    }
}

/// Selection summary for the UI: id and name from the first shape, fills
/// shared by every shape or `"mixed"`.
pub fn describe_selection(shapes: &[Shape]) -> Option<SelectionContent> {
    let first = shapes.first()?;
    let uniform = shapes.iter().all(|s| s.fills == first.fills);
    Some(SelectionContent {
        id: first.id.clone(),
        name: first.name.clone(),
        fills: if uniform {
            Fills::List(first.fills.clone())
        } else {
            Fills::Mixed
        },
    })
}

/// Swap `original` for `replacement` in `fills`. Falls back to the first
/// image fill, then to prepending, when `original` is not found.
fn replace_fill(fills: &[Fill], original: &Fill, replacement: Fill) -> Vec<Fill> {
    let mut out = fills.to_vec();
    let slot = out
        .iter()
        .position(|f| f == original)
        .or_else(|| out.iter().position(Fill::is_image));
    match slot {
        Some(i) => out[i] = replacement,
        None => out.insert(0, replacement),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Rect;
    use mockup_proto::ImageRef;

    fn img(id: &str) -> Fill {
        Fill::image(ImageRef {
            id: id.into(),
            width: 1,
            height: 1,
            mtype: None,
            keep_aspect_ratio: None,
            name: None,
        })
    }

    fn color(hex: &str) -> Fill {
        Fill {
            fill_color: Some(hex.into()),
            fill_opacity: Some(1.0),
            ..Fill::default()
        }
    }

    fn shape(id: &str, fills: Vec<Fill>) -> Shape {
        Shape {
            id: id.into(),
            name: format!("Shape {id}"),
            fills,
            bounds: Rect::default(),
        }
    }

    #[test]
    fn empty_selection_has_no_content() {
        assert!(describe_selection(&[]).is_none());
    }

    #[test]
    fn multi_selection_uses_first_shape_and_merges_fills() {
        let same = describe_selection(&[shape("a", vec![img("x")]), shape("b", vec![img("x")])])
            .unwrap_or_else(|| unreachable!());
        assert_eq!(same.id, "a");
        assert_eq!(same.fills, Fills::List(vec![img("x")]));

        let mixed = describe_selection(&[shape("a", vec![img("x")]), shape("b", vec![img("y")])])
            .unwrap_or_else(|| unreachable!());
        assert_eq!(mixed.name, "Shape a");
        assert!(mixed.fills.is_mixed());
    }

    #[test]
    fn replace_fill_keeps_other_fills_in_place() {
        let fills = vec![color("#fff"), img("old"), color("#000")];
        let out = replace_fill(&fills, &img("old"), img("new"));
        assert_eq!(out, vec![color("#fff"), img("new"), color("#000")]);
    }

    #[test]
    fn replace_fill_falls_back_to_first_image_then_prepends() {
        let out = replace_fill(&[color("#fff"), img("a")], &img("gone"), img("new"));
        assert_eq!(out, vec![color("#fff"), img("new")]);
        let out = replace_fill(&[color("#fff")], &img("gone"), img("new"));
        assert_eq!(out, vec![img("new"), color("#fff")]);
    }
}
