// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pure state transitions for local user actions (pixelate, apply fill, capture results).

use mockup_proto::{Fill, Message};

use crate::state::{ImageBuffer, SelectionState};

/// Shown when pixelation fails.
pub const PIXELATE_ERROR_MESSAGE: &str = "Unable to pixelate image. Please try again.";
/// Shown when the selection's fills cannot be edited as one image.
pub const MIXED_FILLS_MESSAGE: &str = "Select a shape with a single image fill to apply changes.";

/// Local user actions and async job results.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    PreviewLoading(bool),
    PixelateRequested {
        pixel_size: u32,
    },
    OriginalDecoded {
        selection_id: String,
        image: ImageBuffer,
    },
    PixelateFinished {
        selection_id: String,
        preview: ImageBuffer,
    },
    PixelateFailed {
        selection_id: String,
        detail: String,
    },
    ApplyFillRequested {
        add_new_layer: bool,
        should_delete_first: bool,
    },
    DeleteTopLayerRequested,
    CaptureSucceeded {
        image_data: Vec<u8>,
    },
}

/// Work a [`UiEvent`] asks the runtime to perform.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum UiEffect {
    /// Post a record to the host.
    Send(Message),
    /// Pixelate `exported`, reusing `original` pixels when present.
    RunPixelate {
        selection_id: String,
        exported: ImageBuffer,
        original: Option<ImageBuffer>,
        pixel_size: u32,
    },
}

/// Apply `ev` to the selection slice; returns the next slice and effects to run.
pub fn reduce(sel: &SelectionState, ev: UiEvent) -> (SelectionState, Vec<UiEffect>) {
    let mut next = sel.clone();
    let mut fx = Vec::new();
    match ev {
        UiEvent::PreviewLoading(on) => next.is_preview_loading = on,
        UiEvent::PixelateRequested { pixel_size } => {
            if pixel_size == 0 || sel.is_pixelizing {
                return (next, fx);
            }
            if let Some(exported) = &sel.exported_image {
                next.pixel_size = pixel_size;
                next.is_pixelizing = true;
                fx.push(UiEffect::RunPixelate {
                    selection_id: sel.id.clone(),
                    exported: exported.clone(),
                    original: sel.original_image.clone(),
                    pixel_size,
                });
            }
        }
        UiEvent::OriginalDecoded {
            selection_id,
            image,
        } => {
            if selection_id == sel.id {
                next.original_image = Some(image);
            }
        }
        UiEvent::PixelateFinished {
            selection_id,
            preview,
        } => {
            next.is_pixelizing = false;
            if selection_id == sel.id {
                next.preview_image = Some(preview);
                next.error = None;
            }
        }
        UiEvent::PixelateFailed { selection_id, .. } => {
            next.is_pixelizing = false;
            if selection_id == sel.id {
                next.error = Some(PIXELATE_ERROR_MESSAGE.to_owned());
            }
        }
        UiEvent::ApplyFillRequested {
            add_new_layer,
            should_delete_first,
        } => {
            if sel.is_uploading_fill {
                return (next, fx);
            }
            let Some(preview) = &sel.preview_image else {
                return (next, fx);
            };
            match editable_fill(sel) {
                Some(fill) => {
                    next.is_uploading_fill = true;
                    next.error = None;
                    fx.push(UiEffect::Send(Message::UpdateImageFill {
                        image_data: preview.data.clone(),
                        add_new_layer,
                        original_fill: fill,
                        should_delete_first,
                    }));
                }
                None => next.error = Some(MIXED_FILLS_MESSAGE.to_owned()),
            }
        }
        UiEvent::DeleteTopLayerRequested => fx.push(UiEffect::Send(Message::DeleteTopLayer)),
        UiEvent::CaptureSucceeded { image_data } => {
            next.is_uploading_fill = true;
            fx.push(UiEffect::Send(Message::UploadScreenshot { image_data }));
        }
    }
    (next, fx)
}

/// The image fill an edit would replace; `None` for mixed fills or no image fill.
fn editable_fill(sel: &SelectionState) -> Option<Fill> {
    sel.fills.editable_image_fill().cloned()
}
