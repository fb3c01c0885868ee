// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Selection and theme state plus the reducers that apply protocol messages.
//!
//! Reducers are pure: they take the current [`Store`] and a [`Message`] and
//! return the next store or an error. The handler installs the result only on
//! success, so a failing reducer never leaves a partially updated store.

use mockup_proto::{Fills, Message, EXPORT_ERROR_MESSAGE};
use thiserror::Error;

/// Pixel size used for pixelation until the user picks another one.
pub const DEFAULT_PIXEL_SIZE: u32 = 8;

/// Theme token before the host reports one.
pub const DEFAULT_THEME: &str = "light";

/// A raster owned by the store.
///
/// `exported_image` and `preview_image` hold encoded PNG bytes;
/// `original_image` holds the decoded RGBA8 pixels of the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    /// Bytes (PNG or RGBA8, depending on the slot).
    pub data: Vec<u8>,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

impl ImageBuffer {
    /// True when `data` has exactly `width * height * 4` bytes.
    pub fn is_rgba8(&self) -> bool {
        u64::from(self.width) * u64::from(self.height) * 4 == self.data.len() as u64
    }
}

/// Everything the UI knows about the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    /// Selected shape id; empty when nothing is selected.
    pub id: String,
    /// Selected shape name.
    pub name: String,
    /// Fills of the selected shape.
    pub fills: Fills,
    /// Waiting for the host export.
    pub is_loading: bool,
    /// Pixelation running.
    pub is_pixelizing: bool,
    /// Waiting for the host to finish an upload.
    pub is_uploading_fill: bool,
    /// Preview render in progress.
    pub is_preview_loading: bool,
    /// Block size for pixelation.
    pub pixel_size: u32,
    /// User-facing error text.
    pub error: Option<String>,
    /// Decoded RGBA8 pixels of the export.
    pub original_image: Option<ImageBuffer>,
    /// PNG bytes from the host export.
    pub exported_image: Option<ImageBuffer>,
    /// PNG bytes of the pixelated preview.
    pub preview_image: Option<ImageBuffer>,
}

impl SelectionState {
    /// Nothing selected, nothing in flight.
    pub fn empty(pixel_size: u32) -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            fills: Fills::default(),
            is_loading: false,
            is_pixelizing: false,
            is_uploading_fill: false,
            is_preview_loading: false,
            pixel_size,
            error: None,
            original_image: None,
            exported_image: None,
            preview_image: None,
        }
    }

    /// True when a shape is selected.
    pub fn has_selection(&self) -> bool {
        !self.id.is_empty()
    }

    /// The image the viewer should show: the preview when present, else the export.
    pub fn display_image(&self) -> Option<&ImageBuffer> {
        self.preview_image.as_ref().or(self.exported_image.as_ref())
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::empty(DEFAULT_PIXEL_SIZE)
    }
}

/// The host's current theme token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeState {
    /// Token such as `light` or `dark`.
    pub token: String,
}

impl Default for ThemeState {
    fn default() -> Self {
        Self {
            token: DEFAULT_THEME.to_owned(),
        }
    }
}

/// Observable UI state. Written only by the message handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    /// Selection slice.
    pub selection: SelectionState,
    /// Theme slice.
    pub theme: ThemeState,
    /// Pixel size restored whenever the selection resets.
    pub default_pixel_size: u32,
}

impl Store {
    /// Fresh store whose selection resets to `default_pixel_size`.
    pub fn with_pixel_size(default_pixel_size: u32) -> Self {
        Self {
            selection: SelectionState::empty(default_pixel_size),
            theme: ThemeState::default(),
            default_pixel_size,
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::with_pixel_size(DEFAULT_PIXEL_SIZE)
    }
}

/// Reducer failures. The handler logs them and clears `is_loading`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReduceError {
    /// Export payload had no bytes or a zero dimension.
    #[error("empty image for selection {selection_id}: {width}x{height}, {len} bytes")]
    EmptyImage {
        /// Selection the export was made for.
        selection_id: String,
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// Byte count received.
        len: usize,
    },
    /// Message kind has no store transition.
    #[error("no reducer for message kind {0}")]
    NoReducer(&'static str),
}

/// Outcome of a successful reduction.
#[derive(Debug, Clone, PartialEq)]
pub enum Reduced {
    /// The store changed (or was rewritten with equal content).
    Applied(Store),
    /// An export for a selection that is no longer current; nothing changed.
    Stale {
        /// Selection id carried by the message.
        selection_id: String,
    },
}

/// Apply one host-to-UI message to `store`.
///
/// # Errors
/// [`ReduceError::EmptyImage`] when a current export carries no pixels,
/// [`ReduceError::NoReducer`] for kinds that never touch the store.
pub fn reduce(store: &Store, msg: &Message) -> Result<Reduced, ReduceError> {
    let mut next = store.clone();
    match msg {
        Message::Theme { content } => {
            next.theme.token.clone_from(content);
        }
        Message::Selection { content: None } => {
            next.selection = SelectionState::empty(store.default_pixel_size);
        }
        Message::Selection {
            content: Some(content),
        } => {
            let prev = &store.selection;
            let mut sel = SelectionState::empty(store.default_pixel_size);
            sel.id.clone_from(&content.id);
            sel.name.clone_from(&content.name);
            sel.fills = content.fills.clone();
            sel.is_loading = prev.is_loading;
            sel.is_pixelizing = prev.is_pixelizing;
            sel.is_uploading_fill = prev.is_uploading_fill;
            sel.is_preview_loading = prev.is_preview_loading;
            next.selection = sel;
        }
        Message::SelectionLoading { is_loading } => {
            next.selection.is_loading = *is_loading;
            if *is_loading {
                next.selection.error = None;
            }
        }
        Message::SelectionLoaded {
            image_data,
            width,
            height,
            selection_id,
        } => {
            // nothing selected has id "", which must not match an export
            if !store.selection.has_selection() || *selection_id != store.selection.id {
                return Ok(Reduced::Stale {
                    selection_id: selection_id.clone(),
                });
            }
            if image_data.is_empty() || *width == 0 || *height == 0 {
                return Err(ReduceError::EmptyImage {
                    selection_id: selection_id.clone(),
                    width: *width,
                    height: *height,
                    len: image_data.len(),
                });
            }
            let sel = &mut next.selection;
            sel.exported_image = Some(ImageBuffer {
                data: image_data.clone(),
                width: *width,
                height: *height,
            });
            // decoded pixels belong to the previous export
            sel.original_image = None;
            sel.is_loading = false;
            sel.error = None;
        }
        Message::ExportError { .. } => {
            next.selection.is_loading = false;
            next.selection.error = Some(EXPORT_ERROR_MESSAGE.to_owned());
        }
        Message::FillUploadComplete => {
            next.selection.is_uploading_fill = false;
        }
        Message::CaptureScreenshot
        | Message::UploadScreenshot { .. }
        | Message::UpdateImageFill { .. }
        | Message::DeleteTopLayer => return Err(ReduceError::NoReducer(msg.kind())),
    }
    Ok(Reduced::Applied(next))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use mockup_proto::{Fill, ImageRef, SelectionContent};

    fn applied(store: &Store, msg: &Message) -> Store {
        match reduce(store, msg) {
            Ok(Reduced::Applied(s)) => s,
            other => panic!("expected applied, got {other:?}"),
        }
    }

    fn select(id: &str) -> Message {
        Message::Selection {
            content: Some(SelectionContent {
                id: id.into(),
                name: format!("Shape {id}"),
                fills: Fills::List(vec![Fill::image(ImageRef {
                    id: "img".into(),
                    width: 10,
                    height: 10,
                    mtype: None,
                    keep_aspect_ratio: None,
                    name: None,
                })]),
            }),
        }
    }

    fn loaded(id: &str, data: Vec<u8>) -> Message {
        Message::SelectionLoaded {
            image_data: data,
            width: 2,
            height: 2,
            selection_id: id.into(),
        }
    }

    #[test]
    fn theme_replaces_token_only() {
        let s = applied(&Store::default(), &select("a"));
        let t = applied(
            &s,
            &Message::Theme {
                content: "dark".into(),
            },
        );
        assert_eq!(t.theme.token, "dark");
        assert_eq!(t.selection, s.selection);
    }

    #[test]
    fn null_selection_resets_everything_but_theme() {
        let mut s = Store::with_pixel_size(4);
        s.theme.token = "dark".into();
        s = applied(&s, &select("a"));
        s = applied(&s, &loaded("a", vec![1, 2, 3]));
        s.selection.is_uploading_fill = true;
        s.selection.pixel_size = 32;
        s.selection.error = Some("boom".into());

        let r = applied(&s, &Message::Selection { content: None });
        assert_eq!(r.selection, SelectionState::empty(4));
        assert_eq!(r.theme.token, "dark");
    }

    #[test]
    fn new_selection_drops_rasters_and_keeps_in_flight_flags() {
        let mut s = applied(&Store::default(), &select("a"));
        s = applied(&s, &loaded("a", vec![9; 4]));
        s.selection.is_uploading_fill = true;
        s.selection.is_loading = true;
        s.selection.error = Some("old".into());

        let r = applied(&s, &select("b"));
        assert_eq!(r.selection.id, "b");
        assert_eq!(r.selection.name, "Shape b");
        assert!(r.selection.exported_image.is_none());
        assert!(r.selection.error.is_none());
        assert!(r.selection.is_uploading_fill);
        assert!(r.selection.is_loading);
    }

    #[test]
    fn matching_export_is_applied_and_clears_loading() {
        let mut s = applied(&Store::default(), &select("a"));
        s = applied(&s, &Message::SelectionLoading { is_loading: true });
        s.selection.original_image = Some(ImageBuffer {
            data: vec![0; 16],
            width: 2,
            height: 2,
        });
        let r = applied(&s, &loaded("a", vec![7, 7]));
        let img = r.selection.exported_image.as_ref().map(|i| i.data.clone());
        assert_eq!(img, Some(vec![7, 7]));
        assert!(!r.selection.is_loading);
        assert!(r.selection.original_image.is_none());
    }

    #[test]
    fn stale_export_is_reported_and_changes_nothing() {
        let s = applied(&Store::default(), &select("b"));
        let r = reduce(&s, &loaded("a", vec![1])).unwrap();
        assert_eq!(
            r,
            Reduced::Stale {
                selection_id: "a".into()
            }
        );
    }

    #[test]
    fn export_with_empty_id_after_null_selection_is_stale() {
        let s = applied(&Store::default(), &select("a"));
        let s = applied(&s, &Message::Selection { content: None });
        let r = reduce(&s, &loaded("", vec![1, 2, 3])).unwrap();
        assert_eq!(
            r,
            Reduced::Stale {
                selection_id: String::new()
            }
        );
    }

    #[test]
    fn empty_export_is_an_error() {
        let s = applied(&Store::default(), &select("a"));
        let err = reduce(&s, &loaded("a", Vec::new())).unwrap_err();
        assert!(matches!(err, ReduceError::EmptyImage { len: 0, .. }));
    }

    #[test]
    fn export_error_sets_fixed_text() {
        let mut s = applied(&Store::default(), &select("a"));
        s.selection.is_loading = true;
        let r = applied(
            &s,
            &Message::ExportError {
                error: "disk on fire".into(),
            },
        );
        assert!(!r.selection.is_loading);
        assert_eq!(r.selection.error.as_deref(), Some(EXPORT_ERROR_MESSAGE));
    }

    #[test]
    fn loading_true_clears_previous_error() {
        let mut s = Store::default();
        s.selection.error = Some(EXPORT_ERROR_MESSAGE.into());
        let r = applied(&s, &Message::SelectionLoading { is_loading: true });
        assert!(r.selection.is_loading);
        assert!(r.selection.error.is_none());
        let r = applied(&r, &Message::SelectionLoading { is_loading: false });
        assert!(!r.selection.is_loading);
    }

    #[test]
    fn fill_upload_complete_releases_flag() {
        let mut s = Store::default();
        s.selection.is_uploading_fill = true;
        let r = applied(&s, &Message::FillUploadComplete);
        assert!(!r.selection.is_uploading_fill);
    }

    #[test]
    fn host_bound_kinds_have_no_reducer() {
        let err = reduce(&Store::default(), &Message::DeleteTopLayer).unwrap_err();
        assert_eq!(err, ReduceError::NoReducer("delete-top-layer"));
    }
}
