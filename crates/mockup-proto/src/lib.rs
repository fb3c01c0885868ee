// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wire schema for the mockup bridge.
//!
//! The plugin host (document access, no display) and the UI surface (display,
//! no document access) talk over a single ordered channel per direction. Every
//! record is a JSON object discriminated by its `type` tag; there is no version
//! field and no reply correlation. Ordering is the channel's delivery order.
//!
//! See [`wire`] for line framing and forward-compatible decoding.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub mod wire;

pub use wire::{decode_line, decode_value, encode_line, Decoded, WireError};

/// Fixed user-facing message shown for any failed export or capture.
pub const EXPORT_ERROR_MESSAGE: &str = "Unable to export image. Please try again.";

/// Every tag the protocol defines, in table order.
pub const KINDS: [&str; 10] = [
    "theme",
    "selection",
    "selection-loading",
    "selection-loaded",
    "capture-screenshot",
    "upload-screenshot",
    "export-error",
    "update-image-fill",
    "fill-upload-complete",
    "delete-top-layer",
];

/// Returns true when `tag` names a message this protocol version understands.
pub fn is_known_kind(tag: &str) -> bool {
    KINDS.contains(&tag)
}

/// Conventional flow of a message kind. Not enforced in-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Plugin host → UI surface.
    HostToUi,
    /// UI surface → plugin host.
    UiToHost,
}

/// Sender of an inbound record, as observed by the receiving context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// The parent plugin context that embeds the UI.
    Parent,
    /// Any other sender (another frame, an extension, a test harness).
    Other(String),
}

/// An undecoded record together with its provenance.
///
/// Decoding happens inside the receiver's failure boundary, so the raw JSON
/// value travels as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Inbound {
    /// Where the record came from.
    pub source: Source,
    /// The raw record.
    pub data: serde_json::Value,
}

impl Inbound {
    /// Wrap a record received from the parent plugin context.
    pub fn from_parent(data: serde_json::Value) -> Self {
        Self {
            source: Source::Parent,
            data,
        }
    }
}

/// Reference to an image asset stored in the design document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    /// Asset identifier.
    pub id: String,
    /// Pixel width of the stored asset.
    pub width: u32,
    /// Pixel height of the stored asset.
    pub height: u32,
    /// Media type, e.g. `image/png`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtype: Option<String>,
    /// Whether the fill keeps the asset's aspect ratio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_aspect_ratio: Option<bool>,
    /// Display name of the asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A paint attached to a document shape.
///
/// Fields this crate does not model are kept in `extra` so a fill sent back
/// to the host as `originalFill` arrives unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    /// Solid color, `#rrggbb`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    /// Opacity in `0.0..=1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    /// Image paint, when this is an image fill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_image: Option<ImageRef>,
    /// Unmodelled fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Fill {
    /// An image fill pointing at `image`.
    pub fn image(image: ImageRef) -> Self {
        Self {
            fill_opacity: Some(1.0),
            fill_image: Some(image),
            ..Self::default()
        }
    }

    /// True when this fill paints an image.
    pub fn is_image(&self) -> bool {
        self.fill_image.is_some()
    }
}

/// Fills of the current selection: a list, or `"mixed"` when a multi-selection
/// spans more than one distinct set of fills.
#[derive(Debug, Clone, PartialEq)]
pub enum Fills {
    /// Shapes disagree; no single fill is editable.
    Mixed,
    /// Ordered fill list shared by the selection.
    List(Vec<Fill>),
}

impl Default for Fills {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl Fills {
    /// True for the `"mixed"` sentinel.
    pub fn is_mixed(&self) -> bool {
        matches!(self, Self::Mixed)
    }

    /// The fill list, or `None` when mixed.
    pub fn as_slice(&self) -> Option<&[Fill]> {
        match self {
            Self::Mixed => None,
            Self::List(fills) => Some(fills.as_slice()),
        }
    }

    /// First image fill, only when the selection is not mixed.
    pub fn editable_image_fill(&self) -> Option<&Fill> {
        self.as_slice()?.iter().find(|f| f.is_image())
    }
}

const MIXED_TAG: &str = "mixed";

impl Serialize for Fills {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Mixed => serializer.serialize_str(MIXED_TAG),
            Self::List(fills) => fills.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FillsRepr {
    Tag(String),
    List(Vec<Fill>),
}

impl<'de> Deserialize<'de> for Fills {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match FillsRepr::deserialize(deserializer)? {
            FillsRepr::Tag(tag) if tag == MIXED_TAG => Ok(Self::Mixed),
            FillsRepr::Tag(other) => Err(serde::de::Error::custom(format!(
                "expected fill list or \"mixed\", got {other:?}"
            ))),
            FillsRepr::List(fills) => Ok(Self::List(fills)),
        }
    }
}

/// Selection summary carried by a `selection` message.
///
/// Senders may include more fields (older hosts sent the whole UI state);
/// they are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SelectionContent {
    /// Opaque selection identity.
    pub id: String,
    /// Display name of the selected shape.
    pub name: String,
    /// Fills of the selection.
    #[serde(default)]
    pub fills: Fills,
}

/// The closed set of protocol messages. Exactly one case per record,
/// discriminated by the `type` tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Message {
    /// Current theme token (host → UI).
    Theme {
        /// Theme token, e.g. `light` or `dark`.
        content: String,
    },
    /// Selection replaced; `None` means nothing is selected (host → UI).
    Selection {
        /// New selection, or `None`.
        #[serde(default)]
        content: Option<SelectionContent>,
    },
    /// Loading flag toggled (host → UI).
    SelectionLoading {
        /// New value of the flag.
        is_loading: bool,
    },
    /// Exported raster for a selection (host → UI).
    SelectionLoaded {
        /// Encoded image bytes.
        image_data: Vec<u8>,
        /// Pixel width.
        width: u32,
        /// Pixel height.
        height: u32,
        /// Selection the export was made for.
        selection_id: String,
    },
    /// Ask the UI to capture its 3D view (host → UI).
    CaptureScreenshot,
    /// Captured raster handed to the host for upload (UI → host).
    UploadScreenshot {
        /// PNG bytes.
        image_data: Vec<u8>,
    },
    /// Export or capture failed (host → UI). The detail is for logs only.
    ExportError {
        /// Diagnostic detail.
        error: String,
    },
    /// Apply an edited image as a fill or new layer (UI → host).
    UpdateImageFill {
        /// PNG bytes of the edited image.
        image_data: Vec<u8>,
        /// Create a new layer instead of replacing the fill.
        add_new_layer: bool,
        /// Fill being replaced.
        original_fill: Fill,
        /// Remove the most recently added layer first.
        should_delete_first: bool,
    },
    /// Upload finished; release the uploading flag (host → UI).
    FillUploadComplete,
    /// Remove the most recently added layer (UI → host).
    DeleteTopLayer,
}

impl Message {
    /// Wire tag of this message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Theme { .. } => "theme",
            Self::Selection { .. } => "selection",
            Self::SelectionLoading { .. } => "selection-loading",
            Self::SelectionLoaded { .. } => "selection-loaded",
            Self::CaptureScreenshot => "capture-screenshot",
            Self::UploadScreenshot { .. } => "upload-screenshot",
            Self::ExportError { .. } => "export-error",
            Self::UpdateImageFill { .. } => "update-image-fill",
            Self::FillUploadComplete => "fill-upload-complete",
            Self::DeleteTopLayer => "delete-top-layer",
        }
    }

    /// Conventional direction of this message kind.
    pub fn direction(&self) -> Direction {
        match self {
            Self::UploadScreenshot { .. } | Self::UpdateImageFill { .. } | Self::DeleteTopLayer => {
                Direction::UiToHost
            }
            _ => Direction::HostToUi,
        }
    }
}
