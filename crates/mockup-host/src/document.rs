// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Port to the design document owned by the plugin host.

use std::future::Future;

use mockup_proto::{Fill, ImageRef};
use thiserror::Error;

/// Axis-aligned bounds in document units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// A shape as seen by the bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Document-unique id.
    pub id: String,
    /// Layer name.
    pub name: String,
    /// Fill stack, bottom first.
    pub fills: Vec<Fill>,
    /// Bounds.
    pub bounds: Rect,
}

/// Raster produced by exporting a shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    /// PNG bytes.
    pub data: Vec<u8>,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

/// Document-side failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// No shape with this id.
    #[error("shape not found: {0}")]
    ShapeNotFound(String),
    /// Export of a shape failed.
    #[error("export failed: {0}")]
    Export(String),
    /// Image upload was rejected.
    #[error("upload failed: {0}")]
    Upload(String),
    /// Layer or fill edit was rejected.
    #[error("edit failed: {0}")]
    Edit(String),
}

/// Operations the bridge needs from the design document.
pub trait DocumentPort {
    /// Currently selected shapes, in selection order.
    fn selection(&self) -> Vec<Shape>;

    /// Export `shape_id` as PNG.
    fn export_png(
        &mut self,
        shape_id: &str,
    ) -> impl Future<Output = Result<ExportedImage, DocumentError>>;

    /// Store `data` (PNG) as an image asset named `name`.
    fn upload_image(
        &mut self,
        name: &str,
        data: &[u8],
    ) -> impl Future<Output = Result<ImageRef, DocumentError>>;

    /// Create a rectangle filled with `image` directly above `above` (or at
    /// the top of the page when `None`). Returns the new shape id.
    fn create_image_layer(
        &mut self,
        image: &ImageRef,
        above: Option<&str>,
    ) -> Result<String, DocumentError>;

    /// Replace the fill stack of `shape_id`.
    fn set_fills(&mut self, shape_id: &str, fills: Vec<Fill>) -> Result<(), DocumentError>;

    /// Remove `shape_id` from the document.
    fn remove_shape(&mut self, shape_id: &str) -> Result<(), DocumentError>;
}
