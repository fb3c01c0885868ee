// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless in-memory design document.

use std::collections::HashMap;
use std::future::{ready, Future};
use std::io::Cursor;

use image::ImageFormat;
use mockup_proto::{Fill, ImageRef};

use crate::document::{DocumentError, DocumentPort, ExportedImage, Rect, Shape};

/// Page of shapes kept in memory, bottom layer first.
///
/// Exports return bytes registered with [`InMemoryDocument::set_export`];
/// uploads must be PNG. Failures can be injected per operation.
#[derive(Debug, Default)]
pub struct InMemoryDocument {
    shapes: Vec<Shape>,
    selected: Vec<String>,
    exports: HashMap<String, ExportedImage>,
    images: Vec<(ImageRef, Vec<u8>)>,
    next_id: u64,
    /// Fail every export.
    pub fail_export: bool,
    /// Fail every upload.
    pub fail_upload: bool,
}

impl InMemoryDocument {
    /// Empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape on top of the page.
    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Replace the selection. Unknown ids are kept and simply never resolve.
    pub fn select<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = ids.into_iter().map(Into::into).collect();
    }

    /// Register what exporting `shape_id` yields.
    pub fn set_export(&mut self, shape_id: &str, image: ExportedImage) {
        self.exports.insert(shape_id.to_owned(), image);
    }

    /// All shapes, bottom first.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Shape by id.
    pub fn shape(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Uploaded assets with their bytes, oldest first.
    pub fn images(&self) -> &[(ImageRef, Vec<u8>)] {
        &self.images
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn index_of(&self, id: &str) -> Result<usize, DocumentError> {
        self.shapes
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| DocumentError::ShapeNotFound(id.to_owned()))
    }

    fn store_upload(&mut self, name: &str, data: &[u8]) -> Result<ImageRef, DocumentError> {
        if self.fail_upload {
            return Err(DocumentError::Upload("simulated upload failure".into()));
        }
        let decoded = image::load(Cursor::new(data), ImageFormat::Png)
            .map_err(|e| DocumentError::Upload(e.to_string()))?;
        let image = ImageRef {
            id: self.fresh_id("image"),
            width: decoded.width(),
            height: decoded.height(),
            mtype: Some("image/png".to_owned()),
            keep_aspect_ratio: Some(true),
            name: Some(name.to_owned()),
        };
        self.images.push((image.clone(), data.to_vec()));
        Ok(image)
    }
}

impl DocumentPort for InMemoryDocument {
    fn selection(&self) -> Vec<Shape> {
        self.selected
            .iter()
            .filter_map(|id| self.shape(id).cloned())
            .collect()
    }

    fn export_png(
        &mut self,
        shape_id: &str,
    ) -> impl Future<Output = Result<ExportedImage, DocumentError>> {
        let result = if self.fail_export {
            Err(DocumentError::Export("simulated export failure".into()))
        } else {
            self.exports
                .get(shape_id)
                .cloned()
                .ok_or_else(|| DocumentError::Export(format!("nothing to export for {shape_id}")))
        };
        ready(result)
    }

    fn upload_image(
        &mut self,
        name: &str,
        data: &[u8],
    ) -> impl Future<Output = Result<ImageRef, DocumentError>> {
        ready(self.store_upload(name, data))
    }

    fn create_image_layer(
        &mut self,
        image: &ImageRef,
        above: Option<&str>,
    ) -> Result<String, DocumentError> {
        let slot = match above {
            Some(id) => self.index_of(id)? + 1,
            None => self.shapes.len(),
        };
        let bounds = match above {
            Some(id) => self.shape(id).map(|s| s.bounds).unwrap_or_default(),
            None => Rect {
                width: f64::from(image.width),
                height: f64::from(image.height),
                ..Rect::default()
            },
        };
        let id = self.fresh_id("layer");
        self.shapes.insert(
            slot,
            Shape {
                id: id.clone(),
                name: image.name.clone().unwrap_or_else(|| id.clone()),
                fills: vec![Fill::image(image.clone())],
                bounds,
            },
        );
        Ok(id)
    }

    fn set_fills(&mut self, shape_id: &str, fills: Vec<Fill>) -> Result<(), DocumentError> {
        let i = self.index_of(shape_id)?;
        self.shapes[i].fills = fills;
        Ok(())
    }

    fn remove_shape(&mut self, shape_id: &str) -> Result<(), DocumentError> {
        let i = self.index_of(shape_id)?;
        self.shapes.remove(i);
        self.selected.retain(|s| s != shape_id);
        Ok(())
    }
}
