// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Block-average pixelation of the exported selection image.

use mockup_capture::{decode_png, encode_png, CodecError};
use mockup_scene_port::Frame;
use thiserror::Error;
use tracing::debug;

use crate::state::ImageBuffer;

/// Pixelation failures.
#[derive(Debug, Error)]
pub enum PixelateError {
    /// Block size of zero.
    #[error("pixel size must be at least 1")]
    ZeroPixelSize,
    /// Source could not be decoded or the preview could not be encoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Result of one pixelation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixelated {
    /// Decoded RGBA8 pixels of the source.
    pub original: ImageBuffer,
    /// PNG bytes of the pixelated image.
    pub preview: ImageBuffer,
}

/// Byte offset of pixel `(x, y)` in a tightly packed RGBA8 buffer `w` pixels wide.
fn rgba_offset(w: u32, x: u32, y: u32) -> usize {
    (y as usize * w as usize + x as usize) * 4
}

/// Replace every `block`×`block` tile of `frame` with its mean color.
/// Tiles on the right and bottom edges are clipped to the image.
/// Inconsistent frames are returned unchanged.
pub fn pixelate(frame: &Frame, block: u32) -> Frame {
    let block = block.max(1);
    let (w, h) = (frame.width, frame.height);
    let mut out = frame.clone();
    if !frame.is_consistent() {
        return out;
    }
    let mut by = 0;
    while by < h {
        let bh = block.min(h - by);
        let mut bx = 0;
        while bx < w {
            let bw = block.min(w - bx);
            let mut sum = [0u64; 4];
            for y in by..by + bh {
                for x in bx..bx + bw {
                    let i = rgba_offset(w, x, y);
                    for (c, acc) in sum.iter_mut().enumerate() {
                        *acc += u64::from(frame.pixels[i + c]);
                    }
                }
            }
            let n = u64::from(bw) * u64::from(bh);
            let mean = sum.map(|acc| ((acc + n / 2) / n) as u8);
            for y in by..by + bh {
                for x in bx..bx + bw {
                    let i = rgba_offset(w, x, y);
                    out.pixels[i..i + 4].copy_from_slice(&mean);
                }
            }
            bx += bw;
        }
        by += bh;
    }
    out
}

/// Runs pixelation jobs for the UI.
#[derive(Debug, Default, Clone, Copy)]
pub struct Pixelator;

impl Pixelator {
    /// Pixelate `exported` (PNG). Reuses `original` when it already holds
    /// consistent RGBA8 pixels for the same dimensions.
    pub fn run(
        &self,
        exported: &ImageBuffer,
        original: Option<&ImageBuffer>,
        pixel_size: u32,
    ) -> Result<Pixelated, PixelateError> {
        if pixel_size == 0 {
            return Err(PixelateError::ZeroPixelSize);
        }
        let source = match original {
            Some(buf)
                if buf.is_rgba8() && buf.width == exported.width && buf.height == exported.height =>
            {
                Frame {
                    width: buf.width,
                    height: buf.height,
                    pixels: buf.data.clone(),
                }
            }
            _ => decode_png(&exported.data)?,
        };
        let preview = pixelate(&source, pixel_size);
        let png = encode_png(&preview)?;
        debug!(
            width = source.width,
            height = source.height,
            pixel_size,
            bytes = png.len(),
            "pixelated selection image"
        );
        Ok(Pixelated {
            preview: ImageBuffer {
                data: png,
                width: preview.width,
                height: preview.height,
            },
            original: ImageBuffer {
                width: source.width,
                height: source.height,
                data: source.pixels,
            },
        })
    }
}
