// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! PNG codec adapter: frames to transferable bytes and back.
//!
//! PNG is lossless and keeps the alpha channel; the encoded bytes travel as-is
//! (no text framing).

use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat};
use mockup_scene_port::Frame;
use thiserror::Error;

/// Encode/decode failures.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Buffer length does not match the frame dimensions.
    #[error("frame is {width}x{height} but holds {len} bytes")]
    Inconsistent {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// Actual buffer length.
        len: usize,
    },
    /// A frame with no pixels cannot be encoded.
    #[error("frame has zero area")]
    Empty,
    /// The PNG encoder rejected the frame.
    #[error("png encode failed: {0}")]
    Encode(#[source] image::ImageError),
    /// The bytes are not a decodable PNG.
    #[error("png decode failed: {0}")]
    Decode(#[source] image::ImageError),
}

/// Encode an RGBA frame as PNG.
pub fn encode_png(frame: &Frame) -> Result<Vec<u8>, CodecError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(CodecError::Empty);
    }
    if !frame.is_consistent() {
        return Err(CodecError::Inconsistent {
            width: frame.width,
            height: frame.height,
            len: frame.pixels.len(),
        });
    }
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            &frame.pixels,
            frame.width,
            frame.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(CodecError::Encode)?;
    Ok(out)
}

/// Decode PNG bytes into an RGBA frame.
pub fn decode_png(bytes: &[u8]) -> Result<Frame, CodecError> {
    let rgba = image::load(Cursor::new(bytes), ImageFormat::Png)
        .map_err(CodecError::Decode)?
        .into_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Frame {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn png_keeps_alpha_and_dimensions() {
        let frame = Frame {
            width: 2,
            height: 1,
            pixels: vec![255, 0, 0, 0, 10, 20, 30, 128],
        };
        let png = encode_png(&frame).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        assert_eq!(decode_png(&png).unwrap(), frame);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let frame = Frame {
            width: 4,
            height: 4,
            pixels: vec![0; 10],
        };
        assert!(matches!(
            encode_png(&frame),
            Err(CodecError::Inconsistent { len: 10, .. })
        ));
    }

    #[test]
    fn zero_area_is_rejected() {
        assert!(matches!(
            encode_png(&Frame::transparent(0, 5)),
            Err(CodecError::Empty)
        ));
    }

    #[test]
    fn garbage_does_not_decode() {
        assert!(matches!(
            decode_png(b"definitely not a png"),
            Err(CodecError::Decode(_))
        ));
    }
}
