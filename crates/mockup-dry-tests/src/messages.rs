// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Protocol fixtures: typed messages, raw JSON records and small PNGs.

use mockup_capture::encode_png;
use mockup_proto::{Fill, Fills, ImageRef, Message, SelectionContent};
use mockup_scene_port::Frame;
use serde_json::{json, Value};

/// An image fill referencing asset `id`.
pub fn image_fill(id: &str, width: u32, height: u32) -> Fill {
    Fill::image(ImageRef {
        id: id.to_owned(),
        width,
        height,
        mtype: Some("image/png".to_owned()),
        keep_aspect_ratio: Some(true),
        name: Some(format!("{id}.png")),
    })
}

/// `selection` for shape `id` carrying one image fill.
pub fn selection_message(id: &str) -> Message {
    Message::Selection {
        content: Some(SelectionContent {
            id: id.to_owned(),
            name: format!("Shape {id}"),
            fills: Fills::List(vec![image_fill(&format!("{id}-img"), 4, 4)]),
        }),
    }
}

/// `selection-loaded` for `selection_id` with the given bytes.
pub fn loaded_message(selection_id: &str, image_data: Vec<u8>, width: u32, height: u32) -> Message {
    Message::SelectionLoaded {
        image_data,
        width,
        height,
        selection_id: selection_id.to_owned(),
    }
}

/// Raw `selection` record as the host would post it.
pub fn selection_record(id: &str) -> Value {
    json!({
        "type": "selection",
        "content": {
            "id": id,
            "name": format!("Shape {id}"),
            "fills": [{
                "fillOpacity": 1.0,
                "fillImage": {"id": format!("{id}-img"), "width": 4, "height": 4, "mtype": "image/png"}
            }]
        }
    })
}

/// Raw `selection-loaded` record as the host would post it.
pub fn loaded_record(selection_id: &str, image_data: &[u8], width: u32, height: u32) -> Value {
    json!({
        "type": "selection-loaded",
        "imageData": image_data,
        "width": width,
        "height": height,
        "selectionId": selection_id,
    })
}

/// PNG bytes of a `width`×`height` image filled with `rgba`.
pub fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let frame = Frame {
        width,
        height,
        pixels: rgba.repeat(width as usize * height as usize),
    };
    // fixtures only build consistent frames; an empty vec surfaces as a test failure
    encode_png(&frame).unwrap_or_default()
}
