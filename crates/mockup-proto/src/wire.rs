// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON-lines framing for protocol records.
//!
//! One record per line. Decoding reads the `type` tag before the payload so a
//! tag this version does not know comes back as [`Decoded::Unknown`] instead of
//! an error; only a known tag with a broken payload is a [`WireError`].

use serde_json::Value;
use thiserror::Error;

use crate::{is_known_kind, Message};

/// Framing and payload errors.
#[derive(Debug, Error)]
pub enum WireError {
    /// The line is not valid JSON, or a message failed to serialize.
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    /// The record is valid JSON but not an object.
    #[error("record is not a json object")]
    NotAnObject,
    /// The object has no string `type` field.
    #[error("record has no `type` tag")]
    MissingTag,
    /// A known tag carried a payload that does not match its shape.
    #[error("invalid `{kind}` payload: {source}")]
    Payload {
        /// Tag of the offending record.
        kind: String,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Result of decoding one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A message this protocol version understands.
    Known(Message),
    /// A well-formed record with a tag from a newer (or foreign) sender.
    Unknown(String),
}

/// Decode an already-parsed JSON record.
pub fn decode_value(value: Value) -> Result<Decoded, WireError> {
    let tag = match &value {
        Value::Object(map) => match map.get("type") {
            Some(Value::String(tag)) => tag.clone(),
            _ => return Err(WireError::MissingTag),
        },
        _ => return Err(WireError::NotAnObject),
    };
    if !is_known_kind(&tag) {
        return Ok(Decoded::Unknown(tag));
    }
    serde_json::from_value(value)
        .map(Decoded::Known)
        .map_err(|source| WireError::Payload { kind: tag, source })
}

/// Decode one line of the channel. Surrounding whitespace is ignored.
pub fn decode_line(line: &str) -> Result<Decoded, WireError> {
    let value: Value = serde_json::from_str(line.trim())?;
    decode_value(value)
}

/// Encode a message as a single newline-terminated line.
pub fn encode_line(msg: &Message) -> Result<String, WireError> {
    let mut line = serde_json::to_string(msg)?;
    line.push('\n');
    Ok(line)
}
