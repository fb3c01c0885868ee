// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted preferences for the UI bridge (capture + editing defaults).

use serde::{Deserialize, Serialize};

/// Config key the bridge stores its preferences under.
pub const BRIDGE_PREFS_KEY: &str = "mockup_bridge";

/// Saved preferences for the UI-side bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgePrefs {
    /// Offscreen capture parameters.
    pub capture: CapturePrefs,
    /// Pixel size applied when the user first pixelates a selection.
    pub default_pixel_size: u32,
    /// Device model key (see the UI crate's model table).
    pub model: String,
}

impl Default for BridgePrefs {
    fn default() -> Self {
        Self {
            capture: CapturePrefs::default(),
            default_pixel_size: 8,
            model: "laptop".into(),
        }
    }
}

/// Capture resolution and tone-mapping parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapturePrefs {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Supersampling factor used for antialiasing.
    pub pixel_ratio: f32,
    /// Exposure applied before tone mapping.
    pub exposure: f32,
}

impl Default for CapturePrefs {
    fn default() -> Self {
        Self {
            width: 2000,
            height: 2000,
            pixel_ratio: 2.0,
            exposure: 1.5,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn partial_blob_fills_missing_fields_with_defaults() {
        let prefs: BridgePrefs =
            serde_json::from_str(r#"{"model":"iphone","capture":{"width":800}}"#).unwrap();
        assert_eq!(prefs.model, "iphone");
        assert_eq!(prefs.capture.width, 800);
        assert_eq!(prefs.capture.height, 2000);
        assert_eq!(prefs.default_pixel_size, 8);
    }
}
