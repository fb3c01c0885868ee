// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Settings resolution and the line loop.

use anyhow::Result;
use mockup_app_core::config::{ConfigService, ConfigStore};
use mockup_app_core::prefs::{BridgePrefs, BRIDGE_PREFS_KEY};
use mockup_capture::{CaptureRequest, SoftwareFactory};
use mockup_proto::wire::encode_line;
use mockup_proto::Inbound;
use mockup_scene_port::{CameraState, RendererFactory, Scene};
use mockup_ui::models::{model_config, model_or_default, ModelConfig, DEFAULT_MODEL};
use mockup_ui::ui_effects::{RealEffectsRunner, UiEffectsRunner};
use mockup_ui::{Store, UiRuntime, Viewer};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Saved preferences from `store`, or defaults when it cannot supply them.
pub fn load_prefs<S: ConfigStore>(store: S) -> BridgePrefs {
    match ConfigService::new(store).load_or_init(BRIDGE_PREFS_KEY) {
        Ok(prefs) => prefs,
        Err(err) => {
            warn!(error = %err, key = BRIDGE_PREFS_KEY, "preferences unreadable; using defaults");
            BridgePrefs::default()
        }
    }
}

/// Effective settings after merging preferences and flags.
#[derive(Debug, Clone)]
pub struct BridgeSettings {
    pub request: CaptureRequest,
    pub model: &'static ModelConfig,
    pub pixel_size: u32,
}

impl BridgeSettings {
    /// Flags win over saved preferences; unknown models fall back to the default.
    pub fn resolve(
        prefs: &BridgePrefs,
        width: Option<u32>,
        height: Option<u32>,
        model: Option<&str>,
    ) -> Self {
        let name = model.unwrap_or(&prefs.model);
        if model_config(name).is_none() {
            warn!(model = %name, fallback = DEFAULT_MODEL, "unknown device model");
        }
        let capture = &prefs.capture;
        Self {
            request: CaptureRequest {
                width: width.unwrap_or(capture.width),
                height: height.unwrap_or(capture.height),
                exposure: capture.exposure,
                pixel_ratio: capture.pixel_ratio,
            },
            model: model_or_default(name),
            pixel_size: prefs.default_pixel_size.max(1),
        }
    }
}

/// UI runtime with the software renderer and the configured device model.
pub fn build_runtime(settings: &BridgeSettings) -> UiRuntime<SoftwareFactory, RealEffectsRunner> {
    let scene = Scene {
        device: settings.model.device_frame(),
        ..Scene::default()
    };
    UiRuntime::new(
        Store::with_pixel_size(settings.pixel_size),
        Viewer::new(scene, CameraState::default()),
        SoftwareFactory,
        settings.request,
        RealEffectsRunner::default(),
    )
}

/// Handle every line of `input` to completion, in order, writing replies to `output`.
pub async fn run<F, E, R, W>(runtime: &mut UiRuntime<F, E>, input: R, mut output: W) -> Result<()>
where
    F: RendererFactory,
    E: UiEffectsRunner,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut handled = 0u64;
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        // malformed JSON still goes through the handler boundary
        let data = serde_json::from_str::<Value>(&line).unwrap_or_else(|err| {
            debug!(error = %err, "input line is not JSON");
            Value::String(line)
        });
        for msg in runtime.on_record(&Inbound::from_parent(data)).await {
            debug!(kind = msg.kind(), "posting to host");
            output.write_all(encode_line(&msg)?.as_bytes()).await?;
        }
        output.flush().await?;
        handled += 1;
    }
    info!(handled, "input closed");
    Ok(())
}
