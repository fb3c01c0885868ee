// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Device models the viewer can frame a selection in.

use std::f32::consts::FRAC_PI_2;

use mockup_scene_port::{ColorRgba8, DeviceFrame};

/// Model shown when none is configured.
pub const DEFAULT_MODEL: &str = "laptop";

/// Credit line for a third-party model asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribution {
    /// Author display name.
    pub author: &'static str,
    /// Author profile.
    pub author_url: &'static str,
    /// Model page.
    pub model_url: &'static str,
    /// License name.
    pub license: &'static str,
    /// License text.
    pub license_url: &'static str,
}

/// Static description of one device model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelConfig {
    /// Lookup key.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Path of the glTF asset.
    pub model_path: &'static str,
    /// Mesh the selection image is mapped onto.
    pub screen_mesh_name: &'static str,
    /// Materials recolored by the case color.
    pub case_material_names: &'static [&'static str],
    /// Meshes hidden when the matte finish is off.
    pub matte_mesh_names: &'static [&'static str],
    /// Matte finish on by default.
    pub default_matte: bool,
    /// Case color used by the software renderer.
    pub case_color: ColorRgba8,
    /// Initial model position.
    pub initial_position: [f32; 3],
    /// Initial model rotation (Euler, radians).
    pub initial_rotation: [f32; 3],
    /// Asset credits.
    pub attribution: Attribution,
    /// Screen resolution the selection should be exported at, in pixels.
    pub recommended_resolution: (u32, u32),
}

impl ModelConfig {
    /// Width / height of the recommended resolution.
    pub fn screen_aspect(&self) -> f32 {
        let (w, h) = self.recommended_resolution;
        w as f32 / h.max(1) as f32
    }

    /// Device frame for the software renderer.
    pub fn device_frame(&self) -> DeviceFrame {
        DeviceFrame {
            screen_aspect: self.screen_aspect(),
            case_color: self.case_color,
            matte: self.default_matte,
            ..DeviceFrame::default()
        }
    }
}

/// Every known model.
pub static MODELS: [ModelConfig; 2] = [
    ModelConfig {
        key: "iphone",
        name: "iPhone",
        model_path: "/iphone_mockup.glb",
        screen_mesh_name: "Object_13",
        case_material_names: &["Back.001", "GOLD.001"],
        matte_mesh_names: &["Object_6"],
        default_matte: false,
        case_color: [196, 170, 128, 255],
        initial_position: [0.0, 0.0, 0.0],
        initial_rotation: [0.0, -FRAC_PI_2, 0.0],
        attribution: Attribution {
            author: "SDC PERFORMANCE™️",
            author_url: "https://sketchfab.com/Lambo_SC04",
            model_url: "https://sketchfab.com/3d-models/free-iphone-13-pro-2021-a35156d91cf44e70a2fdfeade54ae0b2",
            license: "CC 4.0",
            license_url: "https://creativecommons.org/licenses/by/4.0/",
        },
        recommended_resolution: (2532, 1170),
    },
    ModelConfig {
        key: "laptop",
        name: "Laptop",
        model_path: "/macbook_mockup.glb",
        screen_mesh_name: "Object_21",
        case_material_names: &["Material.003"],
        matte_mesh_names: &["Object_4", "Object_18"],
        default_matte: true,
        case_color: [46, 46, 50, 255],
        initial_position: [0.0, -0.25, 0.0],
        initial_rotation: [0.0, 0.0, 0.0],
        attribution: Attribution {
            author: "jc1245",
            author_url: "https://sketchfab.com/jasperchui2007",
            model_url: "https://sketchfab.com/3d-models/apple-macbook-pro-16-inch-2021-6a42b31bac064b00a91fbfebec07c852",
            license: "CC BY 4.0",
            license_url: "https://creativecommons.org/licenses/by/4.0/",
        },
        recommended_resolution: (3456, 2234),
    },
];

/// Look up a model by key or display name, ignoring case.
pub fn model_config(name: &str) -> Option<&'static ModelConfig> {
    let name = name.trim();
    MODELS
        .iter()
        .find(|m| m.key.eq_ignore_ascii_case(name) || m.name.eq_ignore_ascii_case(name))
}

/// The configured model, falling back to [`DEFAULT_MODEL`].
pub fn model_or_default(name: &str) -> &'static ModelConfig {
    model_config(name).unwrap_or(&MODELS[1])
}
