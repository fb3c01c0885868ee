// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Camera state for scene rendering.

use std::f32::consts::FRAC_PI_4;

/// Perspective camera looking at the device.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    /// Camera position in world space.
    pub position: [f32; 3],
    /// Look-at target in world space.
    pub target: [f32; 3],
    /// Up vector.
    pub up: [f32; 3],
    /// Vertical field of view in radians.
    pub fov_y_radians: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            fov_y_radians: FRAC_PI_4,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl CameraState {
    /// Distance from the camera to its target.
    pub fn distance(&self) -> f32 {
        let d = [
            self.position[0] - self.target[0],
            self.position[1] - self.target[1],
            self.position[2] - self.target[2],
        ];
        (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
    }

    /// World-space height visible at the target plane.
    pub fn visible_height(&self) -> f32 {
        2.0 * self.distance() * (self.fov_y_radians * 0.5).tan()
    }
}
