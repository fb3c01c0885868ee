// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The 3D viewer surface: scene, camera and the capture signal it listens to.

use std::sync::mpsc;

use mockup_capture::{capture_screenshot, decode_png, CaptureError, CaptureRequest, CodecError};
use mockup_scene_port::{CameraState, RendererFactory, Scene, Texture};
use tracing::debug;

use crate::ports::ViewerPort;
use crate::state::ImageBuffer;

/// Signals delivered to a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerEvent {
    /// Capture the current view and hand the PNG back.
    CaptureRequested,
}

/// Cloneable sender side of a viewer's signal channel.
#[derive(Debug, Clone)]
pub struct ViewerHandle {
    tx: mpsc::Sender<ViewerEvent>,
}

impl ViewerPort for ViewerHandle {
    fn request_capture(&self) -> bool {
        self.tx.send(ViewerEvent::CaptureRequested).is_ok()
    }
}

/// Viewer surface. Dropping it disconnects every [`ViewerHandle`].
#[derive(Debug)]
pub struct Viewer {
    scene: Scene,
    camera: CameraState,
    tx: mpsc::Sender<ViewerEvent>,
    rx: mpsc::Receiver<ViewerEvent>,
}

impl Viewer {
    /// New surface showing `scene` from `camera`.
    pub fn new(scene: Scene, camera: CameraState) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            scene,
            camera,
            tx,
            rx,
        }
    }

    /// A handle the message handler can signal through.
    pub fn handle(&self) -> ViewerHandle {
        ViewerHandle {
            tx: self.tx.clone(),
        }
    }

    /// Pending signals, oldest first.
    pub fn drain_events(&mut self) -> Vec<ViewerEvent> {
        self.rx.try_iter().collect()
    }

    /// Scene being shown.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene, for model and background changes.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Camera the view is rendered from.
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    /// Put `image` (PNG bytes) on the device screen, or blank it with `None`.
    pub fn show_image(&mut self, image: Option<&ImageBuffer>) -> Result<(), CodecError> {
        self.scene.screen = match image {
            Some(buf) => {
                let frame = decode_png(&buf.data)?;
                debug!(width = frame.width, height = frame.height, "viewer screen texture updated");
                Some(Texture {
                    width: frame.width,
                    height: frame.height,
                    pixels: frame.pixels,
                })
            }
            None => None,
        };
        Ok(())
    }

    /// Capture the current view as PNG bytes.
    pub async fn capture<F: RendererFactory>(
        &mut self,
        factory: &F,
        request: &CaptureRequest,
    ) -> Result<Vec<u8>, CaptureError> {
        capture_screenshot(factory, &mut self.scene, &self.camera, request).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use mockup_capture::{encode_png, MockFactory};
    use mockup_scene_port::Frame;

    #[test]
    fn handle_signals_reach_the_viewer_in_order() {
        let mut viewer = Viewer::new(Scene::default(), CameraState::default());
        let h = viewer.handle();
        assert!(h.request_capture());
        assert!(h.clone().request_capture());
        assert_eq!(viewer.drain_events().len(), 2);
        assert!(viewer.drain_events().is_empty());
    }

    #[test]
    fn dropped_viewer_refuses_signals() {
        let viewer = Viewer::new(Scene::default(), CameraState::default());
        let h = viewer.handle();
        drop(viewer);
        assert!(!h.request_capture());
    }

    #[test]
    fn show_image_decodes_png_onto_the_screen() {
        let mut viewer = Viewer::new(Scene::default(), CameraState::default());
        let png = encode_png(&Frame {
            width: 3,
            height: 2,
            pixels: vec![200; 24],
        })
        .unwrap();
        let buf = ImageBuffer {
            data: png,
            width: 3,
            height: 2,
        };
        viewer.show_image(Some(&buf)).unwrap();
        let tex = viewer.scene().screen.as_ref().unwrap();
        assert_eq!((tex.width, tex.height), (3, 2));
        viewer.show_image(None).unwrap();
        assert!(viewer.scene().screen.is_none());
    }

    #[test]
    fn show_image_rejects_garbage() {
        let mut viewer = Viewer::new(Scene::default(), CameraState::default());
        let buf = ImageBuffer {
            data: vec![1, 2, 3],
            width: 1,
            height: 1,
        };
        assert!(viewer.show_image(Some(&buf)).is_err());
    }

    #[tokio::test]
    async fn capture_returns_png_and_keeps_background() {
        let mut viewer = Viewer::new(Scene::default(), CameraState::default());
        viewer.scene_mut().background = Some([1, 2, 3, 255]);
        let factory = MockFactory::new();
        let png = viewer
            .capture(&factory, &CaptureRequest::sized(4, 4))
            .await
            .unwrap();
        assert_eq!(&png[1..4], b"PNG");
        assert_eq!(viewer.scene().background, Some([1, 2, 3, 255]));
    }
}
