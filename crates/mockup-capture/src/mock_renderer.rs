// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Renderer double for headless tests of capture callers.
//!
//! `MockFactory` hands out `MockRenderer`s that fill the frame with a flat
//! color and report what they observed through a shared [`MockProbe`].

use std::future::{ready, Future};
use std::sync::{Arc, Mutex, MutexGuard};

use mockup_scene_port::{
    CameraState, ColorRgba8, Frame, OffscreenRenderer, RenderError, RenderSettings,
    RendererFactory, RendererOptions, Scene,
};

/// Where a mock capture should fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MockFailure {
    /// Never fail.
    #[default]
    None,
    /// `RendererFactory::create` fails.
    Acquire,
    /// `render` fails.
    Render,
    /// `read_pixels` fails.
    Readback,
    /// `read_pixels` returns a frame whose buffer is too short.
    MalformedFrame,
}

#[derive(Debug, Default)]
struct ProbeState {
    created: usize,
    disposed: usize,
    backgrounds_seen: Vec<Option<ColorRgba8>>,
    last_settings: Option<RenderSettings>,
    last_options: Option<RendererOptions>,
}

/// Shared record of what mock renderers saw. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct MockProbe {
    inner: Arc<Mutex<ProbeState>>,
}

impl MockProbe {
    fn lock(&self) -> MutexGuard<'_, ProbeState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Renderers created so far.
    pub fn created(&self) -> usize {
        self.lock().created
    }

    /// Renderers disposed so far.
    pub fn disposed(&self) -> usize {
        self.lock().disposed
    }

    /// Renderers created but not yet disposed.
    pub fn live(&self) -> usize {
        let s = self.lock();
        s.created - s.disposed
    }

    /// Scene background observed by each `render` call, in order.
    pub fn backgrounds_seen(&self) -> Vec<Option<ColorRgba8>> {
        self.lock().backgrounds_seen.clone()
    }

    /// Settings passed to the most recent `configure`.
    pub fn last_settings(&self) -> Option<RenderSettings> {
        self.lock().last_settings
    }

    /// Options passed to the most recent `create`.
    pub fn last_options(&self) -> Option<RendererOptions> {
        self.lock().last_options
    }
}

/// Factory producing [`MockRenderer`]s.
#[derive(Clone, Debug, Default)]
pub struct MockFactory {
    /// Shared observation record.
    pub probe: MockProbe,
    /// Injected failure.
    pub failure: MockFailure,
}

impl MockFactory {
    /// A factory whose renderers always succeed.
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory that fails at the given step.
    pub fn failing(failure: MockFailure) -> Self {
        Self {
            probe: MockProbe::default(),
            failure,
        }
    }
}

impl RendererFactory for MockFactory {
    type Renderer = MockRenderer;

    fn create(
        &self,
        width: u32,
        height: u32,
        options: &RendererOptions,
    ) -> Result<MockRenderer, RenderError> {
        if self.failure == MockFailure::Acquire {
            return Err(RenderError::Unavailable("mock acquisition failure".into()));
        }
        {
            let mut s = self.probe.lock();
            s.created += 1;
            s.last_options = Some(*options);
        }
        Ok(MockRenderer {
            probe: self.probe.clone(),
            failure: self.failure,
            width,
            height,
            fill: None,
            disposed: false,
        })
    }
}

/// Renderer double: "renders" the scene background as a flat fill.
#[derive(Debug)]
pub struct MockRenderer {
    probe: MockProbe,
    failure: MockFailure,
    width: u32,
    height: u32,
    fill: Option<ColorRgba8>,
    disposed: bool,
}

impl OffscreenRenderer for MockRenderer {
    fn configure(&mut self, settings: &RenderSettings) {
        self.probe.lock().last_settings = Some(*settings);
    }

    fn render(&mut self, scene: &Scene, _camera: &CameraState) -> Result<(), RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }
        self.probe.lock().backgrounds_seen.push(scene.background);
        if self.failure == MockFailure::Render {
            return Err(RenderError::Render("mock render failure".into()));
        }
        self.fill = Some(scene.background.unwrap_or([0; 4]));
        Ok(())
    }

    fn read_pixels(&mut self) -> impl Future<Output = Result<Frame, RenderError>> {
        let result = match (self.disposed, self.failure, self.fill) {
            (true, _, _) => Err(RenderError::Disposed),
            (_, MockFailure::Readback, _) => {
                Err(RenderError::Readback("mock readback failure".into()))
            }
            (_, _, None) => Err(RenderError::Readback("nothing rendered".into())),
            (_, MockFailure::MalformedFrame, Some(_)) => Ok(Frame {
                width: self.width,
                height: self.height,
                pixels: vec![0; 3],
            }),
            (_, _, Some(color)) => Ok(Frame {
                width: self.width,
                height: self.height,
                pixels: color.repeat(self.width as usize * self.height as usize),
            }),
        };
        ready(result)
    }

    fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.fill = None;
            self.probe.lock().disposed += 1;
        }
    }
}
