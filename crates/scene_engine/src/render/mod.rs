//! Renderer capability
//!
//! The scene never talks to a graphics API. Components that draw emit a
//! [`DrawCall`] to whatever [`Renderer`] the host passes into the render
//! pass; view and projection are handed through exactly as the host gave
//! them.

use crate::assets::AssetGuid;
use crate::foundation::math::Mat4;
use crate::scene::{GameObjectHandle, LightSample};

/// Per-frame values supplied by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView {
    /// Seconds since the previous frame
    pub delta_time: f32,
    /// View matrix
    pub view: Mat4,
    /// Projection matrix
    pub projection: Mat4,
}

impl FrameView {
    /// Bundle frame values
    pub const fn new(delta_time: f32, view: Mat4, projection: Mat4) -> Self {
        Self {
            delta_time,
            view,
            projection,
        }
    }
}

/// One mesh draw request
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// GameObject that issued the draw
    pub owner: GameObjectHandle,
    /// Model asset to draw
    pub model: AssetGuid,
    /// Object world matrix
    pub model_matrix: Mat4,
    /// View matrix as supplied by the host
    pub view: Mat4,
    /// Projection matrix as supplied by the host
    pub projection: Mat4,
    /// Lights affecting the draw
    pub lights: Vec<LightSample>,
}

/// Draw sink used by the render pass
pub trait Renderer {
    /// Called before the scene's render pass
    fn begin_frame(&mut self, _frame: &FrameView) {}

    /// Record one draw
    fn draw(&mut self, call: &DrawCall);

    /// Called after the scene's render pass
    fn end_frame(&mut self) {}
}

/// Renderer that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _call: &DrawCall) {}
}

/// Renderer that keeps every draw call, for tests and headless hosts
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    calls: Vec<DrawCall>,
    frames: usize,
}

impl RecordingRenderer {
    /// Empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every draw recorded so far, in submission order
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Number of frames begun
    pub const fn frames(&self) -> usize {
        self.frames
    }

    /// Forget recorded draws
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self, _frame: &FrameView) {
        self.frames += 1;
    }

    fn draw(&mut self, call: &DrawCall) {
        self.calls.push(call.clone());
    }
}
