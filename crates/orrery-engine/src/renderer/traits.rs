//! Renderer trait — the seam between the headless engine and whatever
//! graphics library rasterizes the scene.
//!
//! On the web the implementor forwards the packed frame to a host-side
//! library; tests use an in-memory recorder.

use super::camera::{CameraUniform, Viewport};
use super::instance::DrawList;

/// Complete frame data for rendering.
pub struct FrameData<'a> {
    pub camera: CameraUniform,
    pub viewport: Viewport,
    pub draw_list: &'a DrawList,
}

/// Renderer trait for graphics backends.
pub trait Renderer {
    /// Backend identifier (e.g., "host-webgl", "recording").
    fn backend(&self) -> &'static str;

    /// Draw a complete frame.
    fn draw(&mut self, frame: &FrameData);

    /// Resize the render surface to `width` × `height` pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Current render surface size in pixels.
    fn size(&self) -> (u32, u32);
}
