//! Screen-space text labels that follow projected body positions.
//!
//! The engine only decides what a label says and where it goes; the host
//! owns the actual elements.

use glam::{Vec2, Vec3};

use crate::api::types::LabelId;
use crate::renderer::camera::{PerspectiveCamera, Viewport};

/// Host-side label surface.
pub trait LabelSink {
    /// Create a label showing `text` and return its handle.
    fn create_label(&mut self, text: &str) -> LabelId;

    /// Move a label to viewport pixel coordinates (origin top-left).
    fn place(&mut self, id: LabelId, x: f32, y: f32);
}

/// Pixel position of a label for a body at `world`, nudged `offset_y` pixels
/// below the projected point.
pub fn label_position(
    camera: &PerspectiveCamera,
    viewport: Viewport,
    world: Vec3,
    offset_y: f32,
) -> Vec2 {
    camera.world_to_pixels(world, viewport) + Vec2::new(0.0, offset_y)
}
