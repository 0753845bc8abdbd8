/// Frame wire format shared with the host renderer.
/// Must stay in sync with the page's draw hook.
///
/// Layout (all values f32):
/// ```text
/// [Header: 32 floats]
/// [Instances: instance_count × 28 floats]
/// [Lights: light_count × 8 floats]
/// [Points: point_count × 3 floats]
/// ```
///
/// Counts are written into the header every frame; the host computes
/// section offsets from them.

use crate::renderer::instance::DrawInstance;
use crate::renderer::traits::FrameData;
use crate::systems::lighting::LIGHT_FLOATS;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 32;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_INSTANCE_COUNT: usize = 1;
pub const HEADER_POINT_COUNT: usize = 2;
pub const HEADER_LIGHT_COUNT: usize = 3;
pub const HEADER_VIEWPORT_WIDTH: usize = 4;
pub const HEADER_VIEWPORT_HEIGHT: usize = 5;
/// Camera position x, y, z at 6..9.
pub const HEADER_CAMERA_POSITION: usize = 6;
/// Column-major view-projection matrix at 16..32.
pub const HEADER_VIEW_PROJECTION: usize = 16;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per draw instance (wire format — never changes).
pub const INSTANCE_FLOATS: usize = 28;

/// Floats per star point.
pub const POINT_FLOATS: usize = 3;

/// Section offsets for one packed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub instance_offset: usize,
    pub light_offset: usize,
    pub point_offset: usize,
    pub total_floats: usize,
}

impl FrameLayout {
    pub fn new(instances: usize, lights: usize, points: usize) -> Self {
        let instance_offset = HEADER_FLOATS;
        let light_offset = instance_offset + instances * INSTANCE_FLOATS;
        let point_offset = light_offset + lights * LIGHT_FLOATS;
        let total_floats = point_offset + points * POINT_FLOATS;
        Self {
            instance_offset,
            light_offset,
            point_offset,
            total_floats,
        }
    }
}

/// Reusable buffer holding one packed frame.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    data: Vec<f32>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pack `frame` into the buffer, replacing the previous contents.
    pub fn pack(&mut self, frame: &FrameData) -> FrameLayout {
        let list = frame.draw_list;
        let layout = FrameLayout::new(list.instance_count(), list.light_count(), list.point_count());

        self.data.clear();
        self.data.resize(HEADER_FLOATS, 0.0);
        self.data[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        self.data[HEADER_INSTANCE_COUNT] = list.instance_count() as f32;
        self.data[HEADER_POINT_COUNT] = list.point_count() as f32;
        self.data[HEADER_LIGHT_COUNT] = list.light_count() as f32;
        self.data[HEADER_VIEWPORT_WIDTH] = frame.viewport.width;
        self.data[HEADER_VIEWPORT_HEIGHT] = frame.viewport.height;
        self.data[HEADER_CAMERA_POSITION..HEADER_CAMERA_POSITION + 3]
            .copy_from_slice(&frame.camera.position[..3]);
        let view_projection: &[f32] = bytemuck::cast_slice(&frame.camera.view_projection);
        self.data[HEADER_VIEW_PROJECTION..HEADER_VIEW_PROJECTION + 16]
            .copy_from_slice(view_projection);

        self.data.reserve(layout.total_floats - HEADER_FLOATS);
        self.data.extend_from_slice(list.instance_floats());
        self.data.extend_from_slice(&list.lights);
        self.data.extend_from_slice(&list.points);
        debug_assert_eq!(self.data.len(), layout.total_floats);
        layout
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

const _: () = assert!(std::mem::size_of::<DrawInstance>() == INSTANCE_FLOATS * 4);
