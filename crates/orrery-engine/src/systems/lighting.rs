//! Point light attached to a scene node.
//!
//! The light's position is its node's world position; only color and falloff
//! live here.

use glam::Vec3;

use crate::api::types::Color;

/// Floats per packed light: `[x, y, z, r, g, b, intensity, distance]`.
pub const LIGHT_FLOATS: usize = 8;

/// An omnidirectional light with finite falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: Color,
    pub intensity: f32,
    /// Falloff distance in world units. 0 means no falloff.
    pub distance: f32,
}

impl PointLight {
    pub fn new(color: Color, intensity: f32, distance: f32) -> Self {
        Self { color, intensity, distance }
    }

    /// Pack the light at a world position into the wire layout.
    pub fn pack(&self, world_pos: Vec3) -> [f32; LIGHT_FLOATS] {
        [
            world_pos.x,
            world_pos.y,
            world_pos.z,
            self.color.r,
            self.color.g,
            self.color.b,
            self.intensity,
            self.distance,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_light_new() {
        let light = PointLight::new(Color::WHITE, 4.0, 200.0);
        assert_eq!(light.intensity, 4.0);
        assert_eq!(light.distance, 200.0);
    }

    #[test]
    fn pack_layout() {
        let light = PointLight::new(Color::new(1.0, 0.5, 0.0), 2.0, 150.0);
        let packed = light.pack(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(packed, [1.0, 2.0, 3.0, 1.0, 0.5, 0.0, 2.0, 150.0]);
    }
}
