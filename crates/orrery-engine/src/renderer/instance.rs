use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::components::entity::NodeKind;
use crate::components::mesh::Geometry;
use crate::core::scene::Scene;
use crate::systems::lighting::LIGHT_FLOATS;

/// A single drawable node as sent to the host renderer.
/// Must be exactly 28 floats (112 bytes) — matches `INSTANCE_FLOATS`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct DrawInstance {
    /// World matrix, column-major.
    pub model: [[f32; 4]; 4],
    /// RGBA tint.
    pub color: [f32; 4],
    /// `[kind, a, b, segments]`, see `Geometry::params`.
    pub geometry: [f32; 4],
    /// `[kind, texture id or -1, flags, point size]`, see `Material::params`.
    pub material: [f32; 4],
}

/// Per-frame draw list built from the scene graph.
/// Pre-allocated and reused each frame to avoid allocations.
pub struct DrawList {
    pub instances: Vec<DrawInstance>,
    /// Flattened world-space star positions (xyz triples).
    pub points: Vec<f32>,
    /// Packed lights, `LIGHT_FLOATS` each.
    pub lights: Vec<f32>,
}

impl DrawList {
    pub fn with_capacity(instances: usize) -> Self {
        Self {
            instances: Vec::with_capacity(instances),
            points: Vec::new(),
            lights: Vec::with_capacity(LIGHT_FLOATS * 4),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.points.clear();
        self.lights.clear();
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn point_count(&self) -> usize {
        self.points.len() / 3
    }

    pub fn light_count(&self) -> usize {
        self.lights.len() / LIGHT_FLOATS
    }

    /// Rebuild from every visible node in the scene.
    pub fn rebuild(&mut self, scene: &Scene) {
        self.clear();
        scene.visit_visible(|node, world| match &node.kind {
            NodeKind::Group => {}
            NodeKind::Mesh { geometry, material } => {
                self.instances.push(DrawInstance {
                    model: world.to_cols_array_2d(),
                    color: material.color.to_rgba(1.0),
                    geometry: geometry.params(),
                    material: material.params(),
                });
            }
            NodeKind::Sprite { material } => {
                self.instances.push(DrawInstance {
                    model: world.to_cols_array_2d(),
                    color: material.color.to_rgba(1.0),
                    geometry: Geometry::Quad.params(),
                    material: material.params(),
                });
            }
            NodeKind::Points { positions, material } => {
                self.push_points(world, positions);
                self.instances.push(DrawInstance {
                    model: Mat4::IDENTITY.to_cols_array_2d(),
                    color: material.color.to_rgba(1.0),
                    geometry: Geometry::Points { count: positions.len() as u32 }.params(),
                    material: material.params(),
                });
            }
            NodeKind::Light(light) => {
                let pos = world.transform_point3(Vec3::ZERO);
                self.lights.extend_from_slice(&light.pack(pos));
            }
        });
    }

    fn push_points(&mut self, world: Mat4, positions: &[Vec3]) {
        self.points.reserve(positions.len() * 3);
        for p in positions {
            let w = world.transform_point3(*p);
            self.points.extend_from_slice(&[w.x, w.y, w.z]);
        }
    }

    /// Instance data as a flat f32 slice.
    pub fn instance_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}
