use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::api::types::NodeId;
use crate::components::material::Material;
use crate::components::mesh::Geometry;
use crate::systems::lighting::PointLight;

/// What a node draws (or emits).
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Pure transform, draws nothing.
    Group,
    Mesh { geometry: Geometry, material: Material },
    /// Camera-facing quad.
    Sprite { material: Material },
    /// Point cloud with local-space positions.
    Points { positions: Vec<Vec3>, material: Material },
    Light(PointLight),
}

/// Scene graph node — a single struct with its local transform and payload.
/// Hierarchy links are owned by `Scene`.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    /// String tag for finding nodes by name.
    pub tag: String,
    /// Hidden nodes (and their children) are skipped when packing a frame.
    pub visible: bool,
    /// Position relative to the parent.
    pub position: Vec3,
    /// Euler rotation (XYZ order), radians.
    pub rotation: Vec3,
    pub scale: Vec3,
    pub kind: NodeKind,
}

impl Node {
    /// Create an empty group node at the origin.
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            tag: String::new(),
            visible: true,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            kind: NodeKind::Group,
        }
    }

    pub fn mesh(id: NodeId, geometry: Geometry, material: Material) -> Self {
        Self::new(id).with_kind(NodeKind::Mesh { geometry, material })
    }

    pub fn sprite(id: NodeId, material: Material) -> Self {
        Self::new(id).with_kind(NodeKind::Sprite { material })
    }

    pub fn points(id: NodeId, positions: Vec<Vec3>, material: Material) -> Self {
        Self::new(id).with_kind(NodeKind::Points { positions, material })
    }

    pub fn light(id: NodeId, light: PointLight) -> Self {
        Self::new(id).with_kind(NodeKind::Light(light))
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Local transform matrix (scale, then rotate, then translate).
    pub fn local_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}
