use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::types::{LabelId, NodeId};

/// Authored description of one orbiting body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelestialBodySpec {
    /// Unique key; also used for texture lookup, speed lookup and the label.
    pub name: String,
    /// Sphere radius in world units.
    pub radius: f32,
    /// Orbital radius around the origin.
    pub distance: f32,
}

impl CelestialBodySpec {
    pub fn new(name: impl Into<String>, radius: f32, distance: f32) -> Self {
        Self {
            name: name.into(),
            radius,
            distance,
        }
    }

    /// Label text: the name with its first character upper-cased.
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Runtime state of a loaded body. Lives for the rest of the session.
#[derive(Debug, Clone)]
pub struct CelestialBody {
    pub name: String,
    pub mesh: NodeId,
    pub label: LabelId,
    /// Orbital angle in radians, kept in `[0, 2π)`.
    pub angle: f32,
    pub distance: f32,
}

impl CelestialBody {
    /// Advance the orbital angle by `speed · dt`, wrapped into `[0, 2π)`.
    pub fn advance(&mut self, speed: f32, dt: f32) {
        self.angle = (self.angle + speed * dt).rem_euclid(TAU);
    }

    /// Position on the circular orbit in the XZ plane.
    pub fn orbit_position(&self) -> Vec3 {
        Vec3::new(
            self.distance * self.angle.cos(),
            0.0,
            self.distance * self.angle.sin(),
        )
    }
}
