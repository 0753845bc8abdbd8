use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::api::error::OrreryError;
use crate::components::body::CelestialBodySpec;

/// System manifest describing the bodies, their initial speeds and textures.
/// Loaded from a JSON file shipped with the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemManifest {
    /// Orbiting bodies, in authoring order.
    pub bodies: Vec<CelestialBodySpec>,
    /// Initial angular speed per body name (radians per second).
    #[serde(default)]
    pub speeds: HashMap<String, f32>,
    /// Surface texture path per body name. Bodies without one get the flat
    /// fallback material.
    #[serde(default)]
    pub textures: HashMap<String, String>,
    /// Texture for the ring of `ringed_body`.
    #[serde(default)]
    pub ring_texture: Option<String>,
    /// Texture for the central body's glow sprite.
    #[serde(default)]
    pub glow_texture: Option<String>,
    /// Name of the body that carries a ring.
    #[serde(default)]
    pub ringed_body: Option<String>,
}

impl SystemManifest {
    /// Parse and validate a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, OrreryError> {
        let manifest: Self = serde_json::from_str(json).map_err(OrreryError::Manifest)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Check names are unique, geometry is positive and speeds are finite.
    pub fn validate(&self) -> Result<(), OrreryError> {
        let mut seen = HashSet::with_capacity(self.bodies.len());
        for body in &self.bodies {
            if !seen.insert(body.name.as_str()) {
                return Err(OrreryError::DuplicateBody(body.name.clone()));
            }
            if body.name.is_empty() {
                return Err(OrreryError::InvalidBody {
                    name: body.name.clone(),
                    reason: "name is empty",
                });
            }
            if !(body.radius.is_finite() && body.radius > 0.0) {
                return Err(OrreryError::InvalidBody {
                    name: body.name.clone(),
                    reason: "radius must be positive",
                });
            }
            if !(body.distance.is_finite() && body.distance > 0.0) {
                return Err(OrreryError::InvalidBody {
                    name: body.name.clone(),
                    reason: "distance must be positive",
                });
            }
        }
        for (name, speed) in &self.speeds {
            if !speed.is_finite() {
                return Err(OrreryError::InvalidSpeed {
                    name: name.clone(),
                    raw: speed.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Texture path registered for a body, if any.
    pub fn texture_for(&self, name: &str) -> Option<&str> {
        self.textures.get(name).map(String::as_str)
    }

    pub fn is_ringed(&self, name: &str) -> bool {
        self.ringed_body.as_deref() == Some(name)
    }
}
