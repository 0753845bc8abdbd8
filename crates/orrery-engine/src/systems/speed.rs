use std::collections::HashMap;

use crate::api::error::OrreryError;
use crate::assets::manifest::SystemManifest;

/// Current angular speed (radians per second) of every body, by name.
///
/// Written by the input bridge, read once per body per frame by the driver.
/// Any finite value is accepted: negative reverses the orbit, zero parks it.
#[derive(Debug, Clone, Default)]
pub struct SpeedTable {
    speeds: HashMap<String, f32>,
}

impl SpeedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial speeds from the manifest. Bodies without an authored speed
    /// start stationary.
    pub fn from_manifest(manifest: &SystemManifest) -> Self {
        let mut table = Self::new();
        for body in &manifest.bodies {
            let speed = match manifest.speeds.get(&body.name) {
                Some(&speed) => speed,
                None => {
                    log::warn!("no speed authored for `{}`; starting stationary", body.name);
                    0.0
                }
            };
            table.speeds.insert(body.name.clone(), speed);
        }
        table
    }

    /// Speed for `name`; unknown names are stationary.
    pub fn get(&self, name: &str) -> f32 {
        self.speeds.get(name).copied().unwrap_or(0.0)
    }

    /// Overwrite the speed for `name`. Non-finite values are rejected and the
    /// previous speed is kept.
    pub fn set(&mut self, name: &str, speed: f32) -> Result<(), OrreryError> {
        if !speed.is_finite() {
            return Err(OrreryError::InvalidSpeed {
                name: name.to_owned(),
                raw: speed.to_string(),
            });
        }
        self.speeds.insert(name.to_owned(), speed);
        Ok(())
    }

    /// Parse a raw control value and store it. Returns the new speed.
    pub fn parse_and_set(&mut self, name: &str, raw: &str) -> Result<f32, OrreryError> {
        let invalid = || OrreryError::InvalidSpeed {
            name: name.to_owned(),
            raw: raw.to_owned(),
        };
        let speed: f32 = raw.trim().parse().map_err(|_| invalid())?;
        if !speed.is_finite() {
            return Err(invalid());
        }
        self.speeds.insert(name.to_owned(), speed);
        Ok(speed)
    }

    pub fn len(&self) -> usize {
        self.speeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speeds.is_empty()
    }
}
