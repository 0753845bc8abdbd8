use serde::Deserialize;

use crate::api::error::OrreryError;
use crate::api::types::Color;

/// Tunables for the orrery, provided by the host page (or defaults).
///
/// Every field has a default, so a JSON override only needs the keys it changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    /// Number of background stars (default: 500).
    pub star_count: usize,
    /// Edge length of the cube the stars are scattered in, centered at origin.
    pub star_field_size: f32,
    /// Point size of each star.
    pub star_size: f32,

    /// Radius of the central body.
    pub sun_radius: f32,
    pub sun_color: Color,
    /// Initial glow sprite scale (x and y).
    pub glow_scale: f32,
    /// Glow scale the pulse oscillates around once animation runs.
    pub glow_pulse_base: f32,
    /// Relative pulse amplitude (0.1 = ±10%).
    pub glow_pulse_amplitude: f32,
    /// Pulse angular frequency in radians per second.
    pub glow_pulse_rate: f32,

    pub light_color: Color,
    pub light_intensity: f32,
    /// Falloff distance of the point light. 0 means infinite.
    pub light_distance: f32,

    pub orbit_color: Color,
    /// Orbit ring half-width around each body's distance.
    pub orbit_half_width: f32,
    pub ring_segments: u32,
    pub sphere_segments: u32,

    /// Flat material color for bodies without a usable texture.
    pub fallback_color: Color,
    /// Body ring inner radius, relative to the body radius.
    pub body_ring_inner_offset: f32,
    /// Body ring outer radius, relative to the body radius.
    pub body_ring_outer_offset: f32,

    /// Self-rotation applied to every body mesh each frame (radians).
    pub spin_per_frame: f32,
    /// Vertical pixel offset placing a label below its body.
    pub label_offset_y: f32,

    /// Vertical field of view in degrees.
    pub camera_fov: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    /// Initial camera distance along +Z.
    pub camera_distance: f32,
    /// Closest the orbit controls may bring the camera to its target.
    pub camera_min_distance: f32,
    /// Farthest the orbit controls may pull the camera from its target.
    pub camera_max_distance: f32,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,

    /// RNG seed. `None` lets the host pick one (e.g. from the clock).
    pub seed: Option<u64>,
    /// Console log level name ("error" .. "trace").
    pub log_level: String,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        Self {
            star_count: 500,
            star_field_size: 300.0,
            star_size: 0.5,
            sun_radius: 3.5,
            sun_color: Color::from_hex(0xffff00),
            glow_scale: 8.0,
            glow_pulse_base: 9.0,
            glow_pulse_amplitude: 0.1,
            glow_pulse_rate: 2.0,
            light_color: Color::WHITE,
            light_intensity: 4.0,
            light_distance: 200.0,
            orbit_color: Color::from_hex(0x888888),
            orbit_half_width: 0.01,
            ring_segments: 64,
            sphere_segments: 32,
            fallback_color: Color::from_hex(0x888888),
            body_ring_inner_offset: 0.3,
            body_ring_outer_offset: 0.9,
            spin_per_frame: 0.01,
            label_offset_y: 20.0,
            camera_fov: 75.0,
            camera_near: 0.1,
            camera_far: 1000.0,
            camera_distance: 30.0,
            camera_min_distance: 1.0,
            camera_max_distance: 500.0,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            seed: None,
            log_level: "info".to_string(),
        }
    }
}

impl OrreryConfig {
    /// Parse a (possibly partial) config from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, OrreryError> {
        serde_json::from_str(json).map_err(OrreryError::Config)
    }

    /// The configured log level, falling back to `Info` for unknown names.
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
