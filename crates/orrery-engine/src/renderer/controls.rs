//! Orbit controls: drag to rotate around a target, right-drag to pan,
//! wheel to dolly. With damping enabled, input accumulates into deltas that
//! decay a little every `update`, giving the camera inertia.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::input::queue::{InputEvent, PointerButton};
use crate::renderer::camera::{PerspectiveCamera, Viewport};

/// Keeps the polar angle off the poles so `look_at` stays well defined.
const POLAR_EPS: f32 = 1e-6;
/// Radius floor applied even when `min_distance` is 0; a zero radius puts
/// the camera on its target and can never be scaled back out.
const MIN_RADIUS: f32 = 1e-3;
/// Radius ceiling applied even when `max_distance` is unbounded; keeps
/// squared lengths inside f32 range.
const MAX_RADIUS: f32 = 1.0e6;
/// Wheel `delta_y` of one mouse-wheel notch in pixel mode.
const WHEEL_NOTCH: f32 = 100.0;
/// Cap on notches taken from a single wheel event.
const MAX_WHEEL_NOTCHES: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    None,
    Rotate { x: f32, y: f32 },
    Pan { x: f32, y: f32 },
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    /// Fraction of the pending delta applied per update (0.05 = slow settle).
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Pending azimuth change (radians).
    theta_delta: f32,
    /// Pending polar change (radians).
    phi_delta: f32,
    /// Pending target translation.
    pan_offset: Vec3,
    /// Radius multiplier applied on the next update.
    scale: f32,
    drag: Drag,
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            theta_delta: 0.0,
            phi_delta: 0.0,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
            drag: Drag::None,
        }
    }

    pub fn with_damping(mut self, factor: f32) -> Self {
        self.enable_damping = true;
        self.damping_factor = factor;
        self
    }

    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    pub fn with_speeds(mut self, rotate: f32, zoom: f32, pan: f32) -> Self {
        self.rotate_speed = rotate;
        self.zoom_speed = zoom;
        self.pan_speed = pan;
        self
    }

    /// Whether rotation or pan input is still waiting to be applied.
    pub fn is_settling(&self) -> bool {
        self.theta_delta.abs() > 1e-6
            || self.phi_delta.abs() > 1e-6
            || self.pan_offset.length_squared() > 1e-12
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.theta_delta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.phi_delta -= angle;
    }

    /// Move closer by `factor` (< 1 zooms in).
    pub fn dolly(&mut self, factor: f32) {
        self.scale *= factor;
    }

    /// Dolly factor for one wheel event, proportional to its size: one
    /// notch is 5% at `zoom_speed` 1, a trackpad tick a small fraction.
    fn wheel_factor(&self, delta_y: f32) -> f32 {
        let notches = (delta_y.abs() / WHEEL_NOTCH).min(MAX_WHEEL_NOTCHES);
        0.95f32.powf(self.zoom_speed * notches)
    }

    /// Feed one pointer/wheel event. `camera` is needed for pan directions.
    pub fn handle(&mut self, event: InputEvent, camera: &PerspectiveCamera, viewport: Viewport) {
        match event {
            InputEvent::PointerDown { x, y, button } => {
                self.drag = match button {
                    PointerButton::Primary => Drag::Rotate { x, y },
                    PointerButton::Secondary => Drag::Pan { x, y },
                };
            }
            InputEvent::PointerMove { x, y } => match self.drag {
                Drag::Rotate { x: lx, y: ly } => {
                    let height = viewport.height.max(1.0);
                    self.rotate_left(TAU * (x - lx) / height * self.rotate_speed);
                    self.rotate_up(TAU * (y - ly) / height * self.rotate_speed);
                    self.drag = Drag::Rotate { x, y };
                }
                Drag::Pan { x: lx, y: ly } => {
                    self.pan(x - lx, y - ly, camera, viewport);
                    self.drag = Drag::Pan { x, y };
                }
                Drag::None => {}
            },
            InputEvent::PointerUp { .. } => self.drag = Drag::None,
            InputEvent::Wheel { delta_y } if delta_y.is_finite() => {
                let factor = self.wheel_factor(delta_y);
                if delta_y < 0.0 {
                    self.dolly(factor);
                } else if delta_y > 0.0 {
                    self.dolly(1.0 / factor);
                }
            }
            InputEvent::Wheel { .. } => {}
        }
    }

    /// Translate the target so the scene follows the pointer.
    fn pan(&mut self, dx: f32, dy: f32, camera: &PerspectiveCamera, viewport: Viewport) {
        let offset = camera.position - self.target;
        // Half the visible height at the target's depth.
        let target_distance = offset.length() * (camera.fov.to_radians() / 2.0).tan();
        let height = viewport.height.max(1.0);

        let forward = (self.target - camera.position).normalize_or_zero();
        let right = forward.cross(camera.up).normalize_or_zero();
        let screen_up = right.cross(forward);

        let left = -right * (2.0 * dx * target_distance / height) * self.pan_speed;
        let up = screen_up * (2.0 * dy * target_distance / height) * self.pan_speed;
        self.pan_offset += left + up;
    }

    /// Apply pending input to the camera and decay it. Call once per frame.
    /// Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - self.target;
        let mut radius = offset.length();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            PI / 2.0
        };

        let step = if self.enable_damping { self.damping_factor } else { 1.0 };
        theta += self.theta_delta * step;
        phi = (phi + self.phi_delta * step).clamp(POLAR_EPS, PI - POLAR_EPS);
        let min_radius = self.min_distance.max(MIN_RADIUS);
        let max_radius = self.max_distance.min(MAX_RADIUS).max(min_radius);
        radius = (radius * self.scale).clamp(min_radius, max_radius);
        self.target += self.pan_offset * step;

        let new_offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        let old_position = camera.position;
        let position = self.target + new_offset;
        if position.is_finite() {
            camera.position = position;
            camera.target = self.target;
        } else {
            log::warn!("orbit controls produced a non-finite camera position; keeping the last one");
            self.target = camera.target;
        }

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.theta_delta *= decay;
            self.phi_delta *= decay;
            self.pan_offset *= decay;
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        old_position.distance_squared(camera.position) > 1e-12
    }
}
