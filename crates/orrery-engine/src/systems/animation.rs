use std::cell::Cell;
use std::rc::Rc;

use glam::Vec3;

use crate::api::config::OrreryConfig;
use crate::api::types::NodeId;
use crate::components::body::CelestialBody;
use crate::core::scene::Scene;
use crate::core::time::FrameClock;
use crate::renderer::camera::{PerspectiveCamera, Viewport};
use crate::renderer::controls::OrbitControls;
use crate::renderer::instance::DrawList;
use crate::renderer::traits::{FrameData, Renderer};
use crate::systems::labels::{label_position, LabelSink};
use crate::systems::speed::SpeedTable;

/// Whether the frame loop should schedule another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Stopped,
}

/// Shared flag that halts the frame loop at the next frame boundary.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

/// Glow sprite scale at `t` seconds: `base · (1 + sin(rate · t) · amplitude)`.
pub fn glow_pulse(config: &OrreryConfig, t: f32) -> f32 {
    config.glow_pulse_base * (1.0 + (config.glow_pulse_rate * t).sin() * config.glow_pulse_amplitude)
}

/// Borrowed state one frame reads and writes.
pub struct FrameContext<'a> {
    pub scene: &'a mut Scene,
    pub bodies: &'a mut [CelestialBody],
    pub speeds: &'a SpeedTable,
    pub camera: &'a mut PerspectiveCamera,
    pub controls: &'a mut OrbitControls,
    pub viewport: Viewport,
    pub labels: &'a mut dyn LabelSink,
    pub renderer: &'a mut dyn Renderer,
    pub draw_list: &'a mut DrawList,
    pub config: &'a OrreryConfig,
}

/// Per-frame orbital update, label tracking, glow pulse and render.
/// Started once, after every body has loaded.
pub struct AnimationDriver {
    clock: FrameClock,
    glow: NodeId,
    stop: StopHandle,
    frames: u64,
}

impl AnimationDriver {
    /// Start the driver at host time `now` (seconds).
    pub fn start(now: f64, glow: NodeId, stop: StopHandle) -> Self {
        let mut clock = FrameClock::new();
        clock.start(now);
        log::info!("animation driver started");
        Self {
            clock,
            glow,
            stop,
            frames: 0,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Seconds since the driver started, as of the last frame.
    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    /// Run one frame at host time `now` (seconds).
    pub fn frame(&mut self, now: f64, ctx: FrameContext) -> FrameOutcome {
        if self.stop.is_stopped() {
            log::info!("animation driver stopped after {} frames", self.frames);
            return FrameOutcome::Stopped;
        }

        let dt = self.clock.tick(now);
        let config = ctx.config;

        for body in ctx.bodies.iter_mut() {
            body.advance(ctx.speeds.get(&body.name), dt);
            let position = body.orbit_position();
            if let Some(node) = ctx.scene.get_mut(body.mesh) {
                node.position = position;
                node.rotation.y += config.spin_per_frame;
            }
            let world = ctx.scene.world_position(body.mesh).unwrap_or(position);
            let label = label_position(ctx.camera, ctx.viewport, world, config.label_offset_y);
            ctx.labels.place(body.label, label.x, label.y);
        }

        let pulse = glow_pulse(config, self.clock.elapsed());
        if let Some(glow) = ctx.scene.get_mut(self.glow) {
            glow.scale = Vec3::new(pulse, pulse, 1.0);
        }

        ctx.controls.update(ctx.camera);

        ctx.draw_list.rebuild(ctx.scene);
        let frame = FrameData {
            camera: ctx.camera.uniform(),
            viewport: ctx.viewport,
            draw_list: ctx.draw_list,
        };
        ctx.renderer.draw(&frame);

        self.frames += 1;
        FrameOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Color, LabelId};
    use crate::components::entity::Node;
    use crate::components::material::Material;
    use crate::components::mesh::Geometry;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Labels(HashMap<LabelId, (f32, f32)>);

    impl LabelSink for Labels {
        fn create_label(&mut self, _text: &str) -> LabelId {
            LabelId(self.0.len() as u32)
        }
        fn place(&mut self, id: LabelId, x: f32, y: f32) {
            self.0.insert(id, (x, y));
        }
    }

    #[derive(Default)]
    struct Recorder {
        frames: usize,
        last_instances: usize,
    }

    impl Renderer for Recorder {
        fn backend(&self) -> &'static str {
            "recording"
        }
        fn draw(&mut self, frame: &FrameData) {
            self.frames += 1;
            self.last_instances = frame.draw_list.instance_count();
        }
        fn resize(&mut self, _width: u32, _height: u32) {}
        fn size(&self) -> (u32, u32) {
            (800, 600)
        }
    }

    struct World {
        scene: Scene,
        bodies: Vec<CelestialBody>,
        speeds: SpeedTable,
        camera: PerspectiveCamera,
        controls: OrbitControls,
        viewport: Viewport,
        labels: Labels,
        renderer: Recorder,
        draw_list: DrawList,
        config: OrreryConfig,
        glow: NodeId,
    }

    impl World {
        /// Bodies at the given distances with the given speeds, all starting at angle 0.
        fn new(bodies: &[(&str, f32, f32)]) -> Self {
            let mut scene = Scene::new();
            let sun = scene.next_id();
            scene.spawn(Node::mesh(sun, Geometry::sphere(3.5, 32), Material::basic(Color::WHITE)));
            let glow = scene.next_id();
            scene.spawn_child(sun, Node::sprite(glow, Material::sprite(Color::WHITE)));

            let mut speeds = SpeedTable::new();
            let bodies = bodies
                .iter()
                .enumerate()
                .map(|(i, &(name, distance, speed))| {
                    speeds.set(name, speed).unwrap();
                    let mesh = scene.next_id();
                    scene.spawn(
                        Node::mesh(mesh, Geometry::sphere(1.0, 32), Material::standard(Color::WHITE))
                            .with_position(Vec3::new(distance, 0.0, 0.0)),
                    );
                    CelestialBody {
                        name: name.to_owned(),
                        mesh,
                        label: LabelId(i as u32),
                        angle: 0.0,
                        distance,
                    }
                })
                .collect();

            let viewport = Viewport::new(800.0, 600.0);
            let mut camera = PerspectiveCamera::new(75.0, viewport.aspect(), 0.1, 1000.0);
            camera.position = Vec3::new(0.0, 0.0, 30.0);
            let config = OrreryConfig::default();
            Self {
                scene,
                bodies,
                speeds,
                camera,
                controls: OrbitControls::new(Vec3::ZERO).with_damping(config.damping_factor),
                viewport,
                labels: Labels::default(),
                renderer: Recorder::default(),
                draw_list: DrawList::with_capacity(16),
                config,
                glow,
            }
        }

        fn frame(&mut self, driver: &mut AnimationDriver, now: f64) -> FrameOutcome {
            driver.frame(
                now,
                FrameContext {
                    scene: &mut self.scene,
                    bodies: &mut self.bodies,
                    speeds: &self.speeds,
                    camera: &mut self.camera,
                    controls: &mut self.controls,
                    viewport: self.viewport,
                    labels: &mut self.labels,
                    renderer: &mut self.renderer,
                    draw_list: &mut self.draw_list,
                    config: &self.config,
                },
            )
        }
    }

    #[test]
    fn angle_accumulates_speed_times_elapsed() {
        let mut world = World::new(&[("earth", 7.0, 0.5)]);
        let mut driver = AnimationDriver::start(10.0, world.glow, StopHandle::new());
        let n = 120;
        let dt = 1.0 / 60.0;
        for i in 1..=n {
            world.frame(&mut driver, 10.0 + i as f64 * dt);
        }
        let expected = n as f32 * 0.5 * dt as f32;
        assert!((world.bodies[0].angle - expected).abs() < 1e-4);
        assert_eq!(driver.frames(), n as u64);
        assert_eq!(world.renderer.frames, n);
    }

    #[test]
    fn mesh_stays_on_its_orbit() {
        let mut world = World::new(&[("mars", 8.5, 3.7)]);
        let mut driver = AnimationDriver::start(0.0, world.glow, StopHandle::new());
        for i in 1..200 {
            world.frame(&mut driver, i as f64 * 0.037);
            let p = world.scene.get(world.bodies[0].mesh).unwrap().position;
            assert_eq!(p.y, 0.0);
            assert!((p.x * p.x + p.z * p.z - 8.5 * 8.5).abs() < 1e-2);
        }
    }

    #[test]
    fn first_frame_measures_from_start() {
        let mut world = World::new(&[("mercury", 4.0, 1.0)]);
        let mut driver = AnimationDriver::start(5.0, world.glow, StopHandle::new());
        world.frame(&mut driver, 5.25);
        assert!((world.bodies[0].angle - 0.25).abs() < 1e-6);
        assert!((driver.elapsed() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn two_bodies_advance_independently_over_one_second() {
        let mut world = World::new(&[("mercury", 4.0, 0.1), ("earth", 7.0, 0.06)]);
        let mut driver = AnimationDriver::start(0.0, world.glow, StopHandle::new());
        for i in 1..=60 {
            world.frame(&mut driver, i as f64 / 60.0);
        }
        assert!((world.bodies[0].angle - 0.1).abs() < 1e-4);
        assert!((world.bodies[1].angle - 0.06).abs() < 1e-4);
        let earth = world.scene.get(world.bodies[1].mesh).unwrap().position;
        assert!((earth.x - 7.0 * 0.06f32.cos()).abs() < 1e-3);
        assert!((earth.z - 7.0 * 0.06f32.sin()).abs() < 1e-3);
    }

    #[test]
    fn changing_one_speed_leaves_the_other_orbit_alone() {
        let mut world = World::new(&[("mercury", 4.0, 0.1), ("earth", 7.0, 0.06)]);
        let mut driver = AnimationDriver::start(0.0, world.glow, StopHandle::new());
        world.frame(&mut driver, 0.5);
        world.speeds.set("mercury", -3.0).unwrap();
        world.frame(&mut driver, 1.0);
        assert!((world.bodies[1].angle - 0.06).abs() < 1e-5);
        let mercury = (0.05f32 - 1.5).rem_euclid(std::f32::consts::TAU);
        assert!((world.bodies[0].angle - mercury).abs() < 1e-4);
    }

    #[test]
    fn spin_advances_per_frame() {
        let mut world = World::new(&[("venus", 5.5, 0.0)]);
        let mut driver = AnimationDriver::start(0.0, world.glow, StopHandle::new());
        for i in 1..=10 {
            world.frame(&mut driver, i as f64);
        }
        let node = world.scene.get(world.bodies[0].mesh).unwrap();
        assert!((node.rotation.y - 0.1).abs() < 1e-5);
        assert!((node.position.x - 5.5).abs() < 1e-5);
    }

    #[test]
    fn glow_pulses_with_total_time() {
        let mut world = World::new(&[]);
        let mut driver = AnimationDriver::start(0.0, world.glow, StopHandle::new());
        world.frame(&mut driver, 0.4);
        world.frame(&mut driver, 1.3);
        let expected = 9.0 * (1.0 + (2.0f32 * 1.3).sin() * 0.1);
        let scale = world.scene.get(world.glow).unwrap().scale;
        assert!((scale.x - expected).abs() < 1e-4);
        assert!((scale.y - expected).abs() < 1e-4);
        assert_eq!(scale.z, 1.0);
        assert!((glow_pulse(&world.config, 0.0) - 9.0).abs() < 1e-6);
    }

    #[test]
    fn label_tracks_projected_body() {
        let mut world = World::new(&[("earth", 7.0, 0.0)]);
        let mut driver = AnimationDriver::start(0.0, world.glow, StopHandle::new());
        world.frame(&mut driver, 0.1);
        let (x, y) = world.labels.0[&LabelId(0)];
        let expected = world
            .camera
            .world_to_pixels(Vec3::new(7.0, 0.0, 0.0), world.viewport);
        assert!((x - expected.x).abs() < 1e-3);
        assert!((y - (expected.y + 20.0)).abs() < 1e-3);
        assert!(x > 400.0);
    }

    #[test]
    fn stop_handle_halts_the_loop() {
        let mut world = World::new(&[("earth", 7.0, 1.0)]);
        let stop = StopHandle::new();
        let mut driver = AnimationDriver::start(0.0, world.glow, stop.clone());
        assert_eq!(world.frame(&mut driver, 0.1), FrameOutcome::Continue);
        stop.stop();
        let angle = world.bodies[0].angle;
        assert_eq!(world.frame(&mut driver, 0.2), FrameOutcome::Stopped);
        assert_eq!(world.bodies[0].angle, angle);
        assert_eq!(world.renderer.frames, 1);
        assert!(driver.stop_handle().is_stopped());
    }

    #[test]
    fn every_frame_renders_the_whole_scene() {
        let mut world = World::new(&[("mercury", 4.0, 0.1), ("earth", 7.0, 0.06)]);
        let mut driver = AnimationDriver::start(0.0, world.glow, StopHandle::new());
        world.frame(&mut driver, 0.016);
        // sun, glow, two bodies
        assert_eq!(world.renderer.last_instances, 4);
    }
}
