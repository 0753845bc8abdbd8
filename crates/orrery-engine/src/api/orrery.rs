use glam::Vec3;

use crate::api::config::OrreryConfig;
use crate::api::types::TextureId;
use crate::assets::manifest::SystemManifest;
use crate::assets::registry::TextureRegistry;
use crate::components::body::CelestialBody;
use crate::core::rng::Rng;
use crate::core::scene::Scene;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::camera::{PerspectiveCamera, Viewport};
use crate::renderer::controls::OrbitControls;
use crate::renderer::instance::DrawList;
use crate::renderer::traits::Renderer;
use crate::systems::animation::{AnimationDriver, FrameContext, FrameOutcome, StopHandle};
use crate::systems::builder::{build_static_scene, StaticScene};
use crate::systems::input::{apply_resize, apply_speed_input, drain_pointer_input};
use crate::systems::labels::LabelSink;
use crate::systems::loader::{BodyContext, BodyLoader, LoadStep};
use crate::systems::speed::SpeedTable;

/// Seed used when the config does not pin one and the host supplies none.
pub const DEFAULT_SEED: u64 = 0x0bb1_7a15;

/// The whole visualization: scene, bodies, camera, speeds and the driver.
///
/// Lifecycle:
/// 1. `new` builds the static scene and registers every texture.
/// 2. `begin_loading` creates the untextured bodies.
/// 3. The host loads each texture and reports it with `texture_loaded` /
///    `texture_failed`. The call that completes the last body starts the
///    driver and returns `true`.
/// 4. The host calls `frame` once per display frame until it returns
///    `FrameOutcome::Stopped`.
pub struct Orrery<R: Renderer, L: LabelSink> {
    config: OrreryConfig,
    scene: Scene,
    textures: TextureRegistry,
    rng: Rng,
    speeds: SpeedTable,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    viewport: Viewport,
    input: InputQueue,
    draw_list: DrawList,
    statics: StaticScene,
    loader: BodyLoader,
    bodies: Vec<CelestialBody>,
    driver: Option<AnimationDriver>,
    stop: StopHandle,
    renderer: R,
    labels: L,
}

impl<R: Renderer, L: LabelSink> Orrery<R, L> {
    pub fn new(config: OrreryConfig, manifest: &SystemManifest, renderer: R, labels: L) -> Self {
        let mut scene = Scene::new();
        let mut textures = TextureRegistry::new();
        let mut rng = Rng::new(config.seed.unwrap_or(DEFAULT_SEED));
        let statics = build_static_scene(&mut scene, &config, manifest, &mut textures, &mut rng);
        let loader = BodyLoader::new(manifest, &mut textures);

        let (width, height) = renderer.size();
        let viewport = Viewport::new(width as f32, height as f32);
        let mut camera = PerspectiveCamera::new(
            config.camera_fov,
            viewport.aspect(),
            config.camera_near,
            config.camera_far,
        );
        camera.position = Vec3::new(0.0, 0.0, config.camera_distance);
        let controls = OrbitControls::new(Vec3::ZERO)
            .with_damping(config.damping_factor)
            .with_distance_limits(config.camera_min_distance, config.camera_max_distance)
            .with_speeds(config.rotate_speed, config.zoom_speed, config.pan_speed);

        let draw_list = DrawList::with_capacity(scene.len() + manifest.bodies.len() * 2);
        log::info!(
            "orrery: {} bodies, {} textures, renderer `{}`",
            manifest.bodies.len(),
            textures.len(),
            renderer.backend()
        );

        Self {
            speeds: SpeedTable::from_manifest(manifest),
            config,
            scene,
            textures,
            rng,
            camera,
            controls,
            viewport,
            input: InputQueue::new(),
            draw_list,
            statics,
            loader,
            bodies: Vec::with_capacity(manifest.bodies.len()),
            driver: None,
            stop: StopHandle::new(),
            renderer,
            labels,
        }
    }

    /// Create the bodies that have no texture to wait for.
    /// Returns `true` if that completed the load barrier and started the driver.
    pub fn begin_loading(&mut self, now: f64) -> bool {
        let step = self.loader.load_untextured(&mut BodyContext {
            scene: &mut self.scene,
            config: &self.config,
            rng: &mut self.rng,
            labels: &mut self.labels,
        });
        self.absorb(step, now)
    }

    pub fn texture_loaded(&mut self, id: TextureId, now: f64) -> bool {
        self.textures.mark_ready(id);
        self.resolve(id, true, now)
    }

    /// A failed image still completes its bodies, with the flat material.
    pub fn texture_failed(&mut self, id: TextureId, now: f64) -> bool {
        match self.textures.path(id) {
            Some(path) => log::warn!("texture `{}` failed to load", path),
            None => log::warn!("texture {:?} failed to load", id),
        }
        self.textures.mark_failed(id);
        self.resolve(id, false, now)
    }

    fn resolve(&mut self, id: TextureId, loaded: bool, now: f64) -> bool {
        let step = self.loader.texture_resolved(
            id,
            loaded,
            &mut BodyContext {
                scene: &mut self.scene,
                config: &self.config,
                rng: &mut self.rng,
                labels: &mut self.labels,
            },
        );
        self.absorb(step, now)
    }

    fn absorb(&mut self, step: LoadStep, now: f64) -> bool {
        self.bodies.extend(step.bodies);
        if step.fired && self.driver.is_none() {
            self.driver = Some(AnimationDriver::start(now, self.statics.glow, self.stop.clone()));
            true
        } else {
            false
        }
    }

    /// Run one frame. Before the driver starts this only reports `Continue`.
    pub fn frame(&mut self, now: f64) -> FrameOutcome {
        let Some(driver) = self.driver.as_mut() else {
            return if self.stop.is_stopped() {
                FrameOutcome::Stopped
            } else {
                FrameOutcome::Continue
            };
        };
        drain_pointer_input(&mut self.input, &mut self.controls, &self.camera, self.viewport);
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

    /// Slider input for `name`. Returns whether the value was accepted.
    pub fn set_speed(&mut self, name: &str, raw: &str) -> bool {
        apply_speed_input(&mut self.speeds, name, raw)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = apply_resize(&mut self.camera, &mut self.renderer, width, height);
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_some() && !self.stop.is_stopped()
    }

    /// Every texture the scene asked for, to be loaded by the host.
    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn speeds(&self) -> &SpeedTable {
        &self.speeds
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn statics(&self) -> &StaticScene {
        &self.statics
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &OrreryConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn labels(&self) -> &L {
        &self.labels
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::LabelId;
    use crate::renderer::traits::FrameData;
    use std::f32::consts::TAU;

    struct Recorder {
        size: (u32, u32),
        frames: usize,
    }

    impl Renderer for Recorder {
        fn backend(&self) -> &'static str {
            "recording"
        }
        fn draw(&mut self, _frame: &FrameData) {
            self.frames += 1;
        }
        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
        }
        fn size(&self) -> (u32, u32) {
            self.size
        }
    }

    #[derive(Default)]
    struct Labels {
        text: Vec<String>,
        at: Vec<(f32, f32)>,
    }

    impl LabelSink for Labels {
        fn create_label(&mut self, text: &str) -> LabelId {
            self.text.push(text.to_owned());
            self.at.push((f32::NAN, f32::NAN));
            LabelId(self.text.len() as u32 - 1)
        }
        fn place(&mut self, id: LabelId, x: f32, y: f32) {
            self.at[id.0 as usize] = (x, y);
        }
    }

    const SYSTEM: &str = r#"{
        "bodies": [
            { "name": "mercury", "radius": 0.5, "distance": 4 },
            { "name": "earth", "radius": 0.75, "distance": 7 }
        ],
        "speeds": { "mercury": 0.1, "earth": 0.06 },
        "textures": { "earth": "textures/earth.jpeg" },
        "glow_texture": "textures/sunglow.png"
    }"#;

    fn orrery() -> Orrery<Recorder, Labels> {
        let manifest = SystemManifest::from_json(SYSTEM).unwrap();
        let config = OrreryConfig { seed: Some(11), ..OrreryConfig::default() };
        Orrery::new(config, &manifest, Recorder { size: (800, 600), frames: 0 }, Labels::default())
    }

    fn angle_of(o: &Orrery<Recorder, Labels>, name: &str) -> f32 {
        o.bodies().iter().find(|b| b.name == name).unwrap().angle
    }

    #[test]
    fn driver_waits_for_every_body() {
        let mut o = orrery();
        assert_eq!(o.textures().len(), 2);
        assert!(!o.begin_loading(0.0));
        assert_eq!(o.bodies().len(), 1);
        assert_eq!(o.frame(0.1), FrameOutcome::Continue);
        assert_eq!(o.renderer().frames, 0);
        assert!(!o.is_running());

        let glow = o.textures().get("textures/sunglow.png").unwrap();
        assert!(!o.texture_loaded(glow, 0.2));
        let earth = o.textures().get("textures/earth.jpeg").unwrap();
        assert!(o.texture_loaded(earth, 0.5));
        assert!(o.is_running());
        assert_eq!(o.labels().text, vec!["Mercury".to_owned(), "Earth".to_owned()]);

        o.frame(0.6);
        assert_eq!(o.renderer().frames, 1);
    }

    #[test]
    fn failed_texture_still_starts_the_driver() {
        let mut o = orrery();
        o.begin_loading(0.0);
        let earth = o.textures().get("textures/earth.jpeg").unwrap();
        assert!(o.texture_failed(earth, 0.1));
        assert_eq!(o.bodies().len(), 2);
        assert_eq!(o.frame(0.2), FrameOutcome::Continue);
    }

    #[test]
    fn one_second_scenario() {
        let mut o = orrery();
        o.begin_loading(0.0);
        let earth = o.textures().get("textures/earth.jpeg").unwrap();
        o.texture_loaded(earth, 0.0);
        let mercury0 = angle_of(&o, "mercury");
        let earth0 = angle_of(&o, "earth");

        for i in 1..=60 {
            o.frame(i as f64 / 60.0);
        }
        let advanced = |now: f32, then: f32| (now - then).rem_euclid(TAU);
        assert!((advanced(angle_of(&o, "mercury"), mercury0) - 0.1).abs() < 1e-4);
        assert!((advanced(angle_of(&o, "earth"), earth0) - 0.06).abs() < 1e-4);

        for body in o.bodies() {
            let p = o.scene().get(body.mesh).unwrap().position;
            assert!((p.x * p.x + p.z * p.z - body.distance * body.distance).abs() < 1e-3);
        }
    }

    #[test]
    fn speed_input_and_resize() {
        let mut o = orrery();
        assert!(o.set_speed("earth", "-1"));
        assert!(!o.set_speed("earth", "warp"));
        assert_eq!(o.speeds().get("earth"), -1.0);
        assert!((o.speeds().get("mercury") - 0.1).abs() < 1e-6);

        o.resize(1600, 400);
        assert!((o.camera().aspect - 4.0).abs() < 1e-6);
        assert_eq!(o.renderer().size(), (1600, 400));
        assert_eq!(o.viewport(), Viewport::new(1600.0, 400.0));
    }

    #[test]
    fn labels_follow_bodies_after_frames() {
        let mut o = orrery();
        o.begin_loading(0.0);
        let earth = o.textures().get("textures/earth.jpeg").unwrap();
        o.texture_loaded(earth, 0.0);
        o.frame(0.016);
        assert!(o.labels().at.iter().all(|(x, y)| x.is_finite() && y.is_finite()));
    }

    #[test]
    fn stop_handle_ends_the_loop() {
        let mut o = orrery();
        o.begin_loading(0.0);
        let earth = o.textures().get("textures/earth.jpeg").unwrap();
        o.texture_loaded(earth, 0.0);
        let stop = o.stop_handle();
        assert_eq!(o.frame(0.1), FrameOutcome::Continue);
        stop.stop();
        assert_eq!(o.frame(0.2), FrameOutcome::Stopped);
        assert!(!o.is_running());
        assert_eq!(o.renderer().frames, 1);
    }

    #[test]
    fn wheel_input_dollies_the_camera() {
        let mut o = orrery();
        o.begin_loading(0.0);
        let earth = o.textures().get("textures/earth.jpeg").unwrap();
        o.texture_loaded(earth, 0.0);
        o.push_input(InputEvent::Wheel { delta_y: -100.0 });
        o.frame(0.016);
        assert!((o.camera().position.length() - 30.0 * 0.95).abs() < 1e-3);
    }

    #[test]
    fn endless_wheel_zoom_keeps_the_view_usable() {
        let mut o = orrery();
        o.begin_loading(0.0);
        let earth = o.textures().get("textures/earth.jpeg").unwrap();
        o.texture_loaded(earth, 0.0);

        let mut now = 0.0;
        for _ in 0..2200 {
            o.push_input(InputEvent::Wheel { delta_y: -100.0 });
            now += 0.016;
            o.frame(now);
        }
        let min = o.config().camera_min_distance;
        assert!((o.camera().position.length() - min).abs() < 1e-3);
        assert!(o.labels().at.iter().all(|(x, y)| x.is_finite() && y.is_finite()));

        for _ in 0..5000 {
            o.push_input(InputEvent::Wheel { delta_y: 100.0 });
            now += 0.016;
            o.frame(now);
        }
        let max = o.config().camera_max_distance;
        assert!((o.camera().position.length() - max).abs() < 1e-2);
        assert!(o.camera().view_projection().is_finite());
    }
}
