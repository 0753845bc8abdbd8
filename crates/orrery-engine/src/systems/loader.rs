//! Per-body asynchronous setup joined behind a single load barrier.
//!
//! Bodies with a surface texture wait for the host to report the image;
//! bodies without one are created immediately with the flat material. A
//! failed image also falls back to the flat material, so every slot
//! eventually completes.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec3;

use crate::api::config::OrreryConfig;
use crate::api::types::{Color, TextureId};
use crate::assets::barrier::LoadBarrier;
use crate::assets::manifest::SystemManifest;
use crate::assets::registry::TextureRegistry;
use crate::components::body::{CelestialBody, CelestialBodySpec};
use crate::components::entity::Node;
use crate::components::material::{Material, Side};
use crate::components::mesh::Geometry;
use crate::core::rng::Rng;
use crate::core::scene::Scene;
use crate::systems::labels::LabelSink;

/// How a body's surface texture request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureOutcome {
    /// No texture registered for the body.
    Missing,
    Loaded(TextureId),
    Failed,
}

/// Everything `create_body` writes into.
pub struct BodyContext<'a> {
    pub scene: &'a mut Scene,
    pub config: &'a OrreryConfig,
    pub rng: &'a mut Rng,
    pub labels: &'a mut dyn LabelSink,
}

/// Bodies created by one loader step and whether the barrier fired.
#[derive(Debug, Default)]
pub struct LoadStep {
    pub bodies: Vec<CelestialBody>,
    pub fired: bool,
}

pub struct BodyLoader {
    specs: Vec<CelestialBodySpec>,
    /// Texture each slot is still waiting on.
    waiting: Vec<Option<TextureId>>,
    /// Ring map and the body that wears it.
    ring: Option<(String, Option<TextureId>)>,
    barrier: LoadBarrier,
}

impl BodyLoader {
    /// Register every texture the bodies need. Nothing is created yet.
    pub fn new(manifest: &SystemManifest, textures: &mut TextureRegistry) -> Self {
        let waiting = manifest
            .bodies
            .iter()
            .map(|body| manifest.texture_for(&body.name).map(|path| textures.request(path)))
            .collect();
        let ring = manifest.ringed_body.clone().map(|name| {
            let map = manifest.ring_texture.as_deref().map(|path| textures.request(path));
            (name, map)
        });
        Self {
            specs: manifest.bodies.clone(),
            waiting,
            ring,
            barrier: LoadBarrier::new(manifest.bodies.len()),
        }
    }

    /// Create every body that has no texture to wait for. On a manifest with
    /// no textured bodies this alone fires the barrier.
    pub fn load_untextured(&mut self, ctx: &mut BodyContext) -> LoadStep {
        let mut step = LoadStep::default();
        for slot in 0..self.specs.len() {
            if self.waiting[slot].is_none() && !self.barrier.is_complete(slot) {
                self.finish(slot, TextureOutcome::Missing, ctx, &mut step);
            }
        }
        step.fired |= self.barrier.try_fire();
        step
    }

    /// Resolve every slot waiting on `texture`.
    pub fn texture_resolved(
        &mut self,
        texture: TextureId,
        loaded: bool,
        ctx: &mut BodyContext,
    ) -> LoadStep {
        let outcome = if loaded {
            TextureOutcome::Loaded(texture)
        } else {
            TextureOutcome::Failed
        };
        let mut step = LoadStep::default();
        for slot in 0..self.specs.len() {
            if self.waiting[slot] == Some(texture) {
                self.waiting[slot] = None;
                self.finish(slot, outcome, ctx, &mut step);
            }
        }
        step
    }

    fn finish(
        &mut self,
        slot: usize,
        outcome: TextureOutcome,
        ctx: &mut BodyContext,
        step: &mut LoadStep,
    ) {
        let spec = &self.specs[slot];
        if outcome == TextureOutcome::Failed {
            log::warn!("texture for `{}` failed to load; using flat material", spec.name);
        }
        let ring_map = match &self.ring {
            Some((name, map)) if *name == spec.name => Some(*map),
            _ => None,
        };
        let body = create_body(spec, outcome, ring_map, ctx);
        log::info!("body `{}` ready", body.name);
        step.bodies.push(body);
        step.fired |= self.barrier.complete(slot);
    }

    pub fn barrier(&self) -> &LoadBarrier {
        &self.barrier
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Build one body: sphere mesh at `(distance, 0, 0)`, label, optional ring
/// child, and the runtime record with a random starting angle.
///
/// `ring` is `Some(map)` for the ringed body.
pub fn create_body(
    spec: &CelestialBodySpec,
    outcome: TextureOutcome,
    ring: Option<Option<TextureId>>,
    ctx: &mut BodyContext,
) -> CelestialBody {
    let config = ctx.config;
    let material = match outcome {
        TextureOutcome::Loaded(map) => Material::standard_mapped(map),
        TextureOutcome::Missing | TextureOutcome::Failed => {
            Material::standard(config.fallback_color)
        }
    };

    let mesh = ctx.scene.next_id();
    ctx.scene.spawn(
        Node::mesh(mesh, Geometry::sphere(spec.radius, config.sphere_segments), material)
            .with_tag(spec.name.clone())
            .with_position(Vec3::new(spec.distance, 0.0, 0.0)),
    );

    if let Some(map) = ring {
        let mut ring_material = Material::basic(Color::WHITE)
            .with_side(Side::Double)
            .with_transparent(true);
        if let Some(map) = map {
            ring_material = ring_material.with_map(map);
        }
        let ring_id = ctx.scene.next_id();
        ctx.scene.spawn_child(
            mesh,
            Node::mesh(
                ring_id,
                Geometry::ring(
                    spec.radius + config.body_ring_inner_offset,
                    spec.radius + config.body_ring_outer_offset,
                    config.ring_segments,
                ),
                ring_material,
            )
            .with_tag(format!("ring:{}", spec.name))
            .with_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0)),
        );
    }

    let label = ctx.labels.create_label(&spec.display_name());

    CelestialBody {
        name: spec.name.clone(),
        mesh,
        label,
        angle: ctx.rng.next_f32() * TAU,
        distance: spec.distance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::LabelId;
    use crate::components::entity::NodeKind;
    use crate::components::material::MaterialKind;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Labels(Vec<String>);

    impl LabelSink for Labels {
        fn create_label(&mut self, text: &str) -> LabelId {
            self.0.push(text.to_owned());
            LabelId(self.0.len() as u32 - 1)
        }
        fn place(&mut self, _id: LabelId, _x: f32, _y: f32) {}
    }

    fn manifest() -> SystemManifest {
        let bodies = vec![
            CelestialBodySpec::new("mercury", 0.5, 4.0),
            CelestialBodySpec::new("venus", 0.7, 5.5),
            CelestialBodySpec::new("earth", 0.75, 7.0),
            CelestialBodySpec::new("saturn", 1.5, 12.5),
        ];
        let textures: HashMap<String, String> = [
            ("mercury", "textures/mercury.jpg"),
            ("earth", "textures/earth.jpeg"),
            ("saturn", "textures/saturn.jpg"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
        SystemManifest {
            bodies,
            speeds: HashMap::new(),
            textures,
            ring_texture: Some("textures/saturn_ring.jpg".into()),
            glow_texture: None,
            ringed_body: Some("saturn".into()),
        }
    }

    struct World {
        scene: Scene,
        config: OrreryConfig,
        rng: Rng,
        labels: Labels,
    }

    impl World {
        fn new() -> Self {
            Self {
                scene: Scene::new(),
                config: OrreryConfig::default(),
                rng: Rng::new(3),
                labels: Labels::default(),
            }
        }

        fn ctx(&mut self) -> BodyContext<'_> {
            BodyContext {
                scene: &mut self.scene,
                config: &self.config,
                rng: &mut self.rng,
                labels: &mut self.labels,
            }
        }
    }

    fn material_of(scene: &Scene, body: &CelestialBody) -> Material {
        match &scene.get(body.mesh).unwrap().kind {
            NodeKind::Mesh { material, .. } => *material,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn untextured_bodies_are_created_immediately() {
        let manifest = manifest();
        let mut textures = TextureRegistry::new();
        let mut loader = BodyLoader::new(&manifest, &mut textures);
        assert_eq!(textures.len(), 4);

        let mut world = World::new();
        let step = loader.load_untextured(&mut world.ctx());
        assert!(!step.fired);
        assert_eq!(step.bodies.len(), 1);
        let venus = &step.bodies[0];
        assert_eq!(venus.name, "venus");
        assert_eq!(world.labels.0, vec!["Venus".to_owned()]);
        let material = material_of(&world.scene, venus);
        assert_eq!(material.kind, MaterialKind::Standard);
        assert_eq!(material.color, Color::from_hex(0x888888));
        assert_eq!(material.map, None);
        assert!((0.0..TAU).contains(&venus.angle));
        assert_eq!(world.scene.world_position(venus.mesh), Some(Vec3::new(5.5, 0.0, 0.0)));
    }

    #[test]
    fn barrier_fires_after_all_textures_in_any_order() {
        let manifest = manifest();
        for order in [[0usize, 1, 2], [2, 1, 0], [1, 2, 0]] {
            let mut textures = TextureRegistry::new();
            let mut loader = BodyLoader::new(&manifest, &mut textures);
            let body_textures = [
                textures.get("textures/mercury.jpg").unwrap(),
                textures.get("textures/earth.jpeg").unwrap(),
                textures.get("textures/saturn.jpg").unwrap(),
            ];
            let mut world = World::new();
            let mut fires = 0;
            let mut created = loader.load_untextured(&mut world.ctx()).bodies.len();
            for (i, &k) in order.iter().enumerate() {
                let step = loader.texture_resolved(body_textures[k], true, &mut world.ctx());
                created += step.bodies.len();
                if step.fired {
                    fires += 1;
                    assert_eq!(i, order.len() - 1);
                }
            }
            assert_eq!(fires, 1);
            assert_eq!(created, 4);
            assert!(loader.barrier().has_fired());

            let again = loader.texture_resolved(body_textures[0], true, &mut world.ctx());
            assert!(again.bodies.is_empty());
            assert!(!again.fired);
        }
    }

    #[test]
    fn failed_texture_falls_back_and_completes() {
        let manifest = SystemManifest {
            bodies: vec![CelestialBodySpec::new("mars", 0.6, 8.5)],
            textures: [("mars".to_owned(), "textures/missing.jpg".to_owned())]
                .into_iter()
                .collect(),
            ..manifest()
        };
        let mut textures = TextureRegistry::new();
        let mut loader = BodyLoader::new(&manifest, &mut textures);
        let mut world = World::new();
        assert!(!loader.load_untextured(&mut world.ctx()).fired);

        let id = textures.get("textures/missing.jpg").unwrap();
        let step = loader.texture_resolved(id, false, &mut world.ctx());
        assert!(step.fired);
        let material = material_of(&world.scene, &step.bodies[0]);
        assert_eq!(material.map, None);
        assert_eq!(material.color, Color::from_hex(0x888888));
    }

    #[test]
    fn loaded_texture_maps_the_sphere() {
        let manifest = manifest();
        let mut textures = TextureRegistry::new();
        let mut loader = BodyLoader::new(&manifest, &mut textures);
        let mut world = World::new();
        let earth_tex = textures.get("textures/earth.jpeg").unwrap();
        let step = loader.texture_resolved(earth_tex, true, &mut world.ctx());
        let material = material_of(&world.scene, &step.bodies[0]);
        assert_eq!(material.kind, MaterialKind::Standard);
        assert_eq!(material.map, Some(earth_tex));
    }

    #[test]
    fn ringed_body_gets_flat_ring_child() {
        let manifest = manifest();
        let mut textures = TextureRegistry::new();
        let mut loader = BodyLoader::new(&manifest, &mut textures);
        let mut world = World::new();
        let saturn_tex = textures.get("textures/saturn.jpg").unwrap();
        let ring_tex = textures.get("textures/saturn_ring.jpg").unwrap();
        let saturn = loader
            .texture_resolved(saturn_tex, true, &mut world.ctx())
            .bodies
            .remove(0);

        let children = world.scene.children(saturn.mesh).to_vec();
        assert_eq!(children.len(), 1);
        let ring = world.scene.get(children[0]).unwrap();
        assert!((ring.rotation.x + FRAC_PI_2).abs() < 1e-6);
        match &ring.kind {
            NodeKind::Mesh { geometry: Geometry::Ring { inner, outer, segments }, material } => {
                assert!((inner - 1.8).abs() < 1e-5);
                assert!((outer - 2.4).abs() < 1e-5);
                assert_eq!(*segments, 64);
                assert_eq!(material.map, Some(ring_tex));
                assert_eq!(material.side, Side::Double);
                assert!(material.transparent);
            }
            other => panic!("unexpected ring kind {other:?}"),
        }

        let earth_tex = textures.get("textures/earth.jpeg").unwrap();
        let earth = loader
            .texture_resolved(earth_tex, true, &mut world.ctx())
            .bodies
            .remove(0);
        assert!(world.scene.children(earth.mesh).is_empty());
    }

    #[test]
    fn no_bodies_fires_on_first_step() {
        let manifest = SystemManifest { bodies: Vec::new(), ..manifest() };
        let mut textures = TextureRegistry::new();
        let mut loader = BodyLoader::new(&manifest, &mut textures);
        let mut world = World::new();
        assert!(loader.load_untextured(&mut world.ctx()).fired);
        assert!(!loader.load_untextured(&mut world.ctx()).fired);
    }
}
