use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::api::config::OrreryConfig;
use crate::api::types::{Color, NodeId};
use crate::assets::manifest::SystemManifest;
use crate::assets::registry::TextureRegistry;
use crate::components::entity::Node;
use crate::components::material::{BlendMode, Material, Side};
use crate::components::mesh::Geometry;
use crate::core::rng::Rng;
use crate::core::scene::Scene;
use crate::systems::lighting::PointLight;

/// Ids of the nodes created by `build_static_scene`.
#[derive(Debug, Clone)]
pub struct StaticScene {
    pub stars: NodeId,
    pub sun: NodeId,
    pub glow: NodeId,
    pub light: NodeId,
    /// One orbit ring per body, in manifest order.
    pub orbits: Vec<NodeId>,
}

/// Build everything that exists before any texture arrives: the starfield,
/// the central body with its glow, the point light and the orbit rings.
pub fn build_static_scene(
    scene: &mut Scene,
    config: &OrreryConfig,
    manifest: &SystemManifest,
    textures: &mut TextureRegistry,
    rng: &mut Rng,
) -> StaticScene {
    let half = config.star_field_size * 0.5;
    let positions: Vec<Vec3> = (0..config.star_count)
        .map(|_| {
            Vec3::new(
                rng.range(-half, half),
                rng.range(-half, half),
                rng.range(-half, half),
            )
        })
        .collect();
    let stars = scene.next_id();
    scene.spawn(
        Node::points(stars, positions, Material::points(Color::WHITE, config.star_size, true))
            .with_tag("stars"),
    );

    let sun = scene.next_id();
    scene.spawn(
        Node::mesh(
            sun,
            Geometry::sphere(config.sun_radius, config.sphere_segments),
            Material::basic(config.sun_color),
        )
        .with_tag("sun"),
    );

    let mut glow_material = Material::sprite(config.sun_color)
        .with_transparent(true)
        .with_blend(BlendMode::Additive);
    if let Some(path) = manifest.glow_texture.as_deref() {
        glow_material = glow_material.with_map(textures.request(path));
    }
    let glow = scene.next_id();
    scene.spawn_child(
        sun,
        Node::sprite(glow, glow_material)
            .with_tag("glow")
            .with_scale(Vec3::new(config.glow_scale, config.glow_scale, 1.0)),
    );

    let light = scene.next_id();
    scene.spawn(
        Node::light(
            light,
            PointLight::new(config.light_color, config.light_intensity, config.light_distance),
        )
        .with_tag("light"),
    );

    let orbits = manifest
        .bodies
        .iter()
        .map(|body| {
            let id = scene.next_id();
            scene.spawn(
                Node::mesh(
                    id,
                    Geometry::ring(
                        body.distance - config.orbit_half_width,
                        body.distance + config.orbit_half_width,
                        config.ring_segments,
                    ),
                    Material::basic(config.orbit_color).with_side(Side::Double),
                )
                .with_tag(format!("orbit:{}", body.name))
                .with_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0)),
            )
        })
        .collect();

    log::info!(
        "static scene built: {} stars, {} orbits",
        config.star_count,
        manifest.bodies.len()
    );

    StaticScene {
        stars,
        sun,
        glow,
        light,
        orbits,
    }
}
