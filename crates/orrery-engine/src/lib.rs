pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::config::OrreryConfig;
pub use api::error::OrreryError;
pub use api::orrery::{Orrery, DEFAULT_SEED};
pub use api::types::{Color, LabelId, NodeId, TextureId};
pub use assets::barrier::LoadBarrier;
pub use assets::manifest::SystemManifest;
pub use assets::registry::{TextureRegistry, TextureState};
pub use bridge::protocol::{FrameBuffer, FrameLayout};
pub use components::body::{CelestialBody, CelestialBodySpec};
pub use components::entity::{Node, NodeKind};
pub use components::material::{BlendMode, Material, MaterialKind, Side};
pub use components::mesh::Geometry;
pub use core::scene::Scene;
pub use input::queue::{InputEvent, InputQueue, PointerButton};
pub use renderer::camera::{PerspectiveCamera, Viewport};
pub use renderer::controls::OrbitControls;
pub use renderer::traits::{FrameData, Renderer};
pub use systems::animation::{FrameOutcome, StopHandle};
pub use systems::labels::LabelSink;
pub use systems::lighting::PointLight;
pub use systems::speed::SpeedTable;
