use crate::input::queue::InputQueue;
use crate::renderer::camera::{PerspectiveCamera, Viewport};
use crate::renderer::controls::OrbitControls;
use crate::renderer::traits::Renderer;
use crate::systems::speed::SpeedTable;

/// Apply a raw slider value to `name`'s speed.
/// Malformed or non-finite input is logged and the previous speed kept.
pub fn apply_speed_input(speeds: &mut SpeedTable, name: &str, raw: &str) -> bool {
    match speeds.parse_and_set(name, raw) {
        Ok(speed) => {
            log::debug!("speed of `{}` set to {}", name, speed);
            true
        }
        Err(err) => {
            log::warn!("{}; keeping {}", err, speeds.get(name));
            false
        }
    }
}

/// Match camera and render surface to a new window size. Idempotent.
pub fn apply_resize(
    camera: &mut PerspectiveCamera,
    renderer: &mut dyn Renderer,
    width: u32,
    height: u32,
) -> Viewport {
    let viewport = Viewport::new(width as f32, height as f32);
    camera.resize(viewport);
    renderer.resize(width, height);
    log::info!("resized to {}x{}", width, height);
    viewport
}

/// Feed queued pointer and wheel events to the orbit controls.
pub fn drain_pointer_input(
    queue: &mut InputQueue,
    controls: &mut OrbitControls,
    camera: &PerspectiveCamera,
    viewport: Viewport,
) {
    for event in queue.drain() {
        controls.handle(event, camera, viewport);
    }
}
