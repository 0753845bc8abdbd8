use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsValue;

use orrery_engine::{Orrery, OrreryConfig, OrreryError, Renderer, SystemManifest};

use crate::dom::{self, DomLabels};
use crate::frame_loop::FrameLoop;
use crate::renderer::{FrameSlot, HostRenderer};
use crate::textures;

/// The orrery as wired into the page.
pub type WebOrrery = Orrery<HostRenderer, DomLabels>;

/// Element that receives the render canvas.
pub const CONTAINER_ID: &str = "container";
/// Element that hosts the label divs.
pub const LABELS_ID: &str = "labels";

/// Parse an optional JSON config override. A malformed override falls back
/// to the defaults; the error is returned so it can be logged once logging
/// is up.
pub fn resolve_config(json: Option<&str>) -> (OrreryConfig, Option<OrreryError>) {
    match json.map(OrreryConfig::from_json) {
        None => (OrreryConfig::default(), None),
        Some(Ok(config)) => (config, None),
        Some(Err(err)) => (OrreryConfig::default(), Some(err)),
    }
}

fn js_error(err: OrreryError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Owns the running orrery and its frame loop.
///
/// Each concrete demo keeps one in a `thread_local!` via `export_orrery!`,
/// because wasm-bindgen cannot export generic structs directly.
pub struct OrreryRunner {
    orrery: Rc<RefCell<WebOrrery>>,
    frame_loop: Rc<FrameLoop>,
}

impl OrreryRunner {
    /// Build the scene, attach it to the page and start every texture load.
    pub fn start(manifest_json: &str, mut config: OrreryConfig) -> Result<Self, JsValue> {
        let manifest = SystemManifest::from_json(manifest_json).map_err(js_error)?;
        if config.seed.is_none() {
            config.seed = Some(js_sys::Date::now() as u64);
        }

        let document = dom::document()?;
        let container = dom::element_by_id(&document, CONTAINER_ID)?;
        let label_host = dom::element_by_id(&document, LABELS_ID)?;
        let canvas = dom::create_canvas(&document, &container)?;

        let slot = FrameSlot::new();
        let mut renderer = HostRenderer::new(canvas.clone(), slot.clone());
        let (width, height) = dom::window_size()?;
        renderer.resize(width, height);
        let labels = DomLabels::new(document.clone(), label_host);

        let orrery = Orrery::new(config, &manifest, renderer, labels);
        let stop = orrery.stop_handle();
        let orrery = Rc::new(RefCell::new(orrery));
        let frame_loop = FrameLoop::new(orrery.clone(), slot, stop);

        dom::bind_resize(&orrery)?;
        dom::bind_pointer(&canvas, &orrery)?;
        let names: Vec<String> = manifest.bodies.iter().map(|b| b.name.clone()).collect();
        let sliders = dom::bind_speed_sliders(&document, &names, &orrery)?;
        log::info!("{} of {} speed sliders bound", sliders, names.len());

        let started = orrery.borrow_mut().begin_loading(dom::now_seconds());
        if started {
            textures::start_loop(&frame_loop);
        }
        let requested = textures::load_all(&orrery, &frame_loop)?;
        log::info!("{} textures requested", requested);

        Ok(Self { orrery, frame_loop })
    }

    pub fn stop(&self) {
        self.frame_loop.stop();
    }

    /// Same path as a slider `input` event.
    pub fn set_speed(&self, name: &str, raw: &str) -> bool {
        self.orrery.borrow_mut().set_speed(name, raw)
    }
}
