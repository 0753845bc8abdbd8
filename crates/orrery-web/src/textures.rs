use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlImageElement;

use orrery_engine::TextureId;

use crate::dom;
use crate::frame_loop::FrameLoop;
use crate::hooks;
use crate::runner::WebOrrery;

/// Start an image load for every texture the orrery registered.
/// Each load reports back on `onload`/`onerror`; the report that completes
/// the last body starts the frame loop.
pub fn load_all(orrery: &Rc<RefCell<WebOrrery>>, frame_loop: &Rc<FrameLoop>) -> Result<usize, JsValue> {
    let requests: Vec<(TextureId, String)> = orrery
        .borrow()
        .textures()
        .iter()
        .map(|(id, path)| (id, path.to_owned()))
        .collect();
    for (id, path) in &requests {
        load(*id, path, orrery, frame_loop)?;
    }
    Ok(requests.len())
}

fn load(
    id: TextureId,
    path: &str,
    orrery: &Rc<RefCell<WebOrrery>>,
    frame_loop: &Rc<FrameLoop>,
) -> Result<(), JsValue> {
    let image = HtmlImageElement::new()?;

    let on_load = {
        let image = image.clone();
        let orrery = orrery.clone();
        let frame_loop = frame_loop.clone();
        Closure::wrap(Box::new(move || {
            hooks::texture(id, &image);
            let started = orrery.borrow_mut().texture_loaded(id, dom::now_seconds());
            if started {
                start_loop(&frame_loop);
            }
        }) as Box<dyn FnMut()>)
    };

    let on_error = {
        let orrery = orrery.clone();
        let frame_loop = frame_loop.clone();
        Closure::wrap(Box::new(move || {
            let started = orrery.borrow_mut().texture_failed(id, dom::now_seconds());
            if started {
                start_loop(&frame_loop);
            }
        }) as Box<dyn FnMut()>)
    };

    image.set_onload(Some(on_load.as_ref().unchecked_ref()));
    image.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    on_load.forget();
    on_error.forget();
    image.set_src(path);
    log::debug!("loading texture {:?} from {}", id, path);
    Ok(())
}

pub(crate) fn start_loop(frame_loop: &FrameLoop) {
    if let Err(err) = frame_loop.start() {
        log::error!("could not start frame loop: {:?}", err);
    }
}
