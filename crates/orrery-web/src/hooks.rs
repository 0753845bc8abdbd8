//! JS callbacks registered by the page: the draw hook receives every packed
//! frame, the texture hook every decoded image.

use std::cell::RefCell;

use js_sys::{Float32Array, Function};
use wasm_bindgen::JsValue;
use web_sys::HtmlImageElement;

use orrery_engine::TextureId;

thread_local! {
    static DRAW_HOOK: RefCell<Option<Function>> = RefCell::new(None);
    static TEXTURE_HOOK: RefCell<Option<Function>> = RefCell::new(None);
}

pub fn set_draw_hook(hook: Function) {
    DRAW_HOOK.with(|cell| *cell.borrow_mut() = Some(hook));
}

pub fn set_texture_hook(hook: Function) {
    TEXTURE_HOOK.with(|cell| *cell.borrow_mut() = Some(hook));
}

/// Call the draw hook with `(frame, instanceCount, pointCount)`.
/// Frames are dropped silently until a hook is registered.
pub fn draw(frame: &[f32], instance_count: usize, point_count: usize) {
    DRAW_HOOK.with(|cell| {
        let Some(hook) = cell.borrow().clone() else {
            return;
        };
        let data = Float32Array::from(frame);
        if let Err(err) = hook.call3(
            &JsValue::NULL,
            &data,
            &JsValue::from(instance_count as u32),
            &JsValue::from(point_count as u32),
        ) {
            log::error!("draw hook threw: {:?}", err);
        }
    });
}

/// Hand a decoded image to the texture hook as `(textureId, image)`.
pub fn texture(id: TextureId, image: &HtmlImageElement) {
    TEXTURE_HOOK.with(|cell| {
        let Some(hook) = cell.borrow().clone() else {
            log::warn!("texture {:?} decoded before a texture hook was set", id);
            return;
        };
        if let Err(err) = hook.call2(&JsValue::NULL, &JsValue::from(id.0), image) {
            log::error!("texture hook threw: {:?}", err);
        }
    });
}
