use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use orrery_engine::{FrameOutcome, StopHandle};

use crate::dom;
use crate::renderer::FrameSlot;
use crate::runner::WebOrrery;

type FrameCallback = Closure<dyn FnMut(f64)>;

/// `requestAnimationFrame` loop driving `Orrery::frame`.
/// Runs until the stop handle is set or the orrery reports `Stopped`.
/// The staged frame is presented only after the orrery borrow ends.
pub struct FrameLoop {
    orrery: Rc<RefCell<WebOrrery>>,
    slot: FrameSlot,
    stop: StopHandle,
    callback: Rc<RefCell<Option<FrameCallback>>>,
    pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    pub fn new(orrery: Rc<RefCell<WebOrrery>>, slot: FrameSlot, stop: StopHandle) -> Rc<Self> {
        Rc::new(Self {
            orrery,
            slot,
            stop,
            callback: Rc::new(RefCell::new(None)),
            pending: Rc::new(Cell::new(None)),
        })
    }

    pub fn is_started(&self) -> bool {
        self.callback.borrow().is_some()
    }

    /// Schedule the first frame. Later calls are no-ops.
    pub fn start(&self) -> Result<(), JsValue> {
        if self.is_started() {
            return Ok(());
        }
        let orrery = self.orrery.clone();
        let slot = self.slot.clone();
        let callback = self.callback.clone();
        let pending = self.pending.clone();
        let on_frame = Closure::wrap(Box::new(move |timestamp: f64| {
            pending.set(None);
            let outcome = orrery.borrow_mut().frame(timestamp / 1000.0);
            slot.present();
            match outcome {
                FrameOutcome::Continue => match request_frame(&callback) {
                    Ok(id) => pending.set(Some(id)),
                    Err(err) => log::error!("requestAnimationFrame failed: {:?}", err),
                },
                FrameOutcome::Stopped => log::info!("frame loop stopped"),
            }
        }) as Box<dyn FnMut(f64)>);
        *self.callback.borrow_mut() = Some(on_frame);

        let id = request_frame(&self.callback)?;
        self.pending.set(Some(id));
        log::info!("frame loop started");
        Ok(())
    }

    /// Stop at the next frame boundary and cancel any frame already queued.
    pub fn stop(&self) {
        self.stop.stop();
        if let Some(id) = self.pending.take() {
            if let Ok(window) = dom::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }
}

fn request_frame(callback: &RefCell<Option<FrameCallback>>) -> Result<i32, JsValue> {
    let borrow = callback.borrow();
    let Some(closure) = borrow.as_ref() else {
        return Err(JsValue::from_str("frame callback missing"));
    };
    dom::window()?.request_animation_frame(closure.as_ref().unchecked_ref())
}
