use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, HtmlInputElement, MouseEvent, WheelEvent};

use orrery_engine::{InputEvent, LabelId, LabelSink, PointerButton};

use crate::runner::WebOrrery;

/// Class given to every label element.
pub const LABEL_CLASS: &str = "planet-label";

pub fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub fn element_by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id} element")))
}

/// Current window inner size in CSS pixels.
pub fn window_size() -> Result<(u32, u32), JsValue> {
    let window = window()?;
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok((width as u32, height as u32))
}

/// Host time in seconds, on the same clock as `requestAnimationFrame`.
pub fn now_seconds() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now() / 1000.0)
        .unwrap_or(0.0)
}

/// Create the render surface and append it to `container`.
pub fn create_canvas(document: &Document, container: &Element) -> Result<HtmlCanvasElement, JsValue> {
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    container.append_child(&canvas)?;
    Ok(canvas)
}

/// Labels as absolutely positioned `div`s under one host element.
pub struct DomLabels {
    document: Document,
    host: Element,
    /// Indexed by `LabelId`; `None` where creation failed.
    labels: Vec<Option<HtmlElement>>,
}

impl DomLabels {
    pub fn new(document: Document, host: Element) -> Self {
        Self {
            document,
            host,
            labels: Vec::new(),
        }
    }

    fn create(&self, text: &str) -> Result<HtmlElement, JsValue> {
        let div: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        div.set_class_name(LABEL_CLASS);
        div.set_text_content(Some(text));
        self.host.append_child(&div)?;
        Ok(div)
    }
}

impl LabelSink for DomLabels {
    fn create_label(&mut self, text: &str) -> LabelId {
        let id = LabelId(self.labels.len() as u32);
        let div = self
            .create(text)
            .map_err(|err| log::error!("could not create label `{}`: {:?}", text, err))
            .ok();
        self.labels.push(div);
        id
    }

    fn place(&mut self, id: LabelId, x: f32, y: f32) {
        let Some(Some(div)) = self.labels.get(id.0 as usize) else {
            return;
        };
        let style = div.style();
        let _ = style.set_property("left", &format!("{x}px"));
        let _ = style.set_property("top", &format!("{y}px"));
    }
}

/// Wire every `<name>Speed` input that exists to the speed table.
/// Bodies without a slider are skipped.
pub fn bind_speed_sliders(
    document: &Document,
    names: &[String],
    orrery: &Rc<RefCell<WebOrrery>>,
) -> Result<usize, JsValue> {
    let mut bound = 0;
    for name in names {
        let Some(element) = document.get_element_by_id(&format!("{name}Speed")) else {
            continue;
        };
        let Ok(input) = element.dyn_into::<HtmlInputElement>() else {
            log::warn!("#{}Speed is not an input element", name);
            continue;
        };
        let orrery = orrery.clone();
        let name = name.clone();
        let target = input.clone();
        let on_input = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            orrery.borrow_mut().set_speed(&name, &target.value());
        }) as Box<dyn FnMut(web_sys::Event)>);
        input.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
        on_input.forget();
        bound += 1;
    }
    Ok(bound)
}

/// Keep camera and canvas in step with the window.
pub fn bind_resize(orrery: &Rc<RefCell<WebOrrery>>) -> Result<(), JsValue> {
    let orrery = orrery.clone();
    let on_resize = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        match window_size() {
            Ok((width, height)) => orrery.borrow_mut().resize(width, height),
            Err(err) => log::warn!("resize: {:?}", err),
        }
    }) as Box<dyn FnMut(web_sys::Event)>);
    window()?.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();
    Ok(())
}

/// Mouse drag and wheel on the canvas feed the orbit controls.
pub fn bind_pointer(canvas: &HtmlCanvasElement, orrery: &Rc<RefCell<WebOrrery>>) -> Result<(), JsValue> {
    let button = |event: &MouseEvent| {
        if event.button() == 2 {
            PointerButton::Secondary
        } else {
            PointerButton::Primary
        }
    };

    let o = orrery.clone();
    let on_down = Closure::wrap(Box::new(move |event: MouseEvent| {
        o.borrow_mut().push_input(InputEvent::PointerDown {
            x: event.offset_x() as f32,
            y: event.offset_y() as f32,
            button: button(&event),
        });
    }) as Box<dyn FnMut(MouseEvent)>);
    canvas.add_event_listener_with_callback("mousedown", on_down.as_ref().unchecked_ref())?;
    on_down.forget();

    let o = orrery.clone();
    let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
        o.borrow_mut().push_input(InputEvent::PointerMove {
            x: event.offset_x() as f32,
            y: event.offset_y() as f32,
        });
    }) as Box<dyn FnMut(MouseEvent)>);
    canvas.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();

    let o = orrery.clone();
    let on_up = Closure::wrap(Box::new(move |event: MouseEvent| {
        o.borrow_mut().push_input(InputEvent::PointerUp {
            x: event.offset_x() as f32,
            y: event.offset_y() as f32,
        });
    }) as Box<dyn FnMut(MouseEvent)>);
    canvas.add_event_listener_with_callback("mouseup", on_up.as_ref().unchecked_ref())?;
    canvas.add_event_listener_with_callback("mouseleave", on_up.as_ref().unchecked_ref())?;
    on_up.forget();

    let o = orrery.clone();
    let on_wheel = Closure::wrap(Box::new(move |event: WheelEvent| {
        event.prevent_default();
        o.borrow_mut().push_input(InputEvent::Wheel { delta_y: event.delta_y() as f32 });
    }) as Box<dyn FnMut(WheelEvent)>);
    canvas.add_event_listener_with_callback("wheel", on_wheel.as_ref().unchecked_ref())?;
    on_wheel.forget();

    let on_context = Closure::wrap(Box::new(move |event: web_sys::Event| {
        event.prevent_default();
    }) as Box<dyn FnMut(web_sys::Event)>);
    canvas.add_event_listener_with_callback("contextmenu", on_context.as_ref().unchecked_ref())?;
    on_context.forget();

    Ok(())
}
