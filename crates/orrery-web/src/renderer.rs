use std::cell::RefCell;
use std::rc::Rc;

use web_sys::HtmlCanvasElement;

use orrery_engine::{FrameBuffer, FrameData, Renderer};

use crate::hooks;

/// Last packed frame, waiting to be handed to the draw hook.
struct Staged {
    buffer: FrameBuffer,
    instances: usize,
    points: usize,
    fresh: bool,
}

/// Packed-frame slot shared between the renderer, which fills it while the
/// orrery is borrowed, and the frame loop, which presents it after the
/// borrow is released. The draw hook may then call back into the orrery.
#[derive(Clone)]
pub struct FrameSlot(Rc<RefCell<Staged>>);

impl FrameSlot {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Staged {
            buffer: FrameBuffer::new(),
            instances: 0,
            points: 0,
            fresh: false,
        })))
    }

    pub fn stage(&self, frame: &FrameData) {
        let mut staged = self.0.borrow_mut();
        staged.buffer.pack(frame);
        staged.instances = frame.draw_list.instance_count();
        staged.points = frame.draw_list.point_count();
        staged.fresh = true;
    }

    /// Send a newly staged frame to the page's draw hook.
    pub fn present(&self) -> bool {
        self.present_with(hooks::draw)
    }

    /// Hand a newly staged frame to `sink` once. Returns whether there was one.
    pub fn present_with(&self, sink: impl FnOnce(&[f32], usize, usize)) -> bool {
        let mut staged = self.0.borrow_mut();
        if !staged.fresh {
            return false;
        }
        staged.fresh = false;
        sink(staged.buffer.as_slice(), staged.instances, staged.points);
        true
    }
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Renderer that packs each frame into the wire format for the page's draw
/// hook. The canvas is only sized here; drawing into it is the host
/// library's job.
pub struct HostRenderer {
    canvas: HtmlCanvasElement,
    slot: FrameSlot,
}

impl HostRenderer {
    pub fn new(canvas: HtmlCanvasElement, slot: FrameSlot) -> Self {
        Self { canvas, slot }
    }
}

impl Renderer for HostRenderer {
    fn backend(&self) -> &'static str {
        "host"
    }

    fn draw(&mut self, frame: &FrameData) {
        self.slot.stage(frame);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }
}
