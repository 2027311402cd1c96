//! Decorative page effects compiled to WebAssembly.
//!
//! `PageEffects::install` sets up everything a page needs in one call: the
//! particle background on the given canvas, click star bursts, card
//! parallax and the assistant chat panel. Each piece can also be installed
//! on its own with `ParticleBackground::attach`, `StarBursts::install`,
//! `Parallax::install` and `ChatWidget::install`. Every installed piece
//! stays active only while its handle is alive.

#[macro_use]
mod utils;
pub mod chat;
pub mod color;
pub mod error;
pub mod field;
pub mod frame_loop;
pub mod parallax;
pub mod particle;
pub mod pointer;
pub mod stars;
pub mod surface;

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Event, HtmlCanvasElement, Window};

pub use crate::chat::ChatWidget;
pub use crate::color::Color;
pub use crate::error::FieldError;
pub use crate::field::{FieldConfig, Link, ParticleField};
pub use crate::frame_loop::{AnimationFrames, FrameLoop, FrameRequest, FrameScheduler, LoopState};
pub use crate::parallax::Parallax;
pub use crate::particle::Particle;
pub use crate::pointer::{PointerReader, PointerTracker, PointerWriter};
pub use crate::stars::StarBursts;
pub use crate::surface::{CanvasSurface, Surface};
use crate::utils::Listener;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
}

pub struct Timer<'a> {
    name: &'a str,
}

impl<'a> Timer<'a> {
    pub fn new(name: &'a str) -> Timer<'a> {
        console::time_with_label(name);
        Timer { name }
    }
}

impl<'a> Drop for Timer<'a> {
    fn drop(&mut self) {
        console::time_end_with_label(self.name);
    }
}

fn viewport_size(window: &Window) -> Result<(f64, f64), JsValue> {
    let width = window
        .inner_width()?
        .as_f64()
        .ok_or_else(|| JsValue::from_str("window.innerWidth is not a number"))?;
    let height = window
        .inner_height()?
        .as_f64()
        .ok_or_else(|| JsValue::from_str("window.innerHeight is not a number"))?;
    Ok((width, height))
}

// Everything one frame touches, borrowed mutably by the frame callback
struct Runtime {
    field: ParticleField,
    surface: CanvasSurface,
    pointer: PointerReader,
    frames: FrameLoop<AnimationFrames>,
}

impl Runtime {
    fn tick(&mut self) {
        if !self.frames.begin_frame() {
            return;
        }
        {
            #[cfg(feature = "frame-timing")]
            let _timer = Timer::new("ParticleField::frame");
            self.field.frame(&mut self.surface, self.pointer.get());
        }
        if let Err(e) = self.frames.end_frame() {
            console_log!("particle field stopped: {}", e);
            self.frames.stop();
        }
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.surface.resize(width, height);
        self.field.resize(width, height);
    }
}

#[wasm_bindgen]
pub struct ParticleBackground {
    runtime: Rc<RefCell<Runtime>>,
    resize_listener: Option<Listener<Event>>,
    pointer_tracker: Option<PointerTracker>,
}

#[wasm_bindgen]
impl ParticleBackground {
    /// Attaches a field with the default config to the canvas with this id.
    /// Returns `null` when there is no such canvas or it has no 2d context.
    pub fn attach(canvas_id: &str) -> Result<JsValue, JsValue> {
        ParticleBackground::attach_with_config(canvas_id, &FieldConfig::default())
    }

    pub fn attach_with_config(canvas_id: &str, config: &FieldConfig) -> Result<JsValue, JsValue> {
        Ok(match ParticleBackground::mount(canvas_id, *config)? {
            Some(background) => background.into(),
            None => JsValue::NULL,
        })
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        self.runtime.borrow_mut().frames.start()?;
        console_log!("particle field running");
        Ok(())
    }

    /// Cancels the pending frame and detaches the resize and pointer
    /// listeners. A stopped background can't be started again.
    pub fn stop(&mut self) {
        self.runtime.borrow_mut().frames.stop();
        self.resize_listener = None;
        self.pointer_tracker = None;
    }

    pub fn is_running(&self) -> bool {
        self.runtime.borrow().frames.is_running()
    }

    pub fn particle_count(&self) -> u32 {
        self.runtime.borrow().field.particles().len() as u32
    }

    /// Frames drawn so far.
    pub fn frame_count(&self) -> u32 {
        self.runtime.borrow().frames.frames() as u32
    }
}

impl ParticleBackground {
    pub fn mount(canvas_id: &str, config: FieldConfig) -> Result<Option<ParticleBackground>, JsValue> {
        let window = web_sys::window().ok_or(FieldError::Dom("no global window".to_owned()))?;
        let document = window
            .document()
            .ok_or(FieldError::Dom("window has no document".to_owned()))?;

        let canvas = match document
            .get_element_by_id(canvas_id)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        {
            Some(canvas) => canvas,
            None => {
                console_log!("no canvas #{}, particle field disabled", canvas_id);
                return Ok(None);
            }
        };
        let mut surface = match CanvasSurface::from_canvas(canvas)? {
            Some(surface) => surface,
            None => {
                console_log!("no 2d context on #{}, particle field disabled", canvas_id);
                return Ok(None);
            }
        };

        let (width, height) = viewport_size(&window)?;
        surface.resize(width, height);
        let field = ParticleField::new(config, [width, height], &mut rand::thread_rng())?;
        let (pointer_tracker, pointer) = PointerTracker::install(&window, &document)?;

        let callback = Rc::new(RefCell::new(None));
        let frames = FrameLoop::new(AnimationFrames::new(window.clone(), callback.clone()));
        let runtime = Rc::new(RefCell::new(Runtime {
            field,
            surface,
            pointer,
            frames,
        }));

        // The frame callback only holds a weak reference, the runtime owns
        // the callback through its scheduler
        let weak = Rc::downgrade(&runtime);
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if let Some(runtime) = weak.upgrade() {
                runtime.borrow_mut().tick();
            }
        }) as Box<dyn FnMut()>));

        let weak = Rc::downgrade(&runtime);
        let resize_window = window.clone();
        let resize_listener = Listener::new(&window, "resize", move |_: Event| {
            let runtime = match weak.upgrade() {
                Some(runtime) => runtime,
                None => return,
            };
            if let Ok((width, height)) = viewport_size(&resize_window) {
                if let Ok(mut runtime) = runtime.try_borrow_mut() {
                    runtime.resize(width, height);
                }
            }
        })?;

        console_log!(
            "particle field attached to #{} ({}x{}, {} particles)",
            canvas_id,
            width,
            height,
            config.particle_count()
        );
        Ok(Some(ParticleBackground {
            runtime,
            resize_listener: Some(resize_listener),
            pointer_tracker: Some(pointer_tracker),
        }))
    }
}

impl Drop for ParticleBackground {
    // A requestAnimationFrame still pending would call into a freed closure
    fn drop(&mut self) {
        if let Ok(mut runtime) = self.runtime.try_borrow_mut() {
            runtime.frames.stop();
        }
    }
}

/// Every effect on the page, installed together and kept alive by this
/// handle.
#[wasm_bindgen]
pub struct PageEffects {
    background: Option<ParticleBackground>,
    chat: Option<ChatWidget>,
    _stars: StarBursts,
    _parallax: Parallax,
}

#[wasm_bindgen]
impl PageEffects {
    /// Installs the panic hook, starts the particle background on
    /// `canvas_id` when that canvas exists and wires up the other effects.
    pub fn install(canvas_id: &str) -> Result<PageEffects, JsValue> {
        initialize();
        let mut background = ParticleBackground::mount(canvas_id, FieldConfig::default())?;
        if let Some(background) = background.as_mut() {
            background.start()?;
        }
        Ok(PageEffects {
            background,
            chat: ChatWidget::mount()?,
            _stars: StarBursts::install()?,
            _parallax: Parallax::install()?,
        })
    }

    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    pub fn has_chat(&self) -> bool {
        self.chat.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.background.as_ref().map_or(false, |b| b.is_running())
    }

    /// Stops the particle background. The other effects stay installed
    /// until the handle is dropped.
    pub fn stop(&mut self) {
        if let Some(background) = self.background.as_mut() {
            background.stop();
        }
    }
}
