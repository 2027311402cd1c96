// Pointer reading shared between the mousemove handlers (writer) and the
// particle field (reader, polled once per frame).

use crate::utils::Listener;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use vecmath::Vector2;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, MouseEvent, Window};

/// Wait for the debounced pointer writer, roughly one frame at 60fps.
pub const DEBOUNCE_MS: i32 = 16;

/// Creates the one writer and a reader for a fresh reading at `(0, 0)`.
pub fn pointer_cell() -> (PointerWriter, PointerReader) {
    let cell = Rc::new(Cell::new([0.0, 0.0]));
    (PointerWriter(cell.clone()), PointerReader(cell))
}

// Not Clone: one writer per cell
pub struct PointerWriter(Rc<Cell<Vector2<f64>>>);

impl PointerWriter {
    pub fn set(&self, reading: Vector2<f64>) {
        self.0.set(reading);
    }
}

#[derive(Clone)]
pub struct PointerReader(Rc<Cell<Vector2<f64>>>);

impl PointerReader {
    pub fn get(&self) -> Vector2<f64> {
        self.0.get()
    }
}

// Trailing-edge debounce. Each new value replaces the pending one and hands
// back the timer that has to be cancelled; only the last value of a burst
// survives until the timer fires.
pub struct TrailingDebounce<T, H> {
    pending: Option<T>,
    timer: Option<H>,
}

impl<T, H> TrailingDebounce<T, H> {
    pub fn new() -> Self {
        TrailingDebounce {
            pending: None,
            timer: None,
        }
    }

    pub fn push(&mut self, value: T) -> Option<H> {
        self.pending = Some(value);
        self.timer.take()
    }

    pub fn armed(&mut self, timer: H) {
        self.timer = Some(timer);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn flush(&mut self) -> Option<T> {
        self.timer = None;
        self.pending.take()
    }

    pub fn cancel(&mut self) -> Option<H> {
        self.pending = None;
        self.timer.take()
    }
}

impl<T, H> Default for TrailingDebounce<T, H> {
    fn default() -> Self {
        TrailingDebounce::new()
    }
}

struct Tracker {
    window: Window,
    writer: PointerWriter,
    glow: Option<HtmlElement>,
    debounce: RefCell<TrailingDebounce<Vector2<f64>, i32>>,
    flush: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Tracker {
    fn on_move(&self, event: &MouseEvent) {
        let reading = [event.client_x() as f64, event.client_y() as f64];
        self.writer.set(reading);
        if let Some(glow) = &self.glow {
            let style = glow.style();
            let moved = style
                .set_property("left", &format!("{}px", reading[0]))
                .and_then(|_| style.set_property("top", &format!("{}px", reading[1])));
            if let Err(e) = moved {
                web_sys::console::error_1(&e);
            }
        }
        self.debounced(reading);
    }

    // Second, rate limited consumer of the same events
    fn debounced(&self, reading: Vector2<f64>) {
        if let Some(previous) = self.debounce.borrow_mut().push(reading) {
            self.window.clear_timeout_with_handle(previous);
        }
        let flush = self.flush.borrow();
        if let Some(callback) = flush.as_ref() {
            if let Ok(handle) = self
                .window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback.as_ref().unchecked_ref(),
                    DEBOUNCE_MS,
                )
            {
                self.debounce.borrow_mut().armed(handle);
            }
        }
    }

    fn on_timer(&self) {
        let value = self.debounce.borrow_mut().flush();
        if let Some(reading) = value {
            self.writer.set(reading);
        }
    }
}

/// Installed mousemove handling. Dropping it removes the listener and any
/// pending debounce timer.
pub struct PointerTracker {
    tracker: Rc<Tracker>,
    _listener: Listener<MouseEvent>,
}

impl PointerTracker {
    pub fn install(window: &Window, document: &Document) -> Result<(PointerTracker, PointerReader), JsValue> {
        let (writer, reader) = pointer_cell();
        let glow = document
            .query_selector(".cursor-light")?
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());

        let tracker = Rc::new(Tracker {
            window: window.clone(),
            writer,
            glow,
            debounce: RefCell::new(TrailingDebounce::new()),
            flush: RefCell::new(None),
        });

        let weak: Weak<Tracker> = Rc::downgrade(&tracker);
        *tracker.flush.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if let Some(tracker) = weak.upgrade() {
                tracker.on_timer();
            }
        }) as Box<dyn FnMut()>));

        let weak = Rc::downgrade(&tracker);
        let listener = Listener::new(document, "mousemove", move |event: MouseEvent| {
            if let Some(tracker) = weak.upgrade() {
                tracker.on_move(&event);
            }
        })?;

        Ok((
            PointerTracker {
                tracker,
                _listener: listener,
            },
            reader,
        ))
    }
}

impl Drop for PointerTracker {
    fn drop(&mut self) {
        let timer = self.tracker.debounce.borrow_mut().cancel();
        if let Some(handle) = timer {
            self.tracker.window.clear_timeout_with_handle(handle);
        }
    }
}
