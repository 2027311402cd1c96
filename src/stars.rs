// Click star bursts: a ring of glyphs flung out from the click point. The
// flight itself is a CSS animation driven by the --tx/--ty offsets.

use crate::color::Color;
use crate::utils::Listener;
use rand::Rng;
use std::f64::consts::PI;
use vecmath::Vector2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, MouseEvent, Window};

pub const STARS_PER_BURST: usize = 8;
pub const STAR_GLYPHS: [&str; 4] = ["\u{2728}", "\u{2B50}", "\u{1F4AB}", "\u{1F31F}"];
pub const STAR_COLORS: [Color; 4] = [Color::ORANGE, Color::TEAL, Color::SUNFLOWER, Color::MINT];
pub const ANGLE_JITTER: f64 = 0.5;
pub const MIN_DISTANCE: f64 = 50.0;
pub const DISTANCE_JITTER: f64 = 50.0;
pub const STAR_LIFETIME_MS: i32 = 1000;

// Clicks on the chat widget shouldn't spray stars over it
const IGNORED_SELECTORS: [&str; 2] = [".ai-chat-container", ".ai-assistant-btn"];

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Star {
    pub origin: Vector2<f64>,
    pub offset: Vector2<f64>,
    pub glyph: &'static str,
    pub color: Color,
}

pub fn plan_burst<R: Rng + ?Sized>(rng: &mut R, origin: Vector2<f64>) -> Vec<Star> {
    (0..STARS_PER_BURST)
        .map(|i| {
            let glyph = STAR_GLYPHS[rng.gen_range(0, STAR_GLYPHS.len())];
            let color = STAR_COLORS[rng.gen_range(0, STAR_COLORS.len())];
            let angle = (2.0 * PI * i as f64) / STARS_PER_BURST as f64 + rng.gen::<f64>() * ANGLE_JITTER;
            let distance = MIN_DISTANCE + rng.gen::<f64>() * DISTANCE_JITTER;
            Star {
                origin,
                offset: [angle.cos() * distance, angle.sin() * distance],
                glyph,
                color,
            }
        })
        .collect()
}

fn spawn_star(window: &Window, document: &Document, star: &Star) -> Result<(), JsValue> {
    let el = document.create_element("div")?.dyn_into::<HtmlElement>()?;
    el.set_class_name("star-particle");
    el.set_text_content(Some(star.glyph));
    let style = el.style();
    style.set_property("left", &format!("{}px", star.origin[0]))?;
    style.set_property("top", &format!("{}px", star.origin[1]))?;
    style.set_property("color", &star.color.to_css_hex())?;
    style.set_property("--tx", &format!("{}px", star.offset[0]))?;
    style.set_property("--ty", &format!("{}px", star.offset[1]))?;

    document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?
        .append_child(&el)?;

    // Closure::once_into_js frees itself after the single call
    let remove = Closure::once_into_js(move || el.remove());
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        remove.unchecked_ref::<js_sys::Function>(),
        STAR_LIFETIME_MS,
    )?;
    Ok(())
}

fn is_ignored(event: &MouseEvent) -> bool {
    let target = match event.target().and_then(|t| t.dyn_into::<Element>().ok()) {
        Some(el) => el,
        None => return false,
    };
    IGNORED_SELECTORS
        .iter()
        .any(|selector| matches!(target.closest(selector), Ok(Some(_))))
}

#[wasm_bindgen]
pub struct StarBursts {
    _listener: Listener<MouseEvent>,
}

#[wasm_bindgen]
impl StarBursts {
    /// Starts spawning bursts on every document click until dropped.
    pub fn install() -> Result<StarBursts, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        let target = document.clone();

        let listener = Listener::new(&target, "click", move |event: MouseEvent| {
            if is_ignored(&event) {
                return;
            }
            let origin = [event.client_x() as f64, event.client_y() as f64];
            for star in plan_burst(&mut rand::thread_rng(), origin).iter() {
                if let Err(e) = spawn_star(&window, &document, star) {
                    web_sys::console::error_1(&e);
                    break;
                }
            }
        })?;
        Ok(StarBursts {
            _listener: listener,
        })
    }
}
