// Card parallax: cards in the visible section lean slightly toward the
// pointer, more so the closer the pointer is to them vertically.

use crate::utils::Listener;
use vecmath::Vector2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, MouseEvent, Window};

pub const PARALLAX_REACH: f64 = 300.0;
pub const MAX_SHIFT: f64 = 3.0;

const SECTION_SELECTOR: &str = ".active-section";
const CARD_SELECTOR: &str = ".content-card, .book-card, .ai-card, .case-card";

/// Returns the `(translateX, translateY)` shift for a card, or `None` when
/// the pointer is `PARALLAX_REACH` or more away from the card's middle.
pub fn parallax_offset(
    pointer: Vector2<f64>,
    viewport: Vector2<f64>,
    card_center_y: f64,
) -> Option<Vector2<f64>> {
    let distance = (pointer[1] - card_center_y).abs();
    if distance >= PARALLAX_REACH {
        return None;
    }
    // -1..1 across the viewport, 0 in the middle
    let nx = (pointer[0] / viewport[0] - 0.5) * 2.0;
    let ny = (pointer[1] / viewport[1] - 0.5) * 2.0;
    let intensity = (PARALLAX_REACH - distance) / PARALLAX_REACH * MAX_SHIFT;
    Some([intensity * nx, -intensity * ny])
}

fn tilt_cards(window: &Window, document: &Document, event: &MouseEvent) -> Result<(), JsValue> {
    let section = match document.query_selector(SECTION_SELECTOR)? {
        Some(section) => section,
        None => return Ok(()),
    };
    let viewport = [
        window.inner_width()?.as_f64().unwrap_or(1.0),
        window.inner_height()?.as_f64().unwrap_or(1.0),
    ];
    let pointer = [event.client_x() as f64, event.client_y() as f64];

    let cards = section.query_selector_all(CARD_SELECTOR)?;
    for i in 0..cards.length() {
        let card = match cards.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
            Some(card) => card,
            None => continue,
        };
        let rect = card.get_bounding_client_rect();
        let center_y = rect.top() + rect.height() / 2.0;
        if let Some(offset) = parallax_offset(pointer, viewport, center_y) {
            let style = card.style();
            // Cards already carrying a translate keep it
            let current = style.get_property_value("transform")?;
            if !current.contains("translateY") && !current.contains("translateX") {
                style.set_property(
                    "transform",
                    &format!("translateY({}px) translateX({}px)", offset[1], offset[0]),
                )?;
            }
        }
    }
    Ok(())
}

#[wasm_bindgen]
pub struct Parallax {
    _listener: Listener<MouseEvent>,
}

#[wasm_bindgen]
impl Parallax {
    pub fn install() -> Result<Parallax, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        let target = document.clone();
        let listener = Listener::new(&target, "mousemove", move |event: MouseEvent| {
            if let Err(e) = tilt_cards(&window, &document, &event) {
                web_sys::console::error_1(&e);
            }
        })?;
        Ok(Parallax {
            _listener: listener,
        })
    }
}
