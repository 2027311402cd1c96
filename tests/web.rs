//! Test suite for the Web and headless browsers.

#![cfg(target_arch = "wasm32")]

extern crate wasm_bindgen_test;
use particle_field::chat::respond;
use particle_field::{
    CanvasSurface, ChatWidget, Color, FieldConfig, PageEffects, Parallax, ParticleBackground,
    PointerTracker, StarBursts, Surface,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{
    Document, Event, HtmlCanvasElement, HtmlElement, HtmlInputElement, KeyboardEvent,
    KeyboardEventInit, MouseEvent, MouseEventInit,
};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn add_element<T: JsCast>(tag: &str, id: &str) -> T {
    let el = document().create_element(tag).unwrap();
    el.set_id(id);
    document().body().unwrap().append_child(&el).unwrap();
    el.dyn_into::<T>().unwrap()
}

async fn next_animation_frame() {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .request_animation_frame(&resolve)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn add_canvas(id: &str) -> HtmlCanvasElement {
    let canvas = document()
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    canvas.set_id(id);
    document().body().unwrap().append_child(&canvas).unwrap();
    canvas
}

#[wasm_bindgen_test]
fn missing_canvas_disables_the_field() {
    let background = ParticleBackground::mount("no-such-canvas", FieldConfig::default()).unwrap();
    assert!(background.is_none());
    assert!(ParticleBackground::attach("no-such-canvas").unwrap().is_null());
}

#[wasm_bindgen_test]
fn non_canvas_element_disables_the_field() {
    let div = document().create_element("div").unwrap();
    div.set_id("not-a-canvas");
    document().body().unwrap().append_child(&div).unwrap();
    let background = ParticleBackground::mount("not-a-canvas", FieldConfig::default()).unwrap();
    assert!(background.is_none());
}

#[wasm_bindgen_test]
fn background_starts_and_stops() {
    let canvas = add_canvas("field-lifecycle");
    let mut background = ParticleBackground::mount("field-lifecycle", FieldConfig::default())
        .unwrap()
        .unwrap();
    let window = web_sys::window().unwrap();
    assert_eq!(canvas.width() as f64, window.inner_width().unwrap().as_f64().unwrap());
    assert_eq!(background.particle_count(), 100);
    assert!(!background.is_running());

    background.start().unwrap();
    assert!(background.is_running());

    background.stop();
    assert!(!background.is_running());
    assert!(background.start().is_err());
}

#[wasm_bindgen_test]
fn config_sets_pool_size() {
    add_canvas("field-config");
    let mut config = FieldConfig::new();
    config.set_particle_count(12);
    let background = ParticleBackground::mount("field-config", config).unwrap().unwrap();
    assert_eq!(background.particle_count(), 12);
}

#[wasm_bindgen_test]
fn invalid_config_is_an_error() {
    add_canvas("field-bad-config");
    let mut config = FieldConfig::new();
    config.set_link_distance(-1.0);
    assert!(ParticleBackground::mount("field-bad-config", config).is_err());
}

#[wasm_bindgen_test]
fn canvas_surface_draws_and_resizes() {
    let canvas = add_canvas("surface-draw");
    let mut surface = CanvasSurface::from_canvas(canvas.clone()).unwrap().unwrap();
    surface.resize(400.0, 300.0);
    assert_eq!((canvas.width(), canvas.height()), (400, 300));
    assert_eq!((surface.width(), surface.height()), (400.0, 300.0));

    surface.clear();
    surface.draw_filled_circle(10.0, 10.0, 2.0, Color::TEAL, 0.5);
    surface.draw_line([0.0, 0.0], [100.0, 0.0], Color::ORANGE, 0.05, 0.5);
}

#[wasm_bindgen_test]
fn click_spawns_a_burst_of_stars() {
    let _bursts = StarBursts::install().unwrap();
    let before = document().query_selector_all(".star-particle").unwrap().length();
    document().body().unwrap().click();
    let after = document().query_selector_all(".star-particle").unwrap().length();
    assert_eq!(after - before, 8);
}

#[wasm_bindgen_test]
fn clicks_on_the_chat_widget_are_ignored() {
    let _bursts = StarBursts::install().unwrap();
    let chat = document()
        .create_element("div")
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    chat.set_class_name("ai-chat-container");
    document().body().unwrap().append_child(&chat).unwrap();

    let before = document().query_selector_all(".star-particle").unwrap().length();
    chat.click();
    let after = document().query_selector_all(".star-particle").unwrap().length();
    assert_eq!(after, before);
}

#[wasm_bindgen_test]
fn parallax_installs() {
    assert!(Parallax::install().is_ok());
}

#[wasm_bindgen_test]
async fn running_background_draws_every_frame() {
    add_canvas("field-frames");
    let mut background = ParticleBackground::mount("field-frames", FieldConfig::default())
        .unwrap()
        .unwrap();
    assert_eq!(background.frame_count(), 0);

    background.start().unwrap();
    next_animation_frame().await;
    next_animation_frame().await;
    let drawn = background.frame_count();
    assert!(drawn >= 2, "only {} frames drawn", drawn);
    assert!(background.is_running());

    background.stop();
    next_animation_frame().await;
    next_animation_frame().await;
    assert_eq!(background.frame_count(), drawn);
}

#[wasm_bindgen_test]
fn window_resize_resizes_the_canvas() {
    let canvas = add_canvas("field-resize");
    let _background = ParticleBackground::mount("field-resize", FieldConfig::default())
        .unwrap()
        .unwrap();
    canvas.set_width(1);
    canvas.set_height(1);

    let window = web_sys::window().unwrap();
    window.dispatch_event(&Event::new("resize").unwrap()).unwrap();

    assert_eq!(canvas.width() as f64, window.inner_width().unwrap().as_f64().unwrap());
    assert_eq!(canvas.height() as f64, window.inner_height().unwrap().as_f64().unwrap());
}

#[wasm_bindgen_test]
fn cursor_glow_follows_the_pointer() {
    let glow = document()
        .create_element("div")
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    glow.set_class_name("cursor-light");
    document().body().unwrap().append_child(&glow).unwrap();

    let window = web_sys::window().unwrap();
    let (_tracker, pointer) = PointerTracker::install(&window, &document()).unwrap();
    let mut init = MouseEventInit::new();
    init.client_x(42).client_y(24);
    let event = MouseEvent::new_with_mouse_event_init_dict("mousemove", &init).unwrap();
    document().dispatch_event(&event).unwrap();

    assert_eq!(pointer.get(), [42.0, 24.0]);
    assert_eq!(glow.style().get_property_value("left").unwrap(), "42px");
    assert_eq!(glow.style().get_property_value("top").unwrap(), "24px");
    glow.remove();
}

#[wasm_bindgen_test]
async fn chat_widget_answers_questions() {
    assert!(ChatWidget::install().unwrap().is_null());

    let button: HtmlElement = add_element("button", "aiAssistantBtn");
    let container: HtmlElement = add_element("div", "aiChatContainer");
    let close: HtmlElement = add_element("button", "chatClose");
    let input: HtmlInputElement = add_element("input", "chatInput");
    let send: HtmlElement = add_element("button", "chatSend");
    let messages: HtmlElement = add_element("div", "chatMessages");
    let widget = ChatWidget::mount().unwrap().unwrap();

    button.click();
    assert!(container.class_list().contains("active"));
    close.click();
    assert!(!container.class_list().contains("active"));

    input.set_value("   ");
    send.click();
    assert_eq!(widget.message_count(), 0);

    input.set_value("  HELLO ");
    send.click();
    assert_eq!(widget.message_count(), 1);
    assert_eq!(input.value(), "");
    let asked = messages.last_element_child().unwrap();
    assert_eq!(asked.class_name(), "chat-message user-message");
    assert_eq!(asked.text_content().unwrap(), "HELLO");

    sleep(1100).await;
    assert_eq!(widget.message_count(), 2);
    let answer = messages.last_element_child().unwrap();
    assert_eq!(answer.class_name(), "chat-message ai-message");
    let typed = answer.query_selector(".message-content p").unwrap().unwrap();
    assert!(respond("hello").starts_with(&typed.text_content().unwrap()));

    input.set_value("自适应控制");
    let mut init = KeyboardEventInit::new();
    init.key("Enter");
    let enter = KeyboardEvent::new_with_keyboard_event_init_dict("keypress", &init).unwrap();
    input.dispatch_event(&enter).unwrap();
    assert_eq!(widget.message_count(), 3);

    drop(widget);
    for el in [&button, &container, &close, &send, &messages].iter() {
        el.remove();
    }
    input.remove();
}

#[wasm_bindgen_test]
fn page_effects_start_the_background() {
    add_canvas("effects-canvas");
    let mut effects = PageEffects::install("effects-canvas").unwrap();
    assert!(effects.has_background());
    assert!(effects.is_running());
    effects.stop();
    assert!(!effects.is_running());

    let effects = PageEffects::install("no-such-canvas").unwrap();
    assert!(!effects.has_background());
    assert!(!effects.is_running());
}
