// The assistant chat panel: canned keyword replies typed out one character
// at a time. No network, the replies are a fixed table.

use crate::utils::Listener;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, KeyboardEvent, MouseEvent, Window};

pub const REPLY_DELAY_MS: i32 = 1000;
pub const TYPE_INTERVAL_MS: i32 = 30;

const AVATAR: &str = "\u{1F916}";

// First match wins, so "自适应控制" gets the control answer
const REPLIES: [(&[&str], &str); 7] = [
    (
        &["动力学", "建模"],
        "电动汽车动力学建模是智能控制的基础。主要包括纵向动力学、横向动力学和垂向动力学模型。纵向动力学关注车辆的加速和制动，横向动力学涉及转向和稳定性，垂向动力学则研究悬架系统。这些模型为后续的控制器设计提供了精确的数学描述。",
    ),
    (
        &["控制", "控制器"],
        "智能控制理论融合了经典控制、现代控制和人工智能技术。主要包括PID控制、状态反馈控制、自适应控制、鲁棒控制以及基于模糊逻辑、神经网络和强化学习的智能控制方法。这些方法能够应对电动汽车系统的非线性和不确定性。",
    ),
    (
        &["状态估计", "观测器"],
        "状态估计与观测器设计用于实时估计无法直接测量的车辆状态，如质心侧偏角、轮胎力等。常用的方法包括卡尔曼滤波、扩展卡尔曼滤波、无迹卡尔曼滤波以及滑模观测器等。准确的状态估计是高性能控制的前提。",
    ),
    (
        &["自适应"],
        "自适应控制能够根据系统参数的变化自动调整控制器参数，保持系统性能。主要包括模型参考自适应控制和自校正控制。在电动汽车中，自适应控制可以应对电池老化、路面变化等不确定性因素。",
    ),
    (
        &["鲁棒", "稳定性"],
        "鲁棒控制设计在系统存在不确定性和外部干扰的情况下，仍能保证系统的稳定性和性能。常用的方法包括H∞控制、μ分析和滑模控制。这对于电动汽车在复杂工况下的稳定运行至关重要。",
    ),
    (
        &["神经网络", "模糊", "强化学习"],
        "智能算法在电动汽车控制中发挥着越来越重要的作用。模糊控制擅长处理不确定性，神经网络具有强大的学习和逼近能力，强化学习则能够通过与环境交互优化控制策略。这些方法为电动汽车的智能化提供了新的途径。",
    ),
    (
        &["你好", "hello", "介绍"],
        "您好！我是AI智能助手，专门为您解答《电动汽车智能控制理论与方法》的相关问题。我可以帮助您理解教材中的核心概念，包括动力学建模、控制理论、状态估计等内容。请随时提问！",
    ),
];

pub const FALLBACK: &str = "感谢您的提问！关于《电动汽车智能控制理论与方法》，我可以为您解答以下方面的问题：\n\n1. 电动汽车动力学建模\n2. 智能控制理论\n3. 状态估计与观测器\n4. 自适应控制\n5. 鲁棒控制\n6. 智能算法（模糊、神经网络、强化学习）\n\n请告诉我您想了解哪个方面？";

/// Picks the canned reply for a message. Keywords match case-insensitively
/// anywhere in the message, in table order.
pub fn respond(message: &str) -> &'static str {
    let message = message.to_lowercase();
    REPLIES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| message.contains(*k)))
        .map(|&(_, reply)| reply)
        .unwrap_or(FALLBACK)
}

/// Trimmed message text, or `None` when there is nothing to send.
pub fn prepare_message(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Reveals a reply one character per tick.
pub struct Typewriter {
    chars: Vec<char>,
    shown: usize,
}

impl Typewriter {
    pub fn new(text: &str) -> Typewriter {
        Typewriter {
            chars: text.chars().collect(),
            shown: 0,
        }
    }

    pub fn tick(&mut self) -> Option<char> {
        let next = self.chars.get(self.shown).copied();
        if next.is_some() {
            self.shown += 1;
        }
        next
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.chars.len()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Sender {
    User,
    Assistant,
}

impl Sender {
    fn class_name(self) -> &'static str {
        match self {
            Sender::User => "chat-message user-message",
            Sender::Assistant => "chat-message ai-message",
        }
    }
}

// One reply being typed out. The interval clears itself once the text is
// done; the entry is dropped on the next reply or with the widget.
struct Typing {
    handle: Rc<Cell<i32>>,
    typewriter: Rc<RefCell<Typewriter>>,
    _tick: Closure<dyn FnMut()>,
}

struct Chat {
    window: Window,
    document: Document,
    container: Element,
    input: HtmlInputElement,
    messages: Element,
    typing: RefCell<Vec<Typing>>,
}

impl Chat {
    fn open(&self) -> Result<(), JsValue> {
        self.container.class_list().add_1("active")?;
        self.input.focus()
    }

    fn close(&self) -> Result<(), JsValue> {
        self.container.class_list().remove_1("active")
    }

    fn send(chat: &Rc<Chat>) -> Result<(), JsValue> {
        let text = match prepare_message(&chat.input.value()) {
            Some(text) => text,
            None => return Ok(()),
        };
        chat.append(Sender::User)?.set_text_content(Some(&text));
        chat.input.set_value("");

        let weak = Rc::downgrade(chat);
        let reply = Closure::once_into_js(move || {
            if let Some(chat) = weak.upgrade() {
                if let Err(e) = chat.reply(&text) {
                    web_sys::console::error_1(&e);
                }
            }
        });
        chat.window.set_timeout_with_callback_and_timeout_and_arguments_0(
            reply.unchecked_ref::<js_sys::Function>(),
            REPLY_DELAY_MS,
        )?;
        Ok(())
    }

    fn reply(&self, question: &str) -> Result<(), JsValue> {
        let paragraph = self.append(Sender::Assistant)?;
        let typewriter = Rc::new(RefCell::new(Typewriter::new(respond(question))));
        let handle = Rc::new(Cell::new(0));

        let tick = {
            let window = self.window.clone();
            let messages = self.messages.clone();
            let typewriter = typewriter.clone();
            let handle = handle.clone();
            Closure::wrap(Box::new(move || match typewriter.borrow_mut().tick() {
                Some(c) => {
                    let mut text = paragraph.text_content().unwrap_or_default();
                    text.push(c);
                    paragraph.set_text_content(Some(&text));
                    messages.set_scroll_top(messages.scroll_height());
                }
                None => window.clear_interval_with_handle(handle.get()),
            }) as Box<dyn FnMut()>)
        };
        handle.set(
            self.window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    tick.as_ref().unchecked_ref(),
                    TYPE_INTERVAL_MS,
                )?,
        );

        let mut typing = self.typing.borrow_mut();
        typing.retain(|t| !t.typewriter.borrow().is_done());
        typing.push(Typing {
            handle,
            typewriter,
            _tick: tick,
        });
        Ok(())
    }

    // Adds an empty message bubble and returns its text paragraph
    fn append(&self, sender: Sender) -> Result<Element, JsValue> {
        let message = self.document.create_element("div")?;
        message.set_class_name(sender.class_name());
        if sender == Sender::Assistant {
            let avatar = self.document.create_element("div")?;
            avatar.set_class_name("message-avatar");
            avatar.set_text_content(Some(AVATAR));
            message.append_child(&avatar)?;
        }
        let content = self.document.create_element("div")?;
        content.set_class_name("message-content");
        let paragraph = self.document.create_element("p")?;
        content.append_child(&paragraph)?;
        message.append_child(&content)?;

        self.messages.append_child(&message)?;
        self.messages.set_scroll_top(self.messages.scroll_height());
        Ok(paragraph)
    }
}

fn report(result: Result<(), JsValue>) {
    if let Err(e) = result {
        web_sys::console::error_1(&e);
    }
}

#[wasm_bindgen]
pub struct ChatWidget {
    chat: Rc<Chat>,
    _clicks: Vec<Listener<MouseEvent>>,
    _enter: Listener<KeyboardEvent>,
}

#[wasm_bindgen]
impl ChatWidget {
    /// Wires up the chat panel. Returns `null` when the page has no
    /// assistant button, panel, input or message list.
    pub fn install() -> Result<JsValue, JsValue> {
        Ok(match ChatWidget::mount()? {
            Some(widget) => widget.into(),
            None => JsValue::NULL,
        })
    }
}

impl ChatWidget {
    pub fn mount() -> Result<Option<ChatWidget>, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;

        let button = document.get_element_by_id("aiAssistantBtn");
        let container = document.get_element_by_id("aiChatContainer");
        let input = document
            .get_element_by_id("chatInput")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        let messages = document.get_element_by_id("chatMessages");
        let (button, container, input, messages) = match (button, container, input, messages) {
            (Some(b), Some(c), Some(i), Some(m)) => (b, c, i, m),
            _ => {
                console_log!("no chat panel, assistant disabled");
                return Ok(None);
            }
        };
        let send_button = document.get_element_by_id("chatSend");
        let close_button = document.get_element_by_id("chatClose");

        let chat = Rc::new(Chat {
            window,
            document,
            container,
            input,
            messages,
            typing: RefCell::new(Vec::new()),
        });

        let mut clicks = Vec::new();
        let c = chat.clone();
        clicks.push(Listener::new(&button, "click", move |_: MouseEvent| report(c.open()))?);
        if let Some(close_button) = close_button {
            let c = chat.clone();
            clicks.push(Listener::new(&close_button, "click", move |_: MouseEvent| report(c.close()))?);
        }
        if let Some(send_button) = send_button {
            let c = chat.clone();
            clicks.push(Listener::new(&send_button, "click", move |_: MouseEvent| {
                report(Chat::send(&c))
            })?);
        }
        let c = chat.clone();
        let enter = Listener::new(&chat.input, "keypress", move |event: KeyboardEvent| {
            if event.key() == "Enter" {
                report(Chat::send(&c));
            }
        })?;

        Ok(Some(ChatWidget {
            chat,
            _clicks: clicks,
            _enter: enter,
        }))
    }

    pub fn message_count(&self) -> u32 {
        self.chat.messages.child_element_count()
    }
}

impl Drop for ChatWidget {
    fn drop(&mut self) {
        for typing in self.chat.typing.borrow_mut().drain(..) {
            self.chat.window.clear_interval_with_handle(typing.handle.get());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_for(keyword: &'static str) -> &'static str {
        REPLIES
            .iter()
            .find(|(keywords, _)| keywords.contains(&keyword))
            .map(|&(_, reply)| reply)
            .unwrap()
    }

    #[test]
    fn earlier_entries_win() {
        assert_eq!(respond("什么是自适应控制？"), reply_for("控制"));
        assert_eq!(respond("自适应"), reply_for("自适应"));
        assert_eq!(respond("动力学控制"), reply_for("动力学"));
    }

    #[test]
    fn keywords_ignore_case() {
        assert_eq!(respond("HELLO there"), reply_for("hello"));
        assert_eq!(respond("Hello"), reply_for("你好"));
    }

    #[test]
    fn unknown_questions_get_the_menu() {
        assert_eq!(respond("what is a battery?"), FALLBACK);
        assert_eq!(respond(""), FALLBACK);
        assert!(FALLBACK.contains("\n\n1. 电动汽车动力学建模"));
    }

    #[test]
    fn blank_messages_are_not_sent() {
        assert_eq!(prepare_message("   \n"), None);
        assert_eq!(prepare_message(""), None);
        assert_eq!(prepare_message("  鲁棒 "), Some("鲁棒".to_owned()));
    }

    #[test]
    fn typewriter_reveals_characters_in_order() {
        let mut typewriter = Typewriter::new("H∞控制");
        let typed: String = std::iter::from_fn(|| typewriter.tick()).collect();
        assert_eq!(typed, "H∞控制");
        assert!(typewriter.is_done());
        assert_eq!(typewriter.tick(), None);
    }

    #[test]
    fn empty_typewriter_is_done_immediately() {
        let mut typewriter = Typewriter::new("");
        assert!(typewriter.is_done());
        assert_eq!(typewriter.tick(), None);
    }
}
