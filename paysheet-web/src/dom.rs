//! Browser DOM surface for the sheet.
//!
//! [`SheetDom::build`] creates the markup once; [`DomHost`] implements
//! [`SheetHost`] on top of it and owns every listener the sheet needs. Input
//! listeners reach the sheet through a weak reference, so the DOM never keeps
//! a destroyed widget alive.

use crate::listeners::ListenerSet;
use crate::utils;
use paysheet_lib::gesture::{DragFrame, DragOrigin};
use paysheet_lib::{MethodDisplay, PaymentSheet, SheetHost};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, PointerEvent};

/// The shared, mutable sheet behind a widget.
pub type SheetCell = RefCell<PaymentSheet<DomHost>>;
/// Non-owning handle used by DOM listeners.
pub type SheetRef = Weak<SheetCell>;

const STYLE_ID: &str = "paysheet-styles";

const STYLES: &str = r#"
.paysheet-root{position:fixed;inset:0;z-index:1000;visibility:hidden;pointer-events:none;transition:visibility 0s linear .3s}
.paysheet-root.show{visibility:visible;pointer-events:auto;transition-delay:0s}
.paysheet-overlay{position:absolute;inset:0;background:rgba(0,0,0,.5);opacity:0;transition:opacity .3s ease}
.paysheet-root.show .paysheet-overlay{opacity:1}
.paysheet-panel{position:absolute;left:0;right:0;bottom:0;max-height:85vh;display:flex;flex-direction:column;background:#fff;border-radius:16px 16px 0 0;transform:translateY(100%);transition:transform .3s ease;touch-action:none}
.paysheet-root.show .paysheet-panel{transform:translateY(0)}
.paysheet-handle{width:36px;height:5px;margin:8px auto;border-radius:3px;background:#d0d0d0}
.paysheet-root.swipe-disabled .paysheet-handle{display:none}
.paysheet-header{position:relative;display:flex;align-items:center;justify-content:center;padding:8px 16px;font-weight:600}
.paysheet-close{position:absolute;right:12px;border:0;background:none;font-size:20px;cursor:pointer}
.paysheet-amount{text-align:center;font-size:32px;font-weight:700;padding:12px 0}
.paysheet-methods{list-style:none;margin:0;padding:0 16px;overflow-y:auto;flex:1;touch-action:pan-y}
.paysheet-method{display:flex;align-items:center;gap:12px;padding:12px 0;border-bottom:1px solid #f0f0f0;cursor:pointer}
.paysheet-method-icon{width:32px;font-size:24px;text-align:center}
.paysheet-method-icon img{width:28px;height:28px}
.paysheet-method-text{flex:1;display:flex;flex-direction:column}
.paysheet-method-subtitle{font-size:12px;color:#999}
.paysheet-method-check{width:18px;height:18px;border-radius:50%;border:1px solid #ccc}
.paysheet-method.selected .paysheet-method-check{background:#07c160;border-color:#07c160}
.paysheet-actions{display:flex;gap:12px;padding:16px}
.paysheet-actions button{flex:1;padding:12px;border:0;border-radius:8px;font-size:16px}
.paysheet-confirm{background:#07c160;color:#fff}
.paysheet-password{display:none;padding:16px}
.paysheet-panel.password-mode .paysheet-password{display:block}
.paysheet-panel.password-mode .paysheet-actions{display:none}
.paysheet-dots{display:flex;justify-content:center;gap:10px;margin-bottom:16px}
.paysheet-dot{width:12px;height:12px;border-radius:50%;border:1px solid #999}
.paysheet-dot.filled{background:#333;border-color:#333}
.paysheet-keypad{display:grid;grid-template-columns:repeat(3,1fr);gap:8px}
.paysheet-keypad button{padding:14px;border:0;border-radius:8px;background:#f5f5f5;font-size:20px}
"#;

/// Keypad layout, row by row. The blank key is a spacer.
const KEYPAD_KEYS: [&str; 12] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "", "0", "del"];

/// Press zones that never start a drag, checked before the draggable ones.
const ORIGIN_ZONES: [(&str, DragOrigin); 6] = [
    (".paysheet-close", DragOrigin::CloseButton),
    (".paysheet-keypad", DragOrigin::Keypad),
    (".paysheet-actions", DragOrigin::Actions),
    (".paysheet-methods", DragOrigin::Content),
    (".paysheet-handle", DragOrigin::Handle),
    (".paysheet-header", DragOrigin::Header),
];

/// Map the element under a press to the sheet zone it belongs to.
pub fn classify_origin(target: &Element) -> DragOrigin {
    ORIGIN_ZONES
        .iter()
        .find(|(selector, _)| matches!(target.closest(selector), Ok(Some(_))))
        .map(|(_, origin)| *origin)
        .unwrap_or(DragOrigin::Surface)
}

/// Run `f` on the sheet unless it is already borrowed further up the stack.
pub(crate) fn with_sheet<R>(sheet: &SheetCell, f: impl FnOnce(&mut PaymentSheet<DomHost>) -> R) -> Option<R> {
    match sheet.try_borrow_mut() {
        Ok(mut guard) => Some(f(&mut guard)),
        Err(_) => {
            utils::warn("paysheet: call ignored while the sheet is busy");
            None
        }
    }
}

fn with_weak<R>(sheet: &SheetRef, f: impl FnOnce(&mut PaymentSheet<DomHost>) -> R) -> Option<R> {
    let strong = sheet.upgrade()?;
    let result = with_sheet(&strong, f);
    result
}

fn create(document: &Document, tag: &str, class: &str) -> Result<HtmlElement, JsValue> {
    let element = document
        .create_element(tag)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| utils::js_error(&format!("<{}> is not an HTML element", tag)))?;
    element.set_class_name(class);
    Ok(element)
}

fn create_button(document: &Document, class: &str, label: &str) -> Result<HtmlElement, JsValue> {
    let button = create(document, "button", class)?;
    button.set_attribute("type", "button")?;
    button.set_text_content(Some(label));
    Ok(button)
}

fn install_styles(document: &Document) -> Result<(), JsValue> {
    if document.get_element_by_id(STYLE_ID).is_some() {
        return Ok(());
    }
    let style = document.create_element("style")?;
    style.set_id(STYLE_ID);
    style.set_text_content(Some(STYLES));
    match document.head() {
        Some(head) => head.append_child(&style)?,
        None => document
            .document_element()
            .ok_or_else(|| utils::js_error("Document has no root element"))?
            .append_child(&style)?,
    };
    Ok(())
}

/// `attr` of the nearest element matching `selector`, starting at the event target.
fn closest_attribute(event: &Event, selector: &str, attr: &str) -> Option<String> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()?
        .closest(selector)
        .ok()??
        .get_attribute(attr)
}

fn looks_like_url(icon: &str) -> bool {
    ["http://", "https://", "data:", "/", "./"]
        .iter()
        .any(|prefix| icon.starts_with(prefix))
}

/// Elements of one mounted sheet.
#[derive(Clone, Debug)]
pub struct SheetDom {
    pub root: HtmlElement,
    pub overlay: HtmlElement,
    pub panel: HtmlElement,
    pub title: HtmlElement,
    pub close_button: HtmlElement,
    pub amount: HtmlElement,
    pub methods: HtmlElement,
    pub cancel_button: HtmlElement,
    pub confirm_button: HtmlElement,
    pub dots: HtmlElement,
    pub keypad: HtmlElement,
}

impl SheetDom {
    /// Create the sheet markup and append it to `container`.
    pub fn build(document: &Document, container: &Element) -> Result<Self, JsValue> {
        install_styles(document)?;

        let root = create(document, "div", "paysheet-root")?;
        root.set_attribute("aria-hidden", "true")?;
        let overlay = create(document, "div", "paysheet-overlay")?;
        let panel = create(document, "div", "paysheet-panel")?;
        panel.set_attribute("role", "dialog")?;
        panel.set_attribute("aria-modal", "true")?;

        let handle = create(document, "div", "paysheet-handle")?;

        let header = create(document, "div", "paysheet-header")?;
        let title = create(document, "span", "paysheet-title")?;
        let close_button = create_button(document, "paysheet-close", "×")?;
        close_button.set_attribute("aria-label", "Close")?;
        header.append_child(&title)?;
        header.append_child(&close_button)?;

        let amount_row = create(document, "div", "paysheet-amount")?;
        let currency = create(document, "span", "paysheet-currency")?;
        currency.set_text_content(Some("¥"));
        let amount = create(document, "span", "paysheet-amount-value")?;
        amount_row.append_child(&currency)?;
        amount_row.append_child(&amount)?;

        let methods = create(document, "ul", "paysheet-methods")?;
        methods.set_attribute("role", "listbox")?;

        let actions = create(document, "div", "paysheet-actions")?;
        let cancel_button = create_button(document, "paysheet-cancel", "取消")?;
        let confirm_button = create_button(document, "paysheet-confirm", "确认支付")?;
        actions.append_child(&cancel_button)?;
        actions.append_child(&confirm_button)?;

        let password = create(document, "div", "paysheet-password")?;
        let dots = create(document, "div", "paysheet-dots")?;
        let keypad = create(document, "div", "paysheet-keypad")?;
        for key in KEYPAD_KEYS {
            let label = if key == "del" { "⌫" } else { key };
            let button = create_button(document, "paysheet-key", label)?;
            if key.is_empty() {
                button.set_attribute("disabled", "")?;
            } else {
                button.set_attribute("data-key", key)?;
            }
            keypad.append_child(&button)?;
        }
        password.append_child(&dots)?;
        password.append_child(&keypad)?;

        for child in [&handle, &header, &amount_row, &methods, &actions, &password] {
            panel.append_child(child)?;
        }
        root.append_child(&overlay)?;
        root.append_child(&panel)?;
        container.append_child(&root)?;

        Ok(Self {
            root,
            overlay,
            panel,
            title,
            close_button,
            amount,
            methods,
            cancel_button,
            confirm_button,
            dots,
            keypad,
        })
    }
}

/// [`SheetHost`] backed by the browser DOM.
pub struct DomHost {
    document: Document,
    dom: SheetDom,
    body: Option<HtmlElement>,
    sheet: SheetRef,
    controls: ListenerSet,
    swipe: ListenerSet,
    overlay_click: ListenerSet,
    saved_overflow: Option<String>,
    show_generation: Rc<Cell<u32>>,
    mounted: bool,
}

impl DomHost {
    /// Wrap built markup. Button, list and keypad listeners are bound at once;
    /// drag and backdrop listeners follow the sheet's configuration.
    pub fn new(document: Document, dom: SheetDom, sheet: SheetRef) -> Self {
        let body = document.body();
        let mut host = Self {
            document,
            dom,
            body,
            sheet,
            controls: ListenerSet::new(),
            swipe: ListenerSet::new(),
            overlay_click: ListenerSet::new(),
            saved_overflow: None,
            show_generation: Rc::new(Cell::new(0)),
            mounted: true,
        };
        host.bind_controls();
        host
    }

    pub fn root(&self) -> &HtmlElement {
        &self.dom.root
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Number of attached drag listeners.
    pub fn swipe_listener_count(&self) -> usize {
        self.swipe.len()
    }

    /// Number of attached backdrop listeners; at most one.
    pub fn overlay_listener_count(&self) -> usize {
        self.overlay_click.len()
    }

    /// Detach every listener and remove the markup.
    pub fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.controls.detach_all();
        self.swipe.detach_all();
        self.overlay_click.detach_all();
        self.unlock_scroll();
        self.dom.root.remove();
        self.mounted = false;
    }

    fn bind_controls(&mut self) {
        let sheet = self.sheet.clone();
        self.controls.attach(
            &self.dom.close_button,
            "click",
            ListenerSet::callback(move |_| {
                with_weak(&sheet, |s| s.cancel());
            }),
        );

        let sheet = self.sheet.clone();
        self.controls.attach(
            &self.dom.cancel_button,
            "click",
            ListenerSet::callback(move |_| {
                with_weak(&sheet, |s| s.cancel());
            }),
        );

        let sheet = self.sheet.clone();
        self.controls.attach(
            &self.dom.confirm_button,
            "click",
            ListenerSet::callback(move |_| {
                with_weak(&sheet, |s| s.confirm());
            }),
        );

        let sheet = self.sheet.clone();
        self.controls.attach(
            &self.dom.methods,
            "click",
            ListenerSet::callback(move |event: Event| {
                let index = closest_attribute(&event, "[data-index]", "data-index")
                    .and_then(|value| value.parse::<usize>().ok());
                if let Some(index) = index {
                    with_weak(&sheet, |s| s.select_method(index));
                }
            }),
        );

        let sheet = self.sheet.clone();
        self.controls.attach(
            &self.dom.keypad,
            "click",
            ListenerSet::callback(move |event: Event| {
                let Some(key) = closest_attribute(&event, "[data-key]", "data-key") else {
                    return;
                };
                with_weak(&sheet, |s| {
                    if key == "del" {
                        s.press_delete();
                    } else if let Some(digit) = key.chars().next() {
                        s.press_digit(digit);
                    }
                });
            }),
        );
    }

    fn bind_swipe(&mut self) {
        let sheet = self.sheet.clone();
        let panel = self.dom.panel.clone();
        self.swipe.attach(
            &self.dom.panel,
            "pointerdown",
            ListenerSet::callback(move |event: Event| {
                let Some(pointer) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                if !pointer.is_primary() {
                    return;
                }
                let origin = event
                    .target()
                    .and_then(|target| target.dyn_into::<Element>().ok())
                    .map(|target| classify_origin(&target))
                    .unwrap_or(DragOrigin::Surface);
                let y = pointer.client_y() as f64;
                let captured = with_weak(&sheet, |s| s.pointer_down(origin, y, event.time_stamp()))
                    .unwrap_or(false);
                if !captured {
                    return;
                }
                if let Err(err) = panel.set_pointer_capture(pointer.pointer_id()) {
                    utils::warn(&format!("paysheet: pointer capture failed: {:?}", err));
                    with_weak(&sheet, |s| s.pointer_cancel());
                    return;
                }
                event.prevent_default();
            }),
        );

        let sheet = self.sheet.clone();
        self.swipe.attach(
            &self.dom.panel,
            "pointermove",
            ListenerSet::callback(move |event: Event| {
                let Some(pointer) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                if !pointer.is_primary() {
                    return;
                }
                let y = pointer.client_y() as f64;
                if with_weak(&sheet, |s| s.pointer_move(y, event.time_stamp())).unwrap_or(false) {
                    event.prevent_default();
                }
            }),
        );

        // a lost capture ends the track like a cancel; after a release the
        // track is already gone and it is a no-op
        for name in ["pointerup", "pointercancel", "lostpointercapture"] {
            let sheet = self.sheet.clone();
            let panel = self.dom.panel.clone();
            self.swipe.attach(
                &self.dom.panel,
                name,
                ListenerSet::callback(move |event: Event| {
                    let Some(pointer) = event.dyn_ref::<PointerEvent>() else {
                        return;
                    };
                    if !pointer.is_primary() {
                        return;
                    }
                    if name != "lostpointercapture" {
                        let _ = panel.release_pointer_capture(pointer.pointer_id());
                    }
                    with_weak(&sheet, |s| {
                        if name == "pointerup" {
                            s.pointer_up()
                        } else {
                            s.pointer_cancel()
                        }
                    });
                }),
            );
        }
    }

    fn bind_overlay(&mut self) {
        let sheet = self.sheet.clone();
        self.overlay_click.attach(
            &self.dom.overlay,
            "click",
            ListenerSet::callback(move |_| {
                with_weak(&sheet, |s| s.overlay_clicked());
            }),
        );
    }

    fn populate_methods(&self, methods: &[MethodDisplay], selected: Option<usize>) -> Result<(), JsValue> {
        self.dom.methods.set_inner_html("");
        for (index, method) in methods.iter().enumerate() {
            let is_selected = selected == Some(index);
            let row = create(&self.document, "li", "paysheet-method")?;
            row.set_attribute("data-index", &index.to_string())?;
            row.set_attribute("role", "option")?;
            row.set_attribute("aria-selected", if is_selected { "true" } else { "false" })?;
            if is_selected {
                row.class_list().add_1("selected")?;
            }

            let icon = create(&self.document, "span", "paysheet-method-icon")?;
            if looks_like_url(&method.icon) {
                let image = self.document.create_element("img")?;
                image.set_attribute("src", &method.icon)?;
                image.set_attribute("alt", "")?;
                icon.append_child(&image)?;
            } else {
                icon.set_text_content(Some(&method.icon));
            }

            let text = create(&self.document, "div", "paysheet-method-text")?;
            let title = create(&self.document, "span", "paysheet-method-title")?;
            title.set_text_content(Some(&method.title));
            text.append_child(&title)?;
            if !method.subtitle.is_empty() {
                let subtitle = create(&self.document, "span", "paysheet-method-subtitle")?;
                subtitle.set_text_content(Some(&method.subtitle));
                text.append_child(&subtitle)?;
            }

            let check = create(&self.document, "span", "paysheet-method-check")?;
            row.append_child(&icon)?;
            row.append_child(&text)?;
            row.append_child(&check)?;
            self.dom.methods.append_child(&row)?;
        }
        Ok(())
    }

    fn populate_dots(&self, length: usize, filled: usize) -> Result<(), JsValue> {
        self.dom.dots.set_inner_html("");
        for index in 0..length {
            let class = if index < filled {
                "paysheet-dot filled"
            } else {
                "paysheet-dot"
            };
            let dot = create(&self.document, "span", class)?;
            self.dom.dots.append_child(&dot)?;
        }
        Ok(())
    }
}

fn warn_on_err(result: Result<(), JsValue>, action: &str) {
    if let Err(err) = result {
        utils::warn(&format!("paysheet: {} failed: {:?}", action, err));
    }
}

impl SheetHost for DomHost {
    fn panel_height(&self) -> f64 {
        self.dom.panel.offset_height() as f64
    }

    fn lock_scroll(&mut self) {
        if let Some(body) = &self.body {
            let style = body.style();
            self.saved_overflow = style.get_property_value("overflow").ok();
            warn_on_err(style.set_property("overflow", "hidden"), "scroll lock");
        }
    }

    fn unlock_scroll(&mut self) {
        let Some(body) = &self.body else {
            return;
        };
        let style = body.style();
        let result = match self.saved_overflow.take() {
            Some(previous) if !previous.is_empty() => style.set_property("overflow", &previous),
            _ => style.remove_property("overflow").map(|_| ()),
        };
        warn_on_err(result, "scroll unlock");
    }

    fn schedule_show(&mut self) {
        let generation = self.show_generation.get().wrapping_add(1);
        self.show_generation.set(generation);
        let _ = self.dom.root.set_attribute("aria-hidden", "false");

        let root = self.dom.root.clone();
        let current = Rc::clone(&self.show_generation);
        let show = Closure::once_into_js(move || {
            // a close before the frame lands cancels the show
            if current.get() == generation {
                let _ = root.class_list().add_1("show");
            }
        });
        let scheduled = utils::window()
            .and_then(|window| window.request_animation_frame(show.unchecked_ref()))
            .is_ok();
        if !scheduled {
            warn_on_err(self.dom.root.class_list().add_1("show"), "show");
        }
    }

    fn hide(&mut self) {
        self.show_generation
            .set(self.show_generation.get().wrapping_add(1));
        warn_on_err(self.dom.root.class_list().remove_1("show"), "hide");
        let _ = self.dom.root.set_attribute("aria-hidden", "true");
    }

    fn set_transitions_enabled(&mut self, enabled: bool) {
        for element in [&self.dom.panel, &self.dom.overlay] {
            let style = element.style();
            let result = if enabled {
                style.remove_property("transition").map(|_| ())
            } else {
                style.set_property("transition", "none")
            };
            warn_on_err(result, "transition toggle");
        }
    }

    fn apply_drag_frame(&mut self, frame: DragFrame) {
        warn_on_err(
            self.dom
                .panel
                .style()
                .set_property("transform", &format!("translateY({}px)", frame.offset)),
            "drag offset",
        );
        warn_on_err(
            self.dom
                .overlay
                .style()
                .set_property("opacity", &frame.backdrop_opacity.to_string()),
            "backdrop fade",
        );
    }

    fn clear_drag_frame(&mut self) {
        let _ = self.dom.panel.style().remove_property("transform");
        let _ = self.dom.overlay.style().remove_property("opacity");
    }

    fn render_amount(&mut self, amount: &str) {
        self.dom.amount.set_text_content(Some(amount));
    }

    fn render_header(&mut self, title: &str) {
        self.dom.title.set_text_content(Some(title));
    }

    fn render_methods(&mut self, methods: &[MethodDisplay], selected: Option<usize>) {
        warn_on_err(self.populate_methods(methods, selected), "method list render");
    }

    fn render_password(&mut self, enabled: bool, length: usize, filled: usize) {
        warn_on_err(
            self.dom
                .panel
                .class_list()
                .toggle_with_force("password-mode", enabled)
                .map(|_| ()),
            "password mode",
        );
        warn_on_err(self.populate_dots(length, filled), "password render");
    }

    fn set_swipe_enabled(&mut self, enabled: bool) {
        self.swipe.detach_all();
        warn_on_err(
            self.dom
                .root
                .class_list()
                .toggle_with_force("swipe-disabled", !enabled)
                .map(|_| ()),
            "drag handle toggle",
        );
        if enabled {
            self.bind_swipe();
        }
    }

    fn set_overlay_dismiss(&mut self, enabled: bool) {
        self.overlay_click.detach_all();
        if enabled {
            self.bind_overlay();
        }
    }
}

impl fmt::Debug for DomHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomHost")
            .field("mounted", &self.mounted)
            .field("controls", &self.controls)
            .field("swipe", &self.swipe)
            .field("overlay_click", &self.overlay_click)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_url_icons() {
        assert!(looks_like_url("https://cdn.example/pay.png"));
        assert!(looks_like_url("data:image/png;base64,AAAA"));
        assert!(!looks_like_url("💳"));
        assert!(!looks_like_url("card"));
    }

    #[wasm_bindgen_test]
    fn test_keypad_layout() {
        assert_eq!(KEYPAD_KEYS.iter().filter(|k| k.len() == 1).count(), 10);
        assert_eq!(KEYPAD_KEYS[11], "del");
    }
}
