//! DOM Helpers
//!
//! Element lookup, RAII event listeners, inline field errors, button loading
//! state and scrolling.

use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlButtonElement, HtmlElement, HtmlFormElement, NodeList, Window,
};

use crate::error::SiteError;

pub fn window() -> Result<Window, SiteError> {
    web_sys::window().ok_or_else(|| SiteError::Js("no window".into()))
}

pub fn document() -> Result<Document, SiteError> {
    window()?.document().ok_or_else(|| SiteError::Js("no document".into()))
}

/// Anything that can be searched with CSS selectors
pub trait QueryRoot {
    fn select(&self, selector: &str) -> Result<Option<Element>, JsValue>;
    fn select_all(&self, selector: &str) -> Result<NodeList, JsValue>;
}

macro_rules! query_root {
    ($($ty:ty),*) => {
        $(impl QueryRoot for $ty {
            fn select(&self, selector: &str) -> Result<Option<Element>, JsValue> {
                self.query_selector(selector)
            }

            fn select_all(&self, selector: &str) -> Result<NodeList, JsValue> {
                self.query_selector_all(selector)
            }
        })*
    };
}

query_root!(Document, Element, HtmlElement, HtmlFormElement);

/// First match of `selector` under `root`, cast to `T`
pub fn query<T: JsCast>(root: &(impl QueryRoot + ?Sized), selector: &str) -> Option<T> {
    root.select(selector).ok().flatten()?.dyn_into::<T>().ok()
}

/// All matches of `selector` under `root` that are `T`
pub fn query_all<T: JsCast>(root: &(impl QueryRoot + ?Sized), selector: &str) -> Vec<T> {
    let Ok(list) = root.select_all(selector) else {
        warn!("[dom] bad selector {}", selector);
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

pub fn by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

/// Element the event was dispatched to
pub fn event_element(ev: &Event) -> Option<Element> {
    ev.target()?.dyn_into::<Element>().ok()
}

/// Nearest ancestor-or-self of the event target matching `selector`
pub fn closest_from_event(ev: &Event, selector: &str) -> Option<Element> {
    event_element(ev)?.closest(selector).ok().flatten()
}

pub fn trimmed_text(el: &Element) -> String {
    el.text_content().unwrap_or_default().trim().to_string()
}

/// Text of the first `selector` match inside `el`
pub fn child_text(el: &Element, selector: &str) -> Option<String> {
    el.query_selector(selector)
        .ok()
        .flatten()
        .map(|child| trimmed_text(&child))
}

pub fn set_style(el: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = el.style().set_property(property, value) {
        warn!("[dom] style {}: {:?}", property, e);
    }
}

/// Event listener removed when dropped
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, event: &'static str, f: F) -> Self
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(f);
        if let Err(e) = target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref()) {
            warn!("[dom] add {} listener: {:?}", event, e);
        }
        Self {
            target: target.clone(),
            event,
            callback,
        }
    }

    /// Listener whose callback only sees events of type `E`
    pub fn typed<E, F>(target: &EventTarget, event: &'static str, mut f: F) -> Self
    where
        E: JsCast,
        F: FnMut(E) + 'static,
    {
        Self::new(target, event, move |ev: Event| {
            if let Ok(ev) = ev.dyn_into::<E>() {
                f(ev);
            }
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

// ========================
// Field Errors
// ========================

const ERROR_CLASS: &str = "error";
const ERROR_MESSAGE_CLASS: &str = "error-message";

fn error_container(field: &Element) -> Option<Element> {
    field
        .closest(".form-group")
        .ok()
        .flatten()
        .or_else(|| field.parent_element())
}

/// Mark `field` invalid and show `message` beside it, replacing any
/// existing message
pub fn show_error(field: &Element, message: &str) {
    let Some(group) = error_container(field) else {
        return;
    };
    if let Ok(Some(existing)) = group.query_selector(&format!(".{}", ERROR_MESSAGE_CLASS)) {
        existing.remove();
    }

    let _ = field.class_list().add_1(ERROR_CLASS);
    let _ = field.set_attribute("aria-invalid", "true");

    let Some(document) = field.owner_document() else {
        return;
    };
    match document.create_element("span") {
        Ok(node) => {
            node.set_class_name(ERROR_MESSAGE_CLASS);
            node.set_text_content(Some(message));
            let _ = node.set_attribute("role", "alert");
            let _ = group.append_child(&node);
        }
        Err(e) => warn!("[dom] create error node: {:?}", e),
    }
}

/// Remove the error marker and message; no-op when there is none
pub fn clear_error(field: &Element) {
    if let Some(group) = error_container(field) {
        if let Ok(Some(existing)) = group.query_selector(&format!(".{}", ERROR_MESSAGE_CLASS)) {
            existing.remove();
        }
    }
    let _ = field.class_list().remove_1(ERROR_CLASS);
    let _ = field.remove_attribute("aria-invalid");
}

pub fn has_error(field: &Element) -> bool {
    field.class_list().contains(ERROR_CLASS)
}

// ========================
// Loading State
// ========================

const ORIGINAL_TEXT_KEY: &str = "originalText";
const FALLBACK_LABEL: &str = "Submit";
const SPINNER_CLASS: &str = "loading-spinner";

/// Disable `button` and show a spinner with `text`
pub fn show_loading(button: &HtmlButtonElement, text: &str) {
    let dataset = button.dataset();
    // Keep the first label if loading is shown twice
    if dataset.get(ORIGINAL_TEXT_KEY).is_none() {
        let original = button.text_content().unwrap_or_default();
        let _ = dataset.set(ORIGINAL_TEXT_KEY, &original);
    }
    button.set_disabled(true);
    button.set_text_content(None);
    match button.owner_document().map(|d| d.create_element("span")) {
        Some(Ok(spinner)) => {
            spinner.set_class_name(SPINNER_CLASS);
            let _ = button.append_child(&spinner);
        }
        Some(Err(e)) => warn!("[dom] create spinner: {:?}", e),
        None => {}
    }
    let _ = button.append_with_str_1(&format!(" {}", text));
    let _ = button.class_list().add_1("loading");
}

/// Re-enable `button` and restore its original label
pub fn hide_loading(button: &HtmlButtonElement) {
    let dataset = button.dataset();
    let label = dataset
        .get(ORIGINAL_TEXT_KEY)
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| FALLBACK_LABEL.to_string());
    button.set_disabled(false);
    button.set_text_content(Some(&label));
    let _ = button.class_list().remove_1("loading");
    dataset.delete(ORIGINAL_TEXT_KEY);
}

/// Restores the button when dropped, on every exit path
pub struct LoadingGuard {
    button: Option<HtmlButtonElement>,
}

impl LoadingGuard {
    pub fn engage(button: Option<HtmlButtonElement>, text: &str) -> Self {
        if let Some(button) = &button {
            show_loading(button, text);
        }
        Self { button }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if let Some(button) = &self.button {
            hide_loading(button);
        }
    }
}

// ========================
// Scrolling
// ========================

/// Document-relative top of `el` minus `offset`
pub fn scroll_target_top(element_top: f64, page_y_offset: f64, offset: f64) -> f64 {
    element_top + page_y_offset - offset
}

/// Smooth-scroll the window so `el` sits `offset` pixels below the top
pub fn scroll_to_element(el: &Element, offset: f64) {
    let Ok(window) = window() else {
        return;
    };
    let top = scroll_target_top(
        el.get_bounding_client_rect().top(),
        window.page_y_offset().unwrap_or(0.0),
        offset,
    );
    let options = web_sys::ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(web_sys::ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use wasm_bindgen_test::wasm_bindgen_test;
    use web_sys::HtmlInputElement;

    use super::*;

    fn mount(html: &str) -> Element {
        let document = document().unwrap();
        let root = document.create_element("div").unwrap();
        root.set_inner_html(html);
        document.body().unwrap().append_child(&root).unwrap();
        root
    }

    fn error_spans(root: &Element) -> u32 {
        root.query_selector_all(".error-message").unwrap().length()
    }

    #[wasm_bindgen_test]
    fn test_show_error_replaces_message() {
        let root = mount(r#"<div class="form-group"><input name="email"></div>"#);
        let input: HtmlInputElement = query(&root, "input").unwrap();

        show_error(&input, "Please enter a valid email address");
        show_error(&input, "This field is required");

        assert_eq!(error_spans(&root), 1);
        let span = root.query_selector("span.error-message").unwrap().unwrap();
        assert_eq!(span.text_content().as_deref(), Some("This field is required"));
        assert_eq!(span.get_attribute("role").as_deref(), Some("alert"));
        assert!(has_error(&input));
        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_clear_error_removes_marker_and_message() {
        let root = mount(r#"<div class="form-group"><input name="name"></div>"#);
        let input: HtmlInputElement = query(&root, "input").unwrap();

        show_error(&input, "This field is required");
        assert_eq!(input.get_attribute("aria-invalid").as_deref(), Some("true"));

        clear_error(&input);
        assert!(input.get_attribute("aria-invalid").is_none());
        assert!(!has_error(&input));
        assert_eq!(error_spans(&root), 0);

        // Nothing to clear
        clear_error(&input);
        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_loading_keeps_first_label() {
        let root = mount(r#"<button type="submit">Send Message</button>"#);
        let button: HtmlButtonElement = query(&root, "button").unwrap();

        show_loading(&button, "Sending...");
        assert!(button.disabled());
        assert!(button.class_list().contains("loading"));
        assert_eq!(button.query_selector_all(".loading-spinner").unwrap().length(), 1);
        assert_eq!(button.text_content().as_deref(), Some(" Sending..."));

        show_loading(&button, "Still sending...");
        assert_eq!(button.dataset().get("originalText").as_deref(), Some("Send Message"));

        hide_loading(&button);
        assert!(!button.disabled());
        assert_eq!(button.text_content().as_deref(), Some("Send Message"));
        assert!(button.dataset().get("originalText").is_none());
        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_loading_label_is_text() {
        let root = mount("<button>Go</button>");
        let button: HtmlButtonElement = query(&root, "button").unwrap();

        show_loading(&button, "<b>Saving</b>");
        assert_eq!(button.query_selector_all("b").unwrap().length(), 0);
        assert_eq!(button.text_content().as_deref(), Some(" <b>Saving</b>"));
        hide_loading(&button);
        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_hide_loading_falls_back_to_submit() {
        let root = mount("<button></button>");
        let button: HtmlButtonElement = query(&root, "button").unwrap();

        hide_loading(&button);
        assert_eq!(button.text_content().as_deref(), Some("Submit"));
        root.remove();
    }
}
