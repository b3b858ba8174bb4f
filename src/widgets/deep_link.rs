//! Deep Links
//!
//! A URL fragment naming a card scrolls to it and pulses a highlight class.
//! In-page links to those cards do the same and push the fragment onto
//! history instead of jumping.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::debug;
use percent_encoding::percent_decode_str;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, Event};

use crate::site::Site;
use crate::utils::dom::{self, Listener};

/// Element id named by a URL fragment, percent-decoded
pub fn fragment_id(hash: &str) -> Option<String> {
    let raw = hash.strip_prefix('#').unwrap_or(hash);
    if raw.is_empty() {
        return None;
    }
    let id = percent_decode_str(raw).decode_utf8_lossy().into_owned();
    (!id.trim().is_empty()).then_some(id)
}

#[derive(Debug, Clone, Copy)]
pub struct HighlightSpec {
    pub card: &'static str,
    pub class: &'static str,
}

impl HighlightSpec {
    pub const PLANS: HighlightSpec = HighlightSpec {
        card: ".pricing-card",
        class: "plan-highlight",
    };

    pub const SOLUTIONS: HighlightSpec = HighlightSpec {
        card: ".solution-card",
        class: "solution-highlight",
    };
}

/// Applies a highlight that clears itself
#[derive(Clone)]
struct Highlighter {
    spec: HighlightSpec,
    document: Document,
    duration_ms: u32,
    clear: Rc<RefCell<Option<Timeout>>>,
}

impl Highlighter {
    fn highlight(&self, target: &Element) {
        for card in dom::query_all::<Element>(&self.document, self.spec.card) {
            let _ = card.class_list().remove_1(self.spec.class);
        }
        let _ = target.class_list().add_1(self.spec.class);

        let class = self.spec.class;
        let el = target.clone();
        let timeout = Timeout::new(self.duration_ms, move || {
            let _ = el.class_list().remove_1(class);
        });
        *self.clear.borrow_mut() = Some(timeout);
    }
}

pub struct DeepLinks {
    _listeners: Vec<Listener>,
    _initial: Option<Timeout>,
    _highlighter: Highlighter,
}

impl DeepLinks {
    pub fn bind(site: &Rc<Site>, document: &Document, spec: HighlightSpec) -> Self {
        let highlighter = Highlighter {
            spec,
            document: document.clone(),
            duration_ms: site.config.timings.highlight_ms,
            clear: Rc::new(RefCell::new(None)),
        };
        let offset = site.config.layout.anchor_offset;

        let hash = document
            .location()
            .and_then(|l| l.hash().ok())
            .unwrap_or_default();
        let initial = fragment_id(&hash).map(|id| {
            let doc = document.clone();
            let hl = highlighter.clone();
            Timeout::new(site.config.timings.deep_link_delay_ms, move || {
                if let Some(target) = doc.get_element_by_id(&id) {
                    debug!("[deep-link] #{}", id);
                    dom::scroll_to_element(&target, offset);
                    hl.highlight(&target);
                }
            })
        });

        let doc = document.clone();
        let hl = highlighter.clone();
        let on_click = Listener::new(document, "click", move |ev: Event| {
            let Some(link) = dom::closest_from_event(&ev, r##"a[href^="#"]"##) else {
                return;
            };
            let href = link.get_attribute("href").unwrap_or_default();
            let Some(target) = fragment_id(&href).and_then(|id| doc.get_element_by_id(&id)) else {
                return;
            };
            if !target.matches(spec.card).unwrap_or(false) {
                return;
            }
            ev.prevent_default();
            dom::scroll_to_element(&target, offset);
            hl.highlight(&target);
            if let Ok(history) = dom::window().and_then(|w| w.history().map_err(crate::error::SiteError::js)) {
                let _ = history.push_state_with_url(&JsValue::NULL, "", Some(&href));
            }
        });

        Self {
            _listeners: vec![on_click],
            _initial: initial,
            _highlighter: highlighter,
        }
    }
}
