//! Modal Dialogs
//!
//! `[data-modal-open="id"]` opens `#id`. A dialog closes from any
//! `[data-modal-close]` inside it, a click on its backdrop, or Escape.

use std::rc::Rc;

use log::{debug, warn};
use web_sys::{Document, Element, Event, KeyboardEvent};

use crate::site::Site;
use crate::utils::dom::{self, Listener};

const OPEN_ATTR: &str = "data-modal-open";
const CLOSE_SELECTOR: &str = "[data-modal-close]";
const MODAL_SELECTOR: &str = ".modal";
const OPEN_CLASS: &str = "open";
const BODY_CLASS: &str = "modal-open";

/// Dialog id named by an opener attribute; a leading `#` is allowed
pub fn modal_target(attr: &str) -> Option<&str> {
    let id = attr.trim().trim_start_matches('#');
    (!id.is_empty()).then_some(id)
}

fn is_open(modal: &Element) -> bool {
    modal.class_list().contains(OPEN_CLASS)
}

pub fn open(document: &Document, modal: &Element) -> bool {
    if is_open(modal) {
        return false;
    }
    let _ = modal.class_list().add_1(OPEN_CLASS);
    let _ = modal.set_attribute("aria-hidden", "false");
    if let Some(body) = document.body() {
        let _ = body.class_list().add_1(BODY_CLASS);
    }
    true
}

/// `false` when the dialog was already closed
pub fn close(document: &Document, modal: &Element) -> bool {
    if !is_open(modal) {
        return false;
    }
    let _ = modal.class_list().remove_1(OPEN_CLASS);
    let _ = modal.set_attribute("aria-hidden", "true");
    let any_open = !dom::query_all::<Element>(document, &format!("{}.{}", MODAL_SELECTOR, OPEN_CLASS)).is_empty();
    if !any_open {
        if let Some(body) = document.body() {
            let _ = body.class_list().remove_1(BODY_CLASS);
        }
    }
    true
}

pub struct Modals {
    _listeners: Vec<Listener>,
}

impl Modals {
    /// `None` when the page has no openers
    pub fn bind(site: &Rc<Site>, document: &Document) -> Option<Self> {
        if dom::query::<Element>(document, &format!("[{}]", OPEN_ATTR)).is_none() {
            return None;
        }

        let mut listeners = Vec::new();

        let site = site.clone();
        let doc = document.clone();
        listeners.push(Listener::new(document, "click", move |ev: Event| {
            if let Some(opener) = dom::closest_from_event(&ev, &format!("[{}]", OPEN_ATTR)) {
                let attr = opener.get_attribute(OPEN_ATTR).unwrap_or_default();
                let Some(id) = modal_target(&attr) else {
                    return;
                };
                ev.prevent_default();
                match doc.get_element_by_id(id) {
                    Some(modal) => {
                        if open(&doc, &modal) {
                            debug!("[modal] opened #{}", id);
                            site.analytics.track_event("Modal", "Open", Some(id), None);
                        }
                    }
                    None => warn!("[modal] no dialog #{}", id),
                }
                return;
            }

            if let Some(closer) = dom::closest_from_event(&ev, CLOSE_SELECTOR) {
                if let Ok(Some(modal)) = closer.closest(MODAL_SELECTOR) {
                    close(&doc, &modal);
                }
                return;
            }

            // Backdrop: the click landed on the dialog element itself
            if let Some(target) = dom::event_element(&ev) {
                if target.matches(MODAL_SELECTOR).unwrap_or(false) {
                    close(&doc, &target);
                }
            }
        }));

        let doc = document.clone();
        listeners.push(Listener::typed(document, "keydown", move |ev: KeyboardEvent| {
            if ev.key() != "Escape" {
                return;
            }
            for modal in dom::query_all::<Element>(&doc, &format!("{}.{}", MODAL_SELECTOR, OPEN_CLASS)) {
                close(&doc, &modal);
            }
        }));

        Some(Self { _listeners: listeners })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_target() {
        assert_eq!(modal_target("demo"), Some("demo"));
        assert_eq!(modal_target("#demo"), Some("demo"));
        assert_eq!(modal_target("  "), None);
        assert_eq!(modal_target("#"), None);
    }
}
