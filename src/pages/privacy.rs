//! Privacy Policy Page
//!
//! Reading aids (anchors, progress bar, print button) and engagement
//! measurements: scroll depth and time spent on the page.

use std::rc::Rc;

use log::warn;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use super::{reveal, PageContext, Reveal};
use crate::error::SiteError;
use crate::site::Site;
use crate::utils::dom::{self, Listener};
use crate::widgets::{bind_scroll_depth, bind_smooth_anchors, ProgressBar};

pub const REVEAL: &[Reveal] = &[reveal(".policy-section, .policy-intro", 0.05)];

pub const VIEWED_KEY: &str = "privacyPolicyViewed";
const LABEL: &str = "Privacy Policy";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyView {
    pub viewed: bool,
    pub timestamp: String,
}

/// Whole seconds between two `Date.now()` readings
pub fn seconds_between(start_ms: f64, end_ms: f64) -> u32 {
    ((end_ms - start_ms) / 1000.0).round().max(0.0) as u32
}

pub fn bind(ctx: &mut PageContext<'_>) -> Result<(), SiteError> {
    let site = ctx.site;
    ctx.scope
        .hold(bind_smooth_anchors(ctx.document, site.config.layout.anchor_offset));
    let depth = bind_scroll_depth(site, LABEL);
    ctx.hold_some(depth);
    let progress = ProgressBar::attach(ctx.document, "reading-progress", site.config.timings.progress_throttle_ms);
    ctx.hold_some(progress);

    site.storage.set(
        VIEWED_KEY,
        &PolicyView {
            viewed: true,
            timestamp: Site::now_iso(),
        },
    );

    let started = js_sys::Date::now();
    let timed = site.clone();
    ctx.scope.on_dispose(move || {
        let secs = seconds_between(started, js_sys::Date::now());
        timed
            .analytics
            .track_event("Engagement", "Time on Page", Some(LABEL), Some(secs.into()));
    });

    if site.device.is_desktop() {
        match PrintButton::attach(site, ctx.document) {
            Ok(Some(button)) => ctx.scope.hold(button),
            Ok(None) => {}
            Err(e) => warn!("[privacy] print button: {}", e),
        }
    }
    Ok(())
}

// ========================
// Print Button
// ========================

const PRINT_LABEL: &str = "🖨️ Print Policy";
const PRINT_CSS: &str = "position: fixed; bottom: 2rem; right: 2rem; padding: 0.875rem 1.5rem; \
    background-color: var(--color-accent); color: var(--color-white); border: none; \
    border-radius: 0.5rem; font-weight: 600; cursor: pointer; \
    box-shadow: 0 4px 12px rgba(0, 0, 0, 0.15); transition: all 0.2s ease; z-index: 100;";

/// Floating print button, removed from the page when dropped
struct PrintButton {
    button: HtmlElement,
    _listeners: Vec<Listener>,
}

impl PrintButton {
    /// `Ok(None)` when the page has no policy content to print
    fn attach(site: &Rc<Site>, document: &Document) -> Result<Option<Self>, SiteError> {
        if dom::query::<HtmlElement>(document, ".content-wrapper").is_none() {
            return Ok(None);
        }
        let button: HtmlElement = document
            .create_element("button")
            .map_err(SiteError::js)?
            .dyn_into()
            .map_err(|_| SiteError::Js("button is not an HtmlElement".into()))?;
        button.set_class_name("btn-print");
        button.set_text_content(Some(PRINT_LABEL));
        button.set_attribute("style", PRINT_CSS).map_err(SiteError::js)?;

        let tracked = site.clone();
        let mut listeners = vec![Listener::new(&button, "click", move |_| {
            tracked.analytics.track_event("Action", "Print", Some(LABEL), None);
            if let Err(e) = dom::window().and_then(|w| w.print().map_err(SiteError::js)) {
                warn!("[privacy] print: {}", e);
            }
        })];
        let lifted = button.clone();
        listeners.push(Listener::new(&button, "mouseenter", move |_| {
            dom::set_style(&lifted, "transform", "translateY(-2px)");
            dom::set_style(&lifted, "box-shadow", "0 6px 16px rgba(0, 0, 0, 0.2)");
        }));
        let rested = button.clone();
        listeners.push(Listener::new(&button, "mouseleave", move |_| {
            dom::set_style(&rested, "transform", "translateY(0)");
            dom::set_style(&rested, "box-shadow", "0 4px 12px rgba(0, 0, 0, 0.15)");
        }));

        document
            .body()
            .ok_or_else(|| SiteError::missing("body"))?
            .append_child(&button)
            .map_err(SiteError::js)?;
        Ok(Some(Self {
            button,
            _listeners: listeners,
        }))
    }
}

impl Drop for PrintButton {
    fn drop(&mut self) {
        self.button.remove();
    }
}
