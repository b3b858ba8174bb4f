//! Shared Chrome Loader
//!
//! Fetches the shared header and footer fragments into their placeholders,
//! then wires the header behavior that could not be bound before the markup
//! existed: sticky state, mobile menu and active-link marking.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use leptos::task::spawn_local;
use log::{debug, error, info};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, KeyboardEvent};

use crate::api::resolve_url;
use crate::error::SiteError;
use crate::site::Site;
use crate::utils::dom::{self, Listener};
use crate::utils::throttle;

pub const HEADER_PLACEHOLDER: &str = "header-placeholder";
pub const FOOTER_PLACEHOLDER: &str = "footer-placeholder";

const STYLE_ELEMENT_ID: &str = "site-utility-styles";

const UTILITY_CSS: &str = r#"
.fade-in { opacity: 1 !important; transform: translateY(0) !important; }
.nav-link.active { color: var(--color-primary); background-color: var(--color-gray-100); }
.error { border-color: #ef4444 !important; }
.error-message { display: block; color: #ef4444; font-size: 0.875rem; margin-top: 0.375rem; }
.loading-spinner { display: inline-block; width: 14px; height: 14px; border: 2px solid rgba(255, 255, 255, 0.3); border-top-color: #ffffff; border-radius: 50%; animation: spin 0.6s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
.toast { position: fixed; bottom: 2rem; right: 2rem; padding: 1rem 1.5rem; background-color: var(--color-gray-800); color: var(--color-white); border-radius: 0.5rem; box-shadow: 0 10px 40px rgba(0, 0, 0, 0.2); opacity: 0; transform: translateY(20px); transition: all 0.3s ease; z-index: 10000; max-width: 400px; font-size: 0.9375rem; }
.toast.show { opacity: 1; transform: translateY(0); }
.toast-success { background-color: #10b981; }
.toast-error { background-color: #ef4444; }
.toast-warning { background-color: #f59e0b; }
.toast-info { background-color: #3b82f6; }
@media (max-width: 640px) { .toast { bottom: 1rem; right: 1rem; left: 1rem; max-width: none; } }
.plan-highlight, .solution-highlight { animation: highlight-pulse 2s ease; }
@keyframes highlight-pulse { 0%, 100% { box-shadow: none; } 50% { box-shadow: 0 0 0 4px var(--color-primary); } }
"#;

/// Slot the header controller lands in once its markup has loaded
pub type HeaderSlot = Rc<RefCell<Option<HeaderController>>>;

/// Append the shared utility stylesheet once per document
pub fn inject_styles(document: &Document) {
    if document.get_element_by_id(STYLE_ELEMENT_ID).is_some() {
        return;
    }
    let Ok(style) = document.create_element("style") else {
        return;
    };
    style.set_id(STYLE_ELEMENT_ID);
    style.set_text_content(Some(UTILITY_CSS));
    if let Some(head) = document.head() {
        let _ = head.append_child(&style);
    }
}

/// Start both fragment loads; neither waits for or blocks the other
pub fn load_shared_components(site: &Rc<Site>, page_file: &'static str, slot: &HeaderSlot) {
    let Ok(document) = dom::document() else {
        return;
    };
    inject_styles(&document);
    let base = document
        .url()
        .unwrap_or_else(|_| "http://localhost/".to_string());

    let header_site = site.clone();
    let header_base = base.clone();
    let header_slot = Rc::downgrade(slot);
    spawn_local(async move {
        let path = header_site.config.fragments.header.clone();
        match load_fragment(&header_site, &header_base, &path, HEADER_PLACEHOLDER).await {
            Ok(()) => wire_header(&header_site, page_file, header_slot),
            Err(e) => error!("[chrome] loading header: {}", e),
        }
    });

    let footer_site = site.clone();
    spawn_local(async move {
        let path = footer_site.config.fragments.footer.clone();
        if let Err(e) = load_fragment(&footer_site, &base, &path, FOOTER_PLACEHOLDER).await {
            error!("[chrome] loading footer: {}", e);
        }
    });
}

async fn load_fragment(site: &Site, base: &str, path: &str, placeholder_id: &str) -> Result<(), SiteError> {
    let url = resolve_url(base, path)?;
    let html = site.api.fetch_fragment(&url).await?;
    let document = dom::document()?;
    let placeholder = document
        .get_element_by_id(placeholder_id)
        .ok_or_else(|| SiteError::missing(format!("#{}", placeholder_id)))?;
    placeholder.set_inner_html(&html);
    debug!("[chrome] injected {} into #{}", path, placeholder_id);
    Ok(())
}

fn wire_header(site: &Rc<Site>, page_file: &'static str, slot: Weak<RefCell<Option<HeaderController>>>) {
    // Page was disposed while the fragment was in flight
    let Some(slot) = slot.upgrade() else {
        return;
    };
    match HeaderController::bind(site, page_file) {
        Ok(header) => {
            info!("[chrome] header ready");
            *slot.borrow_mut() = Some(header);
        }
        Err(e) => error!("[chrome] wiring header: {}", e),
    }
}

// ========================
// Active Link
// ========================

/// Last path segment, defaulting to the index page
pub fn current_page_file(pathname: &str) -> String {
    match pathname.rsplit('/').next() {
        Some(file) if !file.is_empty() => file.to_string(),
        _ => "index.html".to_string(),
    }
}

pub fn is_active_link(href: &str, current_file: &str, page_file: &str) -> bool {
    href == current_file || href == page_file
}

fn mark_active_links(document: &Document, page_file: &str) {
    let pathname = document
        .location()
        .and_then(|l| l.pathname().ok())
        .unwrap_or_default();
    let current = current_page_file(&pathname);
    for link in dom::query_all::<Element>(document, ".nav-link") {
        let href = link.get_attribute("href").unwrap_or_default();
        if is_active_link(&href, &current, page_file) {
            let _ = link.class_list().add_1("active");
            let _ = link.set_attribute("aria-current", "page");
        }
    }
}

// ========================
// Header Controller
// ========================

/// Elements the menu acts on; any may be missing from a given header
#[derive(Clone)]
struct MenuParts {
    header: Option<Element>,
    toggle: Option<Element>,
    nav: Option<Element>,
    body: Option<Element>,
}

impl MenuParts {
    fn is_open(&self) -> bool {
        self.nav
            .as_ref()
            .map_or(false, |nav| nav.class_list().contains("active"))
    }

    fn set_open(&self, open: bool) {
        for el in [&self.nav, &self.toggle].into_iter().flatten() {
            let _ = el.class_list().toggle_with_force("active", open);
        }
        if let Some(body) = &self.body {
            let _ = body.class_list().toggle_with_force("menu-open", open);
        }
        if let Some(toggle) = &self.toggle {
            let _ = toggle.set_attribute("aria-expanded", if open { "true" } else { "false" });
        }
    }

    fn toggle(&self) {
        self.set_open(!self.is_open());
    }

    /// No-op when already closed
    fn close(&self) {
        if self.is_open() {
            self.set_open(false);
        }
    }

    fn contains(&self, target: &Event) -> bool {
        let (Some(header), Some(node)) = (
            &self.header,
            target.target().and_then(|t| t.dyn_into::<web_sys::Node>().ok()),
        ) else {
            return false;
        };
        header.contains(Some(&node))
    }
}

pub struct HeaderController {
    _listeners: Vec<Listener>,
}

impl HeaderController {
    pub fn bind(site: &Rc<Site>, page_file: &str) -> Result<Self, SiteError> {
        let window = dom::window()?;
        let document = dom::document()?;
        let parts = MenuParts {
            header: dom::query(&document, "header"),
            toggle: dom::query(&document, ".mobile-menu-toggle"),
            nav: dom::query(&document, ".nav-menu"),
            body: document.body().map(Into::into),
        };

        let mut listeners = Vec::new();

        // Sticky header
        let threshold = site.config.layout.sticky_threshold;
        let header = parts.header.clone();
        let on_scroll = throttle(
            move |_: ()| {
                let y = dom::window().ok().and_then(|w| w.page_y_offset().ok()).unwrap_or(0.0);
                if let Some(header) = &header {
                    let _ = header.class_list().toggle_with_force("scrolled", y > threshold);
                }
            },
            site.config.timings.header_scroll_throttle_ms,
        );
        listeners.push(Listener::new(&window, "scroll", move |_| {
            on_scroll.call(());
        }));

        if let Some(toggle) = &parts.toggle {
            let menu = parts.clone();
            listeners.push(Listener::new(toggle, "click", move |_| menu.toggle()));
        }

        for link in dom::query_all::<Element>(&document, ".nav-menu a") {
            let menu = parts.clone();
            listeners.push(Listener::new(&link, "click", move |_| menu.close()));
        }

        let menu = parts.clone();
        listeners.push(Listener::new(&document, "click", move |ev: Event| {
            if !menu.contains(&ev) {
                menu.close();
            }
        }));

        let menu = parts.clone();
        listeners.push(Listener::typed(&document, "keydown", move |ev: KeyboardEvent| {
            if ev.key() == "Escape" {
                menu.close();
            }
        }));

        mark_active_links(&document, page_file);

        Ok(Self { _listeners: listeners })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_full_width_on_small_screens() {
        let rule = UTILITY_CSS
            .lines()
            .find(|l| l.starts_with("@media (max-width: 640px)"))
            .unwrap();
        assert!(rule.contains(".toast {"));
        assert!(rule.contains("left: 1rem"));
        assert!(rule.contains("max-width: none"));
    }

    #[test]
    fn test_current_page_file() {
        assert_eq!(current_page_file("/contact.html"), "contact.html");
        assert_eq!(current_page_file("/site/blog.html"), "blog.html");
        assert_eq!(current_page_file("/"), "index.html");
        assert_eq!(current_page_file(""), "index.html");
    }

    #[test]
    fn test_is_active_link() {
        assert!(is_active_link("contact.html", "contact.html", "contact.html"));
        // Pretty URLs still mark the page's own link
        assert!(is_active_link("careers.html", "careers", "careers.html"));
        assert!(!is_active_link("about.html", "contact.html", "contact.html"));
    }
}
