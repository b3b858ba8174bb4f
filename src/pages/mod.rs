//! Page Controllers
//!
//! One controller per loaded document. `boot` picks the page, runs `init`
//! once the DOM is ready and disposes everything on `pagehide`. A page
//! restored from the back/forward cache is initialized again.

mod about;
mod blog;
mod careers;
mod contact;
mod home;
mod not_found;
mod privacy;
mod products;
mod solutions;

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, error, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, PageTransitionEvent, PerformanceNavigationTiming};

use crate::animation::RevealAnimator;
use crate::chrome::{self, HeaderSlot};
use crate::error::SiteError;
use crate::scope::Scope;
use crate::site::Site;
use crate::utils::dom::{self, Listener};
use crate::widgets::{bind_cta_tracking, CtaStyle, Modals};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    About,
    Products,
    Solutions,
    Blog,
    Careers,
    Contact,
    Privacy,
    NotFound,
    /// Any other page: shared chrome and section reveals only
    Other,
}

/// Elements revealed on scroll; the nth match waits `n * stagger_s`
#[derive(Debug, Clone, Copy)]
pub struct Reveal {
    pub selector: &'static str,
    pub stagger_s: f64,
}

const fn reveal(selector: &'static str, stagger_s: f64) -> Reveal {
    Reveal { selector, stagger_s }
}

const OTHER_REVEAL: &[Reveal] = &[reveal("section:not(.hero)", 0.0)];

impl PageKind {
    /// Page named by `data-page` or a file stem
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "index" | "home" => Self::Home,
            "about" => Self::About,
            "products" => Self::Products,
            "solutions" => Self::Solutions,
            "blog" => Self::Blog,
            "careers" => Self::Careers,
            "contact" => Self::Contact,
            "privacy" => Self::Privacy,
            "404" | "not-found" => Self::NotFound,
            _ => Self::Other,
        }
    }

    pub fn from_path(pathname: &str) -> Self {
        let file = chrome::current_page_file(pathname);
        Self::from_name(file.strip_suffix(".html").unwrap_or(&file))
    }

    /// The `data-page` marker wins over the URL
    pub fn detect(data_page: Option<&str>, pathname: &str) -> Self {
        match data_page.filter(|p| !p.trim().is_empty()) {
            Some(name) => Self::from_name(name),
            None => Self::from_path(pathname),
        }
    }

    pub fn file(self) -> &'static str {
        match self {
            Self::Home => "index.html",
            Self::About => "about.html",
            Self::Products => "products.html",
            Self::Solutions => "solutions.html",
            Self::Blog => "blog.html",
            Self::Careers => "careers.html",
            Self::Contact => "contact.html",
            Self::Privacy => "privacy.html",
            Self::NotFound => "404.html",
            Self::Other => "",
        }
    }

    /// Path reported with the page view
    pub fn view_path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::About => "/about",
            Self::Products => "/products",
            Self::Solutions => "/solutions",
            Self::Blog => "/blog",
            Self::Careers => "/careers",
            Self::Contact => "/contact",
            Self::Privacy => "/privacy",
            Self::NotFound => "/404",
            Self::Other => "",
        }
    }

    pub fn cta_style(self) -> CtaStyle {
        match self {
            Self::Home => CtaStyle::Page("Home"),
            Self::About => CtaStyle::Page("About"),
            Self::Products => CtaStyle::Pricing("Products"),
            Self::Solutions => CtaStyle::Page("Solutions"),
            Self::Blog => CtaStyle::Page("Blog"),
            Self::Careers => CtaStyle::Page("Careers"),
            Self::Contact => CtaStyle::Page("Contact"),
            Self::Privacy => CtaStyle::Privacy,
            Self::NotFound => CtaStyle::NotFound,
            Self::Other => CtaStyle::Page("Site"),
        }
    }

    pub fn reveals(self) -> &'static [Reveal] {
        match self {
            Self::Home => home::REVEAL,
            Self::About => about::REVEAL,
            Self::Products => products::REVEAL,
            Self::Solutions => solutions::REVEAL,
            Self::Blog => blog::REVEAL,
            Self::Careers => careers::REVEAL,
            Self::Contact => contact::REVEAL,
            Self::Privacy => privacy::REVEAL,
            Self::NotFound => not_found::REVEAL,
            Self::Other => OTHER_REVEAL,
        }
    }
}

/// Everything a page's `bind` needs
pub struct PageContext<'a> {
    pub site: &'a Rc<Site>,
    pub document: &'a Document,
    pub scope: &'a mut Scope,
}

impl PageContext<'_> {
    /// Keep a widget that may be absent from this page
    pub fn hold_some<T: 'static>(&mut self, widget: Option<T>) -> bool {
        match widget {
            Some(widget) => {
                self.scope.hold(widget);
                true
            }
            None => false,
        }
    }
}

pub struct PageController {
    site: Rc<Site>,
    kind: PageKind,
    scope: Scope,
    header: HeaderSlot,
}

impl PageController {
    pub fn new(site: Rc<Site>, kind: PageKind) -> Self {
        Self {
            site,
            kind,
            scope: Scope::new(),
            header: Rc::new(RefCell::new(None)),
        }
    }

    pub fn init(&mut self) -> Result<(), SiteError> {
        let document = dom::document()?;
        info!("[page] init {:?}", self.kind);

        chrome::load_shared_components(&self.site, self.kind.file(), &self.header);

        match RevealAnimator::new(&self.site.config.layout) {
            Ok(animator) => {
                for target in self.kind.reveals() {
                    animator.watch_all(&document, target.selector, target.stagger_s);
                }
                debug!("[page] {} elements awaiting reveal", animator.pending());
                self.scope.hold(animator);
            }
            Err(e) => warn!("[page] reveal animations disabled: {}", e),
        }

        let mut ctx = PageContext {
            site: &self.site,
            document: &document,
            scope: &mut self.scope,
        };
        let bound = match self.kind {
            PageKind::Home => home::bind(&mut ctx),
            PageKind::About => about::bind(&mut ctx),
            PageKind::Products => products::bind(&mut ctx),
            PageKind::Solutions => solutions::bind(&mut ctx),
            PageKind::Blog => blog::bind(&mut ctx),
            PageKind::Careers => careers::bind(&mut ctx),
            PageKind::Contact => contact::bind(&mut ctx),
            PageKind::Privacy => privacy::bind(&mut ctx),
            PageKind::NotFound => not_found::bind(&mut ctx),
            PageKind::Other => Ok(()),
        };
        if let Err(e) = bound {
            error!("[page] {:?} widgets: {}", self.kind, e);
        }

        let modals = Modals::bind(&self.site, &document);
        ctx.hold_some(modals);
        ctx.scope
            .hold(bind_cta_tracking(&self.site, &document, self.kind.cta_style()));

        let path = self.kind.view_path();
        if !path.is_empty() {
            self.site.analytics.track_page_view(path);
        }
        Ok(())
    }

    pub fn dispose(&mut self) {
        debug!("[page] dispose {:?} ({} resources)", self.kind, self.scope.len());
        self.scope.dispose();
        self.header.borrow_mut().take();
    }
}

// ========================
// Boot
// ========================

thread_local! {
    static ACTIVE: RefCell<Option<PageController>> = const { RefCell::new(None) };
    static LIFECYCLE: RefCell<Vec<Listener>> = const { RefCell::new(Vec::new()) };
}

fn detect_page(document: &Document) -> PageKind {
    let data_page = document.body().and_then(|b| b.get_attribute("data-page"));
    let pathname = document
        .location()
        .and_then(|l| l.pathname().ok())
        .unwrap_or_default();
    PageKind::detect(data_page.as_deref(), &pathname)
}

fn start(site: &Rc<Site>) {
    if ACTIVE.with(|active| active.borrow().is_some()) {
        return;
    }
    let Ok(document) = dom::document() else {
        return;
    };
    let mut controller = PageController::new(site.clone(), detect_page(&document));
    if let Err(e) = controller.init() {
        error!("[page] init failed: {}", e);
    }
    ACTIVE.with(|active| *active.borrow_mut() = Some(controller));
}

fn stop() {
    let controller = ACTIVE.with(|active| active.borrow_mut().take());
    if let Some(mut controller) = controller {
        controller.dispose();
    }
}

/// Wire page lifecycle events and initialize the current page
// ========================
// Load Timing
// ========================

/// Milliseconds from fetch start to the end of the load event; `None`
/// until the load event has finished
pub fn load_time_ms(fetch_start: f64, load_event_end: f64) -> Option<f64> {
    (load_event_end > 0.0 && load_event_end >= fetch_start).then(|| (load_event_end - fetch_start).round())
}

fn log_load_time() {
    let Some(timing) = dom::window()
        .ok()
        .and_then(|w| w.performance())
        .map(|p| p.get_entries_by_type("navigation").get(0))
        .and_then(|entry| entry.dyn_into::<PerformanceNavigationTiming>().ok())
    else {
        return;
    };
    match load_time_ms(timing.fetch_start(), timing.load_event_end()) {
        Some(ms) => info!("[page] Page Load Time: {} ms", ms),
        None => debug!("[page] load timing not available"),
    }
}

/// Logs the navigation timing once the page has loaded
fn watch_load_time(window: &web_sys::Window, document: &Document) -> Option<Listener> {
    if document.ready_state() == "complete" {
        log_load_time();
        return None;
    }
    Some(Listener::new(window, "load", |_| {
        // loadEventEnd is only set after the load handlers return
        Timeout::new(0, log_load_time).forget();
    }))
}

pub fn boot(site: Rc<Site>) -> Result<(), SiteError> {
    let window = dom::window()?;
    let document = dom::document()?;
    let mut lifecycle = Vec::new();

    lifecycle.push(Listener::new(&window, "pagehide", |_| stop()));
    let restored = site.clone();
    lifecycle.push(Listener::typed(&window, "pageshow", move |ev: PageTransitionEvent| {
        if ev.persisted() {
            start(&restored);
        }
    }));

    if document.ready_state() == "loading" {
        let ready = site.clone();
        lifecycle.push(Listener::new(&document, "DOMContentLoaded", move |_| start(&ready)));
    } else {
        start(&site);
    }

    lifecycle.extend(watch_load_time(&window, &document));

    LIFECYCLE.with(|l| l.borrow_mut().extend(lifecycle));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_page_wins() {
        assert_eq!(PageKind::detect(Some("careers"), "/index.html"), PageKind::Careers);
        assert_eq!(PageKind::detect(Some(" "), "/blog.html"), PageKind::Blog);
        assert_eq!(PageKind::detect(None, "/404.html"), PageKind::NotFound);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(PageKind::from_path("/"), PageKind::Home);
        assert_eq!(PageKind::from_path("/site/products.html"), PageKind::Products);
        assert_eq!(PageKind::from_path("/solutions"), PageKind::Solutions);
        assert_eq!(PageKind::from_path("/Privacy.html"), PageKind::Privacy);
        assert_eq!(PageKind::from_path("/pricing-faq.html"), PageKind::Other);
    }

    #[test]
    fn test_page_metadata() {
        assert_eq!(PageKind::Home.file(), "index.html");
        assert_eq!(PageKind::NotFound.view_path(), "/404");
        assert_eq!(PageKind::Products.cta_style(), CtaStyle::Pricing("Products"));
        assert!(PageKind::NotFound.reveals().is_empty());
        assert_eq!(PageKind::Other.view_path(), "");
    }

    #[test]
    fn test_load_time() {
        assert_eq!(load_time_ms(12.0, 842.4), Some(830.0));
        // Still inside the load event
        assert_eq!(load_time_ms(12.0, 0.0), None);
        assert_eq!(load_time_ms(0.0, 0.0), None);
    }

    #[test]
    fn test_reveals_skip_heroes() {
        for kind in [PageKind::Home, PageKind::About, PageKind::Blog, PageKind::Contact] {
            let first = kind.reveals()[0].selector;
            assert!(first.starts_with("section:not("), "{:?}: {}", kind, first);
        }
    }
}
