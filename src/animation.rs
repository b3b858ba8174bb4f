//! Scroll-Triggered Animations
//!
//! Elements are prepared in a hidden, offset state and revealed the first time
//! they cross the viewport threshold. Each element fires once and is then
//! unobserved, whatever order the browser delivers intersection callbacks in.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::config::Layout;
use crate::error::SiteError;
use crate::utils::dom::{self, QueryRoot};

/// Class that moves a prepared element to its visible state
pub const REVEALED_CLASS: &str = "fade-in";

const REVEAL_DURATION_S: f64 = 0.6;

/// One-shot bookkeeping: a registered key fires once, then is forgotten.
/// Only keys still waiting are held, so lookups shrink as elements reveal.
#[derive(Debug)]
pub struct OneShot<K> {
    waiting: Vec<K>,
}

impl<K> Default for OneShot<K> {
    fn default() -> Self {
        Self { waiting: Vec::new() }
    }
}

impl<K: PartialEq> OneShot<K> {
    /// `false` if `key` is already waiting
    pub fn register(&mut self, key: K) -> bool {
        if self.waiting.contains(&key) {
            return false;
        }
        self.waiting.push(key);
        true
    }

    /// `true` only on the first call for a waiting key
    pub fn fire(&mut self, key: &K) -> bool {
        match self.waiting.iter().position(|k| k == key) {
            Some(pos) => {
                self.waiting.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn pending(&self) -> usize {
        self.waiting.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: String,
}

impl ObserverOptions {
    pub fn reveal(layout: &Layout) -> Self {
        Self {
            threshold: layout.reveal_threshold,
            root_margin: layout.reveal_root_margin.clone(),
        }
    }

    pub fn view(layout: &Layout) -> Self {
        Self {
            threshold: layout.view_threshold,
            root_margin: "0px".to_string(),
        }
    }
}

type Entries = Rc<RefCell<OneShot<Element>>>;

/// Intersection observer that calls `on_first` once per observed element
pub struct OneShotObserver {
    observer: IntersectionObserver,
    entries: Entries,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl OneShotObserver {
    pub fn new<F>(options: &ObserverOptions, on_first: F) -> Result<Self, SiteError>
    where
        F: Fn(&Element) + 'static,
    {
        let entries: Entries = Rc::new(RefCell::new(OneShot::default()));
        let seen = entries.clone();
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |records: js_sys::Array, observer: IntersectionObserver| {
                for record in records.iter() {
                    let Ok(record) = record.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !record.is_intersecting() {
                        continue;
                    }
                    let target = record.target();
                    let first = seen.borrow_mut().fire(&target);
                    observer.unobserve(&target);
                    if first {
                        on_first(&target);
                    }
                }
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            .map_err(SiteError::js)?;

        Ok(Self {
            observer,
            entries,
            _callback: callback,
        })
    }

    pub fn observe(&self, el: &Element) {
        if self.entries.borrow_mut().register(el.clone()) {
            self.observer.observe(el);
        }
    }

    pub fn pending(&self) -> usize {
        self.entries.borrow().pending()
    }
}

impl Drop for OneShotObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// `transition` value for a reveal starting after `delay_s`
pub fn reveal_transition(delay_s: f64) -> String {
    if delay_s > 0.0 {
        format!(
            "opacity {d}s ease {delay}s, transform {d}s ease {delay}s",
            d = REVEAL_DURATION_S,
            delay = round_delay(delay_s)
        )
    } else {
        format!("opacity {d}s ease, transform {d}s ease", d = REVEAL_DURATION_S)
    }
}

fn round_delay(delay_s: f64) -> f64 {
    (delay_s * 1000.0).round() / 1000.0
}

/// Reveals prepared elements as they scroll into view
pub struct RevealAnimator {
    observer: OneShotObserver,
    offset_px: f64,
}

impl RevealAnimator {
    pub fn new(layout: &Layout) -> Result<Self, SiteError> {
        let observer = OneShotObserver::new(&ObserverOptions::reveal(layout), |el| {
            let _ = el.class_list().add_1(REVEALED_CLASS);
        })?;
        Ok(Self {
            observer,
            offset_px: layout.reveal_offset_px,
        })
    }

    /// Hide and offset `el`, then watch it
    pub fn prepare(&self, el: &HtmlElement, delay_s: f64) {
        dom::set_style(el, "opacity", "0");
        dom::set_style(el, "transform", &format!("translateY({}px)", self.offset_px));
        dom::set_style(el, "transition", &reveal_transition(delay_s));
        self.observer.observe(el);
    }

    /// Prepare every match of `selector`; the nth element waits `n * stagger_s`
    pub fn watch_all(&self, root: &(impl QueryRoot + ?Sized), selector: &str, stagger_s: f64) -> usize {
        let targets: Vec<HtmlElement> = dom::query_all(root, selector);
        for (i, el) in targets.iter().enumerate() {
            self.prepare(el, i as f64 * stagger_s);
        }
        debug!("[reveal] {} x {}", targets.len(), selector);
        targets.len()
    }

    pub fn pending(&self) -> usize {
        self.observer.pending()
    }
}

/// Fires `on_view` the first time each match of `selector` is half visible
pub fn watch_first_view<F>(
    root: &(impl QueryRoot + ?Sized),
    selector: &str,
    layout: &Layout,
    on_view: F,
) -> Option<OneShotObserver>
where
    F: Fn(&Element) + 'static,
{
    let targets: Vec<Element> = dom::query_all(root, selector);
    if targets.is_empty() {
        return None;
    }
    match OneShotObserver::new(&ObserverOptions::view(layout), on_view) {
        Ok(observer) => {
            for el in &targets {
                observer.observe(el);
            }
            Some(observer)
        }
        Err(e) => {
            warn!("[reveal] view observer for {}: {}", selector, e);
            None
        }
    }
}
