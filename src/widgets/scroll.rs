//! Scroll Behaviors
//!
//! Smooth in-page anchors, a reading progress bar and scroll-depth milestones.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement};

use crate::site::Site;
use crate::utils::dom::{self, Listener};
use crate::utils::throttle;
use crate::widgets::deep_link::fragment_id;

/// Percentage of the scrollable distance covered, clamped to 0..=100.
/// A page that cannot scroll counts as fully read.
pub fn scroll_percent(scroll_top: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let scrollable = scroll_height - viewport_height;
    if scrollable <= 0.0 {
        return 100.0;
    }
    (scroll_top / scrollable * 100.0).clamp(0.0, 100.0)
}

fn current_percent() -> Option<f64> {
    let window = dom::window().ok()?;
    let root = window.document()?.document_element()?;
    let viewport = window.inner_height().ok()?.as_f64()?;
    let top = window.page_y_offset().unwrap_or(0.0);
    Some(scroll_percent(top, f64::from(root.scroll_height()), viewport))
}

/// Smooth-scroll every `a[href^="#"]` to its target; a bare `#` is left alone
pub fn bind_smooth_anchors(document: &Document, offset: f64) -> Vec<Listener> {
    dom::query_all::<Element>(document, r##"a[href^="#"]"##)
        .into_iter()
        .map(|anchor| {
            let doc = document.clone();
            let href = anchor.get_attribute("href").unwrap_or_default();
            Listener::new(&anchor, "click", move |ev: Event| {
                let Some(id) = fragment_id(&href) else {
                    return;
                };
                ev.prevent_default();
                if let Some(target) = doc.get_element_by_id(&id) {
                    dom::scroll_to_element(&target, offset);
                }
            })
        })
        .collect()
}

const PROGRESS_CSS: &str = "position: fixed; top: 72px; left: 0; width: 0; height: 3px; \
    background: linear-gradient(90deg, var(--color-accent), var(--color-primary)); \
    z-index: 999; transition: width 0.1s ease;";

/// Fixed bar under the header whose width follows scroll position
pub struct ProgressBar {
    bar: HtmlElement,
    _listener: Listener,
}

impl ProgressBar {
    pub fn attach(document: &Document, class: &str, throttle_ms: u32) -> Option<Self> {
        let bar = document.create_element("div").ok()?.dyn_into::<HtmlElement>().ok()?;
        bar.set_class_name(class);
        let _ = bar.set_attribute("style", PROGRESS_CSS);
        document.body()?.append_child(&bar).ok()?;

        let target = bar.clone();
        let update = throttle(
            move |_: ()| {
                if let Some(percent) = current_percent() {
                    dom::set_style(&target, "width", &format!("{}%", percent));
                }
            },
            throttle_ms,
        );
        let window = dom::window().ok()?;
        let listener = Listener::new(&window, "scroll", move |_| {
            update.call(());
        });

        Some(Self {
            bar,
            _listener: listener,
        })
    }
}

impl Drop for ProgressBar {
    fn drop(&mut self) {
        self.bar.remove();
    }
}

pub const MILESTONES: [u32; 4] = [25, 50, 75, 100];

/// Reports each milestone once, the first time the reader passes it
#[derive(Debug, Default)]
pub struct DepthTracker {
    reported: Vec<u32>,
    max_percent: u32,
}

impl DepthTracker {
    /// Milestones newly reached at `percent`, in ascending order
    pub fn record(&mut self, percent: f64) -> Vec<u32> {
        let percent = percent.round() as u32;
        self.max_percent = self.max_percent.max(percent);
        let fresh: Vec<u32> = MILESTONES
            .iter()
            .copied()
            .filter(|m| percent >= *m && !self.reported.contains(m))
            .collect();
        self.reported.extend(&fresh);
        fresh
    }

    pub fn max_percent(&self) -> u32 {
        self.max_percent
    }
}

/// Tracks `Engagement / Scroll Depth` for `label` as the reader scrolls
pub fn bind_scroll_depth(site: &Rc<Site>, label: &'static str) -> Option<Listener> {
    let tracker = Rc::new(RefCell::new(DepthTracker::default()));
    let site_for_scroll = site.clone();
    let on_scroll = throttle(
        move |_: ()| {
            let Some(percent) = current_percent() else {
                return;
            };
            let fresh = tracker.borrow_mut().record(percent);
            for milestone in fresh {
                site_for_scroll.analytics.track_event(
                    "Engagement",
                    "Scroll Depth",
                    Some(&format!("{} - {}%", label, milestone)),
                    Some(milestone.into()),
                );
            }
        },
        site.config.timings.depth_throttle_ms,
    );
    let window = dom::window().ok()?;
    Some(Listener::new(&window, "scroll", move |_| {
        on_scroll.call(());
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_percent() {
        assert_eq!(scroll_percent(0.0, 2000.0, 1000.0), 0.0);
        assert_eq!(scroll_percent(500.0, 2000.0, 1000.0), 50.0);
        assert_eq!(scroll_percent(1000.0, 2000.0, 1000.0), 100.0);
        // Overscroll bounce
        assert_eq!(scroll_percent(1100.0, 2000.0, 1000.0), 100.0);
        assert_eq!(scroll_percent(-20.0, 2000.0, 1000.0), 0.0);
    }

    #[test]
    fn test_short_page_is_fully_read() {
        assert_eq!(scroll_percent(0.0, 800.0, 1000.0), 100.0);
        assert_eq!(scroll_percent(0.0, 1000.0, 1000.0), 100.0);
    }

    #[test]
    fn test_milestones_report_once() {
        let mut depth = DepthTracker::default();
        assert!(depth.record(10.0).is_empty());
        assert_eq!(depth.record(26.0), vec![25]);
        assert!(depth.record(30.0).is_empty());
        // Scrolling back up and down again does not repeat
        assert!(depth.record(5.0).is_empty());
        assert!(depth.record(27.0).is_empty());
        assert_eq!(depth.max_percent(), 30);
    }

    #[test]
    fn test_jump_reports_every_passed_milestone() {
        let mut depth = DepthTracker::default();
        assert_eq!(depth.record(80.0), vec![25, 50, 75]);
        assert_eq!(depth.record(99.6), vec![100]);
        assert!(depth.record(100.0).is_empty());
    }
}
