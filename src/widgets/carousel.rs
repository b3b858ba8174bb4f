//! Carousel
//!
//! Index arithmetic lives in [`SlideCursor`]; [`Carousel`] renders it onto the
//! DOM in one of two presentations and owns the autoplay timer.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Interval;
use log::debug;
use web_sys::{Document, Element, Event, HtmlElement, KeyboardEvent, TouchEvent};

use crate::utils::dom::{self, Listener};

/// Position within a fixed-size, wrapping sequence of slides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideCursor {
    index: usize,
    len: usize,
}

impl SlideCursor {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn next(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
        self.index
    }

    pub fn prev(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
        self.index
    }

    /// Jump to `index`; out-of-range targets leave the cursor unchanged
    pub fn go(&mut self, index: usize) -> usize {
        if index < self.len {
            self.index = index;
        }
        self.index
    }

    /// Indices before and after the current slide
    pub fn neighbors(&self) -> (usize, usize) {
        if self.len == 0 {
            return (0, 0);
        }
        (
            (self.index + self.len - 1) % self.len,
            (self.index + 1) % self.len,
        )
    }

    /// Class for slide `i` in the stacked presentation
    pub fn stacked_role(&self, i: usize) -> Option<&'static str> {
        let (prev, next) = self.neighbors();
        if i == self.index {
            Some("active")
        } else if i == next {
            Some("next")
        } else if i == prev {
            Some("prev")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Prev,
}

/// Direction of a horizontal swipe, if it travelled past `threshold`
pub fn swipe_step(start_x: f64, end_x: f64, threshold: f64) -> Option<Step> {
    if end_x < start_x - threshold {
        Some(Step::Next)
    } else if end_x > start_x + threshold {
        Some(Step::Prev)
    } else {
        None
    }
}

pub fn track_transform(index: usize) -> String {
    format!("translateX(-{}%)", index * 100)
}

// ========================
// DOM Carousel
// ========================

#[derive(Debug, Clone, Copy)]
pub enum Presentation {
    /// Slides sit in a track that is translated by whole widths
    Track { track: &'static str },
    /// Slides are stacked; CSS positions them by `active`/`next`/`prev`
    Stacked,
}

#[derive(Debug, Clone, Copy)]
pub enum Dots {
    /// Dots already in the markup
    Existing(&'static str),
    /// One dot per slide appended to `container`
    Generated {
        container: &'static str,
        class: &'static str,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct CarouselSpec {
    /// Element whose hover and touches pause autoplay
    pub hover_zone: &'static str,
    pub slides: &'static str,
    pub dots: Dots,
    pub prev: &'static str,
    pub next: &'static str,
    pub presentation: Presentation,
    pub keyboard: bool,
    pub swipe: bool,
}

impl CarouselSpec {
    pub const INDUSTRIES: CarouselSpec = CarouselSpec {
        hover_zone: ".industries-carousel",
        slides: ".carousel-slide",
        dots: Dots::Existing(".carousel-dot"),
        prev: ".carousel-arrow-left",
        next: ".carousel-arrow-right",
        presentation: Presentation::Track { track: ".carousel-track" },
        keyboard: true,
        swipe: true,
    };

    pub const CARDS: CarouselSpec = CarouselSpec {
        hover_zone: ".cards-wrapper",
        slides: ".card-modern",
        dots: Dots::Generated {
            container: ".carousel-dots-modern",
            class: "dot-modern",
        },
        prev: ".nav-prev",
        next: ".nav-next",
        presentation: Presentation::Stacked,
        keyboard: false,
        swipe: false,
    };
}

struct Slides {
    cursor: SlideCursor,
    slides: Vec<HtmlElement>,
    dots: Vec<Element>,
    track: Option<HtmlElement>,
}

impl Slides {
    fn render(&self) {
        let current = self.cursor.index();
        match &self.track {
            Some(track) => {
                for (i, slide) in self.slides.iter().enumerate() {
                    let _ = slide.class_list().toggle_with_force("active", i == current);
                }
                dom::set_style(track, "transform", &track_transform(current));
            }
            None => {
                for (i, slide) in self.slides.iter().enumerate() {
                    let classes = slide.class_list();
                    let _ = classes.remove_3("active", "next", "prev");
                    if let Some(role) = self.cursor.stacked_role(i) {
                        let _ = classes.add_1(role);
                    }
                }
            }
        }
        for (i, dot) in self.dots.iter().enumerate() {
            let _ = dot.class_list().toggle_with_force("active", i == current);
        }
    }

    fn step(&mut self, step: Step) {
        match step {
            Step::Next => self.cursor.next(),
            Step::Prev => self.cursor.prev(),
        };
        self.render();
    }

    fn go(&mut self, index: usize) {
        self.cursor.go(index);
        self.render();
    }
}

/// Auto-advance timer; dropping the interval stops it
#[derive(Clone)]
struct Autoplay {
    slides: Weak<RefCell<Slides>>,
    timer: Rc<RefCell<Option<Interval>>>,
    interval_ms: u32,
}

impl Autoplay {
    fn start(&self) {
        let slides = self.slides.clone();
        let interval = Interval::new(self.interval_ms, move || {
            if let Some(slides) = slides.upgrade() {
                slides.borrow_mut().step(Step::Next);
            }
        });
        // Replacing a running interval cancels it
        *self.timer.borrow_mut() = Some(interval);
    }

    fn stop(&self) {
        self.timer.borrow_mut().take();
    }
}

pub struct Carousel {
    _slides: Rc<RefCell<Slides>>,
    autoplay: Autoplay,
    _listeners: Vec<Listener>,
}

impl Carousel {
    /// Bind the carousel described by `spec`; `None` when its slides are absent
    pub fn bind(document: &Document, spec: &CarouselSpec, interval_ms: u32, swipe_threshold: f64) -> Option<Self> {
        let slide_els: Vec<HtmlElement> = dom::query_all(document, spec.slides);
        if slide_els.is_empty() {
            return None;
        }
        let track = match spec.presentation {
            Presentation::Track { track } => Some(dom::query::<HtmlElement>(document, track)?),
            Presentation::Stacked => None,
        };
        let dots = match spec.dots {
            Dots::Existing(selector) => dom::query_all(document, selector),
            Dots::Generated { container, class } => generate_dots(document, container, class, slide_els.len()),
        };

        let slides = Rc::new(RefCell::new(Slides {
            cursor: SlideCursor::new(slide_els.len()),
            slides: slide_els,
            dots,
            track,
        }));
        let autoplay = Autoplay {
            slides: Rc::downgrade(&slides),
            timer: Rc::new(RefCell::new(None)),
            interval_ms,
        };

        let mut listeners = Vec::new();

        // Manual navigation restarts the autoplay countdown
        let nav = |step: Step| {
            let slides = slides.clone();
            let autoplay = autoplay.clone();
            move |_: Event| {
                slides.borrow_mut().step(step);
                autoplay.start();
            }
        };
        if let Some(prev) = dom::query::<Element>(document, spec.prev) {
            listeners.push(Listener::new(&prev, "click", nav(Step::Prev)));
        }
        if let Some(next) = dom::query::<Element>(document, spec.next) {
            listeners.push(Listener::new(&next, "click", nav(Step::Next)));
        }

        let dot_els = slides.borrow().dots.clone();
        for (i, dot) in dot_els.iter().enumerate() {
            let slides = slides.clone();
            let autoplay = autoplay.clone();
            listeners.push(Listener::new(dot, "click", move |_| {
                slides.borrow_mut().go(i);
                autoplay.start();
            }));
        }

        if spec.keyboard {
            let slides = slides.clone();
            let autoplay = autoplay.clone();
            listeners.push(Listener::typed(document, "keydown", move |ev: KeyboardEvent| {
                let step = match ev.key().as_str() {
                    "ArrowLeft" => Step::Prev,
                    "ArrowRight" => Step::Next,
                    _ => return,
                };
                slides.borrow_mut().step(step);
                autoplay.start();
            }));
        }

        if let Some(zone) = dom::query::<Element>(document, spec.hover_zone) {
            let pause = autoplay.clone();
            listeners.push(Listener::new(&zone, "mouseenter", move |_| pause.stop()));
            let resume = autoplay.clone();
            listeners.push(Listener::new(&zone, "mouseleave", move |_| resume.start()));

            if spec.swipe {
                let start_x = Rc::new(RefCell::new(0.0));
                let pause = autoplay.clone();
                let start = start_x.clone();
                listeners.push(Listener::typed(&zone, "touchstart", move |ev: TouchEvent| {
                    if let Some(touch) = ev.changed_touches().get(0) {
                        *start.borrow_mut() = f64::from(touch.screen_x());
                    }
                    pause.stop();
                }));
                let resume = autoplay.clone();
                let slides = slides.clone();
                listeners.push(Listener::typed(&zone, "touchend", move |ev: TouchEvent| {
                    if let Some(touch) = ev.changed_touches().get(0) {
                        let end = f64::from(touch.screen_x());
                        if let Some(step) = swipe_step(*start_x.borrow(), end, swipe_threshold) {
                            slides.borrow_mut().step(step);
                        }
                    }
                    resume.start();
                }));
            }
        }

        slides.borrow().render();
        autoplay.start();
        debug!("[carousel] {} bound with {} slides", spec.slides, slides.borrow().cursor.len());

        Some(Self {
            _slides: slides,
            autoplay,
            _listeners: listeners,
        })
    }
}

impl Drop for Carousel {
    fn drop(&mut self) {
        self.autoplay.stop();
    }
}

fn generate_dots(document: &Document, container: &str, class: &str, count: usize) -> Vec<Element> {
    let Some(container) = dom::query::<Element>(document, container) else {
        return Vec::new();
    };
    (0..count)
        .filter_map(|_| {
            let dot = document.create_element("div").ok()?;
            let _ = dot.class_list().add_1(class);
            container.append_child(&dot).ok()?;
            Some(dot)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_both_ways() {
        let mut cursor = SlideCursor::new(3);
        assert_eq!(cursor.next(), 1);
        assert_eq!(cursor.next(), 2);
        assert_eq!(cursor.next(), 0);
        assert_eq!(cursor.prev(), 2);
        assert_eq!(cursor.prev(), 1);
    }

    #[test]
    fn test_go_ignores_out_of_range() {
        let mut cursor = SlideCursor::new(4);
        assert_eq!(cursor.go(3), 3);
        assert_eq!(cursor.go(9), 3);
    }

    #[test]
    fn test_empty_cursor_is_stable() {
        let mut cursor = SlideCursor::new(0);
        assert!(cursor.is_empty());
        assert_eq!(cursor.next(), 0);
        assert_eq!(cursor.prev(), 0);
        assert_eq!(cursor.neighbors(), (0, 0));
    }

    #[test]
    fn test_stacked_roles() {
        let mut cursor = SlideCursor::new(5);
        cursor.go(0);
        assert_eq!(cursor.stacked_role(0), Some("active"));
        assert_eq!(cursor.stacked_role(1), Some("next"));
        assert_eq!(cursor.stacked_role(4), Some("prev"));
        assert_eq!(cursor.stacked_role(2), None);

        // With two slides the neighbor is "next", not "prev"
        let two = SlideCursor::new(2);
        assert_eq!(two.stacked_role(1), Some("next"));
    }

    #[test]
    fn test_swipe_step() {
        assert_eq!(swipe_step(300.0, 200.0, 50.0), Some(Step::Next));
        assert_eq!(swipe_step(200.0, 300.0, 50.0), Some(Step::Prev));
        assert_eq!(swipe_step(200.0, 240.0, 50.0), None);
        assert_eq!(swipe_step(200.0, 150.0, 50.0), None);
    }

    #[test]
    fn test_track_transform() {
        assert_eq!(track_transform(0), "translateX(-0%)");
        assert_eq!(track_transform(2), "translateX(-200%)");
    }
}
