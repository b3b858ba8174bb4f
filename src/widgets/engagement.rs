//! Engagement Tracking
//!
//! Delegated CTA click tracking plus hover, click and first-view events on
//! content cards.

use std::rc::Rc;

use log::debug;
use web_sys::{Document, Element, Event};

use crate::animation::{watch_first_view, OneShotObserver};
use crate::site::Site;
use crate::utils::analytics::EventValue;
use crate::utils::dom::{self, Listener};

pub const CTA_SELECTOR: &str = ".btn-primary, .btn-secondary";

/// What a click on a tracked link reports
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEvent {
    pub category: &'static str,
    pub action: &'static str,
    pub label: String,
    pub value: Option<EventValue>,
}

/// Text and target of a clicked link or button
#[derive(Debug, Clone, PartialEq)]
pub struct Clicked {
    pub text: String,
    pub href: Option<String>,
    /// Plan name of the enclosing pricing card, when there is one
    pub plan: Option<String>,
    pub is_button: bool,
}

/// Label and value convention used by the CTA buttons of most pages
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CtaStyle {
    /// `"{Prefix} Page - {text}"`, value = href
    Page(&'static str),
    /// Like `Page`, with the pricing plan (or "General") before the text
    Pricing(&'static str),
    /// 404 buttons: category `404`, label `"{text} - {href}"`
    NotFound,
    /// Privacy policy: every link, sorted into email, contact form or CTA
    Privacy,
}

impl CtaStyle {
    pub fn selector(self) -> &'static str {
        match self {
            CtaStyle::Page("Contact") => ".btn-primary, .btn-secondary, .method-link",
            CtaStyle::Pricing(_) => ".btn-primary, .btn-secondary, .btn-outline",
            CtaStyle::Privacy => "a[href]",
            _ => CTA_SELECTOR,
        }
    }

    pub fn classify(self, clicked: &Clicked) -> Option<TrackedEvent> {
        let href_value = || clicked.href.clone().map(EventValue::Text);
        match self {
            CtaStyle::Page(prefix) => Some(TrackedEvent {
                category: "CTA",
                action: "Click",
                label: format!("{} Page - {}", prefix, clicked.text),
                value: href_value(),
            }),
            CtaStyle::Pricing(prefix) => Some(TrackedEvent {
                category: "CTA",
                action: "Click",
                label: format!(
                    "{} Page - {} - {}",
                    prefix,
                    clicked.plan.as_deref().unwrap_or("General"),
                    clicked.text
                ),
                value: href_value(),
            }),
            CtaStyle::NotFound => Some(TrackedEvent {
                category: "404",
                action: "Click",
                label: format!("{} - {}", clicked.text, clicked.href.as_deref().unwrap_or_default()),
                value: None,
            }),
            CtaStyle::Privacy => {
                let href = clicked.href.as_deref()?;
                let (category, label) = if href.starts_with("mailto:") {
                    ("Contact", "Privacy Page - Email Link".to_string())
                } else if href.contains("contact.html") {
                    ("Contact", "Privacy Page - Contact Form".to_string())
                } else if clicked.is_button {
                    ("CTA", format!("Privacy Page - {}", clicked.text))
                } else {
                    return None;
                };
                Some(TrackedEvent {
                    category,
                    action: "Click",
                    label,
                    value: href_value(),
                })
            }
        }
    }
}

fn clicked_from(el: &Element) -> Clicked {
    let plan = el
        .closest(".pricing-card")
        .ok()
        .flatten()
        .and_then(|card| dom::child_text(&card, ".plan-name"));
    Clicked {
        text: dom::trimmed_text(el),
        href: el.get_attribute("href"),
        plan,
        is_button: el.class_list().contains("btn"),
    }
}

/// One document-level listener for every CTA on the page
pub fn bind_cta_tracking(site: &Rc<Site>, document: &Document, style: CtaStyle) -> Listener {
    let site = site.clone();
    Listener::new(document, "click", move |ev: Event| {
        let Some(el) = dom::closest_from_event(&ev, style.selector()) else {
            return;
        };
        if let Some(event) = style.classify(&clicked_from(&el)) {
            site.analytics
                .track_event(event.category, event.action, Some(&event.label), event.value);
        }
    })
}

// ========================
// Cards
// ========================

/// A family of cards and how their events are labelled
#[derive(Debug, Clone, Copy)]
pub struct CardEvents {
    pub selector: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    /// Prepended as `"{prefix} - {title}"`; the bare title when `None`
    pub label_prefix: Option<&'static str>,
}

pub fn card_label(prefix: Option<&str>, title: &str) -> String {
    match prefix {
        Some(prefix) => format!("{} - {}", prefix, title),
        None => title.to_string(),
    }
}

impl CardEvents {
    fn title_of(&self, card: &Element) -> Option<String> {
        dom::child_text(card, self.title).filter(|t| !t.is_empty())
    }

    fn label(&self, card: &Element) -> Option<String> {
        let title = self.title_of(card);
        if title.is_none() {
            debug!("[engagement] {} without {}", self.selector, self.title);
        }
        title.map(|t| card_label(self.label_prefix, &t))
    }

    fn track(&self, site: &Site, action: &str, card: &Element) {
        if let Some(label) = self.label(card) {
            site.analytics.track_event(self.category, action, Some(&label), None);
        }
    }

    pub fn on_hover(&self, site: &Rc<Site>, document: &Document, action: &'static str) -> Vec<Listener> {
        self.listen(site, document, "mouseenter", action, None)
    }

    /// Clicks inside `ignore_within` (e.g. the card's own links) are not counted
    pub fn on_click(
        &self,
        site: &Rc<Site>,
        document: &Document,
        action: &'static str,
        ignore_within: Option<&'static str>,
    ) -> Vec<Listener> {
        self.listen(site, document, "click", action, ignore_within)
    }

    fn listen(
        &self,
        site: &Rc<Site>,
        document: &Document,
        event: &'static str,
        action: &'static str,
        ignore_within: Option<&'static str>,
    ) -> Vec<Listener> {
        dom::query_all::<Element>(document, self.selector)
            .into_iter()
            .map(|card| {
                let cards = *self;
                let site = site.clone();
                let el = card.clone();
                Listener::new(&card, event, move |ev: Event| {
                    if let Some(skip) = ignore_within {
                        if dom::closest_from_event(&ev, skip).is_some() {
                            return;
                        }
                    }
                    cards.track(&site, action, &el);
                })
            })
            .collect()
    }

    /// Track the first time each card is half visible; `also` receives the title
    pub fn on_first_view<F>(
        &self,
        site: &Rc<Site>,
        document: &Document,
        action: &'static str,
        also: F,
    ) -> Option<OneShotObserver>
    where
        F: Fn(&str) + 'static,
    {
        let cards = *self;
        let tracked = site.clone();
        watch_first_view(document, self.selector, &site.config.layout, move |card| {
            if let Some(title) = cards.title_of(card) {
                also(&title);
            }
            cards.track(&tracked, action, card);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clicked(text: &str, href: Option<&str>) -> Clicked {
        Clicked {
            text: text.to_string(),
            href: href.map(str::to_string),
            plan: None,
            is_button: false,
        }
    }

    #[test]
    fn test_page_cta_label() {
        let event = CtaStyle::Page("About")
            .classify(&clicked("Get Started", Some("contact.html")))
            .unwrap();
        assert_eq!(event.category, "CTA");
        assert_eq!(event.label, "About Page - Get Started");
        assert_eq!(event.value, Some(EventValue::Text("contact.html".into())));
    }

    #[test]
    fn test_pricing_cta_includes_plan() {
        let mut c = clicked("Choose", Some("#"));
        assert_eq!(
            CtaStyle::Pricing("Products").classify(&c).unwrap().label,
            "Products Page - General - Choose"
        );
        c.plan = Some("Growth".into());
        assert_eq!(
            CtaStyle::Pricing("Products").classify(&c).unwrap().label,
            "Products Page - Growth - Choose"
        );
    }

    #[test]
    fn test_not_found_cta() {
        let event = CtaStyle::NotFound
            .classify(&clicked("Go Home", Some("index.html")))
            .unwrap();
        assert_eq!(event.category, "404");
        assert_eq!(event.label, "Go Home - index.html");
        assert_eq!(event.value, None);
    }

    #[test]
    fn test_privacy_link_classification() {
        let style = CtaStyle::Privacy;
        let mail = style.classify(&clicked("privacy@x", Some("mailto:privacy@x"))).unwrap();
        assert_eq!(mail.label, "Privacy Page - Email Link");

        let form = style.classify(&clicked("Contact us", Some("contact.html#form"))).unwrap();
        assert_eq!(form.label, "Privacy Page - Contact Form");

        let mut btn = clicked("Back to Home", Some("index.html"));
        assert!(style.classify(&btn).is_none());
        btn.is_button = true;
        assert_eq!(style.classify(&btn).unwrap().category, "CTA");

        assert!(style.classify(&clicked("x", None)).is_none());
    }

    #[test]
    fn test_selectors() {
        assert!(CtaStyle::Page("Contact").selector().contains(".method-link"));
        assert_eq!(CtaStyle::Page("Blog").selector(), CTA_SELECTOR);
        assert!(CtaStyle::Pricing("Products").selector().contains(".btn-outline"));
    }

    #[test]
    fn test_card_label() {
        assert_eq!(card_label(Some("Benefit"), "Remote"), "Benefit - Remote");
        assert_eq!(card_label(None, "Launch notes"), "Launch notes");
    }
}
