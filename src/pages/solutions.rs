//! Solutions Page

use std::rc::Rc;

use web_sys::{Document, Element, Event, HtmlElement};

use super::{reveal, PageContext, Reveal};
use crate::error::SiteError;
use crate::site::Site;
use crate::utils::dom::{self, Listener};
use crate::widgets::{CardEvents, Carousel, CarouselSpec, DeepLinks, HighlightSpec, ProgressBar};

pub const REVEAL: &[Reveal] = &[
    reveal("section:not(.solutions-hero)", 0.0),
    reveal(".solution-card", 0.2),
    reveal(".use-case-card", 0.1),
    reveal(".integration-category", 0.1),
];

pub const INTERESTS_KEY: &str = "solutionInterests";

const USE_CASES: CardEvents = CardEvents {
    selector: ".use-case-card",
    title: ".use-case-title",
    category: "Engagement",
    label_prefix: Some("Use Case"),
};

const SOLUTION_CARDS: CardEvents = CardEvents {
    selector: ".solution-card",
    title: ".solution-title",
    category: "Engagement",
    label_prefix: Some("Solution Card"),
};

const SOLUTION_VIEWS: CardEvents = CardEvents {
    label_prefix: Some("Solution"),
    ..SOLUTION_CARDS
};

pub fn bind(ctx: &mut PageContext<'_>) -> Result<(), SiteError> {
    let site = ctx.site;
    let document = ctx.document;

    ctx.scope
        .hold(DeepLinks::bind(site, document, HighlightSpec::SOLUTIONS));
    ctx.scope.hold(USE_CASES.on_hover(site, document, "Hover"));
    ctx.scope
        .hold(SOLUTION_CARDS.on_click(site, document, "Click", Some("a")));

    let interests = site.clone();
    let views = SOLUTION_VIEWS.on_first_view(site, document, "View", move |title| {
        interests.storage.push_unique(INTERESTS_KEY, title.to_string());
    });
    ctx.hold_some(views);

    ctx.scope.hold(bind_integrations(site, document));

    if site.device.is_desktop() {
        let progress = ProgressBar::attach(document, "scroll-progress", site.config.timings.progress_throttle_ms);
        ctx.hold_some(progress);
    }

    let cards = Carousel::bind(
        document,
        &CarouselSpec::CARDS,
        site.config.timings.cards_interval_ms,
        site.config.layout.swipe_threshold,
    );
    ctx.hold_some(cards);
    Ok(())
}

// ========================
// Integration Hub
// ========================

const HUB_LOGO: &str = ".hub-logo";

fn set_hub_focus(document: &Document, focused: bool) {
    let Some(logo) = dom::query::<HtmlElement>(document, HUB_LOGO) else {
        return;
    };
    if focused {
        dom::set_style(&logo, "transform", "translate(-50%, -50%) scale(1.1)");
        dom::set_style(&logo, "box-shadow", "0 0 40px rgba(0, 212, 255, 0.5)");
    } else {
        dom::set_style(&logo, "transform", "translate(-50%, -50%) scale(1)");
        dom::set_style(&logo, "box-shadow", "");
    }
}

fn bind_integrations(site: &Rc<Site>, document: &Document) -> Vec<Listener> {
    let mut listeners = Vec::new();
    for card in dom::query_all::<Element>(document, ".integration-card") {
        let doc = document.clone();
        listeners.push(Listener::new(&card, "mouseenter", move |_| set_hub_focus(&doc, true)));
        let doc = document.clone();
        listeners.push(Listener::new(&card, "mouseleave", move |_| set_hub_focus(&doc, false)));

        let tracked = site.clone();
        let el = card.clone();
        listeners.push(Listener::new(&card, "click", move |_| {
            let category = el.get_attribute("data-category").unwrap_or_default();
            tracked
                .analytics
                .track_event("Integration", "View", Some(&category), None);
        }));
    }

    for button in dom::query_all::<Element>(document, ".btn-integrate") {
        let tracked = site.clone();
        listeners.push(Listener::new(&button, "click", move |ev: Event| {
            ev.stop_propagation();
            let category = dom::event_element(&ev)
                .and_then(|el| el.closest(".integration-card").ok().flatten())
                .and_then(|card| card.get_attribute("data-category"))
                .unwrap_or_default();
            tracked
                .analytics
                .track_event("Integration", "Learn More", Some(&category), None);
        }));
    }
    listeners
}
