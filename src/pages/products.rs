//! Products Page
//!
//! Pricing cards: deep links to a plan, hover tracking, the compare toggle
//! and remembering which plan the visitor picked.

use std::rc::Rc;

use log::debug;
use serde::{Deserialize, Serialize};
use web_sys::{Document, Element, Event};

use super::{reveal, PageContext, Reveal};
use crate::error::SiteError;
use crate::site::Site;
use crate::utils::dom::{self, Listener};
use crate::widgets::{CardEvents, DeepLinks, HighlightSpec};

pub const REVEAL: &[Reveal] = &[
    reveal("section:not(.products-hero)", 0.0),
    reveal(".pricing-card", 0.15),
    reveal(".feature-item", 0.1),
];

pub const SELECTED_PLAN_KEY: &str = "selectedPlan";
const COMPARE_MODE: &str = "compare-mode";
const PLAN_CTA: &str = ".pricing-card .btn-primary, .pricing-card .btn-secondary, .pricing-card .btn-outline";

const PRICING_CARDS: CardEvents = CardEvents {
    selector: ".pricing-card",
    title: ".plan-name",
    category: "Engagement",
    label_prefix: Some("Pricing Card"),
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedPlan {
    pub name: String,
    pub timestamp: String,
}

pub fn bind(ctx: &mut PageContext<'_>) -> Result<(), SiteError> {
    if let Some(previous) = ctx.site.storage.get::<SelectedPlan>(SELECTED_PLAN_KEY) {
        debug!("[products] previously selected {} at {}", previous.name, previous.timestamp);
    }

    ctx.scope
        .hold(DeepLinks::bind(ctx.site, ctx.document, HighlightSpec::PLANS));
    ctx.scope
        .hold(PRICING_CARDS.on_hover(ctx.site, ctx.document, "Hover"));
    let compare = bind_compare_toggle(ctx.site, ctx.document);
    ctx.hold_some(compare);
    ctx.scope.hold(remember_plan(ctx.site, ctx.document));
    Ok(())
}

fn bind_compare_toggle(site: &Rc<Site>, document: &Document) -> Option<Listener> {
    let toggle: Element = document.get_element_by_id("comparePlans")?;
    let grid: Element = dom::query(document, ".pricing-grid")?;
    let site = site.clone();
    Some(Listener::new(&toggle, "click", move |_| {
        let _ = grid.class_list().toggle(COMPARE_MODE);
        site.analytics
            .track_event("Interaction", "Click", Some("Compare Plans Toggle"), None);
    }))
}

fn remember_plan(site: &Rc<Site>, document: &Document) -> Listener {
    let site = site.clone();
    Listener::new(document, "click", move |ev: Event| {
        let Some(cta) = dom::closest_from_event(&ev, PLAN_CTA) else {
            return;
        };
        let Some(name) = cta
            .closest(".pricing-card")
            .ok()
            .flatten()
            .and_then(|card| dom::child_text(&card, ".plan-name"))
            .filter(|n| !n.is_empty())
        else {
            return;
        };
        let plan = SelectedPlan {
            name,
            timestamp: Site::now_iso(),
        };
        site.storage.set(SELECTED_PLAN_KEY, &plan);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_plan_shape() {
        let plan = SelectedPlan {
            name: "Growth".into(),
            timestamp: "2026-03-01T10:00:00.000Z".into(),
        };
        let json = serde_json::to_string(&plan).unwrap();
        assert_eq!(json, r#"{"name":"Growth","timestamp":"2026-03-01T10:00:00.000Z"}"#);
    }
}
