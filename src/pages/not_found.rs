//! Not Found Page
//!
//! Logs each miss locally (newest entries kept) and reports it, then tracks
//! how visitors leave the page.

use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::info;
use serde::{Deserialize, Serialize};
use web_sys::{Document, Element, HtmlElement};

use super::{PageContext, Reveal};
use crate::error::SiteError;
use crate::site::Site;
use crate::utils::dom::{self, Listener};

/// Entry animation replaces scroll reveals here
pub const REVEAL: &[Reveal] = &[];

pub const ERRORS_KEY: &str = "404Errors";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissRecord {
    pub url: String,
    pub referrer: String,
    pub timestamp: String,
    pub user_agent: String,
}

/// `(category, action, label)` describing where the visitor came from
pub fn referrer_event(referrer: &str) -> (&'static str, &'static str, &str) {
    if referrer.is_empty() {
        ("404", "Source", "Direct")
    } else {
        ("404", "Referrer", referrer)
    }
}

pub fn bind(ctx: &mut PageContext<'_>) -> Result<(), SiteError> {
    let window = dom::window()?;
    let location = window.location();
    let referrer = ctx.document.referrer();
    let pathname = location.pathname().map_err(SiteError::js)?;

    let record = MissRecord {
        url: location.href().map_err(SiteError::js)?,
        referrer: if referrer.is_empty() { "Direct".into() } else { referrer.clone() },
        timestamp: Site::now_iso(),
        user_agent: window.navigator().user_agent().unwrap_or_default(),
    };
    info!("[404] {} (from {})", record.url, record.referrer);
    ctx.site
        .storage
        .push_capped(ERRORS_KEY, record, ctx.site.config.not_found_log_cap);

    let analytics = &ctx.site.analytics;
    analytics.track_event("Error", "404", Some(&pathname), None);
    let (category, action, label) = referrer_event(&referrer);
    analytics.track_event(category, action, Some(label), None);

    ctx.scope
        .hold(animate_entry(ctx.document, ctx.site.config.timings.entry_animation_delay_ms));
    ctx.scope.hold(track_link_cards(ctx.site, ctx.document));
    Ok(())
}

// ========================
// Entry Animation
// ========================

struct Entry {
    el: HtmlElement,
    rise_px: u32,
    duration_s: f64,
    delay_s: f64,
}

fn entry_transition(duration_s: f64, delay_s: f64) -> String {
    if delay_s > 0.0 {
        format!(
            "opacity {d}s ease {delay_s}s, transform {d}s ease {delay_s}s",
            d = duration_s
        )
    } else {
        format!("opacity {d}s ease, transform {d}s ease", d = duration_s)
    }
}

fn entries(document: &Document) -> Vec<Entry> {
    let mut entries = Vec::new();
    if let Some(el) = dom::query::<HtmlElement>(document, ".error-content") {
        entries.push(Entry { el, rise_px: 20, duration_s: 0.6, delay_s: 0.0 });
    }
    if let Some(el) = dom::query::<HtmlElement>(document, ".helpful-links") {
        entries.push(Entry { el, rise_px: 20, duration_s: 0.6, delay_s: 0.3 });
    }
    for (i, el) in dom::query_all::<HtmlElement>(document, ".link-card").into_iter().enumerate() {
        entries.push(Entry {
            el,
            rise_px: 10,
            duration_s: 0.4,
            delay_s: 0.5 + i as f64 * 0.1,
        });
    }
    entries
}

fn animate_entry(document: &Document, delay_ms: u32) -> Timeout {
    let entries = entries(document);
    for entry in &entries {
        dom::set_style(&entry.el, "opacity", "0");
        dom::set_style(&entry.el, "transform", &format!("translateY({}px)", entry.rise_px));
    }
    Timeout::new(delay_ms, move || {
        for entry in &entries {
            dom::set_style(&entry.el, "transition", &entry_transition(entry.duration_s, entry.delay_s));
            dom::set_style(&entry.el, "opacity", "1");
            dom::set_style(&entry.el, "transform", "translateY(0)");
        }
    })
}

fn track_link_cards(site: &Rc<Site>, document: &Document) -> Vec<Listener> {
    dom::query_all::<Element>(document, ".link-card")
        .into_iter()
        .map(|card| {
            let site = site.clone();
            let el = card.clone();
            Listener::new(&card, "click", move |_| {
                let text = dom::child_text(&el, ".link-text").unwrap_or_default();
                let href = el.get_attribute("href").unwrap_or_default();
                site.analytics
                    .track_event("404", "Helpful Link", Some(&format!("{} - {}", text, href)), None);
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referrer_event() {
        assert_eq!(referrer_event(""), ("404", "Source", "Direct"));
        assert_eq!(
            referrer_event("https://search.example/?q=orivanta"),
            ("404", "Referrer", "https://search.example/?q=orivanta")
        );
    }

    #[test]
    fn test_entry_transition() {
        assert_eq!(entry_transition(0.6, 0.0), "opacity 0.6s ease, transform 0.6s ease");
        assert_eq!(
            entry_transition(0.4, 0.7),
            "opacity 0.4s ease 0.7s, transform 0.4s ease 0.7s"
        );
    }

    #[test]
    fn test_miss_record_uses_camel_case() {
        let record = MissRecord {
            url: "https://orivanta.ai/nope".into(),
            referrer: "Direct".into(),
            timestamp: "2026-01-01T00:00:00.000Z".into(),
            user_agent: "Mozilla/5.0".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["userAgent"], "Mozilla/5.0");
        assert_eq!(json["referrer"], "Direct");
    }
}
