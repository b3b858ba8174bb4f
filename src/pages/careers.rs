//! Careers Page

use log::debug;
use serde::{Deserialize, Serialize};

use super::{reveal, PageContext, Reveal};
use crate::error::SiteError;
use crate::forms::{ApplicationForm, JobAlertForm};
use crate::site::Site;
use crate::widgets::CardEvents;

pub const REVEAL: &[Reveal] = &[
    reveal("section:not(.careers-hero)", 0.0),
    reveal(".benefit-card", 0.1),
    reveal(".position-card", 0.15),
];

pub const INTEREST_KEY: &str = "careerInterest";

const BENEFITS: CardEvents = CardEvents {
    selector: ".benefit-card",
    title: ".benefit-title",
    category: "Engagement",
    label_prefix: Some("Benefit"),
};

const POSITIONS: CardEvents = CardEvents {
    selector: ".position-card",
    title: ".position-info h3",
    category: "Careers",
    label_prefix: None,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerInterest {
    pub visited: bool,
    pub timestamp: String,
    pub source: String,
}

impl CareerInterest {
    pub fn new(referrer: &str, timestamp: String) -> Self {
        let source = if referrer.is_empty() { "direct" } else { referrer };
        Self {
            visited: true,
            timestamp,
            source: source.to_string(),
        }
    }
}

pub fn bind(ctx: &mut PageContext<'_>) -> Result<(), SiteError> {
    let interest = CareerInterest::new(&ctx.document.referrer(), Site::now_iso());
    debug!("[careers] visit from {}", interest.source);
    ctx.site.storage.set(INTEREST_KEY, &interest);

    ctx.scope
        .hold(BENEFITS.on_hover(ctx.site, ctx.document, "Hover"));
    let views = POSITIONS.on_first_view(ctx.site, ctx.document, "View Position", |_| {});
    ctx.hold_some(views);
    ctx.scope
        .hold(POSITIONS.on_click(ctx.site, ctx.document, "Click Position", Some(".btn")));

    let alerts = JobAlertForm::bind(ctx.site, ctx.document);
    ctx.hold_some(alerts);
    let application = ApplicationForm::bind(ctx.site, ctx.document);
    ctx.hold_some(application);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interest_source() {
        let direct = CareerInterest::new("", "t".into());
        assert_eq!(direct.source, "direct");
        assert!(direct.visited);

        let referred = CareerInterest::new("https://news.example/jobs", "t".into());
        assert_eq!(referred.source, "https://news.example/jobs");
    }
}
