//! About Page

use super::{reveal, PageContext, Reveal};
use crate::error::SiteError;
use crate::widgets::{CardEvents, ValuesOrbit};

pub const REVEAL: &[Reveal] = &[
    reveal("section:not(.about-hero)", 0.0),
    reveal(".service-item", 0.1),
];

const VALUE_CARDS: CardEvents = CardEvents {
    selector: ".value-card",
    title: ".value-title",
    category: "Engagement",
    label_prefix: Some("Value"),
};

pub fn bind(ctx: &mut PageContext<'_>) -> Result<(), SiteError> {
    // The orbit tracks value card clicks itself
    let orbit = ValuesOrbit::bind(ctx.site, ctx.document);
    ctx.hold_some(orbit);
    ctx.scope
        .hold(VALUE_CARDS.on_hover(ctx.site, ctx.document, "Hover"));
    Ok(())
}
