//! Home Page

use super::{reveal, PageContext, Reveal};
use crate::error::SiteError;
use crate::widgets::{bind_smooth_anchors, Carousel, CarouselSpec};

pub const REVEAL: &[Reveal] = &[reveal("section:not(.hero)", 0.0)];

pub fn bind(ctx: &mut PageContext<'_>) -> Result<(), SiteError> {
    let config = &ctx.site.config;
    ctx.scope
        .hold(bind_smooth_anchors(ctx.document, config.layout.scroll_offset));

    let industries = Carousel::bind(
        ctx.document,
        &CarouselSpec::INDUSTRIES,
        config.timings.industries_interval_ms,
        config.layout.swipe_threshold,
    );
    let cards = Carousel::bind(
        ctx.document,
        &CarouselSpec::CARDS,
        config.timings.cards_interval_ms,
        config.layout.swipe_threshold,
    );
    ctx.hold_some(industries);
    ctx.hold_some(cards);
    Ok(())
}
