//! Blog Page

use super::{reveal, PageContext, Reveal};
use crate::error::SiteError;
use crate::forms::NewsletterForm;
use crate::widgets::CardEvents;

pub const REVEAL: &[Reveal] = &[
    reveal("section:not(.blog-hero)", 0.0),
    reveal(".blog-card", 0.1),
];

const POSTS: CardEvents = CardEvents {
    selector: ".blog-card",
    title: ".blog-card-title",
    category: "Blog",
    label_prefix: None,
};

pub fn bind(ctx: &mut PageContext<'_>) -> Result<(), SiteError> {
    let newsletter = NewsletterForm::bind(ctx.site, ctx.document);
    ctx.hold_some(newsletter);

    let views = POSTS.on_first_view(ctx.site, ctx.document, "View Post", |_| {});
    ctx.hold_some(views);
    ctx.scope
        .hold(POSTS.on_click(ctx.site, ctx.document, "Click Post", None));
    Ok(())
}
