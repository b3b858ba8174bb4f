//! Contact Page

use super::{reveal, PageContext, Reveal};
use crate::error::SiteError;
use crate::forms::ContactForm;

pub const REVEAL: &[Reveal] = &[reveal("section:not(.contact-hero)", 0.0)];

pub fn bind(ctx: &mut PageContext<'_>) -> Result<(), SiteError> {
    let form = ContactForm::bind(ctx.site, ctx.document).ok_or_else(|| SiteError::missing("#contactForm"))?;
    ctx.scope.hold(form);
    Ok(())
}
