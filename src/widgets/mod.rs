//! Page Widgets
//!
//! Self-contained interactive pieces. Each `bind` returns a value that owns
//! its listeners and timers; dropping it unbinds the widget.

pub mod carousel;
pub mod deep_link;
pub mod engagement;
pub mod modal;
pub mod orbit;
pub mod scroll;

pub use carousel::{Carousel, CarouselSpec};
pub use deep_link::{DeepLinks, HighlightSpec};
pub use engagement::{bind_cta_tracking, CardEvents, CtaStyle};
pub use modal::Modals;
pub use orbit::ValuesOrbit;
pub use scroll::{bind_scroll_depth, bind_smooth_anchors, ProgressBar};
