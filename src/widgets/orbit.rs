//! Values Orbit
//!
//! Cards circling a center point. Each card gets its starting angle as a CSS
//! variable; hovering the container freezes the whole orbit.

use std::rc::Rc;

use web_sys::{Document, Element, HtmlElement};

use crate::site::Site;
use crate::utils::dom::{self, Listener};

const CARD: &str = ".value-card";
const ORBIT: &str = ".values-orbit";
const CONTAINER: &str = ".values-orbit-container";
const TITLE: &str = ".value-title";
const STEP_DEG: usize = 90;

pub fn rotation_for(index: usize) -> String {
    format!("{}deg", index * STEP_DEG)
}

pub fn play_state(paused: bool) -> &'static str {
    if paused {
        "paused"
    } else {
        "running"
    }
}

pub struct ValuesOrbit {
    _listeners: Vec<Listener>,
}

impl ValuesOrbit {
    pub fn bind(site: &Rc<Site>, document: &Document) -> Option<Self> {
        let cards: Vec<HtmlElement> = dom::query_all(document, CARD);
        let orbit: HtmlElement = dom::query(document, ORBIT)?;
        if cards.is_empty() {
            return None;
        }

        for (i, card) in cards.iter().enumerate() {
            dom::set_style(card, "--rotation", &rotation_for(i));
        }

        let mut listeners = Vec::new();
        if let Some(container) = dom::query::<Element>(document, CONTAINER) {
            for (event, paused) in [("mouseenter", true), ("mouseleave", false)] {
                let orbit = orbit.clone();
                let cards = cards.clone();
                listeners.push(Listener::new(&container, event, move |_| {
                    let state = play_state(paused);
                    dom::set_style(&orbit, "animation-play-state", state);
                    for card in &cards {
                        dom::set_style(card, "animation-play-state", state);
                    }
                }));
            }
        }

        for card in &cards {
            let site = site.clone();
            let el: Element = card.clone().into();
            listeners.push(Listener::new(card, "click", move |_| {
                if let Some(title) = dom::child_text(&el, TITLE) {
                    site.analytics
                        .track_event("Engagement", "Click", Some(&format!("Value - {}", title)), None);
                }
            }));
        }

        Some(Self { _listeners: listeners })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_for() {
        assert_eq!(rotation_for(0), "0deg");
        assert_eq!(rotation_for(3), "270deg");
    }

    #[test]
    fn test_play_state() {
        assert_eq!(play_state(true), "paused");
        assert_eq!(play_state(false), "running");
    }
}
