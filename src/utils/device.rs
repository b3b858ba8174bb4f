//! Device Detection
//!
//! Coarse device class from the user-agent string.

use regex::Regex;
use std::sync::OnceLock;

static MOBILE_RE: OnceLock<Regex> = OnceLock::new();
static TABLET_RE: OnceLock<Regex> = OnceLock::new();
static ANDROID_RE: OnceLock<Regex> = OnceLock::new();
static MOBI_RE: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

fn mobile_re() -> &'static Regex {
    MOBILE_RE.get_or_init(|| {
        Regex::new(r"(?i)Android|webOS|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini").expect("mobile pattern is valid")
    })
}

fn tablet_re() -> &'static Regex {
    TABLET_RE.get_or_init(|| Regex::new(r"(?i)tablet|ipad|playbook|silk").expect("tablet pattern is valid"))
}

fn android_re() -> &'static Regex {
    ANDROID_RE.get_or_init(|| Regex::new(r"(?i)android").expect("android pattern is valid"))
}

fn mobi_re() -> &'static Regex {
    MOBI_RE.get_or_init(|| Regex::new(r"(?i)mobi").expect("mobi pattern is valid"))
}

pub fn is_mobile(user_agent: &str) -> bool {
    mobile_re().is_match(user_agent)
}

/// Tablet keywords, or Android with no "mobi" anywhere after it
pub fn is_tablet(user_agent: &str) -> bool {
    if tablet_re().is_match(user_agent) {
        return true;
    }
    match android_re().find(user_agent) {
        Some(m) => !mobi_re().is_match(&user_agent[m.end()..]),
        None => false,
    }
}

pub fn is_desktop(user_agent: &str) -> bool {
    !is_mobile(user_agent) && !is_tablet(user_agent)
}

impl DeviceClass {
    /// Tablet wins over mobile: iPads and Android tablets match both
    pub fn detect(user_agent: &str) -> Self {
        if is_tablet(user_agent) {
            Self::Tablet
        } else if is_mobile(user_agent) {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    pub fn is_desktop(self) -> bool {
        self == Self::Desktop
    }
}
