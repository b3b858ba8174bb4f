//! Site Configuration
//!
//! Defaults cover every page. A page may override any subset with an inline
//! `<script type="application/json" id="site-config">` block.

use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};

use crate::error::SiteError;

/// Element id of the optional inline config block
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub api_base_production: String,
    pub api_base_development: String,
    /// Hostnames that select the development API base
    pub development_hosts: Vec<String>,
    pub endpoints: Endpoints,
    pub fragments: Fragments,
    pub measurement_id: String,
    pub timings: Timings,
    pub layout: Layout,
    /// Max entries kept in the not-found error log
    pub not_found_log_cap: usize,
    /// Overrides the host-derived log level ("debug", "info", ...)
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Endpoints {
    pub newsletter: String,
    pub contact: String,
    pub careers_apply: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Fragments {
    pub header: String,
    pub footer: String,
}

/// Delays and intervals, all in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timings {
    pub toast_ms: u32,
    pub toast_show_delay_ms: u32,
    pub toast_removal_ms: u32,
    pub success_hide_ms: u32,
    pub highlight_ms: u32,
    pub deep_link_delay_ms: u32,
    pub industries_interval_ms: u32,
    pub cards_interval_ms: u32,
    pub draft_save_ms: u32,
    pub draft_clear_ms: u32,
    pub header_scroll_throttle_ms: u32,
    pub progress_throttle_ms: u32,
    pub depth_throttle_ms: u32,
    pub message_scroll_delay_ms: u32,
    pub entry_animation_delay_ms: u32,
}

/// Pixel offsets and observer tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Layout {
    pub scroll_offset: f64,
    pub anchor_offset: f64,
    pub sticky_threshold: f64,
    pub swipe_threshold: f64,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    pub reveal_offset_px: f64,
    pub view_threshold: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            api_base_production: "https://orivanta-ai-backend.vercel.app".to_string(),
            api_base_development: "http://localhost:3000".to_string(),
            development_hosts: vec!["localhost".to_string(), "127.0.0.1".to_string()],
            endpoints: Endpoints::default(),
            fragments: Fragments::default(),
            measurement_id: "GA_MEASUREMENT_ID".to_string(),
            timings: Timings::default(),
            layout: Layout::default(),
            not_found_log_cap: 10,
            log_level: None,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            newsletter: "/api/newsletter/subscribe".to_string(),
            contact: "/api/contact/submit".to_string(),
            careers_apply: "/api/careers/apply".to_string(),
        }
    }
}

impl Default for Fragments {
    fn default() -> Self {
        Self {
            header: "shared/header.html".to_string(),
            footer: "shared/footer.html".to_string(),
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            toast_ms: 3000,
            toast_show_delay_ms: 10,
            toast_removal_ms: 300,
            success_hide_ms: 5000,
            highlight_ms: 2000,
            deep_link_delay_ms: 500,
            industries_interval_ms: 5000,
            cards_interval_ms: 4000,
            draft_save_ms: 500,
            draft_clear_ms: 2000,
            header_scroll_throttle_ms: 100,
            progress_throttle_ms: 50,
            depth_throttle_ms: 250,
            message_scroll_delay_ms: 100,
            entry_animation_delay_ms: 100,
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            scroll_offset: 80.0,
            anchor_offset: 100.0,
            sticky_threshold: 50.0,
            swipe_threshold: 50.0,
            reveal_threshold: 0.1,
            reveal_root_margin: "0px 0px -50px 0px".to_string(),
            reveal_offset_px: 20.0,
            view_threshold: 0.5,
        }
    }
}

impl SiteConfig {
    pub fn from_json(text: &str) -> Result<Self, SiteError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read the inline config block, falling back to defaults
    pub fn load(document: &web_sys::Document) -> Self {
        let Some(element) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
            return Self::default();
        };
        let text = element.text_content().unwrap_or_default();
        match Self::from_json(&text) {
            Ok(config) => config,
            Err(e) => {
                warn!("[config] ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
                Self::default()
            }
        }
    }

    pub fn is_development(&self, host: &str) -> bool {
        self.development_hosts.iter().any(|h| h == host)
    }

    pub fn api_base(&self, host: &str) -> &str {
        if self.is_development(host) {
            &self.api_base_development
        } else {
            &self.api_base_production
        }
    }

    pub fn log_level(&self, host: &str) -> LevelFilter {
        if let Some(level) = self.log_level.as_deref().and_then(|l| l.parse().ok()) {
            return level;
        }
        if self.is_development(host) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
