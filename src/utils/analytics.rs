//! Analytics Facade
//!
//! Forwards events to the page's global `gtag` function when one is present.
//! Every event is also logged locally. Tracking never fails the caller.

use log::{debug, info, warn};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};

/// Event value: a count/duration or a link target
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventValue {
    Number(f64),
    Text(String),
}

impl From<f64> for EventValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<u32> for EventValue {
    fn from(v: u32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<&str> for EventValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for EventValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventParams {
    pub event_category: String,
    pub event_label: Option<String>,
    pub value: Option<EventValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageViewParams {
    pub page_path: String,
}

/// Destination for tracked events
pub trait AnalyticsSink {
    fn event(&self, action: &str, params: &EventParams);
    fn page_view(&self, measurement_id: &str, params: &PageViewParams);
}

/// Calls `window.gtag(...)` if the page defines it
#[derive(Debug, Default)]
pub struct GtagSink;

impl GtagSink {
    fn gtag() -> Option<js_sys::Function> {
        let window = web_sys::window()?;
        js_sys::Reflect::get(&window, &JsValue::from_str("gtag"))
            .ok()?
            .dyn_into::<js_sys::Function>()
            .ok()
    }

    fn call<P: Serialize>(command: &str, target: &str, params: &P) {
        let Some(gtag) = Self::gtag() else {
            return;
        };
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let params = match params.serialize(&serializer) {
            Ok(value) => value,
            Err(e) => {
                warn!("[analytics] serialize params: {}", e);
                return;
            }
        };
        if let Err(e) = gtag.call3(&JsValue::NULL, &command.into(), &target.into(), &params) {
            warn!("[analytics] gtag {} threw: {:?}", command, e);
        }
    }
}

impl AnalyticsSink for GtagSink {
    fn event(&self, action: &str, params: &EventParams) {
        Self::call("event", action, params);
    }

    fn page_view(&self, measurement_id: &str, params: &PageViewParams) {
        Self::call("config", measurement_id, params);
    }
}

pub struct Analytics {
    measurement_id: String,
    sink: Box<dyn AnalyticsSink>,
}

impl Analytics {
    pub fn new(measurement_id: impl Into<String>, sink: Box<dyn AnalyticsSink>) -> Self {
        Self {
            measurement_id: measurement_id.into(),
            sink,
        }
    }

    pub fn track_event(&self, category: &str, action: &str, label: Option<&str>, value: Option<EventValue>) {
        let params = event_params(category, label, value);
        info!(
            "[analytics] event {}/{} label={:?} value={:?}",
            category, action, params.event_label, params.value
        );
        self.sink.event(action, &params);
    }

    pub fn track_page_view(&self, path: &str) {
        debug!("[analytics] page view {}", path);
        self.sink.page_view(
            &self.measurement_id,
            &PageViewParams {
                page_path: path.to_string(),
            },
        );
    }
}

pub fn event_params(category: &str, label: Option<&str>, value: Option<EventValue>) -> EventParams {
    EventParams {
        event_category: category.to_string(),
        event_label: label.map(str::to_string),
        value,
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Sink that remembers what it was given
    #[derive(Clone, Default)]
    pub struct RecordingSink {
        pub events: Rc<RefCell<Vec<(String, EventParams)>>>,
        pub page_views: Rc<RefCell<Vec<(String, String)>>>,
    }

    impl AnalyticsSink for RecordingSink {
        fn event(&self, action: &str, params: &EventParams) {
            self.events.borrow_mut().push((action.to_string(), params.clone()));
        }

        fn page_view(&self, measurement_id: &str, params: &PageViewParams) {
            self.page_views
                .borrow_mut()
                .push((measurement_id.to_string(), params.page_path.clone()));
        }
    }
}
