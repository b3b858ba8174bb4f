//! Site Services
//!
//! Constructed once at startup and handed to the page controller. Holds
//! everything the old global utility object used to provide.

use std::rc::Rc;

use log::warn;

use crate::api::{ApiClient, SubmitApi};
use crate::config::SiteConfig;
use crate::utils::analytics::{Analytics, AnalyticsSink};
use crate::utils::dom;
use crate::utils::storage::{KeyValueStore, LocalStore, MemoryStore, SiteStorage, Storage};
use crate::utils::toast::{self, Severity};
use crate::utils::DeviceClass;

pub struct Site {
    pub config: SiteConfig,
    pub storage: SiteStorage,
    pub analytics: Analytics,
    pub api: ApiClient,
    /// Where the forms send their submissions; `api` unless replaced
    pub submit: Rc<dyn SubmitApi>,
    pub device: DeviceClass,
}

impl Site {
    pub fn new(
        config: SiteConfig,
        store: Box<dyn KeyValueStore>,
        sink: Box<dyn AnalyticsSink>,
        host: &str,
        user_agent: &str,
    ) -> Self {
        let api = ApiClient::new(config.api_base(host), config.endpoints.clone());
        let analytics = Analytics::new(config.measurement_id.clone(), sink);
        Self {
            device: DeviceClass::detect(user_agent),
            storage: Storage::new(store),
            analytics,
            submit: Rc::new(api.clone()),
            api,
            config,
        }
    }

    /// Wire up against the real browser; storage falls back to memory
    /// when `localStorage` is blocked
    pub fn from_browser(config: SiteConfig) -> Rc<Self> {
        let window = dom::window().ok();
        let host = window
            .as_ref()
            .and_then(|w| w.location().hostname().ok())
            .unwrap_or_default();
        let user_agent = window
            .as_ref()
            .and_then(|w| w.navigator().user_agent().ok())
            .unwrap_or_default();

        let store: Box<dyn KeyValueStore> = match window.as_ref().map(LocalStore::open) {
            Some(Ok(local)) => Box::new(local),
            Some(Err(e)) => {
                warn!("[site] {}; using in-memory storage", e);
                Box::new(MemoryStore::new())
            }
            None => Box::new(MemoryStore::new()),
        };

        Rc::new(Self::new(
            config,
            store,
            Box::new(crate::utils::analytics::GtagSink),
            &host,
            &user_agent,
        ))
    }

    pub fn toast(&self, message: &str, severity: Severity) {
        toast::show_toast(message, severity, self.config.timings.toast_ms, &self.config.timings);
    }

    pub fn now_iso() -> String {
        chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    }
}

#[cfg(test)]
impl Site {
    pub(crate) fn with_submit_api(mut self, submit: Rc<dyn SubmitApi>) -> Self {
        self.submit = submit;
        self
    }

    /// In-memory storage, recorded analytics and the given submission backend
    pub(crate) fn for_tests(
        submit: Rc<dyn SubmitApi>,
    ) -> (Rc<Self>, crate::utils::analytics::recording::RecordingSink) {
        let sink = crate::utils::analytics::recording::RecordingSink::default();
        let site = Self::new(
            SiteConfig::default(),
            Box::new(MemoryStore::new()),
            Box::new(sink.clone()),
            "localhost",
            "",
        )
        .with_submit_api(submit);
        (Rc::new(site), sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::analytics::recording::RecordingSink;

    #[test]
    fn test_site_uses_host_for_api_base() {
        let site = Site::new(
            SiteConfig::default(),
            Box::new(MemoryStore::new()),
            Box::new(RecordingSink::default()),
            "localhost",
            "Mozilla/5.0 (X11; Linux x86_64)",
        );
        assert_eq!(site.api.endpoint("/api/contact/submit"), "http://localhost:3000/api/contact/submit");
        assert_eq!(site.device, DeviceClass::Desktop);
        assert!(site.storage.set("k", &1));
    }

    #[test]
    fn test_submit_api_can_be_replaced() {
        use crate::api::fake::FakeSubmitApi;
        use crate::api::Subscription;

        let fake = Rc::new(FakeSubmitApi::default());
        let (site, sink) = Site::for_tests(fake.clone());

        let subscription = Subscription {
            email: "a@b.co".into(),
            timestamp: Site::now_iso(),
            source: "test".into(),
        };
        let reply = futures::executor::block_on(site.submit.subscribe_newsletter(&subscription));
        assert!(reply.is_ok());
        assert_eq!(fake.newsletter_calls.get(), 1);
        assert_eq!(fake.calls(), 1);
        assert!(sink.events.borrow().is_empty());
    }

    #[test]
    fn test_now_iso_format() {
        let ts = Site::now_iso();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
