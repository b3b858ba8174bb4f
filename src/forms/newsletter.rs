//! Newsletter Signup

use std::rc::Rc;

use leptos::task::spawn_local;
use log::{debug, error, info};
use web_sys::{Document, HtmlButtonElement, HtmlFormElement, HtmlInputElement};

use super::{attempt, failure_message, on_submit, rules, Attempt, MessageBox, MessageKind, PhaseCell};
use crate::api::Subscription;
use crate::site::Site;
use crate::utils::dom::{self, Listener};
use crate::utils::toast::Severity;

const FORM_ID: &str = "newsletterForm";
const EMAIL_ID: &str = "newsletter-email";
const MESSAGE_ID: &str = "newsletterMessage";
const SUBMIT: &str = r#"button[type="submit"]"#;
const SUBSCRIBING: &str = "Subscribing...";
const SOURCE: &str = "blog_page";
const SUCCESS: &str = "🎉 Success! You're now subscribed to our newsletter.";
const FALLBACK: &str = "Oops! Something went wrong. Please try again.";
const THANKS: &str = "Thank you for subscribing!";

pub const SUBSCRIPTION_KEY: &str = "newsletterSubscription";

struct Inner {
    site: Rc<Site>,
    form: HtmlFormElement,
    email: HtmlInputElement,
    message: MessageBox,
    phase: PhaseCell,
}

pub struct NewsletterForm {
    _inner: Rc<Inner>,
    _listeners: Vec<Listener>,
}

impl NewsletterForm {
    pub fn bind(site: &Rc<Site>, document: &Document) -> Option<Self> {
        let form: HtmlFormElement = dom::by_id(document, FORM_ID)?;
        let email: HtmlInputElement = dom::by_id(document, EMAIL_ID)?;
        let inner = Rc::new(Inner {
            site: site.clone(),
            message: MessageBox::new(document.get_element_by_id(MESSAGE_ID)),
            phase: PhaseCell::default(),
            form,
            email,
        });
        inner.prefill();

        let mut listeners = Vec::new();
        let blurred = inner.clone();
        listeners.push(Listener::new(&inner.email, "blur", move |_| {
            blurred.check_email();
        }));
        let typed = inner.clone();
        listeners.push(Listener::new(&inner.email, "input", move |_| {
            if dom::has_error(&typed.email) {
                dom::clear_error(&typed.email);
            }
            typed.message.hide();
        }));
        let submitting = inner.clone();
        listeners.push(on_submit(&inner.form, move || {
            spawn_local(submit(submitting.clone()));
        }));

        Some(Self {
            _inner: inner,
            _listeners: listeners,
        })
    }
}

impl Inner {
    fn prefill(&self) {
        if let Some(existing) = self.site.storage.get::<Subscription>(SUBSCRIPTION_KEY) {
            debug!("[newsletter] already subscribed as {}", existing.email);
            if !existing.email.is_empty() {
                self.email.set_value(&existing.email);
            }
        }
    }

    fn check_email(&self) -> bool {
        dom::clear_error(&self.email);
        match rules::newsletter_email(self.email.value().trim()) {
            Ok(()) => true,
            Err(message) => {
                dom::show_error(&self.email, message);
                false
            }
        }
    }
}

async fn submit(form: Rc<Inner>) {
    if form.phase.get().is_busy() {
        return;
    }
    let email = form.email.value().trim().to_string();
    form.message.hide();

    let subscription = Subscription {
        email: email.clone(),
        timestamp: Site::now_iso(),
        source: SOURCE.to_string(),
    };
    let button = dom::query::<HtmlButtonElement>(&form.form, SUBMIT);
    let outcome = attempt(
        &form.phase,
        || rules::newsletter_email(&email).is_ok(),
        button,
        SUBSCRIBING,
        || form.site.submit.subscribe_newsletter(&subscription),
    )
    .await;

    let site = &form.site;
    match outcome {
        Attempt::Busy => {}
        Attempt::Rejected => {
            dom::show_error(&form.email, rules::INVALID_EMAIL);
            form.message.show(rules::INVALID_EMAIL, MessageKind::Error);
        }
        Attempt::Sent(Ok(_)) => {
            site.storage.set(SUBSCRIPTION_KEY, &subscription);
            site.analytics
                .track_event("Newsletter", "Subscribe", Some("Blog Page"), Some(email.as_str().into()));
            form.message
                .flash(SUCCESS, MessageKind::Success, site.config.timings.success_hide_ms);
            form.form.reset();
            site.toast(THANKS, Severity::Success);
            info!("[newsletter] subscribed {}", email);
        }
        Attempt::Sent(Err(e)) => {
            error!("[newsletter] subscribe failed: {}", e);
            let text = failure_message(&e, FALLBACK);
            form.message.show(&text, MessageKind::Error);
            site.analytics
                .track_event("Newsletter", "Error", Some("Blog Page"), Some(e.to_string().into()));
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use any_spawner::Executor;
    use wasm_bindgen_test::wasm_bindgen_test;
    use web_sys::Element;

    use super::*;
    use crate::api::fake::FakeSubmitApi;
    use crate::utils::analytics::recording::RecordingSink;

    const PAGE: &str = r#"
        <form id="newsletterForm">
            <div class="form-group"><input id="newsletter-email" type="email"></div>
            <button type="submit">Subscribe</button>
        </form>
        <div id="newsletterMessage" class="form-message"></div>
    "#;

    struct Page {
        root: Element,
        site: Rc<Site>,
        sink: RecordingSink,
        form: NewsletterForm,
    }

    fn mount(fake: &Rc<FakeSubmitApi>) -> Page {
        let _ = Executor::init_wasm_bindgen();
        let document = dom::document().unwrap();
        let root = document.create_element("div").unwrap();
        root.set_inner_html(PAGE);
        document.body().unwrap().append_child(&root).unwrap();

        let (site, sink) = Site::for_tests(fake.clone());
        let form = NewsletterForm::bind(&site, &document).unwrap();
        Page { root, site, sink, form }
    }

    #[wasm_bindgen_test]
    async fn test_invalid_email_sends_nothing() {
        let fake = Rc::new(FakeSubmitApi::default());
        let page = mount(&fake);
        page.form._inner.email.set_value("not-an-email");

        submit(page.form._inner.clone()).await;

        assert_eq!(fake.calls(), 0);
        assert!(dom::has_error(&page.form._inner.email));
        let message = page.form._inner.message.element().unwrap();
        assert_eq!(message.text_content().as_deref(), Some(rules::INVALID_EMAIL));
        assert!(page.site.storage.get::<Subscription>(SUBSCRIPTION_KEY).is_none());
        page.root.remove();
    }

    #[wasm_bindgen_test]
    async fn test_success_saves_subscription() {
        let fake = Rc::new(FakeSubmitApi::default());
        let page = mount(&fake);
        let inner = page.form._inner.clone();
        inner.email.set_value(" reader@example.com ");

        submit(inner.clone()).await;

        assert_eq!(fake.newsletter_calls.get(), 1);
        let saved = page.site.storage.get::<Subscription>(SUBSCRIPTION_KEY).unwrap();
        assert_eq!(saved.email, "reader@example.com");
        assert_eq!(saved.source, "blog_page");

        let message = inner.message.element().unwrap();
        assert_eq!(message.text_content().as_deref(), Some(SUCCESS));
        assert_eq!(message.class_name(), "form-message success show");
        assert_eq!(inner.email.value(), "");

        let button: HtmlButtonElement = dom::query(&page.root, SUBMIT).unwrap();
        assert_eq!(button.text_content().as_deref(), Some("Subscribe"));

        let document = dom::document().unwrap();
        assert!(document.query_selector(".toast.toast-success").unwrap().is_some());
        assert_eq!(page.sink.events.borrow()[0].0, "Subscribe");
        page.root.remove();
    }

    #[wasm_bindgen_test]
    async fn test_failure_keeps_email() {
        let fake = Rc::new(FakeSubmitApi::failing(503));
        let page = mount(&fake);
        let inner = page.form._inner.clone();
        inner.email.set_value("reader@example.com");

        submit(inner.clone()).await;

        assert_eq!(fake.newsletter_calls.get(), 1);
        assert_eq!(inner.email.value(), "reader@example.com");
        let message = inner.message.element().unwrap();
        assert_eq!(message.text_content().as_deref(), Some(FALLBACK));
        assert!(page.site.storage.get::<Subscription>(SUBSCRIPTION_KEY).is_none());
        assert_eq!(page.sink.events.borrow()[0].0, "Error");
        page.root.remove();
    }
}
