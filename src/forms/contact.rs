//! Contact Form
//!
//! Validates and posts the contact form as JSON. Field values are saved as
//! drafts while the visitor types and restored on the next visit.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::task::spawn_local;
use log::{error, info};
use web_sys::{Document, HtmlButtonElement, HtmlFormElement};

use super::{
    attempt, check_all, failure_message, on_submit, rules, value_of, watch_fields, Attempt, Field, MessageBox, MessageKind,
    PhaseCell,
};
use crate::api::ContactArgs;
use crate::site::Site;
use crate::utils::dom::{self, Listener};
use crate::utils::timing::debounce;

const FORM_ID: &str = "contactForm";
const MESSAGE_ID: &str = "formMessage";
const FIELDS: &str = ".form-input, .form-textarea";
const SUBMIT: &str = ".btn-submit";
const SENDING: &str = "Sending...";
const FALLBACK: &str = "Something went wrong. Please email us at hello@orivanta.ai";
const THANKS: &str = "Thanks for reaching out! We'll get back to you shortly.";
const DRAFT_PREFIX: &str = "contact_";

pub fn draft_key(field_name: &str) -> String {
    format!("{}{}", DRAFT_PREFIX, field_name)
}

struct Inner {
    site: Rc<Site>,
    form: HtmlFormElement,
    fields: Vec<Field>,
    message: MessageBox,
    phase: PhaseCell,
    clear_drafts: RefCell<Option<Timeout>>,
}

pub struct ContactForm {
    _inner: Rc<Inner>,
    _listeners: Vec<Listener>,
}

impl ContactForm {
    /// `None` when the page has no contact form
    pub fn bind(site: &Rc<Site>, document: &Document) -> Option<Self> {
        let form: HtmlFormElement = dom::by_id(document, FORM_ID)?;
        let fields = Field::collect(&form, FIELDS);
        let inner = Rc::new(Inner {
            site: site.clone(),
            message: MessageBox::new(document.get_element_by_id(MESSAGE_ID)),
            phase: PhaseCell::default(),
            clear_drafts: RefCell::new(None),
            fields,
            form,
        });

        let mut listeners = watch_fields(&inner.fields, rules::contact_field);
        listeners.extend(inner.autosave());

        let submitting = inner.clone();
        listeners.push(on_submit(&inner.form, move || {
            spawn_local(submit(submitting.clone()));
        }));

        info!("[contact] form bound ({} fields)", inner.fields.len());
        Some(Self {
            _inner: inner,
            _listeners: listeners,
        })
    }
}

impl Inner {
    /// Restore saved drafts into empty fields and save new input, debounced
    fn autosave(&self) -> Vec<Listener> {
        let wait = self.site.config.timings.draft_save_ms;
        self.fields
            .iter()
            .map(|field| {
                let key = draft_key(&field.name());
                if field.value().is_empty() {
                    if let Some(saved) = self.site.storage.get::<String>(&key) {
                        field.set_value(&saved);
                    }
                }

                let site = self.site.clone();
                let source = field.clone();
                let save = debounce(
                    move |_: ()| {
                        let value = source.trimmed();
                        if !value.is_empty() {
                            site.storage.set(&key, &value);
                        }
                    },
                    wait,
                );
                Listener::new(field.element(), "input", move |_| save.call(()))
            })
            .collect()
    }

    fn schedule_draft_clear(&self) {
        let site = self.site.clone();
        let keys: Vec<String> = self.fields.iter().map(|f| draft_key(&f.name())).collect();
        let timeout = Timeout::new(self.site.config.timings.draft_clear_ms, move || {
            for key in &keys {
                site.storage.remove(key);
            }
        });
        *self.clear_drafts.borrow_mut() = Some(timeout);
    }

    fn args(&self) -> ContactArgs {
        ContactArgs {
            name: value_of(&self.fields, "name"),
            email: value_of(&self.fields, "email"),
            company: value_of(&self.fields, "company"),
            notes: value_of(&self.fields, "notes"),
            timestamp: Site::now_iso(),
        }
    }
}

async fn submit(form: Rc<Inner>) {
    if form.phase.get().is_busy() {
        return;
    }
    form.message.hide();

    let button = dom::query::<HtmlButtonElement>(&form.form, SUBMIT);
    let args = form.args();
    let outcome = attempt(
        &form.phase,
        || check_all(&form.fields, rules::contact_field),
        button,
        SENDING,
        || form.site.submit.submit_contact(&args),
    )
    .await;

    let analytics = &form.site.analytics;
    match outcome {
        Attempt::Busy => {}
        Attempt::Rejected => form.message.show(rules::FIX_ERRORS, MessageKind::Error),
        Attempt::Sent(Ok(reply)) => {
            analytics.track_event("Form", "Submit", Some("Contact Form"), None);
            let text = reply.message.as_deref().filter(|m| !m.trim().is_empty()).unwrap_or(THANKS);
            form.message.show(text, MessageKind::Success);
            form.form.reset();
            form.schedule_draft_clear();
            scroll_to_message(&form);
        }
        Attempt::Sent(Err(e)) => {
            error!("[contact] submit failed: {}", e);
            let text = failure_message(&e, FALLBACK);
            form.message.show(&text, MessageKind::Error);
            analytics.track_event("Form", "Error", Some("Contact Form"), Some(text.into()));
        }
    }
}

fn scroll_to_message(form: &Inner) {
    let Some(el) = form.message.element().cloned() else {
        return;
    };
    let offset = form.site.config.layout.anchor_offset;
    Timeout::new(form.site.config.timings.message_scroll_delay_ms, move || {
        dom::scroll_to_element(&el, offset);
    })
    .forget();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_key() {
        assert_eq!(draft_key("email"), "contact_email");
        assert_eq!(draft_key("notes"), "contact_notes");
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use std::cell::RefCell;

    use any_spawner::Executor;
    use wasm_bindgen_test::wasm_bindgen_test;
    use web_sys::{Element, HtmlInputElement, HtmlTextAreaElement};

    use super::*;
    use crate::api::fake::FakeSubmitApi;
    use crate::forms::FormPhase;

    const PAGE: &str = r#"
        <form id="contactForm">
            <div class="form-group"><input class="form-input" name="name" required></div>
            <div class="form-group"><input class="form-input" type="email" name="email" required></div>
            <div class="form-group"><input class="form-input" name="company"></div>
            <div class="form-group"><textarea class="form-textarea" name="notes"></textarea></div>
            <button type="submit" class="btn-submit">Send Message</button>
        </form>
        <div id="formMessage" class="form-message"></div>
    "#;

    struct Page {
        root: Element,
        form: ContactForm,
        button: HtmlButtonElement,
    }

    fn mount(fake: &Rc<FakeSubmitApi>) -> Page {
        let _ = Executor::init_wasm_bindgen();
        let document = dom::document().unwrap();
        let root = document.create_element("div").unwrap();
        root.set_inner_html(PAGE);
        document.body().unwrap().append_child(&root).unwrap();

        let (site, _) = Site::for_tests(fake.clone());
        let form = ContactForm::bind(&site, &document).unwrap();
        let button = dom::query(&root, SUBMIT).unwrap();
        Page { root, form, button }
    }

    fn fill_valid(page: &Page) {
        let input = |name: &str| -> HtmlInputElement {
            dom::query(&page.root, &format!(r#"[name="{}"]"#, name)).unwrap()
        };
        input("name").set_value("Ada Lovelace");
        input("email").set_value("ada@example.com");
        let notes: HtmlTextAreaElement = dom::query(&page.root, r#"[name="notes"]"#).unwrap();
        notes.set_value("Interested in a pilot project.");
    }

    fn message(page: &Page) -> Element {
        dom::query(&page.root, "#formMessage").unwrap()
    }

    #[wasm_bindgen_test]
    async fn test_invalid_form_sends_nothing() {
        let fake = Rc::new(FakeSubmitApi::default());
        let page = mount(&fake);

        submit(page.form._inner.clone()).await;

        assert_eq!(fake.calls(), 0);
        assert_eq!(message(&page).text_content().as_deref(), Some(rules::FIX_ERRORS));
        assert_eq!(message(&page).class_name(), "form-message error show");
        assert_eq!(page.button.text_content().as_deref(), Some("Send Message"));
        assert_eq!(page.form._inner.phase.get(), FormPhase::Idle);
        page.root.remove();
    }

    #[wasm_bindgen_test]
    async fn test_button_restored_after_success() {
        let fake = Rc::new(FakeSubmitApi::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let page = mount(&fake);
        fill_valid(&page);

        let (button, log) = (page.button.clone(), seen.clone());
        *fake.on_send.borrow_mut() = Some(Box::new(move || {
            log.borrow_mut().push((button.text_content().unwrap_or_default(), button.disabled()));
        }));

        submit(page.form._inner.clone()).await;

        assert_eq!(fake.contact_calls.get(), 1);
        assert_eq!(*seen.borrow(), vec![(" Sending...".to_string(), true)]);
        assert_eq!(page.button.text_content().as_deref(), Some("Send Message"));
        assert!(!page.button.disabled());
        assert_eq!(message(&page).text_content().as_deref(), Some(THANKS));
        page.root.remove();
    }

    #[wasm_bindgen_test]
    async fn test_button_restored_after_failure() {
        let fake = Rc::new(FakeSubmitApi::failing(500));
        let page = mount(&fake);
        fill_valid(&page);

        submit(page.form._inner.clone()).await;

        assert_eq!(fake.contact_calls.get(), 1);
        assert_eq!(page.button.text_content().as_deref(), Some("Send Message"));
        assert!(!page.button.disabled());
        assert_eq!(message(&page).text_content().as_deref(), Some(FALLBACK));
        assert_eq!(message(&page).class_name(), "form-message error show");
        page.root.remove();
    }
}
