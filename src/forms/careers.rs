//! Careers Forms
//!
//! The job-alert signup is stored locally only. The application form posts
//! multipart data, including an optional résumé read from the file input.

use std::rc::Rc;

use js_sys::Uint8Array;
use leptos::task::spawn_local;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlButtonElement, HtmlFormElement, HtmlInputElement};

use super::{
    attempt, check_all, failure_message, on_submit, rules, value_of, watch_fields, Attempt, Field, MessageBox, MessageKind,
    PhaseCell,
};
use crate::api::{ApplicationArgs, Resume};
use crate::error::SiteError;
use crate::site::Site;
use crate::utils::dom::{self, Listener};
use crate::utils::toast::Severity;
use crate::utils::validation::validate_email;

// ========================
// Job Alert
// ========================

pub const JOB_ALERT_KEY: &str = "jobAlertSubscription";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAlert {
    pub email: String,
    pub timestamp: String,
}

pub struct JobAlertForm {
    _listener: Listener,
}

impl JobAlertForm {
    pub fn bind(site: &Rc<Site>, document: &Document) -> Option<Self> {
        let form: HtmlFormElement = dom::by_id(document, "jobAlertForm")?;
        let site = site.clone();
        let target = form.clone();
        let listener = on_submit(&form, move || {
            let email = dom::query::<HtmlInputElement>(&target, r#"input[type="email"]"#)
                .map(|input| input.value().trim().to_string())
                .unwrap_or_default();
            if email.is_empty() || !validate_email(&email) {
                site.toast("Please enter a valid email address", Severity::Error);
                return;
            }
            let alert = JobAlert {
                email: email.clone(),
                timestamp: Site::now_iso(),
            };
            site.storage.set(JOB_ALERT_KEY, &alert);
            site.analytics
                .track_event("Careers", "Job Alert Signup", Some(&email), None);
            site.toast("Thank you! We'll notify you when positions open up.", Severity::Success);
            target.reset();
        });
        Some(Self { _listener: listener })
    }
}

// ========================
// Application
// ========================

const APPLICATION_ID: &str = "careerApplicationForm";
const MESSAGE_ID: &str = "applicationMessage";
const FIELDS: &str = ".form-input, .form-textarea, .form-select";
const RESUME_INPUT: &str = r#"input[type="file"]"#;
const SUBMIT: &str = r#"button[type="submit"]"#;
const SUBMITTING: &str = "Submitting...";
const THANKS: &str = "Thank you for applying! We'll be in touch soon.";
const FALLBACK: &str = "Something went wrong. Please email us at careers@orivanta.ai";

struct Inner {
    site: Rc<Site>,
    form: HtmlFormElement,
    fields: Vec<Field>,
    message: MessageBox,
    phase: PhaseCell,
}

pub struct ApplicationForm {
    _inner: Rc<Inner>,
    _listeners: Vec<Listener>,
}

impl ApplicationForm {
    pub fn bind(site: &Rc<Site>, document: &Document) -> Option<Self> {
        let form: HtmlFormElement = dom::by_id(document, APPLICATION_ID)?;
        let fields = Field::collect(&form, FIELDS)
            .into_iter()
            .filter(|f| !matches!(f, Field::Input(input) if input.type_() == "file"))
            .collect();
        let inner = Rc::new(Inner {
            site: site.clone(),
            message: MessageBox::new(document.get_element_by_id(MESSAGE_ID)),
            phase: PhaseCell::default(),
            fields,
            form,
        });

        let mut listeners = watch_fields(&inner.fields, rules::application_field);
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

/// Contents of the first selected file, if any
async fn read_resume(form: &HtmlFormElement) -> Result<Option<Resume>, SiteError> {
    let Some(file) = dom::query::<HtmlInputElement>(form, RESUME_INPUT)
        .and_then(|input| input.files())
        .and_then(|files| files.get(0))
    else {
        return Ok(None);
    };
    let buffer = JsFuture::from(file.array_buffer()).await.map_err(SiteError::js)?;
    Ok(Some(Resume {
        file_name: file.name(),
        mime: file.type_(),
        bytes: Uint8Array::new(&buffer).to_vec(),
    }))
}

async fn submit(form: Rc<Inner>) {
    if form.phase.get().is_busy() {
        return;
    }
    form.message.hide();

    let position = value_of(&form.fields, "position");
    let button = dom::query::<HtmlButtonElement>(&form.form, SUBMIT);
    let (inner, applied_for) = (&*form, &position);
    let outcome = attempt(
        &form.phase,
        || check_all(&form.fields, rules::application_field),
        button,
        SUBMITTING,
        move || async move {
            let resume = match read_resume(&inner.form).await {
                Ok(resume) => resume,
                Err(e) => {
                    warn!("[careers] could not read resume: {}", e);
                    None
                }
            };
            let phone = value_of(&inner.fields, "phone");
            let args = ApplicationArgs {
                name: value_of(&inner.fields, "name"),
                email: value_of(&inner.fields, "email"),
                phone: (!phone.is_empty()).then_some(phone),
                position: applied_for.clone(),
                message: value_of(&inner.fields, "message"),
                timestamp: Site::now_iso(),
                resume,
            };
            inner.site.submit.submit_application(args).await
        },
    )
    .await;

    let analytics = &form.site.analytics;
    match outcome {
        Attempt::Busy => {}
        Attempt::Rejected => form.message.show(rules::FIX_ERRORS, MessageKind::Error),
        Attempt::Sent(Ok(reply)) => {
            let text = reply.message.as_deref().filter(|m| !m.trim().is_empty()).unwrap_or(THANKS);
            form.message.show(text, MessageKind::Success);
            form.form.reset();
            analytics.track_event("Careers", "Apply", Some(&position), None);
            info!("[careers] application sent for {}", position);
        }
        Attempt::Sent(Err(e)) => {
            error!("[careers] application failed: {}", e);
            let text = failure_message(&e, FALLBACK);
            form.message.show(&text, MessageKind::Error);
            analytics.track_event("Careers", "Application Error", Some(&position), Some(text.into()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_alert_record_shape() {
        let alert = JobAlert {
            email: "dev@example.com".into(),
            timestamp: "2026-01-01T00:00:00.000Z".into(),
        };
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["email"], "dev@example.com");
        assert!(json.get("source").is_none());
    }
}
