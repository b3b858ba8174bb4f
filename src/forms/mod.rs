//! Form Submission
//!
//! Shared machinery for the site's forms: the submission phase machine, a
//! typed handle over input/textarea/select fields, the form-level message box
//! and live field validation.

pub mod careers;
pub mod contact;
pub mod newsletter;
pub mod rules;

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, Event, HtmlButtonElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement,
};

use crate::api::ApiReply;
use crate::error::SiteError;
use crate::utils::dom::{self, Listener, LoadingGuard};

pub use careers::{ApplicationForm, JobAlertForm};
pub use contact::ContactForm;
pub use newsletter::NewsletterForm;

// ========================
// Phase Machine
// ========================

/// Where a form is in its submit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Validating,
    Rejected,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("form cannot move from {from:?} to {to:?}")]
pub struct IllegalTransition {
    pub from: FormPhase,
    pub to: FormPhase,
}

impl FormPhase {
    pub fn can_become(self, next: FormPhase) -> bool {
        use FormPhase::*;
        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, Rejected)
                | (Validating, Submitting)
                | (Submitting, Succeeded)
                | (Submitting, Failed)
                | (Rejected | Succeeded | Failed, Idle)
        )
    }

    pub fn advance(self, next: FormPhase) -> Result<FormPhase, IllegalTransition> {
        if self.can_become(next) {
            Ok(next)
        } else {
            Err(IllegalTransition { from: self, to: next })
        }
    }

    pub fn is_busy(self) -> bool {
        matches!(self, FormPhase::Validating | FormPhase::Submitting)
    }
}

/// Shared, mutable phase of one form
#[derive(Debug, Clone, Default)]
pub struct PhaseCell(Rc<Cell<FormPhase>>);

impl PhaseCell {
    pub fn get(&self) -> FormPhase {
        self.0.get()
    }

    pub fn advance(&self, next: FormPhase) -> Result<(), IllegalTransition> {
        self.0.set(self.0.get().advance(next)?);
        Ok(())
    }

    /// Start a submit cycle; `false` while one is already running
    pub fn begin(&self) -> bool {
        self.advance(FormPhase::Validating).is_ok()
    }

    /// Record a terminal outcome and return to idle
    pub fn settle(&self, outcome: FormPhase) {
        if let Err(e) = self.advance(outcome) {
            log::warn!("[forms] {}", e);
        }
        self.0.set(FormPhase::Idle);
    }
}

fn step(phase: &PhaseCell, next: FormPhase) {
    if let Err(e) = phase.advance(next) {
        log::warn!("[forms] {}", e);
    }
}

/// How one press of a submit button ended
#[derive(Debug)]
pub enum Attempt {
    /// A submission was already running
    Busy,
    /// Validation failed; nothing was sent
    Rejected,
    Sent(Result<ApiReply, SiteError>),
}

/// One submit cycle: validate, then send with `button` showing `busy_label`
/// until the reply arrives. The phase is back to idle when this returns.
pub async fn attempt<V, S, Fut>(
    phase: &PhaseCell,
    validate: V,
    button: Option<HtmlButtonElement>,
    busy_label: &str,
    send: S,
) -> Attempt
where
    V: FnOnce() -> bool,
    S: FnOnce() -> Fut,
    Fut: Future<Output = Result<ApiReply, SiteError>>,
{
    if !phase.begin() {
        return Attempt::Busy;
    }
    if !validate() {
        step(phase, FormPhase::Rejected);
        phase.settle(FormPhase::Idle);
        return Attempt::Rejected;
    }
    step(phase, FormPhase::Submitting);

    let result = {
        let _loading = LoadingGuard::engage(button, busy_label);
        send().await
    };
    phase.settle(if result.is_ok() {
        FormPhase::Succeeded
    } else {
        FormPhase::Failed
    });
    Attempt::Sent(result)
}

// ========================
// Fields
// ========================

#[derive(Debug, Clone)]
pub enum Field {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
    Select(HtmlSelectElement),
}

impl Field {
    pub fn from_element(el: Element) -> Option<Self> {
        let el = match el.dyn_into::<HtmlInputElement>() {
            Ok(input) => return Some(Self::Input(input)),
            Err(el) => el,
        };
        let el = match el.dyn_into::<HtmlTextAreaElement>() {
            Ok(area) => return Some(Self::TextArea(area)),
            Err(el) => el,
        };
        el.dyn_into::<HtmlSelectElement>().ok().map(Self::Select)
    }

    /// Every field under `form` matching `selector`
    pub fn collect(form: &HtmlFormElement, selector: &str) -> Vec<Self> {
        dom::query_all::<Element>(form, selector)
            .into_iter()
            .filter_map(Self::from_element)
            .collect()
    }

    pub fn element(&self) -> &Element {
        match self {
            Self::Input(el) => el,
            Self::TextArea(el) => el,
            Self::Select(el) => el,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Input(el) => el.name(),
            Self::TextArea(el) => el.name(),
            Self::Select(el) => el.name(),
        }
    }

    pub fn value(&self) -> String {
        match self {
            Self::Input(el) => el.value(),
            Self::TextArea(el) => el.value(),
            Self::Select(el) => el.value(),
        }
    }

    pub fn trimmed(&self) -> String {
        self.value().trim().to_string()
    }

    pub fn set_value(&self, value: &str) {
        match self {
            Self::Input(el) => el.set_value(value),
            Self::TextArea(el) => el.set_value(value),
            Self::Select(el) => el.set_value(value),
        }
    }

    pub fn is_required(&self) -> bool {
        self.element().has_attribute("required")
    }

    /// Apply `rule` to the trimmed value and show or clear the error
    pub fn check(&self, rule: impl Fn(&str, &str, bool) -> rules::RuleResult) -> bool {
        dom::clear_error(self.element());
        match rule(&self.name(), &self.trimmed(), self.is_required()) {
            Ok(()) => true,
            Err(message) => {
                dom::show_error(self.element(), message);
                false
            }
        }
    }
}

/// Trimmed value of the field called `name`
pub fn value_of(fields: &[Field], name: &str) -> String {
    fields
        .iter()
        .find(|f| f.name() == name)
        .map(Field::trimmed)
        .unwrap_or_default()
}

/// Check every field, showing each error; `true` when all pass
pub fn check_all(fields: &[Field], rule: impl Fn(&str, &str, bool) -> rules::RuleResult + Copy) -> bool {
    // No short-circuit: every invalid field gets its message
    fields.iter().fold(true, |ok, field| field.check(rule) && ok)
}

/// Validate on blur; typing into a field in error clears it
pub fn watch_fields<R>(fields: &[Field], rule: R) -> Vec<Listener>
where
    R: Fn(&str, &str, bool) -> rules::RuleResult + Copy + 'static,
{
    let mut listeners = Vec::with_capacity(fields.len() * 2);
    for field in fields {
        let on_blur = field.clone();
        listeners.push(Listener::new(field.element(), "blur", move |_| {
            on_blur.check(rule);
        }));
        let on_input = field.clone();
        listeners.push(Listener::new(field.element(), "input", move |_| {
            if dom::has_error(on_input.element()) {
                dom::clear_error(on_input.element());
            }
        }));
    }
    listeners
}

// ========================
// Form Message
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

pub fn message_class(kind: Option<MessageKind>) -> String {
    match kind {
        Some(kind) => format!("form-message {} show", kind.as_str()),
        None => "form-message".to_string(),
    }
}

/// The status line under a form
#[derive(Clone)]
pub struct MessageBox {
    el: Option<Element>,
    auto_hide: Rc<RefCell<Option<Timeout>>>,
}

impl MessageBox {
    pub fn new(el: Option<Element>) -> Self {
        Self {
            el,
            auto_hide: Rc::new(RefCell::new(None)),
        }
    }

    pub fn element(&self) -> Option<&Element> {
        self.el.as_ref()
    }

    pub fn show(&self, text: &str, kind: MessageKind) {
        // A newer message must not be hidden by an older timer
        self.auto_hide.borrow_mut().take();
        if let Some(el) = &self.el {
            el.set_text_content(Some(text));
            el.set_class_name(&message_class(Some(kind)));
        }
    }

    /// Show, then hide after `ms`
    pub fn flash(&self, text: &str, kind: MessageKind, ms: u32) {
        self.show(text, kind);
        let Some(el) = self.el.clone() else {
            return;
        };
        let timeout = Timeout::new(ms, move || {
            el.set_class_name(&message_class(None));
            el.set_text_content(Some(""));
        });
        *self.auto_hide.borrow_mut() = Some(timeout);
    }

    pub fn hide(&self) {
        self.auto_hide.borrow_mut().take();
        if let Some(el) = &self.el {
            el.set_class_name(&message_class(None));
            el.set_text_content(Some(""));
        }
    }
}

/// User-facing reason for a failed submission
pub fn failure_message(error: &SiteError, fallback: &str) -> String {
    error.server_message().unwrap_or(fallback).to_string()
}

/// Submit listener that cancels the native submission and hands off to `f`
pub fn on_submit(form: &HtmlFormElement, mut f: impl FnMut() + 'static) -> Listener {
    Listener::new(form, "submit", move |ev: Event| {
        ev.prevent_default();
        f();
    })
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use FormPhase::*;

    #[test]
    fn test_happy_path() {
        let phase = PhaseCell::default();
        assert!(phase.begin());
        phase.advance(Submitting).unwrap();
        assert!(phase.get().is_busy());
        phase.settle(Succeeded);
        assert_eq!(phase.get(), Idle);
    }

    #[test]
    fn test_rejects_submit_in_flight() {
        let phase = PhaseCell::default();
        assert!(phase.begin());
        phase.advance(Submitting).unwrap();
        assert!(!phase.begin());
        phase.settle(Failed);
        assert!(phase.begin());
    }

    #[test]
    fn test_rejected_never_reaches_submitting() {
        let phase = PhaseCell::default();
        phase.begin();
        phase.advance(Rejected).unwrap();
        assert_eq!(
            phase.advance(Submitting),
            Err(IllegalTransition { from: Rejected, to: Submitting })
        );
        phase.settle(Idle);
        assert_eq!(phase.get(), Idle);
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(Idle.advance(Submitting).is_err());
        assert!(Idle.advance(Succeeded).is_err());
        assert!(Validating.advance(Succeeded).is_err());
        assert!(Submitting.advance(Idle).is_err());
        assert!(Succeeded.advance(Validating).is_err());
        assert!(Failed.advance(Idle).is_ok());
    }

    #[test]
    fn test_attempt_rejected_sends_nothing() {
        let phase = PhaseCell::default();
        let sent = Cell::new(0);
        let outcome = block_on(attempt(&phase, || false, None, "Sending...", || {
            sent.set(sent.get() + 1);
            async { Ok(ApiReply::default()) }
        }));
        assert!(matches!(outcome, Attempt::Rejected));
        assert_eq!(sent.get(), 0);
        assert_eq!(phase.get(), Idle);
    }

    #[test]
    fn test_attempt_sends_once_when_valid() {
        let phase = PhaseCell::default();
        let sent = Cell::new(0);
        let outcome = block_on(attempt(&phase, || true, None, "Sending...", || {
            sent.set(sent.get() + 1);
            // In flight: a second press must be turned away
            assert_eq!(phase.get(), Submitting);
            assert!(!phase.begin());
            async {
                Ok(ApiReply {
                    message: Some("ok".into()),
                })
            }
        }));
        assert!(matches!(outcome, Attempt::Sent(Ok(ref reply)) if reply.message.as_deref() == Some("ok")));
        assert_eq!(sent.get(), 1);
        assert_eq!(phase.get(), Idle);
    }

    #[test]
    fn test_attempt_busy_while_running() {
        let phase = PhaseCell::default();
        assert!(phase.begin());
        let outcome = block_on(attempt(&phase, || true, None, "Sending...", || async {
            Ok(ApiReply::default())
        }));
        assert!(matches!(outcome, Attempt::Busy));
        assert_eq!(phase.get(), Validating);
    }

    #[test]
    fn test_attempt_failure_allows_retry() {
        let phase = PhaseCell::default();
        let outcome = block_on(attempt(&phase, || true, None, "Sending...", || async {
            Err(SiteError::Network("offline".into()))
        }));
        assert!(matches!(outcome, Attempt::Sent(Err(SiteError::Network(_)))));
        assert_eq!(phase.get(), Idle);
        assert!(phase.begin());
    }

    #[test]
    fn test_message_class() {
        assert_eq!(message_class(Some(MessageKind::Success)), "form-message success show");
        assert_eq!(message_class(Some(MessageKind::Error)), "form-message error show");
        assert_eq!(message_class(None), "form-message");
    }

    #[test]
    fn test_failure_message() {
        let http = SiteError::Http {
            status: 422,
            message: Some("Email already registered".into()),
        };
        assert_eq!(failure_message(&http, "fallback"), "Email already registered");
        let net = SiteError::Network("offline".into());
        assert_eq!(failure_message(&net, "fallback"), "fallback");
    }
}
