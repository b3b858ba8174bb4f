//! Toast Notifications
//!
//! Transient overlay messages mounted on `<body>` with Leptos. A toast fades
//! in, stays for its duration, fades out and is unmounted.

use gloo_timers::callback::Timeout;
use leptos::mount::mount_to;
use leptos::prelude::*;
use log::warn;

use crate::config::Timings;
use crate::utils::dom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// CSS class list for a toast in the given state
pub fn toast_class(severity: Severity, shown: bool) -> String {
    if shown {
        format!("toast toast-{} show", severity.as_str())
    } else {
        format!("toast toast-{}", severity.as_str())
    }
}

/// Show `message` for `duration_ms`, using the show/removal delays from `timings`
pub fn show_toast(message: &str, severity: Severity, duration_ms: u32, timings: &Timings) {
    let body = match dom::document().map(|d| d.body()) {
        Ok(Some(body)) => body,
        _ => {
            warn!("[toast] no <body> to mount on");
            return;
        }
    };

    let shown = RwSignal::new(false);
    let text = message.to_string();
    let handle = mount_to(body, move || {
        view! {
            <div class=move || toast_class(severity, shown.get()) role="alert" aria-live="polite">
                {text}
            </div>
        }
    });

    let removal_ms = timings.toast_removal_ms;
    Timeout::new(timings.toast_show_delay_ms, move || shown.set(true)).forget();
    Timeout::new(duration_ms, move || {
        shown.set(false);
        Timeout::new(removal_ms, move || {
            drop(handle);
            shown.dispose();
        })
        .forget();
    })
    .forget();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_class() {
        assert_eq!(toast_class(Severity::Success, false), "toast toast-success");
        assert_eq!(toast_class(Severity::Error, true), "toast toast-error show");
        assert_eq!(toast_class(Severity::Warning, true), "toast toast-warning show");
        assert_eq!(Severity::Info.as_str(), "info");
    }
}
