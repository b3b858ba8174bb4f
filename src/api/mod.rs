//! Backend API
//!
//! HTTP calls made by the site, organized by flow. On wasm32 `reqwest` runs
//! on top of the browser's `fetch`.

mod careers;
mod contact;
mod fragments;
mod newsletter;

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::config::Endpoints;
use crate::error::SiteError;

pub use careers::*;
pub use contact::*;
pub use fragments::*;
pub use newsletter::*;

/// Body returned by the submission endpoints
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiReply {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    endpoints: Endpoints,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, endpoints: Endpoints) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            endpoints,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiReply, SiteError> {
        let response = self.http.post(self.endpoint(path)).json(body).send().await?;
        read_reply(response).await
    }

    async fn post_multipart(&self, path: &str, form: reqwest::multipart::Form) -> Result<ApiReply, SiteError> {
        let response = self.http.post(self.endpoint(path)).multipart(form).send().await?;
        read_reply(response).await
    }
}

pub type ApiFuture<'a> = Pin<Box<dyn Future<Output = Result<ApiReply, SiteError>> + 'a>>;

/// The form submissions, as seen by the form controllers
pub trait SubmitApi {
    fn submit_contact<'a>(&'a self, args: &'a ContactArgs) -> ApiFuture<'a>;
    fn subscribe_newsletter<'a>(&'a self, subscription: &'a Subscription) -> ApiFuture<'a>;
    fn submit_application(&self, args: ApplicationArgs) -> ApiFuture<'_>;
}

impl SubmitApi for ApiClient {
    fn submit_contact<'a>(&'a self, args: &'a ContactArgs) -> ApiFuture<'a> {
        Box::pin(ApiClient::submit_contact(self, args))
    }

    fn subscribe_newsletter<'a>(&'a self, subscription: &'a Subscription) -> ApiFuture<'a> {
        Box::pin(ApiClient::subscribe_newsletter(self, subscription))
    }

    fn submit_application(&self, args: ApplicationArgs) -> ApiFuture<'_> {
        Box::pin(ApiClient::submit_application(self, args))
    }
}

async fn read_reply(response: reqwest::Response) -> Result<ApiReply, SiteError> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    check_reply(status, &body)
}

/// Non-JSON bodies are treated as carrying no message
pub fn parse_reply(body: &str) -> ApiReply {
    serde_json::from_str(body).unwrap_or_default()
}

/// 2xx is success; anything else fails with the server's message if any
pub fn check_reply(status: u16, body: &str) -> Result<ApiReply, SiteError> {
    let reply = parse_reply(body);
    if (200..300).contains(&status) {
        Ok(reply)
    } else {
        Err(SiteError::Http {
            status,
            message: reply.message,
        })
    }
}

pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
pub(crate) mod fake {
    use std::cell::{Cell, RefCell};

    use super::*;

    /// Answers every submission with a canned reply and counts the calls
    #[derive(Default)]
    pub struct FakeSubmitApi {
        pub contact_calls: Cell<usize>,
        pub newsletter_calls: Cell<usize>,
        pub application_calls: Cell<usize>,
        /// HTTP status to fail with; `None` succeeds
        pub fail_status: Cell<Option<u16>>,
        pub reply_message: RefCell<Option<String>>,
        /// Runs while the request is in flight
        pub on_send: RefCell<Option<Box<dyn Fn()>>>,
    }

    impl FakeSubmitApi {
        pub fn failing(status: u16) -> Self {
            let fake = Self::default();
            fake.fail_status.set(Some(status));
            fake
        }

        pub fn calls(&self) -> usize {
            self.contact_calls.get() + self.newsletter_calls.get() + self.application_calls.get()
        }

        fn answer(&self, counter: &Cell<usize>) -> ApiFuture<'_> {
            counter.set(counter.get() + 1);
            if let Some(hook) = self.on_send.borrow().as_ref() {
                hook();
            }
            let result = match self.fail_status.get() {
                Some(status) => Err(SiteError::Http { status, message: None }),
                None => Ok(ApiReply {
                    message: self.reply_message.borrow().clone(),
                }),
            };
            Box::pin(async move { result })
        }
    }

    impl SubmitApi for FakeSubmitApi {
        fn submit_contact<'a>(&'a self, _args: &'a ContactArgs) -> ApiFuture<'a> {
            self.answer(&self.contact_calls)
        }

        fn subscribe_newsletter<'a>(&'a self, _subscription: &'a Subscription) -> ApiFuture<'a> {
            self.answer(&self.newsletter_calls)
        }

        fn submit_application(&self, _args: ApplicationArgs) -> ApiFuture<'_> {
            self.answer(&self.application_calls)
        }
    }
}
