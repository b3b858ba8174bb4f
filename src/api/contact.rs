//! Contact Submission

use serde::Serialize;

use super::{ApiClient, ApiReply};
use crate::error::SiteError;

#[derive(Debug, Clone, Serialize)]
pub struct ContactArgs {
    pub name: String,
    pub email: String,
    pub company: String,
    pub notes: String,
    pub timestamp: String,
}

impl ApiClient {
    pub async fn submit_contact(&self, args: &ContactArgs) -> Result<ApiReply, SiteError> {
        self.post_json(&self.endpoints.contact, args).await
    }
}
