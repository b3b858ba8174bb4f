//! Newsletter Subscription

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiReply};
use crate::error::SiteError;

/// Request body, also persisted locally after a successful subscribe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub email: String,
    pub timestamp: String,
    pub source: String,
}

impl ApiClient {
    pub async fn subscribe_newsletter(&self, subscription: &Subscription) -> Result<ApiReply, SiteError> {
        self.post_json(&self.endpoints.newsletter, subscription).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_json_shape() {
        let sub = Subscription {
            email: "user@example.com".into(),
            timestamp: "2026-01-01T00:00:00Z".into(),
            source: "blog_page".into(),
        };
        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(json["email"], "user@example.com");
        assert_eq!(json["source"], "blog_page");
    }
}
