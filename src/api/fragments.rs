//! Shared Fragment Loading

use super::ApiClient;
use crate::error::SiteError;

impl ApiClient {
    /// GET an HTML fragment; non-2xx is an error
    pub async fn fetch_fragment(&self, url: &str) -> Result<String, SiteError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SiteError::Http {
                status: status.as_u16(),
                message: None,
            });
        }
        Ok(response.text().await?)
    }
}

/// Resolve a page-relative path against the document URL
pub fn resolve_url(base: &str, relative: &str) -> Result<String, SiteError> {
    let base = reqwest::Url::parse(base).map_err(|e| SiteError::Url(format!("{}: {}", base, e)))?;
    base.join(relative)
        .map(String::from)
        .map_err(|e| SiteError::Url(format!("{}: {}", relative, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_to_page() {
        assert_eq!(
            resolve_url("https://orivanta.ai/blog.html", "shared/header.html").unwrap(),
            "https://orivanta.ai/shared/header.html"
        );
        assert_eq!(
            resolve_url("http://localhost:8080/site/contact.html?x=1#form", "shared/footer.html").unwrap(),
            "http://localhost:8080/site/shared/footer.html"
        );
    }

    #[test]
    fn test_resolve_rejects_bad_base() {
        assert!(matches!(resolve_url("not a url", "shared/header.html"), Err(SiteError::Url(_))));
    }
}
