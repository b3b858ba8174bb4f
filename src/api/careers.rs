//! Careers Application
//!
//! Sent as multipart so a résumé file can ride along with the text fields.

use reqwest::multipart::{Form, Part};

use super::{ApiClient, ApiReply};
use crate::error::SiteError;

#[derive(Debug, Clone)]
pub struct Resume {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ApplicationArgs {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: String,
    pub message: String,
    pub timestamp: String,
    pub resume: Option<Resume>,
}

impl ApplicationArgs {
    /// Text fields in submission order; empty optional fields are skipped
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("position", self.position.clone()),
            ("message", self.message.clone()),
            ("timestamp", self.timestamp.clone()),
        ];
        if let Some(phone) = self.phone.as_ref().filter(|p| !p.is_empty()) {
            fields.insert(2, ("phone", phone.clone()));
        }
        fields
    }

    fn into_form(self) -> Result<Form, SiteError> {
        let mut form = Form::new();
        for (name, value) in self.text_fields() {
            form = form.text(name, value);
        }
        if let Some(resume) = self.resume {
            let mut part = Part::bytes(resume.bytes).file_name(resume.file_name);
            if !resume.mime.is_empty() {
                part = part.mime_str(&resume.mime)?;
            }
            form = form.part("resume", part);
        }
        Ok(form)
    }
}

impl ApiClient {
    pub async fn submit_application(&self, args: ApplicationArgs) -> Result<ApiReply, SiteError> {
        let form = args.into_form()?;
        self.post_multipart(&self.endpoints.careers_apply, form).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(phone: Option<&str>) -> ApplicationArgs {
        ApplicationArgs {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: phone.map(str::to_string),
            position: "Engineer".into(),
            message: "I would love to join the team.".into(),
            timestamp: "2026-01-01T00:00:00Z".into(),
            resume: None,
        }
    }

    #[test]
    fn test_text_fields_skip_empty_phone() {
        let names: Vec<_> = args(Some("")).text_fields().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["name", "email", "position", "message", "timestamp"]);
    }

    #[test]
    fn test_text_fields_include_phone() {
        let fields = args(Some("555-123-4567")).text_fields();
        assert_eq!(fields[2], ("phone", "555-123-4567".to_string()));
    }
}
