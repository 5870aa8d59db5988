use crate::{PreviewError, PreviewSet, WidgetConfig};
use async_trait::async_trait;
use html_escape::encode_text;
use reqwest::Client;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, error, instrument};

pub const DEFAULT_REPORT_FILE: &str = "open-graph-preview.html";
pub const SUBMITTED_MESSAGE: &str = "Thank you! Your PDF report is being generated.";

/// Where the email-then-export flow currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportState {
    #[default]
    Ready,
    Submitting,
    Submitted,
}

impl ExportState {
    pub fn message(self) -> Option<&'static str> {
        match self {
            ExportState::Submitted => Some(SUBMITTED_MESSAGE),
            ExportState::Ready | ExportState::Submitting => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct LeadPayload<'a> {
    email: &'a str,
}

/// Posts captured email addresses to the lead webhook.
#[derive(Clone)]
pub struct LeadCapture {
    client: Client,
    webhook: String,
}

impl LeadCapture {
    pub fn new(config: &WidgetConfig) -> Result<Self, PreviewError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            error!(error = %e, "Failed to create HTTP client");
            PreviewError::ConfigError(format!("Failed to initialize HTTP client: {e}"))
        })?;

        Ok(Self::with_client(client, config.capture_webhook.clone()))
    }

    pub fn with_client(client: Client, webhook: impl Into<String>) -> Self {
        Self {
            client,
            webhook: webhook.into(),
        }
    }

    /// Sends `{"email": ...}` to the webhook. The response body is ignored.
    #[instrument(level = "debug", skip(self, email), err)]
    pub async fn submit(&self, email: &str) -> Result<(), PreviewError> {
        let email = email.trim();
        if !looks_like_email(email) {
            return Err(PreviewError::SubmissionError(format!(
                "'{email}' is not an email address"
            )));
        }

        let response = self
            .client
            .post(&self.webhook)
            .json(&LeadPayload { email })
            .send()
            .await
            .map_err(|e| PreviewError::SubmissionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PreviewError::SubmissionError(format!(
                "Webhook returned status: {status}"
            )));
        }

        debug!("Email captured");
        Ok(())
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Turns a rendered [`PreviewSet`] into a downloadable document.
#[async_trait]
pub trait ReportExporter {
    async fn export(&self, previews: &PreviewSet) -> Result<PathBuf, PreviewError>;
}

/// Writes the previews as a standalone HTML report.
#[derive(Debug, Clone)]
pub struct HtmlReportExporter {
    dir: PathBuf,
    file_name: String,
}

impl HtmlReportExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_name: DEFAULT_REPORT_FILE.to_string(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn render_document(previews: &PreviewSet) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Open Graph Preview Report: {}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
            encode_text(&previews.summary.url),
            previews.to_html(),
        )
    }
}

#[async_trait]
impl ReportExporter for HtmlReportExporter {
    #[instrument(level = "debug", skip_all)]
    async fn export(&self, previews: &PreviewSet) -> Result<PathBuf, PreviewError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PreviewError::ExportError(format!("{}: {e}", self.dir.display())))?;

        let path = self.dir.join(&self.file_name);
        tokio::fs::write(&path, Self::render_document(previews))
            .await
            .map_err(|e| PreviewError::ExportError(format!("{}: {e}", path.display())))?;

        debug!(path = %path.display(), "Preview report written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render_all, MetadataRecord};

    #[test]
    fn test_email_shape() {
        assert!(looks_like_email("someone@example.com"));
        assert!(!looks_like_email(""));
        assert!(!looks_like_email("someone"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("someone@"));
        assert!(!looks_like_email("a@b@c"));
        assert!(!looks_like_email("some one@example.com"));
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected_locally() {
        // Unroutable webhook: a network attempt would fail differently.
        let capture = LeadCapture::with_client(Client::new(), "http://invalid.invalid/hook");
        let err = capture.submit("   ").await.unwrap_err();
        assert!(matches!(err, PreviewError::SubmissionError(msg) if msg.contains("not an email")));
    }

    #[test]
    fn test_report_document() {
        let previews = render_all(&MetadataRecord {
            title: Some("Tom & Jerry".to_string()),
            url: Some("https://example.com/".to_string()),
            ..MetadataRecord::default()
        });
        let document = HtmlReportExporter::render_document(&previews);

        assert!(document.starts_with("<!DOCTYPE html>"));
        assert!(document.contains("Tom &amp; Jerry"));
        assert_eq!(document.matches("<section class=\"preview ").count(), 3);
        assert!(document.contains("Open Graph Data"));
    }

    #[test]
    fn test_submitted_message() {
        assert_eq!(ExportState::Submitted.message(), Some(SUBMITTED_MESSAGE));
        assert_eq!(ExportState::default().message(), None);
    }
}
