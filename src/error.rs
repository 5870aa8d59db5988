use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Failed to fetch content: {0}")]
    FetchError(String),

    #[error("Failed to derive hostname: {0}")]
    HostnameParseError(#[from] url::ParseError),

    #[error("Email submission failed: {0}")]
    SubmissionError(String),

    #[error("Failed to export previews: {0}")]
    ExportError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl PreviewError {
    pub fn log(&self) {
        match self {
            PreviewError::FetchError(e) => {
                error!(error = %e, "Content fetch failed");
            }
            PreviewError::HostnameParseError(e) => {
                warn!(error = %e, "Hostname derivation failed");
            }
            PreviewError::SubmissionError(e) => {
                error!(error = %e, "Email capture failed");
            }
            PreviewError::ExportError(e) => {
                error!(error = %e, "Preview export failed");
            }
            PreviewError::ConfigError(e) => {
                warn!(error = %e, "Configuration rejected");
            }
        }
    }
}
