use async_trait::async_trait;

mod config;
mod controller;
mod error;
mod export;
mod extractor;
mod fetcher;
#[cfg(feature = "logging")]
mod logging;
mod progress;
mod render;
mod utils;

pub use config::{WidgetConfig, DEFAULT_CAPTURE_WEBHOOK, DEFAULT_RELAY_ENDPOINT};
pub use controller::{WidgetController, WidgetState, FETCH_FAILED_MESSAGE};
pub use error::PreviewError;
pub use export::{
    ExportState, HtmlReportExporter, LeadCapture, ReportExporter, DEFAULT_REPORT_FILE,
    SUBMITTED_MESSAGE,
};
pub use extractor::MetadataExtractor;
pub use fetcher::{FetcherConfig, RelayEnvelope, RelayFetcher, RelayStatus};
#[cfg(feature = "logging")]
pub use logging::{setup_logging, LogConfig};
pub use progress::{ProgressIndicator, ProgressTicker, PROGRESS_CEILING, PROGRESS_COMPLETE};
pub use render::{
    hostname_of, render_all, render_facebook, render_google, render_imessage, render_summary,
    ImageBlock, Platform, PreviewCard, PreviewSet, SummaryPanel, PLACEHOLDER,
};
pub use utils::truncate_str;

/// Open Graph metadata of one fetched page.
///
/// Every field is optional. A record is produced once per fetch and never
/// patched afterwards; a new fetch yields a new record.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MetadataRecord {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub url: Option<String>,
}

/// Source of raw page HTML for the widget controller.
#[async_trait]
pub trait PageSource {
    async fn fetch_html(&self, target_url: &str) -> Result<String, PreviewError>;
}
