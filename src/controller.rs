use crate::{
    render_all, ExportState, LeadCapture, MetadataExtractor, MetadataRecord, PageSource,
    PreviewError, PreviewSet, ProgressIndicator, ProgressTicker, RelayFetcher, ReportExporter,
    WidgetConfig,
};
use std::path::PathBuf;
use tokio::sync::watch;
use tracing::{debug, info, instrument};

pub const FETCH_FAILED_MESSAGE: &str =
    "Failed to fetch Open Graph data. Please check the URL and try again.";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum WidgetState {
    #[default]
    Idle,
    Fetching,
    Success(MetadataRecord),
    Failed(String),
}

/// Drives one viewer widget: URL in, record and previews out.
///
/// `submit` borrows the controller mutably, so at most one fetch per
/// controller is ever in flight.
pub struct WidgetController<S = RelayFetcher> {
    source: S,
    extractor: MetadataExtractor,
    lead_capture: LeadCapture,
    ticker: ProgressTicker,
    indicator: ProgressIndicator,
    progress_tx: watch::Sender<f64>,
    state: WidgetState,
    export_state: ExportState,
}

impl WidgetController<RelayFetcher> {
    pub fn new(config: &WidgetConfig) -> Result<Self, PreviewError> {
        let source = RelayFetcher::from_widget_config(config)?;
        let lead_capture = LeadCapture::new(config)?;
        Ok(Self::with_parts(source, lead_capture, ProgressTicker::new(config.tick_interval)))
    }
}

impl<S: PageSource + Sync> WidgetController<S> {
    pub fn with_parts(source: S, lead_capture: LeadCapture, ticker: ProgressTicker) -> Self {
        let (progress_tx, _) = watch::channel(0.0);
        Self {
            source,
            extractor: MetadataExtractor::new(),
            lead_capture,
            ticker,
            indicator: ProgressIndicator::new(),
            progress_tx,
            state: WidgetState::Idle,
            export_state: ExportState::Ready,
        }
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn record(&self) -> Option<&MetadataRecord> {
        match &self.state {
            WidgetState::Success(record) => Some(record),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            WidgetState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, WidgetState::Fetching)
    }

    pub fn progress(&self) -> f64 {
        self.indicator.value()
    }

    /// Live progress values, updated on every tick of a running fetch.
    pub fn subscribe_progress(&self) -> watch::Receiver<f64> {
        self.progress_tx.subscribe()
    }

    pub fn export_state(&self) -> ExportState {
        self.export_state
    }

    /// The rendered preview tree, available once a fetch has succeeded.
    pub fn previews(&self) -> Option<PreviewSet> {
        self.record().map(render_all)
    }

    /// Fetches `url` through the page source and extracts its metadata.
    ///
    /// Any failure ends in [`WidgetState::Failed`] with a generic message;
    /// nothing is returned as an error.
    ///
    /// There is no cancellation. If the returned future is dropped before it
    /// resolves (e.g. under `tokio::time::timeout`), the state stays
    /// [`WidgetState::Fetching`] and progress keeps its last tick until the
    /// next `submit` resets both.
    pub async fn submit(&mut self, url: &str) -> &WidgetState {
        debug!(url = %url, "Submitting URL");
        self.state = WidgetState::Fetching;
        self.export_state = ExportState::Ready;
        self.indicator.reset();
        self.progress_tx.send_replace(self.indicator.value());

        let source = &self.source;
        let extractor = &self.extractor;
        let work = async {
            let html = source.fetch_html(url).await?;
            Ok::<_, PreviewError>(extractor.extract(&html, url))
        };

        let result = self
            .ticker
            .drive(&mut self.indicator, &self.progress_tx, work)
            .await;

        match result {
            Ok(record) => {
                self.indicator.complete();
                info!(
                    url = %url,
                    title = ?record.title,
                    "Open Graph data fetched"
                );
                self.state = WidgetState::Success(record);
            }
            Err(e) => {
                e.log();
                self.indicator.reset();
                self.state = WidgetState::Failed(FETCH_FAILED_MESSAGE.to_string());
            }
        }
        self.progress_tx.send_replace(self.indicator.value());

        &self.state
    }

    /// Captures `email` and, only if that succeeds, exports the current previews.
    ///
    /// A failed capture leaves the fetched record and previews untouched.
    #[instrument(level = "debug", skip(self, email, exporter))]
    pub async fn request_export<E>(&mut self, email: &str, exporter: &E) -> Result<PathBuf, PreviewError>
    where
        E: ReportExporter + Sync + ?Sized,
    {
        let previews = self
            .previews()
            .ok_or_else(|| PreviewError::ExportError("No previews to export".to_string()))?;

        self.export_state = ExportState::Submitting;
        if let Err(e) = self.lead_capture.submit(email).await {
            e.log();
            self.export_state = ExportState::Ready;
            return Err(e);
        }
        self.export_state = ExportState::Submitted;
        debug!("Email captured, exporting previews");

        exporter.export(&previews).await.inspect_err(|e| e.log())
    }
}
