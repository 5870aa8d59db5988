use crate::{PageSource, PreviewError, WidgetConfig};
use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

/// Envelope the relay wraps around the proxied page.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayEnvelope {
    pub contents: Option<String>,
    #[serde(default)]
    pub status: Option<RelayStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelayStatus {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub http_code: Option<u16>,
}

/// Fetches page HTML through a CORS relay.
///
/// One request per call, no retries. Every failure mode (transport, relay
/// status, envelope shape) is reported as [`PreviewError::FetchError`].
#[derive(Clone)]
pub struct RelayFetcher {
    client: Client,
    relay_endpoint: String,
}

impl RelayFetcher {
    pub fn new() -> Result<Self, PreviewError> {
        debug!("Relay fetcher initialized with default configuration");
        Self::new_with_config(FetcherConfig::default())
    }

    /// Creates a fetcher with custom configuration
    pub fn new_with_config(config: FetcherConfig) -> Result<Self, PreviewError> {
        let mut client_builder = Client::builder().user_agent(config.user_agent);

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        if let Some(headers) = config.headers {
            client_builder = client_builder.default_headers(headers);
        }

        if let Some(redirect_policy) = config.redirect_policy {
            client_builder = client_builder.redirect(redirect_policy);
        }

        let client = client_builder.build().map_err(|e| {
            error!(error = %e, "Failed to create HTTP client");
            PreviewError::ConfigError(format!("Failed to initialize HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            relay_endpoint: config.relay_endpoint,
        })
    }

    pub fn from_widget_config(config: &WidgetConfig) -> Result<Self, PreviewError> {
        Self::new_with_config(FetcherConfig::from(config))
    }

    pub fn with_client(client: Client, relay_endpoint: impl Into<String>) -> Self {
        Self {
            client,
            relay_endpoint: relay_endpoint.into(),
        }
    }

    /// Relay request URL carrying `target_url` as the encoded `url` parameter.
    pub fn relay_url(&self, target_url: &str) -> Result<Url, PreviewError> {
        Url::parse_with_params(&self.relay_endpoint, &[("url", target_url)]).map_err(|e| {
            error!(error = %e, endpoint = %self.relay_endpoint, "Invalid relay endpoint");
            PreviewError::FetchError(format!("Invalid relay endpoint: {e}"))
        })
    }

    #[instrument(level = "debug", skip(self), err)]
    pub async fn fetch_html(&self, target_url: &str) -> Result<String, PreviewError> {
        let request_url = self.relay_url(target_url)?;
        debug!(relay_url = %request_url, "Starting relay request");

        let response = self.client.get(request_url).send().await.map_err(|e| {
            error!(error = %e, url = %target_url, "Failed to send relay request");
            PreviewError::FetchError(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, url = %target_url, "Relay returned an error status");
            return Err(PreviewError::FetchError(format!(
                "Relay returned status: {status}"
            )));
        }

        let envelope: RelayEnvelope = response.json().await.map_err(|e| {
            error!(error = %e, url = %target_url, "Failed to parse relay envelope");
            PreviewError::FetchError(e.to_string())
        })?;

        if let Some(status) = &envelope.status {
            debug!(
                upstream_url = ?status.url,
                upstream_code = ?status.http_code,
                "Relay reported upstream status"
            );
        }

        let contents = envelope.contents.ok_or_else(|| {
            error!(url = %target_url, "Relay envelope carried no contents");
            PreviewError::FetchError("Relay envelope carried no contents".to_string())
        })?;

        debug!(url = %target_url, content_length = contents.len(), "Successfully fetched page through relay");
        Ok(contents)
    }
}

#[async_trait]
impl PageSource for RelayFetcher {
    async fn fetch_html(&self, target_url: &str) -> Result<String, PreviewError> {
        RelayFetcher::fetch_html(self, target_url).await
    }
}

/// Client options for [`RelayFetcher`].
///
/// # Examples
/// ```ignore
/// let fetcher = RelayFetcher::new_with_config(FetcherConfig {
///     relay_endpoint: "http://localhost:1458/get".to_string(),
///     timeout: Some(Duration::from_secs(20)),
///     ..FetcherConfig::default()
/// })?;
/// ```
pub struct FetcherConfig {
    pub relay_endpoint: String,
    pub user_agent: String,
    pub timeout: Option<Duration>,
    pub headers: Option<HeaderMap>,
    pub redirect_policy: Option<reqwest::redirect::Policy>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self::from(&WidgetConfig::default())
    }
}

impl From<&WidgetConfig> for FetcherConfig {
    fn from(config: &WidgetConfig) -> Self {
        Self {
            relay_endpoint: config.relay_endpoint.clone(),
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            headers: None,
            redirect_policy: None,
        }
    }
}
