use crate::PreviewError;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_RELAY_ENDPOINT: &str = "https://api.allorigins.win/get";
pub const DEFAULT_CAPTURE_WEBHOOK: &str = "https://services.leadconnectorhq.com/hooks/mZBqXJLpInc1VbPcqzY8/webhook-trigger/dfdc43c8-e6b5-46b1-9d3a-559a572a6d55";

const RELAY_ENV: &str = "OG_PREVIEW_RELAY_URL";
const WEBHOOK_ENV: &str = "OG_PREVIEW_WEBHOOK_URL";
const USER_AGENT_ENV: &str = "OG_PREVIEW_USER_AGENT";
const TIMEOUT_ENV: &str = "OG_PREVIEW_TIMEOUT_SECS";

/// Endpoints and client settings shared by the fetcher, the lead capture
/// client and the progress ticker.
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub relay_endpoint: String,
    pub capture_webhook: String,
    pub user_agent: String,
    /// `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
    pub tick_interval: Duration,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            relay_endpoint: DEFAULT_RELAY_ENDPOINT.to_string(),
            capture_webhook: DEFAULT_CAPTURE_WEBHOOK.to_string(),
            user_agent: "og_preview/0.1.0".to_string(),
            timeout: None,
            tick_interval: Duration::from_millis(500),
        }
    }
}

impl WidgetConfig {
    /// Defaults overridden by any `OG_PREVIEW_*` environment variables.
    pub fn from_env() -> Result<Self, PreviewError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, PreviewError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(relay) = lookup(RELAY_ENV) {
            debug!(relay = %relay, "Using relay endpoint from environment");
            config.relay_endpoint = parse_endpoint(RELAY_ENV, &relay)?;
        }

        if let Some(webhook) = lookup(WEBHOOK_ENV) {
            debug!("Using capture webhook from environment");
            config.capture_webhook = parse_endpoint(WEBHOOK_ENV, &webhook)?;
        }

        if let Some(agent) = lookup(USER_AGENT_ENV) {
            config.user_agent = agent;
        }

        if let Some(secs) = lookup(TIMEOUT_ENV) {
            let secs: u64 = secs.trim().parse().map_err(|e| {
                PreviewError::ConfigError(format!("{TIMEOUT_ENV} must be whole seconds: {e}"))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn parse_endpoint(key: &str, value: &str) -> Result<String, PreviewError> {
    let endpoint = Url::parse(value.trim())
        .map_err(|e| PreviewError::ConfigError(format!("{key} is not a valid URL: {e}")))?;
    Ok(endpoint.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = WidgetConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.relay_endpoint, DEFAULT_RELAY_ENDPOINT);
        assert_eq!(config.tick_interval, Duration::from_millis(500));
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_environment_overrides() {
        let config = WidgetConfig::from_lookup(lookup_from(&[
            (RELAY_ENV, "http://127.0.0.1:9000/get"),
            (USER_AGENT_ENV, "tester/1.0"),
            (TIMEOUT_ENV, "15"),
        ]))
        .unwrap();

        assert_eq!(config.relay_endpoint, "http://127.0.0.1:9000/get");
        assert_eq!(config.user_agent, "tester/1.0");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let result = WidgetConfig::from_lookup(lookup_from(&[(WEBHOOK_ENV, "not a url")]));
        assert!(matches!(result, Err(PreviewError::ConfigError(_))));

        let result = WidgetConfig::from_lookup(lookup_from(&[(TIMEOUT_ENV, "soon")]));
        assert!(matches!(result, Err(PreviewError::ConfigError(_))));
    }
}
