/// Dashboard configuration, fixed at process start
use crate::shared::error::DashboardError;
use std::{path::PathBuf, time::Duration};
use url::Url;

/// Default corridor status feed
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:5000/status";

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// WebSocket endpoint of the live feed
    pub url: String,
    /// Period of the acquisition loop
    pub tick_interval: Duration,
    /// Upper bound on a single connection attempt
    pub connect_timeout: Duration,
    /// File receiving log output (kept off the terminal UI)
    pub log_path: PathBuf,
    /// Attempt one live connection at startup, whatever the mode
    pub connect_on_startup: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT.to_string(),
            tick_interval: Duration::from_secs(1),
            connect_timeout: Duration::from_secs(5),
            log_path: PathBuf::from("traffic-dashboard.log"),
            connect_on_startup: true,
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration with custom URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set tick interval
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set log file path
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }

    /// Enable or disable the startup connection attempt
    pub fn with_connect_on_startup(mut self, enabled: bool) -> Self {
        self.connect_on_startup = enabled;
        self
    }

    /// Parse the endpoint, requiring a `ws` or `wss` scheme
    pub fn endpoint(&self) -> Result<Url, DashboardError> {
        validate_endpoint(&self.url)
    }
}

/// Parse a WebSocket endpoint
pub fn validate_endpoint(url: &str) -> Result<Url, DashboardError> {
    let parsed = Url::parse(url).map_err(|e| DashboardError::InvalidEndpoint {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "ws" | "wss" => Ok(parsed),
        scheme => Err(DashboardError::InvalidEndpoint {
            url: url.to_string(),
            reason: format!("unsupported scheme {scheme}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = DashboardConfig::new("ws://10.0.0.2:9001/status")
            .with_tick_interval(Duration::from_millis(500))
            .with_connect_timeout(Duration::from_secs(2))
            .with_log_path("/tmp/dashboard.log")
            .with_connect_on_startup(false);

        assert_eq!(config.url, "ws://10.0.0.2:9001/status");
        assert_eq!(config.tick_interval, Duration::from_millis(500));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.log_path, PathBuf::from("/tmp/dashboard.log"));
        assert!(!config.connect_on_startup);
    }

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.url, "ws://localhost:5000/status");
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert!(config.connect_on_startup);

        let endpoint = config.endpoint().unwrap();
        assert_eq!(endpoint.host_str(), Some("localhost"));
        assert_eq!(endpoint.port(), Some(5000));
        assert_eq!(endpoint.path(), "/status");
    }

    #[test]
    fn test_validate_endpoint_rejects_bad_urls() {
        assert!(validate_endpoint("wss://feed.example.com/status").is_ok());

        for bad in ["http://localhost:5000/status", "not a url", ""] {
            let error = validate_endpoint(bad).unwrap_err();
            assert!(
                matches!(error, DashboardError::InvalidEndpoint { .. }),
                "{bad}: {error}"
            );
        }
    }
}
