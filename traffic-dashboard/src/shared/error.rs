use std::time::Duration;
use thiserror::Error;

/// All errors generated in `traffic-dashboard`.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("connection attempt to {url} timed out after {timeout:?}")]
    ConnectTimeout { url: String, timeout: Duration },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid data received: {0}")]
    MalformedMessage(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl DashboardError {
    /// Determine if an error belongs to the transport and must degrade the
    /// dashboard to mock data.
    #[allow(clippy::match_like_matches_macro)]
    pub fn is_transport(&self) -> bool {
        match self {
            DashboardError::InvalidEndpoint { .. }
            | DashboardError::Connect { .. }
            | DashboardError::ConnectTimeout { .. }
            | DashboardError::Transport(_) => true,
            _ => false,
        }
    }
}
