//! HTTP client for the `/api/v3/system/status` endpoint

use crate::config::ServiceTarget;
use crate::errors::{CheckError, MonitorError, Result};
use crate::status::SystemStatus;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// HTTP client shared by every status check
#[derive(Debug, Clone)]
pub struct StatusClient {
    client: Client,
    timeout: Duration,
}

impl StatusClient {
    /// Create a new status client
    pub fn new(http_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(http_timeout)
            .user_agent(format!("media_check/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(MonitorError::Http)?;

        Ok(Self {
            client,
            timeout: http_timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch and decode the status of one target.
    ///
    /// Anything but a 200 is an error. A 200 whose body is not valid status
    /// JSON comes back as `CheckError::MalformedResponse`.
    pub async fn fetch_status(
        &self,
        target: &ServiceTarget,
    ) -> std::result::Result<SystemStatus, CheckError> {
        let url = target.status_url();

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &target.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        debug!(
            "Received response from {} ({}): {}",
            target.name,
            status.as_u16(),
            body
        );

        if status != StatusCode::OK {
            return Err(CheckError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[test]
    fn test_client_creation() {
        let client = assert_ok!(StatusClient::new(Duration::from_secs(10)));
        assert_eq!(client.timeout(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let client = StatusClient::new(Duration::from_secs(2)).unwrap();
        // Port 9 (discard) is closed on test hosts
        let target = ServiceTarget::new("Radarr", "http://127.0.0.1:9", "key");

        let err = client.fetch_status(&target).await.unwrap_err();
        assert!(matches!(err, CheckError::Transport(_)));
        assert!(!err.is_reachable());
    }
}
