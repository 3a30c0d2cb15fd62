//! Live-reload notifier
//!
//! Posts changed paths to a running tiny-lr style server.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::domain::ports::LiveReload;
use crate::error::{SdkError, SdkResult};

pub struct LiveReloadNotifier {
    client: Client,
    endpoint: String,
}

impl LiveReloadNotifier {
    pub fn new(port: u16) -> SdkResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .map_err(|e| SdkError::RemoteUnavailable(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("http://localhost:{}/changed", port),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl LiveReload for LiveReloadNotifier {
    fn changed(&self, path: &Path) -> SdkResult<()> {
        let files = path.to_string_lossy();
        self.client
            .post(&self.endpoint)
            .query(&[("files", files.as_ref())])
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| SdkError::RemoteUnavailable(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_targets_local_port() {
        let notifier = LiveReloadNotifier::new(35729).unwrap();
        assert_eq!(notifier.endpoint(), "http://localhost:35729/changed");
    }

    #[test]
    fn no_listener_is_an_error() {
        let notifier = LiveReloadNotifier::new(9).unwrap();
        assert!(notifier.changed(Path::new("/tmp/peak.css")).is_err());
    }
}
