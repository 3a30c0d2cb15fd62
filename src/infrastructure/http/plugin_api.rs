//! Plugin reload endpoint over HTTP

use std::time::Duration;

use reqwest::blocking::Client;

use crate::domain::ports::PluginApi;
use crate::domain::value_objects::ReloadCategory;
use crate::error::{SdkError, SdkResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpPluginApi {
    client: Client,
    reload_url: String,
}

impl HttpPluginApi {
    pub fn new(reload_url: impl Into<String>) -> SdkResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SdkError::RemoteUnavailable(e.to_string()))?;
        Ok(Self {
            client,
            reload_url: reload_url.into(),
        })
    }

    pub fn reload_url(&self) -> &str {
        &self.reload_url
    }
}

impl PluginApi for HttpPluginApi {
    fn reload(&self, category: ReloadCategory) -> SdkResult<serde_json::Value> {
        tracing::debug!(url = %self.reload_url, %category, "reloading plugin");
        let response = self
            .client
            .get(&self.reload_url)
            .query(&category.query())
            .send()
            .map_err(|e| SdkError::RemoteUnavailable(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();
        parse_reload_response(status, &body)
    }
}

/// A reload is acknowledged only by a 200 whose JSON body has `reloaded`.
pub fn parse_reload_response(status: u16, body: &str) -> SdkResult<serde_json::Value> {
    if status != 200 {
        return Err(SdkError::UnexpectedResponse { status });
    }
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|mut value| value.get_mut("reloaded").map(serde_json::Value::take))
        .ok_or(SdkError::UnexpectedResponse { status })
}
