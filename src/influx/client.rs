use std::future::Future;

use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use super::point::BatchPoints;
use crate::{BenchfluxError, Result};

/// Anything that can persist a full batch in one call
pub trait BatchWriter {
    fn write(&self, batch: &BatchPoints) -> impl Future<Output = Result<()>> + Send;
}

/// Connection settings for [`HttpClient`]
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL of the server, e.g. `http://localhost:8086`
    pub addr: String,
    pub user_agent: String,
}

impl HttpConfig {
    pub fn new(addr: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            user_agent: user_agent.into(),
        }
    }
}

/// Error body returned by the `/write` endpoint
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

/// InfluxDB 1.x HTTP write client
#[derive(Debug, Clone)]
pub struct HttpClient {
    url: Url,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let url = Url::parse(&config.addr).map_err(|e| {
            BenchfluxError::ClientError(format!("invalid URL {}: {}", config.addr, e))
        })?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(BenchfluxError::ClientError(format!(
                    "unsupported protocol scheme: {}, your address must start with http:// or https://",
                    other
                )))
            }
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| BenchfluxError::ClientError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { url, client })
    }

    /// Full `/write` URL for a batch, including its query parameters
    pub fn write_url(&self, batch: &BatchPoints) -> Url {
        let mut url = self.url.clone();
        let path = format!("{}/write", url.path().trim_end_matches('/'));
        url.set_path(&path);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("db", batch.database());
            if !batch.retention_policy().is_empty() {
                query.append_pair("rp", batch.retention_policy());
            }
            query.append_pair("precision", batch.precision().as_str());
        }
        url
    }
}

impl BatchWriter for HttpClient {
    async fn write(&self, batch: &BatchPoints) -> Result<()> {
        let url = self.write_url(batch);
        let body = batch.line_protocol();
        debug!(url = %url, points = batch.len(), bytes = body.len(), "writing batch");

        let response = self.client.post(url).body(body).send().await?;
        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::NO_CONTENT {
            return Ok(());
        }

        let body = response.bytes().await?;
        let message = serde_json::from_slice::<ErrorResponse>(&body)
            .ok()
            .and_then(|r| r.error)
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| String::from_utf8_lossy(&body).trim().to_string());

        Err(BenchfluxError::WriteError(format!(
            "server responded {}: {}",
            status, message
        )))
    }
}
