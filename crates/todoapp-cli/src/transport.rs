use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use todoapp_core::config::Config;
use todoapp_core::transport::{ApiRequest, HttpResponse, HttpTransport, TransportError};
use tracing::{debug, instrument};

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("failed building HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: ApiRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;

        debug!(%status, bytes = body.len(), "response read");
        Ok(HttpResponse { status, body })
    }
}
