use std::time::{Duration, Instant};

use crate::Result;
use crate::http::request::Request;
use crate::http::response::Response;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self {
            inner: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    pub async fn execute(&self, request: Request) -> Result<Response> {
        let url = request.full_url()?;
        tracing::debug!(method = %request.method, url = %url, "sending request");

        let mut req = self
            .inner
            .request(request.method.into(), url)
            .headers(request.headers);

        if let Some(body) = request.body {
            req = req.body(body);
        }

        let start = Instant::now();
        let response = req.send().await?;
        let duration = start.elapsed();

        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(status, elapsed_ms = duration.as_millis() as u64, "received response");

        Response::new(status, body)
    }
}
