//! Single-shot page fetcher for the deal aggregator

use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Source of listing pages. The engine issues exactly one `fetch` per scrape.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Plain `GET` with the transport's defaults: no custom headers, no cookies.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        // Check status
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }
}
