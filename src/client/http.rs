use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, IF_NONE_MATCH};
use reqwest::{Client, StatusCode};

use crate::app::Result;
use crate::client::{FeedClient, FetchOutcome};
use crate::domain::Credentials;

pub struct HttpFeedClient {
    client: Client,
}

impl HttpFeedClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .user_agent("feedmirror/0.1.0")
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }
}

impl Default for HttpFeedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedClient for HttpFeedClient {
    async fn fetch(
        &self,
        url: &str,
        etag: Option<&str>,
        credentials: Option<&Credentials>,
    ) -> Result<FetchOutcome> {
        let mut headers = HeaderMap::new();

        if let Some(etag) = etag {
            if let Ok(value) = HeaderValue::from_str(etag) {
                headers.insert(IF_NONE_MATCH, value);
            }
        }

        let mut request = self.client.get(url).headers(headers);
        if let Some(creds) = credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = request.send().await?;

        if response.status() == StatusCode::NOT_MODIFIED {
            return Ok(FetchOutcome::NotModified);
        }

        if !response.status().is_success() {
            return Ok(FetchOutcome::Failed {
                status: response.status().as_u16(),
            });
        }

        let etag = response
            .headers()
            .get("etag")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let body = response.text().await?;

        Ok(FetchOutcome::Fetched { body, etag })
    }
}
