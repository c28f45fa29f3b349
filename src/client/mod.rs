pub mod http;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::Credentials;

#[derive(Debug)]
pub enum FetchOutcome {
    /// Fresh payload, with the new freshness token from the response headers.
    Fetched { body: String, etag: Option<String> },
    /// The freshness precondition matched; the stored copy is current.
    NotModified,
    /// Non-2xx, non-304 response.
    Failed { status: u16 },
}

#[async_trait]
pub trait FeedClient {
    async fn fetch(
        &self,
        url: &str,
        etag: Option<&str>,
        credentials: Option<&Credentials>,
    ) -> Result<FetchOutcome>;
}
