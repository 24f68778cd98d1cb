// # Page Fetcher Trait
//
// Defines the interface for retrieving the raw results page.
//
// ## Implementations
//
// - HTTP (reqwest): `loto-source-http` crate
// - Tests: static or failing fetchers in `tests/common`
//
// ## Usage
//
// ```rust,ignore
// use loto_core::PageFetcher;
//
// #[tokio::main]
// async fn main() -> loto_core::Result<()> {
//     let fetcher = /* PageFetcher implementation */;
//     let markup = fetcher.fetch().await?;
//     println!("{} bytes", markup.len());
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for page fetcher implementations
///
/// A fetcher performs exactly one request per call and keeps no state
/// between calls.
///
/// ## Allowed
/// - Outbound I/O to the configured endpoint
/// - Enforcing a bounded timeout
///
/// ## Not allowed
/// - Retries or backoff (owned by the host schedule)
/// - Parsing the markup (owned by the extractor)
/// - Caching previous responses (the coordinator keeps the last record)
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page and return its body as text
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: Response body of a 200 OK response
    /// - `Err(Error::Connectivity)`: Network failure, timeout or non-OK status
    async fn fetch(&self) -> Result<String, crate::Error>;

    /// Endpoint this fetcher targets, for logging
    fn endpoint(&self) -> &str;
}

/// Helper trait for constructing fetchers from configuration
pub trait PageFetcherFactory: Send + Sync {
    /// Create a PageFetcher from the source configuration
    fn create(
        &self,
        config: &crate::config::SourceConfig,
    ) -> Result<Box<dyn PageFetcher>, crate::Error>;
}
