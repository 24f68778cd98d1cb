//! Core traits for the results pipeline
//!
//! - [`PageFetcher`]: Retrieve the raw results page
//! - [`TokenStrategy`]: Locate candidate numbers in a parsed page

pub mod page_fetcher;
pub mod token_strategy;

pub use page_fetcher::{PageFetcher, PageFetcherFactory};
pub use token_strategy::{TokenScan, TokenStrategy, accept_token};
