//! Test doubles and common utilities for pipeline contract tests
//!
//! These fetchers replace the network so the contracts can be checked
//! against scripted markup and failures.

#![allow(dead_code)]

use loto_core::error::{ConnectivityCause, Error, Result};
use loto_core::traits::PageFetcher;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const TEST_URL: &str = "https://results.example.test/loto";

/// Build a results page whose body is one `<span>` per entry
pub fn page_with_spans(texts: &[&str]) -> String {
    let spans: String = texts
        .iter()
        .map(|text| format!("<span>{}</span>", text))
        .collect();
    format!("<html><body><div class=\"result\">{}</div></body></html>", spans)
}

/// A fetcher that always returns the same markup
pub struct StaticFetcher {
    markup: String,
    calls: Arc<AtomicUsize>,
}

impl StaticFetcher {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared call counter, readable after the fetcher is moved
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait::async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.markup.clone())
    }

    fn endpoint(&self) -> &str {
        TEST_URL
    }
}

/// A fetcher that always fails with the given status code
pub struct FailingFetcher {
    status: u16,
}

impl FailingFetcher {
    pub fn new(status: u16) -> Self {
        Self { status }
    }
}

#[async_trait::async_trait]
impl PageFetcher for FailingFetcher {
    async fn fetch(&self) -> Result<String> {
        Err(Error::connectivity(
            TEST_URL,
            ConnectivityCause::Status(self.status),
        ))
    }

    fn endpoint(&self) -> &str {
        TEST_URL
    }
}

/// A fetcher that replays scripted outcomes, then repeats the last one
pub struct ScriptedFetcher {
    script: std::sync::Mutex<VecDeque<std::result::Result<String, u16>>>,
    last: std::sync::Mutex<Option<std::result::Result<String, u16>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedFetcher {
    /// `Ok(markup)` is returned as-is, `Err(status)` as a connectivity error
    pub fn new(script: Vec<std::result::Result<String, u16>>) -> Self {
        Self {
            script: std::sync::Mutex::new(script.into()),
            last: std::sync::Mutex::new(None),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait::async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        let outcome = match next {
            Some(outcome) => {
                *self.last.lock().unwrap() = Some(outcome.clone());
                outcome
            }
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .expect("script must not be empty"),
        };

        outcome.map_err(|status| Error::connectivity(TEST_URL, ConnectivityCause::Status(status)))
    }

    fn endpoint(&self) -> &str {
        TEST_URL
    }
}

/// A fetcher that takes `delay` per call and records the peak number of
/// calls in flight
pub struct SlowFetcher {
    markup: String,
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    calls: Arc<AtomicUsize>,
}

impl SlowFetcher {
    pub fn new(markup: impl Into<String>, delay: Duration) -> Self {
        Self {
            markup: markup.into(),
            delay,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn peak(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.peak)
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait::async_trait]
impl PageFetcher for SlowFetcher {
    async fn fetch(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self.markup.clone())
    }

    fn endpoint(&self) -> &str {
        TEST_URL
    }
}

/// The page from the reference scenario: six draw numbers then a year
pub fn reference_page() -> String {
    page_with_spans(&["2", "5", "26", "32", "44", "10", "2024"])
}
