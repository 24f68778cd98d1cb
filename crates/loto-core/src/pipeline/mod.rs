//! Fetch → extract pipeline
//!
//! [`Pipeline::refresh`] is the single operation the host schedules. It is a
//! function of the fetched markup and the configuration only: the timer, the
//! last known record and the availability flag live in the coordinator.

use tracing::{debug, info};

use crate::config::LotoConfig;
use crate::draw::DrawResult;
use crate::error::{Error, Result};
use crate::extract::{Extractor, selector};
use crate::traits::PageFetcher;

/// One fetch followed by one extraction
pub struct Pipeline {
    fetcher: Box<dyn PageFetcher>,
    extractor: Extractor,
    probe_marker: Option<String>,
}

impl Pipeline {
    pub fn new(fetcher: Box<dyn PageFetcher>, extractor: Extractor) -> Self {
        Self {
            fetcher,
            extractor,
            probe_marker: None,
        }
    }

    /// Build a pipeline around `fetcher` using the extraction settings in `config`
    pub fn from_config(fetcher: Box<dyn PageFetcher>, config: &LotoConfig) -> Result<Self> {
        let mut pipeline = Self::new(fetcher, Extractor::from_config(config)?);
        if let Some(marker) = &config.probe_marker {
            pipeline = pipeline.with_probe_marker(marker.as_str())?;
        }
        Ok(pipeline)
    }

    /// Require `marker` to match when probing the source
    pub fn with_probe_marker(mut self, marker: impl Into<String>) -> Result<Self> {
        let marker = marker.into();
        selector::parse_selector(&marker)?;
        self.probe_marker = Some(marker);
        Ok(self)
    }

    /// Run one cycle
    ///
    /// Fetcher errors are returned unchanged; extraction errors come from
    /// [`Extractor::extract`].
    pub async fn refresh(&self) -> Result<DrawResult> {
        debug!("Fetching {}", self.fetcher.endpoint());
        let markup = self.fetcher.fetch().await?;
        let draw = self.extractor.extract(&markup)?;
        info!("Draw {}: {}", draw.draw_date(), draw.summary());
        Ok(draw)
    }

    /// Check that the source is reachable and looks like a results page
    ///
    /// Performs one fetch. Fails with `InvalidData` when the page is blank or
    /// the probe marker matches nothing.
    pub async fn probe(&self) -> Result<()> {
        let markup = self.fetcher.fetch().await?;
        if markup.trim().is_empty() {
            return Err(Error::invalid_data(format!(
                "{} returned an empty page",
                self.fetcher.endpoint()
            )));
        }

        if let Some(marker) = &self.probe_marker {
            let selector = selector::parse_selector(marker)?;
            let document = scraper::Html::parse_document(&markup);
            if document.select(&selector).next().is_none() {
                return Err(Error::invalid_data(format!(
                    "{} does not contain '{}'",
                    self.fetcher.endpoint(),
                    marker
                )));
            }
        }

        Ok(())
    }

    pub fn endpoint(&self) -> &str {
        self.fetcher.endpoint()
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }
}
