//! Configuration types for the results pipeline
//!
//! The host owns persistence of these values; the pipeline only consumes them.

use serde::{Deserialize, Serialize};

use crate::draw::FALLBACK_DRAW_DATE;

/// Shortest allowed refresh interval (5 minutes)
pub const MIN_UPDATE_INTERVAL_SECS: u64 = 300;

/// Longest allowed refresh interval (24 hours)
pub const MAX_UPDATE_INTERVAL_SECS: u64 = 86_400;

/// Results page fetched when no URL is configured
pub const DEFAULT_RESULTS_URL: &str =
    "https://www.fdj.fr/jeux-de-tirage/loto/resultats/mercredi-25-juin-2025";

/// User-Agent sent with every request unless overridden
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotoConfig {
    /// Display name prefixed to every field label
    #[serde(default = "default_name")]
    pub name: String,

    /// Short label of the results provider, reported with every snapshot
    #[serde(default = "default_source_label")]
    pub source_label: String,

    /// Seconds between refresh cycles
    #[serde(default = "default_update_interval_secs")]
    pub update_interval_secs: u64,

    /// Expose the draw date field
    #[serde(default = "default_true")]
    pub show_date: bool,

    /// Expose the complete result (summary) field
    #[serde(default = "default_true")]
    pub show_complete_result: bool,

    /// Where and how to fetch the results page
    #[serde(default)]
    pub source: SourceConfig,

    /// How numeric tokens are located in the page
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// How the draw date is obtained
    #[serde(default)]
    pub draw_date: DrawDateConfig,

    /// What to do when the page yields too few numbers
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// CSS selector that must match for the page to count as a results page
    /// when probing. `None` accepts any non-blank page.
    #[serde(default)]
    pub probe_marker: Option<String>,

    /// Capacity of the coordinator event channel
    ///
    /// When full, new events are dropped with a warning.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl LotoConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            name: default_name(),
            source_label: default_source_label(),
            update_interval_secs: default_update_interval_secs(),
            show_date: true,
            show_complete_result: true,
            source: SourceConfig::default(),
            extraction: ExtractionConfig::default(),
            draw_date: DrawDateConfig::default(),
            failure_policy: FailurePolicy::default(),
            probe_marker: None,
            event_channel_capacity: default_event_channel_capacity(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.name.trim().is_empty() {
            return Err(crate::Error::config("Name cannot be empty"));
        }

        if self.source_label.trim().is_empty() {
            return Err(crate::Error::config("Source label cannot be empty"));
        }

        if !(MIN_UPDATE_INTERVAL_SECS..=MAX_UPDATE_INTERVAL_SECS)
            .contains(&self.update_interval_secs)
        {
            return Err(crate::Error::config(format!(
                "Update interval must be between {} and {} seconds, got {}",
                MIN_UPDATE_INTERVAL_SECS, MAX_UPDATE_INTERVAL_SECS, self.update_interval_secs
            )));
        }

        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }

        if let Some(marker) = &self.probe_marker
            && marker.trim().is_empty()
        {
            return Err(crate::Error::config("Probe marker cannot be empty"));
        }

        self.source.validate()?;
        self.extraction.validate()?;
        self.draw_date.validate()?;

        Ok(())
    }

    /// Parse a JSON document and validate the result
    ///
    /// Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, crate::Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Refresh interval as a [`std::time::Duration`]
    pub fn update_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.update_interval_secs)
    }
}

impl Default for LotoConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Results page source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL of the results page
    #[serde(default = "default_url")]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl SourceConfig {
    /// Validate the source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.url.is_empty() {
            return Err(crate::Error::config("Source URL cannot be empty"));
        }
        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "Source URL must use HTTP or HTTPS scheme, got: {}",
                self.url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("Source timeout must be > 0"));
        }
        Ok(())
    }

    /// Request timeout as a [`std::time::Duration`]
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Token extraction strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtractionConfig {
    /// Scan every leaf element of one tag across the whole page
    SpanScan {
        /// Tag name to scan (e.g. "span")
        #[serde(default = "default_scan_tag")]
        tag: String,
    },

    /// Only look inside a results container
    Selector {
        /// CSS selector of the results container (e.g. "#loto-results")
        container: String,
        /// CSS selector of ball elements inside the container
        item: String,
    },
}

impl ExtractionConfig {
    /// Validate the extraction configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ExtractionConfig::SpanScan { tag } => {
                if tag.trim().is_empty() {
                    return Err(crate::Error::config("Scan tag cannot be empty"));
                }
                Ok(())
            }
            ExtractionConfig::Selector { container, item } => {
                if container.trim().is_empty() {
                    return Err(crate::Error::config("Results container selector cannot be empty"));
                }
                if item.trim().is_empty() {
                    return Err(crate::Error::config("Ball selector cannot be empty"));
                }
                Ok(())
            }
        }
    }

    /// Strategy type name
    pub fn type_name(&self) -> &'static str {
        match self {
            ExtractionConfig::SpanScan { .. } => "span_scan",
            ExtractionConfig::Selector { .. } => "selector",
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig::SpanScan {
            tag: default_scan_tag(),
        }
    }
}

/// Draw date configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawDateConfig {
    /// Optional CSS selector (e.g. a heading) holding the draw date
    #[serde(default)]
    pub selector: Option<String>,

    /// Label used when no selector is set or it matches nothing
    #[serde(default = "default_draw_date_label")]
    pub label: String,
}

impl DrawDateConfig {
    /// Validate the draw date configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.label.trim().is_empty() {
            return Err(crate::Error::config("Draw date label cannot be empty"));
        }
        if let Some(selector) = &self.selector
            && selector.trim().is_empty()
        {
            return Err(crate::Error::config("Draw date selector cannot be empty"));
        }
        Ok(())
    }
}

impl Default for DrawDateConfig {
    fn default() -> Self {
        Self {
            selector: None,
            label: default_draw_date_label(),
        }
    }
}

/// Behavior when a page yields fewer numbers than a draw needs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Fail the cycle with `InsufficientData`
    #[default]
    Strict,
    /// Publish the fallback record and log a warning
    Lenient,
}

impl std::str::FromStr for FailurePolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(FailurePolicy::Strict),
            "lenient" => Ok(FailurePolicy::Lenient),
            other => Err(crate::Error::config(format!(
                "Unknown failure policy '{}', expected strict or lenient",
                other
            ))),
        }
    }
}

fn default_name() -> String {
    "Loto FDJ".to_string()
}

fn default_source_label() -> String {
    "FDJ".to_string()
}

fn default_update_interval_secs() -> u64 {
    3600
}

fn default_true() -> bool {
    true
}

fn default_url() -> String {
    DEFAULT_RESULTS_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_scan_tag() -> String {
    "span".to_string()
}

fn default_draw_date_label() -> String {
    FALLBACK_DRAW_DATE.to_string()
}

fn default_event_channel_capacity() -> usize {
    64
}
