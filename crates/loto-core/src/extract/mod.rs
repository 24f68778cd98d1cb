//! Extraction and validation of a draw from raw markup
//!
//! ```text
//! markup ──parse──▶ Html ──TokenStrategy──▶ candidates ──first 6──▶ DrawResult
//!                    │                                                ▲
//!                    └──────────DrawDateSource──────────draw date─────┘
//! ```
//!
//! The [`Extractor`] is the only origin of `Parse` and `InsufficientData`
//! errors. Under [`FailurePolicy::Lenient`] an insufficient page yields the
//! fallback record instead.

pub mod selector;
pub mod span_scan;

pub use selector::SelectorStrategy;
pub use span_scan::SpanScanStrategy;

use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::config::{DrawDateConfig, ExtractionConfig, FailurePolicy, LotoConfig};
use crate::draw::DrawResult;
use crate::error::{Error, Result};
use crate::traits::TokenStrategy;
use crate::traits::token_strategy::{TokenScan, element_text};

/// Build the token strategy described by `config`
pub fn strategy_from_config(config: &ExtractionConfig) -> Result<Box<dyn TokenStrategy>> {
    config.validate()?;
    match config {
        ExtractionConfig::SpanScan { tag } => Ok(Box::new(SpanScanStrategy::new(tag.as_str())?)),
        ExtractionConfig::Selector { container, item } => {
            Ok(Box::new(SelectorStrategy::new(container, item)?))
        }
    }
}

/// Independent draw date lookup
///
/// Tries the optional selector first and falls back to the static label.
#[derive(Debug)]
pub struct DrawDateSource {
    selector: Option<Selector>,
    label: String,
}

impl DrawDateSource {
    /// Always use `label`
    pub fn fixed(label: impl Into<String>) -> Self {
        Self {
            selector: None,
            label: label.into(),
        }
    }

    /// Read the date from the first `selector` match, else use `label`
    pub fn with_selector(selector: &str, label: impl Into<String>) -> Result<Self> {
        Ok(Self {
            selector: Some(selector::parse_selector(selector)?),
            label: label.into(),
        })
    }

    pub fn from_config(config: &DrawDateConfig) -> Result<Self> {
        config.validate()?;
        match &config.selector {
            Some(selector) => Self::with_selector(selector, config.label.as_str()),
            None => Ok(Self::fixed(config.label.as_str())),
        }
    }

    /// Resolve the draw date for `document`
    pub fn resolve(&self, document: &Html) -> String {
        self.selector
            .as_ref()
            .and_then(|selector| document.select(selector).next())
            .map(|element| {
                element_text(&element)
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| self.label.clone())
    }
}

/// Turns markup into a validated [`DrawResult`]
pub struct Extractor {
    strategy: Box<dyn TokenStrategy>,
    draw_date: DrawDateSource,
    policy: FailurePolicy,
}

impl Extractor {
    pub fn new(strategy: Box<dyn TokenStrategy>, draw_date: DrawDateSource, policy: FailurePolicy) -> Self {
        Self {
            strategy,
            draw_date,
            policy,
        }
    }

    /// Build an extractor from the full configuration
    pub fn from_config(config: &LotoConfig) -> Result<Self> {
        Ok(Self::new(
            strategy_from_config(&config.extraction)?,
            DrawDateSource::from_config(&config.draw_date)?,
            config.failure_policy,
        ))
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Extract a draw from `markup`
    ///
    /// # Returns
    ///
    /// - `Ok(DrawResult)`: Live record, or the fallback record in lenient mode
    /// - `Err(Error::Parse)`: The markup is blank
    /// - `Err(Error::InsufficientData)`: Fewer than six candidates (strict mode)
    pub fn extract(&self, markup: &str) -> Result<DrawResult> {
        if markup.trim().is_empty() {
            return Err(Error::parse("document is empty"));
        }

        let document = Html::parse_document(markup);
        let scan = self.strategy.scan(&document);
        debug!("{}", token_trace(self.strategy.name(), &scan));

        let draw_date = self.draw_date.resolve(&document);
        match DrawResult::from_candidates(&scan.accepted, draw_date) {
            Err(Error::InsufficientData { found, required }) => match self.policy {
                FailurePolicy::Strict => {
                    warn!("Not enough numbers found: {} (need {})", found, required);
                    Err(Error::insufficient(found, required))
                }
                FailurePolicy::Lenient => {
                    warn!(
                        "Not enough numbers found: {} (need {}), publishing fallback record",
                        found, required
                    );
                    Ok(DrawResult::fallback())
                }
            },
            other => other,
        }
    }
}

/// Diagnostic line listing every accepted token in document order
fn token_trace(strategy: &str, scan: &TokenScan) -> String {
    format!(
        "Numbers found by {}: {:?} ({} fragments discarded)",
        strategy, scan.accepted, scan.discarded
    )
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("strategy", &self.strategy.name())
            .field("draw_date", &self.draw_date)
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <h2 class="draw-date">  Mercredi
             2 juillet 2025 </h2>
          <span>2</span><span>5</span><span>26</span><span>32</span>
          <span>44</span><span>10</span><span>2024</span>
        </body></html>"#;

    fn span_extractor(policy: FailurePolicy) -> Extractor {
        Extractor::new(
            Box::new(SpanScanStrategy::new("span").unwrap()),
            DrawDateSource::fixed("Mercredi 25 juin 2025"),
            policy,
        )
    }

    #[test]
    fn extracts_draw_in_source_order() {
        let draw = span_extractor(FailurePolicy::Strict).extract(PAGE).unwrap();
        assert_eq!(draw.balls(), &[2, 5, 26, 32, 44]);
        assert_eq!(draw.bonus_ball(), 10);
        assert_eq!(draw.summary(), "2 - 5 - 26 - 32 - 44 * 10");
        assert_eq!(draw.draw_date(), "Mercredi 25 juin 2025");
        assert!(!draw.is_fallback());
    }

    #[test]
    fn blank_markup_is_a_parse_error() {
        let extractor = span_extractor(FailurePolicy::Lenient);
        assert!(matches!(extractor.extract(""), Err(Error::Parse(_))));
        assert!(matches!(extractor.extract(" \n\t"), Err(Error::Parse(_))));
    }

    #[test]
    fn date_selector_collapses_whitespace() {
        let source = DrawDateSource::with_selector("h2.draw-date", "fallback").unwrap();
        let document = Html::parse_document(PAGE);
        assert_eq!(source.resolve(&document), "Mercredi 2 juillet 2025");
    }

    #[test]
    fn date_selector_falls_back_to_label() {
        let source = DrawDateSource::with_selector("h1.missing", "Samedi 28 juin 2025").unwrap();
        let document = Html::parse_document(PAGE);
        assert_eq!(source.resolve(&document), "Samedi 28 juin 2025");
    }

    #[test]
    fn token_trace_lists_accepted_numbers_in_order() {
        let strategy = SpanScanStrategy::new("span").unwrap();
        let scan = strategy.scan(&Html::parse_document(PAGE));
        assert_eq!(
            token_trace(strategy.name(), &scan),
            "Numbers found by span_scan: [2, 5, 26, 32, 44, 10] (1 fragments discarded)"
        );
    }

    #[test]
    fn extractor_from_config_reads_date_through_selector() {
        let mut config = LotoConfig::default();
        config.draw_date.selector = Some("h2.draw-date".to_string());
        let draw = Extractor::from_config(&config).unwrap().extract(PAGE).unwrap();
        assert_eq!(draw.draw_date(), "Mercredi 2 juillet 2025");
        assert_eq!(draw.summary(), "2 - 5 - 26 - 32 - 44 * 10");
    }

    #[test]
    fn extractor_from_config_uses_selector_strategy() {
        let mut config = LotoConfig::default();
        config.extraction = ExtractionConfig::Selector {
            container: "#loto-results".to_string(),
            item: "span".to_string(),
        };
        let extractor = Extractor::from_config(&config).unwrap();
        assert!(matches!(
            extractor.extract(PAGE),
            Err(Error::InsufficientData { found: 0, .. })
        ));
    }
}
