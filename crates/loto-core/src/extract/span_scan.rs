// # Span Scan Strategy
//
// Heuristic page-wide scan: every leaf element of one tag, in document order.
//
// The results page markup changes often and carries no stable ids around the
// balls, so this strategy does not look for a results container at all. It
// relies on no unrelated in-range number appearing before the draw in the
// page. That is a known fragility of the positional convention.

use scraper::{Html, Selector};

use crate::error::{Error, Result};
use crate::traits::TokenStrategy;
use crate::traits::token_strategy::{TokenScan, element_text, is_leaf};

/// Page-wide leaf element scan
#[derive(Debug)]
pub struct SpanScanStrategy {
    tag: String,
    selector: Selector,
}

impl SpanScanStrategy {
    /// Scan every leaf `tag` element
    pub fn new(tag: impl Into<String>) -> Result<Self> {
        let tag = tag.into();
        let selector = Selector::parse(&tag)
            .map_err(|why| Error::config(format!("Invalid scan tag '{}': {:?}", tag, why)))?;
        Ok(Self { tag, selector })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl TokenStrategy for SpanScanStrategy {
    fn scan(&self, document: &Html) -> TokenScan {
        let mut scan = TokenScan::default();
        for element in document.select(&self.selector).filter(is_leaf) {
            scan.push(&element_text(&element));
        }
        scan
    }

    fn name(&self) -> &'static str {
        "span_scan"
    }
}
