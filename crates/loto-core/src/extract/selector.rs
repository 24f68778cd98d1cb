// # Selector Strategy
//
// Structural alternative to the span scan: only ball elements inside a
// results container are considered. Use it once the page exposes a stable
// container (e.g. `#loto-results`).

use scraper::{Html, Selector};

use crate::error::{Error, Result};
use crate::traits::TokenStrategy;
use crate::traits::token_strategy::{TokenScan, element_text, is_leaf};

/// Container-scoped ball selector
#[derive(Debug)]
pub struct SelectorStrategy {
    container: Selector,
    item: Selector,
}

impl SelectorStrategy {
    /// Scan `item` elements inside every `container` match
    pub fn new(container: &str, item: &str) -> Result<Self> {
        Ok(Self {
            container: parse_selector(container)?,
            item: parse_selector(item)?,
        })
    }
}

impl TokenStrategy for SelectorStrategy {
    fn scan(&self, document: &Html) -> TokenScan {
        let mut scan = TokenScan::default();
        for container in document.select(&self.container) {
            for element in container.select(&self.item).filter(is_leaf) {
                scan.push(&element_text(&element));
            }
        }
        scan
    }

    fn name(&self) -> &'static str {
        "selector"
    }
}

pub(crate) fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|why| Error::config(format!("Invalid CSS selector '{}': {:?}", css, why)))
}
