// # Token Strategy Trait
//
// Defines how candidate numbers are located in a parsed results page.
//
// The strategy is isolated from the rest of the pipeline so the heuristic
// page-wide scan can be replaced by a structural selector without touching
// validation, date extraction or publishing.

use scraper::{ElementRef, Html};

use crate::draw::{MAX_BALL, MIN_BALL};

/// Outcome of one scan over a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenScan {
    /// Accepted numbers, in document order
    pub accepted: Vec<u8>,
    /// Number of fragments looked at and rejected
    pub discarded: usize,
}

impl TokenScan {
    /// Run one text fragment through the acceptance rule
    pub fn push(&mut self, fragment: &str) {
        match accept_token(fragment) {
            Some(value) => self.accepted.push(value),
            None => self.discarded += 1,
        }
    }
}

/// Trait for token scanning strategies
pub trait TokenStrategy: Send + Sync {
    /// Scan `document` and return the candidate sequence
    fn scan(&self, document: &Html) -> TokenScan;

    /// Strategy name, for logging
    fn name(&self) -> &'static str;
}

/// Accept a text fragment as a ball number
///
/// The trimmed fragment must be non-empty, consist only of ASCII decimal
/// digits and its value must lie in `MIN_BALL..=MAX_BALL`.
pub fn accept_token(fragment: &str) -> Option<u8> {
    let text = fragment.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    // Long digit runs overflow and are rejected like any out-of-range value
    let value: u32 = text.parse().ok()?;
    if (u32::from(MIN_BALL)..=u32::from(MAX_BALL)).contains(&value) {
        u8::try_from(value).ok()
    } else {
        None
    }
}

/// Whether `element` has no element children
pub fn is_leaf(element: &ElementRef<'_>) -> bool {
    !element.children().any(|child| child.value().is_element())
}

/// Concatenated text content of `element`
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_in_range_digits() {
        assert_eq!(accept_token("1"), Some(1));
        assert_eq!(accept_token(" 49 "), Some(49));
        assert_eq!(accept_token("\n 07\t"), Some(7));
    }

    #[test]
    fn rejects_everything_else() {
        for text in ["50", "0", "abc", "", "   ", "-3", "+3", "4.5", "12a", "2024", "99999999999999999999"] {
            assert_eq!(accept_token(text), None, "{:?} should be rejected", text);
        }
    }

    #[test]
    fn scan_counts_discarded_fragments() {
        let mut scan = TokenScan::default();
        for text in ["3", "Chance", "50", "12"] {
            scan.push(text);
        }
        assert_eq!(scan.accepted, vec![3, 12]);
        assert_eq!(scan.discarded, 2);
    }
}
