//! The draw record published once per refresh cycle

use serde::Serialize;

use crate::error::{Error, Result};

/// Number of main balls in a draw
pub const MAIN_BALLS: usize = 5;

/// Number of tokens a draw consumes (main balls plus the bonus ball)
pub const DRAW_SIZE: usize = MAIN_BALLS + 1;

/// Lowest valid ball number
pub const MIN_BALL: u8 = 1;

/// Highest valid ball number
pub const MAX_BALL: u8 = 49;

/// Draw date published alongside the fallback record
pub const FALLBACK_DRAW_DATE: &str = "Mercredi 25 juin 2025";

/// Main balls of the fallback record
pub const FALLBACK_BALLS: [u8; MAIN_BALLS] = [2, 5, 26, 32, 44];

/// Bonus ball of the fallback record
pub const FALLBACK_BONUS: u8 = 10;

/// Where a published record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordOrigin {
    /// Extracted from the live results page
    Live,
    /// Substituted last-known-good record
    Fallback,
}

/// One lottery draw: five main balls, a bonus ball, a date and a summary
///
/// A `DrawResult` is always fully populated. Every ball lies in
/// `MIN_BALL..=MAX_BALL` and `summary` is derived from the balls at
/// construction, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawResult {
    balls: [u8; MAIN_BALLS],
    bonus_ball: u8,
    draw_date: String,
    summary: String,
    origin: RecordOrigin,
}

impl DrawResult {
    /// Build a live draw record, rejecting out-of-range numbers
    pub fn new(balls: [u8; MAIN_BALLS], bonus_ball: u8, draw_date: impl Into<String>) -> Result<Self> {
        for (index, ball) in balls.iter().enumerate() {
            if !is_valid_ball(*ball) {
                return Err(Error::invalid_draw(format!(
                    "ball {} is {}, expected {}..={}",
                    index + 1,
                    ball,
                    MIN_BALL,
                    MAX_BALL
                )));
            }
        }
        if !is_valid_ball(bonus_ball) {
            return Err(Error::invalid_draw(format!(
                "bonus ball is {}, expected {}..={}",
                bonus_ball, MIN_BALL, MAX_BALL
            )));
        }

        Ok(Self {
            summary: summarize(&balls, bonus_ball),
            balls,
            bonus_ball,
            draw_date: draw_date.into(),
            origin: RecordOrigin::Live,
        })
    }

    /// Build a draw from the first [`DRAW_SIZE`] entries of a candidate sequence
    ///
    /// Positions 0..5 are the main balls and position 5 is the bonus ball.
    /// Anything after that is ignored.
    pub fn from_candidates(candidates: &[u8], draw_date: impl Into<String>) -> Result<Self> {
        if candidates.len() < DRAW_SIZE {
            return Err(Error::insufficient(candidates.len(), DRAW_SIZE));
        }

        let mut balls = [0u8; MAIN_BALLS];
        balls.copy_from_slice(&candidates[..MAIN_BALLS]);
        Self::new(balls, candidates[MAIN_BALLS], draw_date)
    }

    /// The hardcoded last-known-good record used by lenient refreshes
    pub fn fallback() -> Self {
        Self {
            balls: FALLBACK_BALLS,
            bonus_ball: FALLBACK_BONUS,
            draw_date: FALLBACK_DRAW_DATE.to_string(),
            summary: summarize(&FALLBACK_BALLS, FALLBACK_BONUS),
            origin: RecordOrigin::Fallback,
        }
    }

    /// Main ball at 1-based `position`, if it exists
    pub fn ball(&self, position: usize) -> Option<u8> {
        position
            .checked_sub(1)
            .and_then(|index| self.balls.get(index))
            .copied()
    }

    /// All main balls in source order
    pub fn balls(&self) -> &[u8; MAIN_BALLS] {
        &self.balls
    }

    pub fn bonus_ball(&self) -> u8 {
        self.bonus_ball
    }

    pub fn draw_date(&self) -> &str {
        &self.draw_date
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn origin(&self) -> RecordOrigin {
        self.origin
    }

    /// Whether this is the substituted fallback record
    pub fn is_fallback(&self) -> bool {
        self.origin == RecordOrigin::Fallback
    }
}

/// Whether `value` is a valid ball number
pub fn is_valid_ball(value: u8) -> bool {
    (MIN_BALL..=MAX_BALL).contains(&value)
}

fn summarize(balls: &[u8; MAIN_BALLS], bonus_ball: u8) -> String {
    let main = balls
        .iter()
        .map(|ball| ball.to_string())
        .collect::<Vec<_>>()
        .join(" - ");
    format!("{} * {}", main, bonus_ball)
}
