//! Individually addressable fields of a draw
//!
//! Hosts expose each field of a [`DrawResult`] as its own named value.
//! [`DrawField`] enumerates the eight kinds so lookups are checked by the
//! compiler instead of going through string keys.

use serde::Serialize;
use std::fmt;

use crate::config::LotoConfig;
use crate::draw::DrawResult;

/// The eight fields of a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawField {
    Ball1,
    Ball2,
    Ball3,
    Ball4,
    Ball5,
    BonusBall,
    DrawDate,
    Summary,
}

/// Value of a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(u8),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl DrawField {
    /// All fields, in display order
    pub const ALL: [DrawField; 8] = [
        DrawField::Ball1,
        DrawField::Ball2,
        DrawField::Ball3,
        DrawField::Ball4,
        DrawField::Ball5,
        DrawField::BonusBall,
        DrawField::DrawDate,
        DrawField::Summary,
    ];

    /// Stable key used in logs and serialized output
    pub fn key(&self) -> &'static str {
        match self {
            DrawField::Ball1 => "ball_1",
            DrawField::Ball2 => "ball_2",
            DrawField::Ball3 => "ball_3",
            DrawField::Ball4 => "ball_4",
            DrawField::Ball5 => "ball_5",
            DrawField::BonusBall => "bonus_ball",
            DrawField::DrawDate => "draw_date",
            DrawField::Summary => "summary",
        }
    }

    /// Look a field up by its [`key`](Self::key)
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            DrawField::Ball1 => "Ball 1",
            DrawField::Ball2 => "Ball 2",
            DrawField::Ball3 => "Ball 3",
            DrawField::Ball4 => "Ball 4",
            DrawField::Ball5 => "Ball 5",
            DrawField::BonusBall => "Bonus Ball",
            DrawField::DrawDate => "Draw Date",
            DrawField::Summary => "Complete Result",
        }
    }

    /// Label prefixed with the configured display name, e.g. "Loto FDJ Ball 1"
    pub fn display_name(&self, name: &str) -> String {
        format!("{} {}", name, self.label())
    }

    /// Read this field from a draw
    pub fn value(&self, draw: &DrawResult) -> FieldValue {
        match self {
            DrawField::Ball1 => FieldValue::Number(draw.balls()[0]),
            DrawField::Ball2 => FieldValue::Number(draw.balls()[1]),
            DrawField::Ball3 => FieldValue::Number(draw.balls()[2]),
            DrawField::Ball4 => FieldValue::Number(draw.balls()[3]),
            DrawField::Ball5 => FieldValue::Number(draw.balls()[4]),
            DrawField::BonusBall => FieldValue::Number(draw.bonus_ball()),
            DrawField::DrawDate => FieldValue::Text(draw.draw_date().to_string()),
            DrawField::Summary => FieldValue::Text(draw.summary().to_string()),
        }
    }

    /// Whether the display toggles in `config` expose this field
    pub fn enabled(&self, config: &LotoConfig) -> bool {
        match self {
            DrawField::DrawDate => config.show_date,
            DrawField::Summary => config.show_complete_result,
            _ => true,
        }
    }

    /// Fields exposed under `config`, in display order
    pub fn enabled_fields(config: &LotoConfig) -> Vec<DrawField> {
        Self::ALL
            .into_iter()
            .filter(|field| field.enabled(config))
            .collect()
    }
}

impl fmt::Display for DrawField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A field as seen by a consumer: the last known value plus availability
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldReading {
    pub field: DrawField,
    /// Last published value; `None` until the first successful cycle
    pub value: Option<FieldValue>,
    /// Whether the most recent cycle succeeded
    pub available: bool,
}
