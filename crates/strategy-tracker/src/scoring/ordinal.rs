use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Five-point qualitative scale shared by stakeholder, risk, and initiative fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrdinalLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl OrdinalLevel {
    pub const ALL: [OrdinalLevel; 5] = [
        OrdinalLevel::VeryLow,
        OrdinalLevel::Low,
        OrdinalLevel::Medium,
        OrdinalLevel::High,
        OrdinalLevel::VeryHigh,
    ];

    /// Recognises the stored key (`very_high`) and the display label (`Very High`).
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.key() == raw || level.label() == raw)
    }

    /// Unknown or empty values count as [`OrdinalLevel::Medium`].
    pub fn from_field(raw: &str) -> Self {
        Self::parse(raw).unwrap_or(OrdinalLevel::Medium)
    }

    pub const fn key(self) -> &'static str {
        match self {
            OrdinalLevel::VeryLow => "very_low",
            OrdinalLevel::Low => "low",
            OrdinalLevel::Medium => "medium",
            OrdinalLevel::High => "high",
            OrdinalLevel::VeryHigh => "very_high",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            OrdinalLevel::VeryLow => "Very Low",
            OrdinalLevel::Low => "Low",
            OrdinalLevel::Medium => "Medium",
            OrdinalLevel::High => "High",
            OrdinalLevel::VeryHigh => "Very High",
        }
    }

    /// 1 through 5.
    pub const fn points(self) -> u8 {
        match self {
            OrdinalLevel::VeryLow => 1,
            OrdinalLevel::Low => 2,
            OrdinalLevel::Medium => 3,
            OrdinalLevel::High => 4,
            OrdinalLevel::VeryHigh => 5,
        }
    }

    /// 20 through 100, used for initiative status achievement.
    pub const fn status_percent(self) -> u8 {
        self.points() * 20
    }

    pub fn weight(self) -> Decimal {
        Decimal::from(self.points())
    }

    pub fn is_high_or_above(self) -> bool {
        self >= OrdinalLevel::High
    }

    pub fn is_low_or_below(self) -> bool {
        self <= OrdinalLevel::Low
    }
}

impl fmt::Display for OrdinalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
