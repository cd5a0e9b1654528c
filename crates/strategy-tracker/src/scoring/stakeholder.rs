use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ordinal::OrdinalLevel;

/// Raw level fields as captured on a stakeholder record.
#[derive(Debug, Clone, Copy)]
pub struct StakeholderLevels<'a> {
    pub impact: &'a str,
    pub influence: &'a str,
    pub interest: &'a str,
    pub risk: &'a str,
    pub satisfaction: &'a str,
}

/// Derived engagement fields stored alongside the stakeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementAssessment {
    pub engagement_priority_score: Decimal,
    pub is_key_stakeholder: bool,
    pub requires_attention: bool,
}

/// Influence/interest grid placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementQuadrant {
    ManageClosely,
    KeepSatisfied,
    KeepInformed,
    Monitor,
}

pub fn key_stakeholder_threshold() -> Decimal {
    Decimal::new(70, 1)
}

pub fn attention_threshold() -> Decimal {
    Decimal::new(80, 1)
}

/// `(impact*0.30 + influence*0.25 + interest*0.20 + risk*0.25) * 2`, one decimal.
/// Ranges from 2.0 to 10.0.
pub fn engagement_priority_score(impact: &str, influence: &str, interest: &str, risk: &str) -> Decimal {
    let weighted = OrdinalLevel::from_field(impact).weight() * Decimal::new(30, 2)
        + OrdinalLevel::from_field(influence).weight() * Decimal::new(25, 2)
        + OrdinalLevel::from_field(interest).weight() * Decimal::new(20, 2)
        + OrdinalLevel::from_field(risk).weight() * Decimal::new(25, 2);

    (weighted * Decimal::TWO).round_dp(1)
}

pub fn assess_engagement(levels: &StakeholderLevels<'_>) -> EngagementAssessment {
    let score = engagement_priority_score(
        levels.impact,
        levels.influence,
        levels.interest,
        levels.risk,
    );

    let risky = OrdinalLevel::from_field(levels.risk).is_high_or_above();
    let dissatisfied = OrdinalLevel::from_field(levels.satisfaction).is_low_or_below();

    EngagementAssessment {
        engagement_priority_score: score,
        is_key_stakeholder: score >= key_stakeholder_threshold(),
        requires_attention: score >= attention_threshold() || risky || dissatisfied,
    }
}

pub fn engagement_quadrant(influence: &str, interest: &str) -> EngagementQuadrant {
    let influential = OrdinalLevel::from_field(influence).is_high_or_above();
    let interested = OrdinalLevel::from_field(interest).is_high_or_above();

    match (influential, interested) {
        (true, true) => EngagementQuadrant::ManageClosely,
        (true, false) => EngagementQuadrant::KeepSatisfied,
        (false, true) => EngagementQuadrant::KeepInformed,
        (false, false) => EngagementQuadrant::Monitor,
    }
}
