use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Tenanted;
use crate::scoring::{
    assess_engagement, engagement_quadrant, EngagementAssessment, EngagementQuadrant,
    StakeholderLevels,
};

/// Days without contact after which an engagement is overdue.
pub const ENGAGEMENT_OVERDUE_AFTER_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeholderType {
    Internal,
    External,
    Interface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeholderCategory {
    Strategic,
    #[default]
    Operational,
    Tactical,
    Influencer,
    Beneficiary,
}

fn medium() -> String {
    "medium".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeholderDraft {
    pub name: String,
    pub stakeholder_type: StakeholderType,
    #[serde(default)]
    pub category: StakeholderCategory,
    #[serde(default = "medium")]
    pub impact_level: String,
    #[serde(default = "medium")]
    pub influence_score: String,
    #[serde(default = "medium")]
    pub interest_level: String,
    #[serde(default = "medium")]
    pub risk_level: String,
    #[serde(default = "medium")]
    pub satisfaction_level: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub last_engagement_date: Option<NaiveDate>,
    #[serde(default)]
    pub next_engagement_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl StakeholderDraft {
    pub fn levels(&self) -> StakeholderLevels<'_> {
        StakeholderLevels {
            impact: &self.impact_level,
            influence: &self.influence_score,
            interest: &self.interest_level,
            risk: &self.risk_level,
            satisfaction: &self.satisfaction_level,
        }
    }
}

/// Stored stakeholder; `engagement` is recomputed from the profile on every save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stakeholder {
    pub code: String,
    #[serde(flatten)]
    pub profile: StakeholderDraft,
    #[serde(flatten)]
    pub engagement: EngagementAssessment,
}

impl Stakeholder {
    pub fn assess(code: String, profile: StakeholderDraft) -> Self {
        let engagement = assess_engagement(&profile.levels());
        Self {
            code,
            profile,
            engagement,
        }
    }

    /// `STK-<ORG3>-<NAME3>`; the caller appends a four digit counter.
    pub fn code_base(organization_name: &str, stakeholder_name: &str) -> String {
        let prefix = |raw: &str| raw.chars().take(3).collect::<String>().to_uppercase();
        format!(
            "STK-{}-{}",
            prefix(organization_name),
            prefix(stakeholder_name)
        )
    }

    pub fn days_since_last_engagement(&self, today: NaiveDate) -> Option<i64> {
        self.profile
            .last_engagement_date
            .map(|last| (today - last).num_days())
    }
}

/// Stakeholder as presented, with the read-time engagement fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakeholderView {
    #[serde(flatten)]
    pub stakeholder: Tenanted<Stakeholder>,
    pub quadrant: EngagementQuadrant,
    pub days_since_last_engagement: Option<i64>,
    pub engagement_overdue: bool,
}

impl StakeholderView {
    pub fn new(stakeholder: Tenanted<Stakeholder>, today: NaiveDate) -> Self {
        let profile = &stakeholder.record.profile;
        let quadrant = engagement_quadrant(&profile.influence_score, &profile.interest_level);
        let days_since_last_engagement = stakeholder.record.days_since_last_engagement(today);
        let engagement_overdue =
            days_since_last_engagement.is_some_and(|days| days > ENGAGEMENT_OVERDUE_AFTER_DAYS);

        Self {
            stakeholder,
            quadrant,
            days_since_last_engagement,
            engagement_overdue,
        }
    }
}
