use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::catalog::ChoiceCatalog;
use crate::scoring::{
    improvement_needed, mitigation_action, report_metrics, severity_score, PlanTargets,
    ReportMetrics,
};

/// One KPI in the strategy map: perspective > focus area > objective > KPI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyHierarchy {
    pub perspective: String,
    pub focus_area: String,
    pub objective: String,
    pub kpi: String,
    #[serde(default)]
    pub formula: String,
}

impl StrategyHierarchy {
    pub fn selection(&self) -> [&str; 4] {
        [
            self.perspective.as_str(),
            self.focus_area.as_str(),
            self.objective.as_str(),
            self.kpi.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeHorizonType {
    #[serde(rename = "Long Term")]
    LongTerm,
    #[serde(rename = "Medium Term")]
    MediumTerm,
    #[serde(rename = "Short Term")]
    ShortTerm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicCycleDraft {
    pub time_horizon: String,
    pub time_horizon_type: TimeHorizonType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicCycle {
    pub name: String,
    #[serde(flatten)]
    pub schedule: StrategicCycleDraft,
}

impl StrategicCycle {
    /// Names the cycle `"<org> - <horizon> (<Month YYYY>–<Month YYYY>)"`.
    pub fn named(organization_name: &str, schedule: StrategicCycleDraft) -> Self {
        let name = format!(
            "{} - {} ({}–{})",
            organization_name,
            schedule.time_horizon,
            schedule.start_date.format("%B %Y"),
            schedule.end_date.format("%B %Y"),
        );
        Self { name, schedule }
    }

    pub fn duration_days(&self) -> i64 {
        (self.schedule.end_date - self.schedule.start_date).num_days()
    }

    /// Calendar quarter (1-4) the cycle starts in.
    pub fn start_quarter(&self) -> u32 {
        (self.schedule.start_date.month() - 1) / 3 + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorType {
    Lead,
    Lagg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectionOfChange {
    Increasing,
    Decreasing,
}

fn full_weight() -> Decimal {
    Decimal::ONE_HUNDRED
}

fn pending() -> String {
    "pending".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicActionPlanDraft {
    pub cycle_id: RecordId,
    pub hierarchy_id: RecordId,
    pub indicator_type: IndicatorType,
    pub direction_of_change: DirectionOfChange,
    pub baseline: Decimal,
    pub target: Decimal,
    #[serde(default = "full_weight")]
    pub weight: Decimal,
    #[serde(default = "pending")]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicActionPlan {
    #[serde(flatten)]
    pub plan: StrategicActionPlanDraft,
    pub improvement_needed: Decimal,
}

impl StrategicActionPlan {
    pub fn measure(plan: StrategicActionPlanDraft) -> Self {
        let improvement_needed = improvement_needed(plan.baseline, plan.target);
        Self {
            plan,
            improvement_needed,
        }
    }

    pub fn targets(&self) -> PlanTargets {
        PlanTargets {
            baseline: self.plan.baseline,
            target: self.plan.target,
            weight: self.plan.weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicReportDraft {
    pub action_plan_id: RecordId,
    pub achievement: Decimal,
    #[serde(default = "pending")]
    pub status: String,
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default)]
    pub data_collector: Option<String>,
    #[serde(default)]
    pub progress_summary: Option<String>,
    #[serde(default)]
    pub performance_summary: Option<String>,
    #[serde(default)]
    pub challenges: Option<String>,
    #[serde(default)]
    pub successes: Option<String>,
    #[serde(default)]
    pub lessons_learned: Option<String>,
}

/// Stored report; `metrics` reflect the plan as it stood when the report was saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicReport {
    #[serde(flatten)]
    pub report: StrategicReportDraft,
    #[serde(flatten)]
    pub metrics: ReportMetrics,
}

impl StrategicReport {
    pub fn against(plan: &StrategicActionPlan, report: StrategicReportDraft) -> Self {
        let metrics = report_metrics(&plan.targets(), report.achievement);
        Self { report, metrics }
    }
}

/// Declaration order is the display order: internal factors before external ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SwotType {
    Strength,
    Weakness,
    Opportunity,
    Threat,
}

impl SwotType {
    pub const fn key(self) -> &'static str {
        match self {
            SwotType::Strength => "Strength",
            SwotType::Weakness => "Weakness",
            SwotType::Opportunity => "Opportunity",
            SwotType::Threat => "Threat",
        }
    }
}

fn medium_label() -> String {
    "Medium".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwotAnalysis {
    pub swot_type: SwotType,
    pub pillar: String,
    pub factor: String,
    #[serde(default = "medium_label")]
    pub priority: String,
    #[serde(default = "medium_label")]
    pub impact: String,
    #[serde(default)]
    pub likelihood: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// SWOT factor recorded against the period a strategic report covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwotReport {
    pub strategic_report_id: RecordId,
    #[serde(flatten)]
    pub analysis: SwotAnalysis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskStatus {
    #[default]
    Identified,
    Mitigated,
    Closed,
}

fn medium_key() -> String {
    "medium".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDraft {
    pub cycle_id: RecordId,
    pub risk_category: String,
    pub risk_name: String,
    #[serde(default = "medium_key")]
    pub likelihood: String,
    #[serde(default = "medium_key")]
    pub impact: String,
    #[serde(default)]
    pub status: RiskStatus,
}

/// Stored risk with its severity and the catalog mitigation copied at save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskEntry {
    #[serde(flatten)]
    pub risk: RiskDraft,
    pub severity_score: u8,
    pub mitigation_action: String,
}

impl RiskEntry {
    pub fn assess(catalog: &ChoiceCatalog, risk: RiskDraft) -> Self {
        let severity_score = severity_score(&risk.likelihood, &risk.impact);
        let mitigation_action = mitigation_action(catalog, &risk.risk_category, &risk.risk_name);
        Self {
            risk,
            severity_score,
            mitigation_action,
        }
    }
}
