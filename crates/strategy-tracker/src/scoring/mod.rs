//! Pure derivations of stored and read-time metrics.
//!
//! Nothing here fails: unrecognised levels score as medium and degenerate arithmetic
//! (zero spans, zero plans, overflow) resolves to zero.

mod initiative;
mod ordinal;
mod risk;
mod stakeholder;
mod strategic;

pub use initiative::{
    initiative_progress, remaining_amount, remaining_days, resource_utilization,
    status_achievement_percent, total_consumption, utilization_percent, InitiativeFigures,
    InitiativeProgress, ResourceUtilization,
};
pub use ordinal::OrdinalLevel;
pub use risk::{mitigation_action, severity_score};
pub use stakeholder::{
    assess_engagement, attention_threshold, engagement_priority_score, engagement_quadrant,
    key_stakeholder_threshold, EngagementAssessment, EngagementQuadrant, StakeholderLevels,
};
pub use strategic::{
    improvement_needed, percent_achieved, report_metrics, PlanTargets, ReportMetrics,
};
