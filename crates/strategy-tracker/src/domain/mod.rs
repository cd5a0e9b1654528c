//! Records owned by an organization. Where a record carries derived fields, the
//! submitted fields live in a `*Draft` and the stored shape wraps it.

mod initiative;
mod organization;
mod stakeholder;
mod strategy;

pub use initiative::{
    InitiativePlanning, InitiativeReport, InitiativeReportView, ResourceItemPlan,
    ResourceItemReport, ResourceReportView, ResourceType,
};
pub use organization::{
    CoreValue, InvitationDraft, Mission, MissionSuggestions, Organization, OrganizationDraft,
    OrganizationType, StatementDraft, ValueDraft, Vision,
};
pub use stakeholder::{
    Stakeholder, StakeholderCategory, StakeholderDraft, StakeholderType, StakeholderView,
};
pub use strategy::{
    DirectionOfChange, IndicatorType, RiskDraft, RiskEntry, RiskStatus, StrategicActionPlan,
    StrategicActionPlanDraft, StrategicCycle, StrategicCycleDraft, StrategicReport,
    StrategicReportDraft, StrategyHierarchy, SwotAnalysis, SwotReport, SwotType,
    TimeHorizonType,
};

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(pub u64);

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "org-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored row: the payload plus its identity and owning organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenanted<T> {
    pub id: RecordId,
    pub organization_id: OrganizationId,
    #[serde(flatten)]
    pub record: T,
}

impl<T> Tenanted<T> {
    pub fn new(id: RecordId, organization_id: OrganizationId, record: T) -> Self {
        Self {
            id,
            organization_id,
            record,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Tenanted<U> {
        Tenanted {
            id: self.id,
            organization_id: self.organization_id,
            record: f(self.record),
        }
    }
}
