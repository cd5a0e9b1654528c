//! Storage contracts. Every tenant-owned read or write goes through a
//! [`TenantScope`]; rows outside the scope behave exactly like missing rows.

mod memory;

pub use memory::{MemoryOrganizations, MemoryStore, MemoryTable};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::access::{Membership, TenantScope};
use crate::domain::{
    CoreValue, InitiativePlanning, InitiativeReport, Mission, Organization, OrganizationDraft,
    OrganizationId, RecordId, ResourceItemPlan, ResourceItemReport, RiskEntry, Stakeholder,
    StrategicActionPlan, StrategicCycle, StrategicReport, StrategyHierarchy, SwotAnalysis,
    SwotReport, Tenanted, Vision,
};
use crate::scoring::total_consumption;

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Scoped CRUD over one kind of tenant-owned record.
pub trait RecordRepository<T>: Send + Sync {
    /// Stores `record` under `organization_id` and assigns a fresh id.
    fn insert(&self, organization_id: OrganizationId, record: T)
        -> Result<Tenanted<T>, RepositoryError>;

    /// Replaces the payload of a visible row. The owning organization never changes.
    fn update(
        &self,
        scope: &TenantScope,
        id: RecordId,
        record: T,
    ) -> Result<Tenanted<T>, RepositoryError>;

    fn fetch(&self, scope: &TenantScope, id: RecordId)
        -> Result<Option<Tenanted<T>>, RepositoryError>;

    fn list(&self, scope: &TenantScope) -> Result<Vec<Tenanted<T>>, RepositoryError>;

    fn delete(&self, scope: &TenantScope, id: RecordId) -> Result<(), RepositoryError>;
}

/// Memberships add the two lookups the access resolver and invitees need.
pub trait MembershipRepository: RecordRepository<Membership> {
    fn latest_accepted(
        &self,
        email: &str,
        organization_id: OrganizationId,
    ) -> Result<Option<Tenanted<Membership>>, RepositoryError>;

    /// Unscoped: the invitee is not yet a member of the inviting organization.
    fn find_by_token(&self, token: Uuid) -> Result<Option<Tenanted<Membership>>, RepositoryError>;
}

/// Resource reports add the live consumption sum for a plan.
pub trait ResourceReportRepository: RecordRepository<ResourceItemReport> {
    fn total_used(&self, scope: &TenantScope, plan_id: RecordId) -> Result<Decimal, RepositoryError> {
        Ok(total_consumption(
            self.list(scope)?
                .iter()
                .filter(|row| row.record.plan_id == plan_id)
                .map(|row| row.record.resource_used),
        ))
    }
}

/// Organizations are the tenants themselves and are addressed by their own id.
pub trait OrganizationRepository: Send + Sync {
    fn insert(
        &self,
        profile: OrganizationDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Organization, RepositoryError>;

    fn update(
        &self,
        id: OrganizationId,
        profile: OrganizationDraft,
    ) -> Result<Organization, RepositoryError>;

    fn fetch(&self, id: OrganizationId) -> Result<Option<Organization>, RepositoryError>;
}

/// The full set of tables the service works against.
pub trait StrategyStore: Send + Sync {
    fn organizations(&self) -> &dyn OrganizationRepository;
    fn memberships(&self) -> &dyn MembershipRepository;
    fn visions(&self) -> &dyn RecordRepository<Vision>;
    fn missions(&self) -> &dyn RecordRepository<Mission>;
    fn values(&self) -> &dyn RecordRepository<CoreValue>;
    fn stakeholders(&self) -> &dyn RecordRepository<Stakeholder>;
    fn hierarchies(&self) -> &dyn RecordRepository<StrategyHierarchy>;
    fn cycles(&self) -> &dyn RecordRepository<StrategicCycle>;
    fn action_plans(&self) -> &dyn RecordRepository<StrategicActionPlan>;
    fn strategic_reports(&self) -> &dyn RecordRepository<StrategicReport>;
    fn swot_analyses(&self) -> &dyn RecordRepository<SwotAnalysis>;
    fn swot_reports(&self) -> &dyn RecordRepository<SwotReport>;
    fn initiatives(&self) -> &dyn RecordRepository<InitiativePlanning>;
    fn initiative_reports(&self) -> &dyn RecordRepository<InitiativeReport>;
    fn resource_plans(&self) -> &dyn RecordRepository<ResourceItemPlan>;
    fn resource_reports(&self) -> &dyn ResourceReportRepository;
    fn risks(&self) -> &dyn RecordRepository<RiskEntry>;
}
