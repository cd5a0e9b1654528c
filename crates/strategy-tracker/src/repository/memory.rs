use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{
    MembershipRepository, OrganizationRepository, RecordRepository, RepositoryError,
    ResourceReportRepository, StrategyStore,
};
use crate::access::{latest_accepted, Membership, TenantScope};
use crate::domain::{
    CoreValue, InitiativePlanning, InitiativeReport, Mission, Organization, OrganizationDraft,
    OrganizationId, RecordId, ResourceItemPlan, ResourceItemReport, RiskEntry, Stakeholder,
    StrategicActionPlan, StrategicCycle, StrategicReport, StrategyHierarchy, SwotAnalysis,
    SwotReport, Tenanted, Vision,
};

fn poisoned() -> RepositoryError {
    RepositoryError::Unavailable("table lock poisoned".to_string())
}

/// Mutex-guarded table keyed by record id, with its own id sequence.
pub struct MemoryTable<T> {
    rows: Mutex<BTreeMap<RecordId, Tenanted<T>>>,
    sequence: AtomicU64,
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            sequence: AtomicU64::new(1),
        }
    }
}

impl<T> MemoryTable<T> {
    fn rows(&self) -> Result<MutexGuard<'_, BTreeMap<RecordId, Tenanted<T>>>, RepositoryError> {
        self.rows.lock().map_err(|_| poisoned())
    }

    fn next_id(&self) -> RecordId {
        RecordId(self.sequence.fetch_add(1, Ordering::Relaxed))
    }
}

impl<T> RecordRepository<T> for MemoryTable<T>
where
    T: Clone + Send + 'static,
{
    fn insert(
        &self,
        organization_id: OrganizationId,
        record: T,
    ) -> Result<Tenanted<T>, RepositoryError> {
        let row = Tenanted::new(self.next_id(), organization_id, record);
        let mut rows = self.rows()?;
        if rows.contains_key(&row.id) {
            return Err(RepositoryError::Conflict);
        }
        rows.insert(row.id, row.clone());
        Ok(row)
    }

    fn update(
        &self,
        scope: &TenantScope,
        id: RecordId,
        record: T,
    ) -> Result<Tenanted<T>, RepositoryError> {
        let mut rows = self.rows()?;
        match rows.get_mut(&id) {
            Some(row) if scope.admits(row.organization_id) => {
                row.record = record;
                Ok(row.clone())
            }
            _ => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(
        &self,
        scope: &TenantScope,
        id: RecordId,
    ) -> Result<Option<Tenanted<T>>, RepositoryError> {
        let rows = self.rows()?;
        Ok(rows
            .get(&id)
            .filter(|row| scope.admits(row.organization_id))
            .cloned())
    }

    fn list(&self, scope: &TenantScope) -> Result<Vec<Tenanted<T>>, RepositoryError> {
        let rows = self.rows()?;
        Ok(rows
            .values()
            .filter(|row| scope.admits(row.organization_id))
            .cloned()
            .collect())
    }

    fn delete(&self, scope: &TenantScope, id: RecordId) -> Result<(), RepositoryError> {
        let mut rows = self.rows()?;
        let visible = rows
            .get(&id)
            .is_some_and(|row| scope.admits(row.organization_id));
        if !visible {
            return Err(RepositoryError::NotFound);
        }
        rows.remove(&id);
        Ok(())
    }
}

impl MembershipRepository for MemoryTable<Membership> {
    fn latest_accepted(
        &self,
        email: &str,
        organization_id: OrganizationId,
    ) -> Result<Option<Tenanted<Membership>>, RepositoryError> {
        let rows = self.rows()?;
        Ok(latest_accepted(rows.values(), email, organization_id).cloned())
    }

    fn find_by_token(&self, token: Uuid) -> Result<Option<Tenanted<Membership>>, RepositoryError> {
        let rows = self.rows()?;
        Ok(rows
            .values()
            .find(|row| row.record.token == token)
            .cloned())
    }
}

impl ResourceReportRepository for MemoryTable<ResourceItemReport> {}

pub struct MemoryOrganizations {
    rows: Mutex<BTreeMap<OrganizationId, Organization>>,
    sequence: AtomicU64,
}

impl Default for MemoryOrganizations {
    fn default() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            sequence: AtomicU64::new(1),
        }
    }
}

impl OrganizationRepository for MemoryOrganizations {
    fn insert(
        &self,
        profile: OrganizationDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Organization, RepositoryError> {
        let id = OrganizationId(self.sequence.fetch_add(1, Ordering::Relaxed));
        let organization = Organization {
            id,
            profile,
            created_at,
        };
        let mut rows = self.rows.lock().map_err(|_| poisoned())?;
        rows.insert(id, organization.clone());
        Ok(organization)
    }

    fn update(
        &self,
        id: OrganizationId,
        profile: OrganizationDraft,
    ) -> Result<Organization, RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned())?;
        let organization = rows.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        organization.profile = profile;
        Ok(organization.clone())
    }

    fn fetch(&self, id: OrganizationId) -> Result<Option<Organization>, RepositoryError> {
        let rows = self.rows.lock().map_err(|_| poisoned())?;
        Ok(rows.get(&id).cloned())
    }
}

/// In-process store backing the service binary, the demo and the tests.
#[derive(Default)]
pub struct MemoryStore {
    organizations: MemoryOrganizations,
    memberships: MemoryTable<Membership>,
    visions: MemoryTable<Vision>,
    missions: MemoryTable<Mission>,
    values: MemoryTable<CoreValue>,
    stakeholders: MemoryTable<Stakeholder>,
    hierarchies: MemoryTable<StrategyHierarchy>,
    cycles: MemoryTable<StrategicCycle>,
    action_plans: MemoryTable<StrategicActionPlan>,
    strategic_reports: MemoryTable<StrategicReport>,
    swot_analyses: MemoryTable<SwotAnalysis>,
    swot_reports: MemoryTable<SwotReport>,
    initiatives: MemoryTable<InitiativePlanning>,
    initiative_reports: MemoryTable<InitiativeReport>,
    resource_plans: MemoryTable<ResourceItemPlan>,
    resource_reports: MemoryTable<ResourceItemReport>,
    risks: MemoryTable<RiskEntry>,
}

impl StrategyStore for MemoryStore {
    fn organizations(&self) -> &dyn OrganizationRepository {
        &self.organizations
    }

    fn memberships(&self) -> &dyn MembershipRepository {
        &self.memberships
    }

    fn visions(&self) -> &dyn RecordRepository<Vision> {
        &self.visions
    }

    fn missions(&self) -> &dyn RecordRepository<Mission> {
        &self.missions
    }

    fn values(&self) -> &dyn RecordRepository<CoreValue> {
        &self.values
    }

    fn stakeholders(&self) -> &dyn RecordRepository<Stakeholder> {
        &self.stakeholders
    }

    fn hierarchies(&self) -> &dyn RecordRepository<StrategyHierarchy> {
        &self.hierarchies
    }

    fn cycles(&self) -> &dyn RecordRepository<StrategicCycle> {
        &self.cycles
    }

    fn action_plans(&self) -> &dyn RecordRepository<StrategicActionPlan> {
        &self.action_plans
    }

    fn strategic_reports(&self) -> &dyn RecordRepository<StrategicReport> {
        &self.strategic_reports
    }

    fn swot_analyses(&self) -> &dyn RecordRepository<SwotAnalysis> {
        &self.swot_analyses
    }

    fn swot_reports(&self) -> &dyn RecordRepository<SwotReport> {
        &self.swot_reports
    }

    fn initiatives(&self) -> &dyn RecordRepository<InitiativePlanning> {
        &self.initiatives
    }

    fn initiative_reports(&self) -> &dyn RecordRepository<InitiativeReport> {
        &self.initiative_reports
    }

    fn resource_plans(&self) -> &dyn RecordRepository<ResourceItemPlan> {
        &self.resource_plans
    }

    fn resource_reports(&self) -> &dyn ResourceReportRepository {
        &self.resource_reports
    }

    fn risks(&self) -> &dyn RecordRepository<RiskEntry> {
        &self.risks
    }
}
