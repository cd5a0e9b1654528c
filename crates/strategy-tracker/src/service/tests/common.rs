use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use crate::access::{AccessContext, Identity, Membership, TenantScope};
use crate::catalog::Catalogs;
use crate::domain::{
    CoreValue, DirectionOfChange, IndicatorType, InitiativePlanning, InitiativeReport, Mission,
    Organization, OrganizationDraft, OrganizationId, OrganizationType, RecordId,
    ResourceItemPlan, RiskDraft, RiskEntry, RiskStatus, Stakeholder, StakeholderCategory,
    StakeholderDraft, StakeholderType, StrategicActionPlan, StrategicActionPlanDraft,
    StrategicCycle, StrategicCycleDraft, StrategicReport, StrategicReportDraft, StrategyHierarchy,
    SwotAnalysis, SwotReport, SwotType, Tenanted, TimeHorizonType, Vision,
};
use crate::repository::{
    MembershipRepository, MemoryStore, OrganizationRepository, RecordRepository,
    RepositoryError, ResourceReportRepository, StrategyStore,
};
use crate::service::StrategyService;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn catalogs() -> Arc<Catalogs> {
    Arc::new(Catalogs::embedded().expect("embedded catalogs parse"))
}

pub(super) fn memory_service() -> StrategyService<MemoryStore> {
    StrategyService::new(Arc::new(MemoryStore::default()), catalogs())
}

pub(super) fn identity(email: &str, organization_id: Option<OrganizationId>, role: Option<&str>) -> Identity {
    Identity {
        email: email.to_string(),
        organization_id,
        role: role.map(str::to_string),
        is_superuser: false,
    }
}

pub(super) fn organization_draft(name: &str) -> OrganizationDraft {
    OrganizationDraft {
        name: name.to_string(),
        organization_type: OrganizationType::NonProfit,
        sector: "Health".to_string(),
        address: "Bole Road".to_string(),
        contact_person: "Hana".to_string(),
    }
}

/// A registered organization with an editor (its founder) and a viewer.
pub(super) struct Tenant {
    pub organization: Organization,
    pub editor: AccessContext,
    pub viewer: AccessContext,
}

impl Tenant {
    pub fn id(&self) -> OrganizationId {
        self.organization.id
    }
}

pub(super) fn register(service: &StrategyService<MemoryStore>, name: &str, founder: &str) -> Tenant {
    let organization = service
        .register_organization(&identity(founder, None, None), organization_draft(name))
        .expect("organization registers");
    let editor = service
        .resolve_access(identity(founder, Some(organization.id), None))
        .expect("editor resolves");
    let viewer_email = format!("viewer@{}.org", name.to_lowercase().replace(' ', "-"));
    let viewer = service
        .resolve_access(identity(&viewer_email, Some(organization.id), Some("viewer")))
        .expect("viewer resolves");

    Tenant {
        organization,
        editor,
        viewer,
    }
}

pub(super) fn superuser(service: &StrategyService<MemoryStore>) -> AccessContext {
    let mut admin = identity("root@platform.org", None, None);
    admin.is_superuser = true;
    service.resolve_access(admin).expect("superuser resolves")
}

pub(super) fn stakeholder_draft(
    name: &str,
    impact: &str,
    influence: &str,
    interest: &str,
    risk: &str,
) -> StakeholderDraft {
    StakeholderDraft {
        name: name.to_string(),
        stakeholder_type: StakeholderType::External,
        category: StakeholderCategory::Strategic,
        impact_level: impact.to_string(),
        influence_score: influence.to_string(),
        interest_level: interest.to_string(),
        risk_level: risk.to_string(),
        satisfaction_level: "medium".to_string(),
        email: Some("contact@ministry.gov.et".to_string()),
        phone: Some("+251911000111".to_string()),
        department: None,
        last_engagement_date: None,
        next_engagement_date: None,
        notes: None,
    }
}

pub(super) fn cycle_draft() -> StrategicCycleDraft {
    StrategicCycleDraft {
        time_horizon: "1 year".to_string(),
        time_horizon_type: TimeHorizonType::ShortTerm,
        start_date: date(2025, 7, 1),
        end_date: date(2026, 6, 30),
    }
}

pub(super) fn revenue_kpi() -> StrategyHierarchy {
    StrategyHierarchy {
        perspective: "Financial Perspective".to_string(),
        focus_area: "Revenue Growth & Diversification".to_string(),
        objective: "Enhance Total Revenue Performance".to_string(),
        kpi: "Total revenue growth (%)".to_string(),
        formula: String::new(),
    }
}

pub(super) fn plan_draft(cycle_id: RecordId, hierarchy_id: RecordId, weight: i64) -> StrategicActionPlanDraft {
    StrategicActionPlanDraft {
        cycle_id,
        hierarchy_id,
        indicator_type: IndicatorType::Lead,
        direction_of_change: DirectionOfChange::Increasing,
        baseline: Decimal::from(10),
        target: Decimal::from(20),
        weight: Decimal::from(weight),
        status: "pending".to_string(),
    }
}

pub(super) fn report_draft(action_plan_id: RecordId, achievement: i64) -> StrategicReportDraft {
    StrategicReportDraft {
        action_plan_id,
        achievement: Decimal::from(achievement),
        status: "in_progress".to_string(),
        data_source: None,
        data_collector: None,
        progress_summary: None,
        performance_summary: None,
        challenges: None,
        successes: None,
        lessons_learned: None,
    }
}

pub(super) fn risk_draft(cycle_id: RecordId) -> RiskDraft {
    RiskDraft {
        cycle_id,
        risk_category: "Financial Risks".to_string(),
        risk_name: "Revenue decline in key markets".to_string(),
        likelihood: "high".to_string(),
        impact: "medium".to_string(),
        status: RiskStatus::Identified,
    }
}

pub(super) fn swot_entry(swot_type: SwotType, factor: &str, priority: &str) -> SwotAnalysis {
    SwotAnalysis {
        swot_type,
        pillar: "Leadership & Governance".to_string(),
        factor: factor.to_string(),
        priority: priority.to_string(),
        impact: "Medium".to_string(),
        likelihood: None,
        description: None,
    }
}

pub(super) fn initiative(budget: i64, hr: i64) -> InitiativePlanning {
    InitiativePlanning {
        focus_area: "Financial Sustainability".to_string(),
        dimension: "Revenue Diversification".to_string(),
        name: "Launch fee-for-service clinic".to_string(),
        description: String::new(),
        total_budget_planned: Decimal::from(budget),
        total_hr_planned: Decimal::from(hr),
        priority: "High".to_string(),
        baseline_status: "Medium".to_string(),
        target_status: "High".to_string(),
        start_date: Some(date(2025, 7, 1)),
        end_date: Some(date(2025, 12, 31)),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn offline() -> RepositoryError {
    RepositoryError::Unavailable("database offline".to_string())
}

/// Every table refuses every call.
pub(super) struct UnavailableTable;

impl<T> RecordRepository<T> for UnavailableTable {
    fn insert(&self, _organization_id: OrganizationId, _record: T) -> Result<Tenanted<T>, RepositoryError> {
        Err(offline())
    }

    fn update(
        &self,
        _scope: &TenantScope,
        _id: RecordId,
        _record: T,
    ) -> Result<Tenanted<T>, RepositoryError> {
        Err(offline())
    }

    fn fetch(&self, _scope: &TenantScope, _id: RecordId) -> Result<Option<Tenanted<T>>, RepositoryError> {
        Err(offline())
    }

    fn list(&self, _scope: &TenantScope) -> Result<Vec<Tenanted<T>>, RepositoryError> {
        Err(offline())
    }

    fn delete(&self, _scope: &TenantScope, _id: RecordId) -> Result<(), RepositoryError> {
        Err(offline())
    }
}

impl MembershipRepository for UnavailableTable {
    fn latest_accepted(
        &self,
        _email: &str,
        _organization_id: OrganizationId,
    ) -> Result<Option<Tenanted<Membership>>, RepositoryError> {
        Err(offline())
    }

    fn find_by_token(&self, _token: Uuid) -> Result<Option<Tenanted<Membership>>, RepositoryError> {
        Err(offline())
    }
}

impl ResourceReportRepository for UnavailableTable {}

impl OrganizationRepository for UnavailableTable {
    fn insert(
        &self,
        _profile: OrganizationDraft,
        _created_at: DateTime<Utc>,
    ) -> Result<Organization, RepositoryError> {
        Err(offline())
    }

    fn update(
        &self,
        _id: OrganizationId,
        _profile: OrganizationDraft,
    ) -> Result<Organization, RepositoryError> {
        Err(offline())
    }

    fn fetch(&self, _id: OrganizationId) -> Result<Option<Organization>, RepositoryError> {
        Err(offline())
    }
}

pub(super) struct UnavailableStore {
    table: UnavailableTable,
}

impl Default for UnavailableStore {
    fn default() -> Self {
        Self {
            table: UnavailableTable,
        }
    }
}

impl StrategyStore for UnavailableStore {
    fn organizations(&self) -> &dyn OrganizationRepository {
        &self.table
    }

    fn memberships(&self) -> &dyn MembershipRepository {
        &self.table
    }

    fn visions(&self) -> &dyn RecordRepository<Vision> {
        &self.table
    }

    fn missions(&self) -> &dyn RecordRepository<Mission> {
        &self.table
    }

    fn values(&self) -> &dyn RecordRepository<CoreValue> {
        &self.table
    }

    fn stakeholders(&self) -> &dyn RecordRepository<Stakeholder> {
        &self.table
    }

    fn hierarchies(&self) -> &dyn RecordRepository<StrategyHierarchy> {
        &self.table
    }

    fn cycles(&self) -> &dyn RecordRepository<StrategicCycle> {
        &self.table
    }

    fn action_plans(&self) -> &dyn RecordRepository<StrategicActionPlan> {
        &self.table
    }

    fn strategic_reports(&self) -> &dyn RecordRepository<StrategicReport> {
        &self.table
    }

    fn swot_analyses(&self) -> &dyn RecordRepository<SwotAnalysis> {
        &self.table
    }

    fn swot_reports(&self) -> &dyn RecordRepository<SwotReport> {
        &self.table
    }

    fn initiatives(&self) -> &dyn RecordRepository<InitiativePlanning> {
        &self.table
    }

    fn initiative_reports(&self) -> &dyn RecordRepository<InitiativeReport> {
        &self.table
    }

    fn resource_plans(&self) -> &dyn RecordRepository<ResourceItemPlan> {
        &self.table
    }

    fn resource_reports(&self) -> &dyn ResourceReportRepository {
        &self.table
    }

    fn risks(&self) -> &dyn RecordRepository<RiskEntry> {
        &self.table
    }
}
