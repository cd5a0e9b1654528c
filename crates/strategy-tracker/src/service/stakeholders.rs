use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::validation::FieldChecks;
use super::{ServiceError, StrategyService};
use crate::access::{AccessContext, TenantScope};
use crate::domain::{RecordId, Stakeholder, StakeholderDraft, StakeholderView, Tenanted};
use crate::repository::StrategyStore;

fn check_stakeholder(draft: &StakeholderDraft) -> Result<(), ServiceError> {
    FieldChecks::new()
        .required("name", &draft.name)
        .level("impact_level", &draft.impact_level)
        .level("influence_score", &draft.influence_score)
        .level("interest_level", &draft.interest_level)
        .level("risk_level", &draft.risk_level)
        .level("satisfaction_level", &draft.satisfaction_level)
        .email("email", draft.email.as_deref())
        .phone("phone", draft.phone.as_deref())
        .finish()?;
    Ok(())
}

/// First `<base>-NNNN` not already taken in the organization.
fn next_code(base: &str, taken: &BTreeSet<String>) -> String {
    (1..)
        .map(|sequence: u32| format!("{base}-{sequence:04}"))
        .find(|code| !taken.contains(code))
        .unwrap_or_else(|| format!("{base}-{:04}", taken.len() + 1))
}

impl<S> StrategyService<S>
where
    S: StrategyStore + 'static,
{
    pub fn create_stakeholder(
        &self,
        context: &AccessContext,
        draft: StakeholderDraft,
    ) -> Result<Tenanted<Stakeholder>, ServiceError> {
        let organization_id = self.home_organization(context)?;
        check_stakeholder(&draft)?;
        let organization = self.organization(organization_id)?;

        let base = Stakeholder::code_base(organization.name(), &draft.name);
        let taken = self
            .store
            .stakeholders()
            .list(&TenantScope::Organization(organization_id))?
            .into_iter()
            .map(|row| row.record.code)
            .collect::<BTreeSet<_>>();
        let code = next_code(&base, &taken);

        let stakeholder = Stakeholder::assess(code, draft);
        debug!(
            code = %stakeholder.code,
            score = %stakeholder.engagement.engagement_priority_score,
            key = stakeholder.engagement.is_key_stakeholder,
            attention = stakeholder.engagement.requires_attention,
            "assessed stakeholder"
        );
        let row = self.store.stakeholders().insert(organization_id, stakeholder)?;
        info!(organization = %organization_id, id = %row.id, code = %row.record.code, "created stakeholder");
        Ok(row)
    }

    /// Re-scores the stakeholder from the new levels; the code never changes.
    pub fn update_stakeholder(
        &self,
        context: &AccessContext,
        id: RecordId,
        draft: StakeholderDraft,
    ) -> Result<Tenanted<Stakeholder>, ServiceError> {
        self.scope(context)?;
        check_stakeholder(&draft)?;
        let current: Tenanted<Stakeholder> =
            self.visible(self.store.stakeholders(), context, id, "stakeholder")?;
        let stakeholder = Stakeholder::assess(current.record.code, draft);
        self.replace(self.store.stakeholders(), context, id, stakeholder, "stakeholder")
    }

    pub fn stakeholder(
        &self,
        context: &AccessContext,
        id: RecordId,
        today: NaiveDate,
    ) -> Result<StakeholderView, ServiceError> {
        let row = self.visible(self.store.stakeholders(), context, id, "stakeholder")?;
        Ok(StakeholderView::new(row, today))
    }

    /// Highest engagement priority first, then by name.
    pub fn stakeholders(
        &self,
        context: &AccessContext,
        today: NaiveDate,
    ) -> Result<Vec<StakeholderView>, ServiceError> {
        let mut rows: Vec<Tenanted<Stakeholder>> =
            self.list_visible(self.store.stakeholders(), context)?;
        rows.sort_by(|a, b| {
            b.record
                .engagement
                .engagement_priority_score
                .cmp(&a.record.engagement.engagement_priority_score)
                .then_with(|| a.record.profile.name.cmp(&b.record.profile.name))
        });
        Ok(rows
            .into_iter()
            .map(|row| StakeholderView::new(row, today))
            .collect())
    }

    pub fn delete_stakeholder(&self, context: &AccessContext, id: RecordId) -> Result<(), ServiceError> {
        self.remove(self.store.stakeholders(), context, id, "stakeholder")
    }
}
