use tracing::{debug, info};

use super::validation::FieldChecks;
use super::{advise, Checked, ServiceError, StrategyService};
use crate::access::AccessContext;
use crate::catalog::{check_selection, AdvisoryNote};
use crate::domain::{OrganizationId, RecordId, RiskDraft, RiskEntry, Tenanted};
use crate::repository::StrategyStore;

impl<S> StrategyService<S>
where
    S: StrategyStore + 'static,
{
    /// Validates the draft, resolves the owning cycle and scores the risk.
    fn assess_risk(
        &self,
        context: &AccessContext,
        draft: RiskDraft,
    ) -> Result<(OrganizationId, RiskEntry, Vec<AdvisoryNote>), ServiceError> {
        self.scope(context)?;
        FieldChecks::new()
            .required("risk_category", &draft.risk_category)
            .required("risk_name", &draft.risk_name)
            .level("likelihood", &draft.likelihood)
            .level("impact", &draft.impact)
            .finish()?;

        let cycle = self.cycle(context, draft.cycle_id)?;
        let catalog = self.catalogs.risk();
        let advisories = advise(check_selection(
            catalog,
            &[draft.risk_category.as_str(), draft.risk_name.as_str()],
        ));
        let entry = RiskEntry::assess(catalog, draft);
        debug!(
            severity = entry.severity_score,
            mitigation_found = !entry.mitigation_action.is_empty(),
            "assessed risk"
        );
        Ok((cycle.organization_id, entry, advisories))
    }

    pub fn create_risk(
        &self,
        context: &AccessContext,
        draft: RiskDraft,
    ) -> Result<Checked<RiskEntry>, ServiceError> {
        let (organization_id, entry, advisories) = self.assess_risk(context, draft)?;
        let row = self.store.risks().insert(organization_id, entry)?;
        info!(
            organization = %organization_id,
            id = %row.id,
            severity = row.record.severity_score,
            "created risk"
        );
        Ok(Checked::new(row, advisories))
    }

    /// Re-scores the risk and copies the current catalog mitigation.
    pub fn update_risk(
        &self,
        context: &AccessContext,
        id: RecordId,
        draft: RiskDraft,
    ) -> Result<Checked<RiskEntry>, ServiceError> {
        let (owner, entry, advisories) = self.assess_risk(context, draft)?;
        let row = self.replace_owned(
            self.store.risks(),
            context,
            id,
            ("cycle_id", owner),
            entry,
            "risk",
        )?;
        Ok(Checked::new(row, advisories))
    }

    pub fn risk(&self, context: &AccessContext, id: RecordId) -> Result<Tenanted<RiskEntry>, ServiceError> {
        self.visible(self.store.risks(), context, id, "risk")
    }

    /// Most severe first.
    pub fn risks(&self, context: &AccessContext) -> Result<Vec<Tenanted<RiskEntry>>, ServiceError> {
        let mut rows: Vec<Tenanted<RiskEntry>> = self.list_visible(self.store.risks(), context)?;
        rows.sort_by(|a, b| b.record.severity_score.cmp(&a.record.severity_score));
        Ok(rows)
    }

    pub fn delete_risk(&self, context: &AccessContext, id: RecordId) -> Result<(), ServiceError> {
        self.remove(self.store.risks(), context, id, "risk")
    }
}
