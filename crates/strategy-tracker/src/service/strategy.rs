use std::cmp::Reverse;

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::validation::FieldChecks;
use super::{advise, Checked, ServiceError, StrategyService};
use crate::access::AccessContext;
use crate::catalog::{check_selection, AdvisoryNote};
use crate::domain::{
    OrganizationId, RecordId, RiskEntry, StrategicActionPlan, StrategicActionPlanDraft,
    StrategicCycle, StrategicCycleDraft, StrategicReport, StrategicReportDraft, StrategyHierarchy,
    SwotAnalysis, SwotReport, Tenanted,
};
use crate::repository::StrategyStore;
use crate::scoring::OrdinalLevel;

fn check_hierarchy(hierarchy: &StrategyHierarchy) -> Result<(), ServiceError> {
    FieldChecks::new()
        .required("perspective", &hierarchy.perspective)
        .required("focus_area", &hierarchy.focus_area)
        .required("objective", &hierarchy.objective)
        .required("kpi", &hierarchy.kpi)
        .finish()?;
    Ok(())
}

fn check_cycle(draft: &StrategicCycleDraft) -> Result<(), ServiceError> {
    FieldChecks::new()
        .required("time_horizon", &draft.time_horizon)
        .date_order("end_date", Some(draft.start_date), Some(draft.end_date))
        .finish()?;
    Ok(())
}

fn check_swot(swot: &SwotAnalysis) -> Result<(), ServiceError> {
    FieldChecks::new()
        .required("pillar", &swot.pillar)
        .required("factor", &swot.factor)
        .level("priority", &swot.priority)
        .level("impact", &swot.impact)
        .optional_level("likelihood", swot.likelihood.as_deref())
        .finish()?;
    Ok(())
}

impl<S> StrategyService<S>
where
    S: StrategyStore + 'static,
{
    /// Fills a blank formula from the KPI leaf and notes any unlisted level.
    fn prepare_hierarchy(
        &self,
        mut hierarchy: StrategyHierarchy,
    ) -> Result<(StrategyHierarchy, Vec<AdvisoryNote>), ServiceError> {
        check_hierarchy(&hierarchy)?;
        let catalog = self.catalogs.strategy_map();
        if hierarchy.formula.trim().is_empty() {
            let formula = catalog.lookup_leaf(&hierarchy.selection()).to_string();
            hierarchy.formula = formula;
        }
        let advisories = advise(check_selection(catalog, &hierarchy.selection()));
        Ok((hierarchy, advisories))
    }

    pub fn create_hierarchy(
        &self,
        context: &AccessContext,
        hierarchy: StrategyHierarchy,
    ) -> Result<Checked<StrategyHierarchy>, ServiceError> {
        let organization_id = self.home_organization(context)?;
        let (hierarchy, advisories) = self.prepare_hierarchy(hierarchy)?;
        let row = self.store.hierarchies().insert(organization_id, hierarchy)?;
        info!(organization = %organization_id, id = %row.id, kpi = %row.record.kpi, "created strategy hierarchy");
        Ok(Checked::new(row, advisories))
    }

    pub fn update_hierarchy(
        &self,
        context: &AccessContext,
        id: RecordId,
        hierarchy: StrategyHierarchy,
    ) -> Result<Checked<StrategyHierarchy>, ServiceError> {
        self.scope(context)?;
        let (hierarchy, advisories) = self.prepare_hierarchy(hierarchy)?;
        let row = self.replace(self.store.hierarchies(), context, id, hierarchy, "strategy hierarchy")?;
        Ok(Checked::new(row, advisories))
    }

    pub fn hierarchy(
        &self,
        context: &AccessContext,
        id: RecordId,
    ) -> Result<Tenanted<StrategyHierarchy>, ServiceError> {
        self.visible(self.store.hierarchies(), context, id, "strategy hierarchy")
    }

    pub fn hierarchies(
        &self,
        context: &AccessContext,
    ) -> Result<Vec<Tenanted<StrategyHierarchy>>, ServiceError> {
        self.list_visible(self.store.hierarchies(), context)
    }

    /// Takes the action plans measured against this KPI with it.
    pub fn delete_hierarchy(&self, context: &AccessContext, id: RecordId) -> Result<(), ServiceError> {
        self.visible(self.store.hierarchies(), context, id, "strategy hierarchy")?;
        let plans = self.remove_children(
            self.store.action_plans(),
            context,
            "action plan",
            |plan: &StrategicActionPlan| plan.plan.hierarchy_id == id,
        )?;
        self.remove_plan_reports(context, &plans)?;
        self.remove(self.store.hierarchies(), context, id, "strategy hierarchy")
    }

    fn organization_name(&self, organization_id: OrganizationId) -> Result<String, ServiceError> {
        Ok(self.organization(organization_id)?.profile.name)
    }

    pub fn create_cycle(
        &self,
        context: &AccessContext,
        draft: StrategicCycleDraft,
    ) -> Result<Tenanted<StrategicCycle>, ServiceError> {
        let organization_id = self.home_organization(context)?;
        check_cycle(&draft)?;
        let cycle = StrategicCycle::named(&self.organization_name(organization_id)?, draft);
        let row = self.store.cycles().insert(organization_id, cycle)?;
        info!(organization = %organization_id, id = %row.id, name = %row.record.name, "created strategic cycle");
        Ok(row)
    }

    /// Renames the cycle from the owning organization and the new dates.
    pub fn update_cycle(
        &self,
        context: &AccessContext,
        id: RecordId,
        draft: StrategicCycleDraft,
    ) -> Result<Tenanted<StrategicCycle>, ServiceError> {
        self.scope(context)?;
        check_cycle(&draft)?;
        let current = self.visible(self.store.cycles(), context, id, "strategic cycle")?;
        let cycle = StrategicCycle::named(&self.organization_name(current.organization_id)?, draft);
        self.replace(self.store.cycles(), context, id, cycle, "strategic cycle")
    }

    pub fn cycle(
        &self,
        context: &AccessContext,
        id: RecordId,
    ) -> Result<Tenanted<StrategicCycle>, ServiceError> {
        self.visible(self.store.cycles(), context, id, "strategic cycle")
    }

    pub fn cycles(&self, context: &AccessContext) -> Result<Vec<Tenanted<StrategicCycle>>, ServiceError> {
        self.list_visible(self.store.cycles(), context)
    }

    /// Takes the cycle's action plans, their reports and the cycle's risks with it.
    pub fn delete_cycle(&self, context: &AccessContext, id: RecordId) -> Result<(), ServiceError> {
        self.visible(self.store.cycles(), context, id, "strategic cycle")?;
        let plans = self.remove_children(
            self.store.action_plans(),
            context,
            "action plan",
            |plan: &StrategicActionPlan| plan.plan.cycle_id == id,
        )?;
        self.remove_plan_reports(context, &plans)?;
        self.remove_children(self.store.risks(), context, "risk", |risk: &RiskEntry| {
            risk.risk.cycle_id == id
        })?;
        self.remove(self.store.cycles(), context, id, "strategic cycle")
    }

    /// Both parents must be visible and owned by the same organization; the plan is
    /// stored under that organization.
    fn plan_owner(
        &self,
        context: &AccessContext,
        draft: &StrategicActionPlanDraft,
    ) -> Result<OrganizationId, ServiceError> {
        self.scope(context)?;
        FieldChecks::new()
            .within("weight", draft.weight, Decimal::ZERO, Decimal::ONE_HUNDRED)
            .finish()?;

        let cycle = self.visible(self.store.cycles(), context, draft.cycle_id, "strategic cycle")?;
        let hierarchy = self.visible(
            self.store.hierarchies(),
            context,
            draft.hierarchy_id,
            "strategy hierarchy",
        )?;
        if cycle.organization_id != hierarchy.organization_id {
            FieldChecks::new()
                .reject("hierarchy_id", "belongs to a different organization than the cycle")
                .finish()?;
        }
        Ok(cycle.organization_id)
    }

    pub fn create_action_plan(
        &self,
        context: &AccessContext,
        draft: StrategicActionPlanDraft,
    ) -> Result<Tenanted<StrategicActionPlan>, ServiceError> {
        let organization_id = self.plan_owner(context, &draft)?;
        let plan = StrategicActionPlan::measure(draft);
        debug!(improvement_needed = %plan.improvement_needed, "measured action plan");
        let row = self.store.action_plans().insert(organization_id, plan)?;
        info!(organization = %organization_id, id = %row.id, "created action plan");
        Ok(row)
    }

    /// Stored reports keep the metrics computed when they were saved.
    pub fn update_action_plan(
        &self,
        context: &AccessContext,
        id: RecordId,
        draft: StrategicActionPlanDraft,
    ) -> Result<Tenanted<StrategicActionPlan>, ServiceError> {
        let owner = self.plan_owner(context, &draft)?;
        let plan = StrategicActionPlan::measure(draft);
        self.replace_owned(
            self.store.action_plans(),
            context,
            id,
            ("cycle_id", owner),
            plan,
            "action plan",
        )
    }

    pub fn action_plan(
        &self,
        context: &AccessContext,
        id: RecordId,
    ) -> Result<Tenanted<StrategicActionPlan>, ServiceError> {
        self.visible(self.store.action_plans(), context, id, "action plan")
    }

    pub fn action_plans(
        &self,
        context: &AccessContext,
    ) -> Result<Vec<Tenanted<StrategicActionPlan>>, ServiceError> {
        self.list_visible(self.store.action_plans(), context)
    }

    pub fn delete_action_plan(&self, context: &AccessContext, id: RecordId) -> Result<(), ServiceError> {
        self.visible(self.store.action_plans(), context, id, "action plan")?;
        self.remove_plan_reports(context, &[id])?;
        self.remove(self.store.action_plans(), context, id, "action plan")
    }

    /// Strategic reports filed against any of `plans`, and their SWOT reports.
    fn remove_plan_reports(&self, context: &AccessContext, plans: &[RecordId]) -> Result<(), ServiceError> {
        if plans.is_empty() {
            return Ok(());
        }
        let reports = self.remove_children(
            self.store.strategic_reports(),
            context,
            "strategic report",
            |report: &StrategicReport| plans.contains(&report.report.action_plan_id),
        )?;
        self.remove_children(
            self.store.swot_reports(),
            context,
            "swot report",
            |swot: &SwotReport| reports.contains(&swot.strategic_report_id),
        )?;
        Ok(())
    }

    fn measure_report(
        &self,
        context: &AccessContext,
        draft: StrategicReportDraft,
    ) -> Result<(OrganizationId, StrategicReport), ServiceError> {
        self.scope(context)?;
        FieldChecks::new()
            .non_negative("achievement", draft.achievement)
            .finish()?;
        let plan = self.visible(
            self.store.action_plans(),
            context,
            draft.action_plan_id,
            "action plan",
        )?;
        let report = StrategicReport::against(&plan.record, draft);
        debug!(
            percent_achieved = %report.metrics.percent_achieved,
            variance = %report.metrics.variance,
            weighted_score = %report.metrics.weighted_score,
            "measured strategic report"
        );
        Ok((plan.organization_id, report))
    }

    pub fn create_strategic_report(
        &self,
        context: &AccessContext,
        draft: StrategicReportDraft,
    ) -> Result<Tenanted<StrategicReport>, ServiceError> {
        let (organization_id, report) = self.measure_report(context, draft)?;
        let row = self.store.strategic_reports().insert(organization_id, report)?;
        info!(organization = %organization_id, id = %row.id, "created strategic report");
        Ok(row)
    }

    pub fn update_strategic_report(
        &self,
        context: &AccessContext,
        id: RecordId,
        draft: StrategicReportDraft,
    ) -> Result<Tenanted<StrategicReport>, ServiceError> {
        let (owner, report) = self.measure_report(context, draft)?;
        self.replace_owned(
            self.store.strategic_reports(),
            context,
            id,
            ("action_plan_id", owner),
            report,
            "strategic report",
        )
    }

    pub fn strategic_report(
        &self,
        context: &AccessContext,
        id: RecordId,
    ) -> Result<Tenanted<StrategicReport>, ServiceError> {
        self.visible(self.store.strategic_reports(), context, id, "strategic report")
    }

    pub fn strategic_reports(
        &self,
        context: &AccessContext,
    ) -> Result<Vec<Tenanted<StrategicReport>>, ServiceError> {
        self.list_visible(self.store.strategic_reports(), context)
    }

    pub fn delete_strategic_report(
        &self,
        context: &AccessContext,
        id: RecordId,
    ) -> Result<(), ServiceError> {
        self.visible(self.store.strategic_reports(), context, id, "strategic report")?;
        self.remove_children(
            self.store.swot_reports(),
            context,
            "swot report",
            |swot: &SwotReport| swot.strategic_report_id == id,
        )?;
        self.remove(self.store.strategic_reports(), context, id, "strategic report")
    }

    fn review_swot(&self, swot: &SwotAnalysis) -> Result<Vec<AdvisoryNote>, ServiceError> {
        check_swot(swot)?;
        let selection = [swot.swot_type.key(), swot.pillar.as_str(), swot.factor.as_str()];
        Ok(advise(check_selection(self.catalogs.swot(), &selection)))
    }

    pub fn create_swot(
        &self,
        context: &AccessContext,
        swot: SwotAnalysis,
    ) -> Result<Checked<SwotAnalysis>, ServiceError> {
        let organization_id = self.home_organization(context)?;
        let advisories = self.review_swot(&swot)?;
        let row = self.store.swot_analyses().insert(organization_id, swot)?;
        info!(organization = %organization_id, id = %row.id, "created swot entry");
        Ok(Checked::new(row, advisories))
    }

    pub fn update_swot(
        &self,
        context: &AccessContext,
        id: RecordId,
        swot: SwotAnalysis,
    ) -> Result<Checked<SwotAnalysis>, ServiceError> {
        self.scope(context)?;
        let advisories = self.review_swot(&swot)?;
        let row = self.replace(self.store.swot_analyses(), context, id, swot, "swot entry")?;
        Ok(Checked::new(row, advisories))
    }

    pub fn swot(
        &self,
        context: &AccessContext,
        id: RecordId,
    ) -> Result<Tenanted<SwotAnalysis>, ServiceError> {
        self.visible(self.store.swot_analyses(), context, id, "swot entry")
    }

    pub fn swot_analyses(
        &self,
        context: &AccessContext,
    ) -> Result<Vec<Tenanted<SwotAnalysis>>, ServiceError> {
        self.list_visible(self.store.swot_analyses(), context)
    }

    pub fn delete_swot(&self, context: &AccessContext, id: RecordId) -> Result<(), ServiceError> {
        self.remove(self.store.swot_analyses(), context, id, "swot entry")
    }

    /// Stored under the organization that owns the strategic report.
    pub fn create_swot_report(
        &self,
        context: &AccessContext,
        report: SwotReport,
    ) -> Result<Checked<SwotReport>, ServiceError> {
        self.scope(context)?;
        let advisories = self.review_swot(&report.analysis)?;
        let owner = self.strategic_report(context, report.strategic_report_id)?;
        let row = self.store.swot_reports().insert(owner.organization_id, report)?;
        info!(
            organization = %row.organization_id,
            id = %row.id,
            strategic_report = %row.record.strategic_report_id,
            "created swot report"
        );
        Ok(Checked::new(row, advisories))
    }

    pub fn update_swot_report(
        &self,
        context: &AccessContext,
        id: RecordId,
        report: SwotReport,
    ) -> Result<Checked<SwotReport>, ServiceError> {
        self.scope(context)?;
        let advisories = self.review_swot(&report.analysis)?;
        let owner = self.strategic_report(context, report.strategic_report_id)?;
        let row = self.replace_owned(
            self.store.swot_reports(),
            context,
            id,
            ("strategic_report_id", owner.organization_id),
            report,
            "swot report",
        )?;
        Ok(Checked::new(row, advisories))
    }

    pub fn swot_report(
        &self,
        context: &AccessContext,
        id: RecordId,
    ) -> Result<Tenanted<SwotReport>, ServiceError> {
        self.visible(self.store.swot_reports(), context, id, "swot report")
    }

    /// Grouped strength, weakness, opportunity, threat; highest priority first in each.
    pub fn swot_reports(
        &self,
        context: &AccessContext,
    ) -> Result<Vec<Tenanted<SwotReport>>, ServiceError> {
        let mut rows = self.list_visible(self.store.swot_reports(), context)?;
        rows.sort_by_key(|row| {
            let analysis = &row.record.analysis;
            (
                analysis.swot_type,
                Reverse(OrdinalLevel::from_field(&analysis.priority).points()),
            )
        });
        Ok(rows)
    }

    pub fn delete_swot_report(&self, context: &AccessContext, id: RecordId) -> Result<(), ServiceError> {
        self.remove(self.store.swot_reports(), context, id, "swot report")
    }
}
