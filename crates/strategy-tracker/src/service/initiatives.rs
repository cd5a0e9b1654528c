use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::validation::FieldChecks;
use super::{advise, Checked, ServiceError, StrategyService};
use crate::access::AccessContext;
use crate::catalog::check_selection;
use crate::domain::{
    InitiativePlanning, InitiativeReport, InitiativeReportView, OrganizationId, RecordId,
    ResourceItemPlan, ResourceItemReport, ResourceReportView, Tenanted,
};
use crate::repository::StrategyStore;
use crate::scoring::total_consumption;

fn check_initiative(plan: &InitiativePlanning) -> Result<(), ServiceError> {
    FieldChecks::new()
        .required("focus_area", &plan.focus_area)
        .required("dimension", &plan.dimension)
        .required("name", &plan.name)
        .non_negative("total_budget_planned", plan.total_budget_planned)
        .non_negative("total_hr_planned", plan.total_hr_planned)
        .level("priority", &plan.priority)
        .level("baseline_status", &plan.baseline_status)
        .level("target_status", &plan.target_status)
        .date_order("end_date", plan.start_date, plan.end_date)
        .finish()?;
    Ok(())
}

fn check_initiative_report(report: &InitiativeReport) -> Result<(), ServiceError> {
    FieldChecks::new()
        .non_negative("total_budget_spent", report.total_budget_spent)
        .non_negative("total_actual_hr", report.total_actual_hr)
        .level("achieved_status", &report.achieved_status)
        .finish()?;
    Ok(())
}

impl<S> StrategyService<S>
where
    S: StrategyStore + 'static,
{
    pub fn create_initiative(
        &self,
        context: &AccessContext,
        plan: InitiativePlanning,
    ) -> Result<Checked<InitiativePlanning>, ServiceError> {
        let organization_id = self.home_organization(context)?;
        check_initiative(&plan)?;
        let advisories = advise(check_selection(
            self.catalogs.initiative(),
            &[plan.focus_area.as_str(), plan.dimension.as_str()],
        ));
        let row = self.store.initiatives().insert(organization_id, plan)?;
        info!(organization = %organization_id, id = %row.id, name = %row.record.name, "created initiative");
        Ok(Checked::new(row, advisories))
    }

    pub fn update_initiative(
        &self,
        context: &AccessContext,
        id: RecordId,
        plan: InitiativePlanning,
    ) -> Result<Checked<InitiativePlanning>, ServiceError> {
        self.scope(context)?;
        check_initiative(&plan)?;
        let advisories = advise(check_selection(
            self.catalogs.initiative(),
            &[plan.focus_area.as_str(), plan.dimension.as_str()],
        ));
        let row = self.replace(self.store.initiatives(), context, id, plan, "initiative")?;
        Ok(Checked::new(row, advisories))
    }

    pub fn initiative(
        &self,
        context: &AccessContext,
        id: RecordId,
    ) -> Result<Tenanted<InitiativePlanning>, ServiceError> {
        self.visible(self.store.initiatives(), context, id, "initiative")
    }

    pub fn initiatives(
        &self,
        context: &AccessContext,
    ) -> Result<Vec<Tenanted<InitiativePlanning>>, ServiceError> {
        self.list_visible(self.store.initiatives(), context)
    }

    /// Takes the initiative's reports and resource plans with it.
    pub fn delete_initiative(&self, context: &AccessContext, id: RecordId) -> Result<(), ServiceError> {
        self.visible(self.store.initiatives(), context, id, "initiative")?;
        self.remove_children(
            self.store.initiative_reports(),
            context,
            "initiative report",
            |report: &InitiativeReport| report.initiative_id == id,
        )?;
        let plans = self.remove_children(
            self.store.resource_plans(),
            context,
            "resource plan",
            |plan: &ResourceItemPlan| plan.initiative_id == id,
        )?;
        self.remove_resource_usage(context, &plans)?;
        self.remove(self.store.initiatives(), context, id, "initiative")
    }

    fn remove_resource_usage(&self, context: &AccessContext, plans: &[RecordId]) -> Result<(), ServiceError> {
        if plans.is_empty() {
            return Ok(());
        }
        self.remove_children::<ResourceItemReport, _, _>(
            self.store.resource_reports(),
            context,
            "resource report",
            |report| plans.contains(&report.plan_id),
        )?;
        Ok(())
    }

    fn initiative_owner(
        &self,
        context: &AccessContext,
        initiative_id: RecordId,
    ) -> Result<OrganizationId, ServiceError> {
        let plan = self.initiative(context, initiative_id)?;
        Ok(plan.organization_id)
    }

    pub fn create_initiative_report(
        &self,
        context: &AccessContext,
        report: InitiativeReport,
    ) -> Result<Tenanted<InitiativeReport>, ServiceError> {
        self.scope(context)?;
        check_initiative_report(&report)?;
        let organization_id = self.initiative_owner(context, report.initiative_id)?;
        let row = self.store.initiative_reports().insert(organization_id, report)?;
        info!(organization = %organization_id, id = %row.id, "created initiative report");
        Ok(row)
    }

    pub fn update_initiative_report(
        &self,
        context: &AccessContext,
        id: RecordId,
        report: InitiativeReport,
    ) -> Result<Tenanted<InitiativeReport>, ServiceError> {
        self.scope(context)?;
        check_initiative_report(&report)?;
        let owner = self.initiative_owner(context, report.initiative_id)?;
        self.replace_owned(
            self.store.initiative_reports(),
            context,
            id,
            ("initiative_id", owner),
            report,
            "initiative report",
        )
    }

    /// Report joined with its initiative; progress is computed against the plan as it
    /// stands today.
    pub fn initiative_report(
        &self,
        context: &AccessContext,
        id: RecordId,
        today: NaiveDate,
    ) -> Result<InitiativeReportView, ServiceError> {
        let row: Tenanted<InitiativeReport> =
            self.visible(self.store.initiative_reports(), context, id, "initiative report")?;
        let plan = self.initiative(context, row.record.initiative_id)?;
        let view = InitiativeReportView::new(row, &plan.record, today);
        debug!(
            id = %view.report.id,
            budget_utilization = %view.progress.budget_utilization_percent,
            status_achievement = %view.progress.status_achievement_percent,
            "computed initiative progress"
        );
        Ok(view)
    }

    /// Reports whose initiative is no longer visible are left out.
    pub fn initiative_reports(
        &self,
        context: &AccessContext,
        today: NaiveDate,
    ) -> Result<Vec<InitiativeReportView>, ServiceError> {
        let plans = self
            .initiatives(context)?
            .into_iter()
            .map(|plan| (plan.id, plan.record))
            .collect::<BTreeMap<_, _>>();
        let reports: Vec<Tenanted<InitiativeReport>> =
            self.list_visible(self.store.initiative_reports(), context)?;
        Ok(reports
            .into_iter()
            .filter_map(|row| {
                let plan = plans.get(&row.record.initiative_id)?;
                Some(InitiativeReportView::new(row, plan, today))
            })
            .collect())
    }

    pub fn delete_initiative_report(
        &self,
        context: &AccessContext,
        id: RecordId,
    ) -> Result<(), ServiceError> {
        self.remove(self.store.initiative_reports(), context, id, "initiative report")
    }

    fn check_resource_plan(
        &self,
        context: &AccessContext,
        plan: &ResourceItemPlan,
    ) -> Result<OrganizationId, ServiceError> {
        self.scope(context)?;
        FieldChecks::new()
            .required("resource_name", &plan.resource_name)
            .non_negative("resource_required", plan.resource_required)
            .finish()?;
        self.initiative_owner(context, plan.initiative_id)
    }

    pub fn create_resource_plan(
        &self,
        context: &AccessContext,
        plan: ResourceItemPlan,
    ) -> Result<Tenanted<ResourceItemPlan>, ServiceError> {
        let organization_id = self.check_resource_plan(context, &plan)?;
        let row = self.store.resource_plans().insert(organization_id, plan)?;
        info!(organization = %organization_id, id = %row.id, resource = %row.record.resource_name, "created resource plan");
        Ok(row)
    }

    pub fn update_resource_plan(
        &self,
        context: &AccessContext,
        id: RecordId,
        plan: ResourceItemPlan,
    ) -> Result<Tenanted<ResourceItemPlan>, ServiceError> {
        let owner = self.check_resource_plan(context, &plan)?;
        self.replace_owned(
            self.store.resource_plans(),
            context,
            id,
            ("initiative_id", owner),
            plan,
            "resource plan",
        )
    }

    pub fn resource_plan(
        &self,
        context: &AccessContext,
        id: RecordId,
    ) -> Result<Tenanted<ResourceItemPlan>, ServiceError> {
        self.visible(self.store.resource_plans(), context, id, "resource plan")
    }

    pub fn resource_plans(
        &self,
        context: &AccessContext,
    ) -> Result<Vec<Tenanted<ResourceItemPlan>>, ServiceError> {
        self.list_visible(self.store.resource_plans(), context)
    }

    /// Takes the usage reported against the plan with it.
    pub fn delete_resource_plan(&self, context: &AccessContext, id: RecordId) -> Result<(), ServiceError> {
        self.visible(self.store.resource_plans(), context, id, "resource plan")?;
        self.remove_resource_usage(context, &[id])?;
        self.remove(self.store.resource_plans(), context, id, "resource plan")
    }

    fn check_resource_report(
        &self,
        context: &AccessContext,
        report: &ResourceItemReport,
    ) -> Result<OrganizationId, ServiceError> {
        self.scope(context)?;
        FieldChecks::new()
            .non_negative("resource_used", report.resource_used)
            .finish()?;
        let plan = self.resource_plan(context, report.plan_id)?;
        Ok(plan.organization_id)
    }

    pub fn create_resource_report(
        &self,
        context: &AccessContext,
        report: ResourceItemReport,
    ) -> Result<Tenanted<ResourceItemReport>, ServiceError> {
        let organization_id = self.check_resource_report(context, &report)?;
        let row = self.store.resource_reports().insert(organization_id, report)?;
        info!(organization = %organization_id, id = %row.id, "created resource report");
        Ok(row)
    }

    pub fn update_resource_report(
        &self,
        context: &AccessContext,
        id: RecordId,
        report: ResourceItemReport,
    ) -> Result<Tenanted<ResourceItemReport>, ServiceError> {
        let owner = self.check_resource_report(context, &report)?;
        self.replace_owned(
            self.store.resource_reports(),
            context,
            id,
            ("plan_id", owner),
            report,
            "resource report",
        )
    }

    /// Utilization aggregates every report filed against the same plan.
    pub fn resource_report(
        &self,
        context: &AccessContext,
        id: RecordId,
    ) -> Result<ResourceReportView, ServiceError> {
        let scope = self.scope(context)?;
        let row: Tenanted<ResourceItemReport> =
            self.visible(self.store.resource_reports(), context, id, "resource report")?;
        let plan = self.resource_plan(context, row.record.plan_id)?;
        let total_used = self.store.resource_reports().total_used(scope, plan.id)?;
        Ok(ResourceReportView::new(row, &plan.record, total_used))
    }

    pub fn resource_reports(
        &self,
        context: &AccessContext,
    ) -> Result<Vec<ResourceReportView>, ServiceError> {
        let plans = self
            .resource_plans(context)?
            .into_iter()
            .map(|plan| (plan.id, plan.record))
            .collect::<BTreeMap<_, _>>();
        let reports: Vec<Tenanted<ResourceItemReport>> =
            self.list_visible(self.store.resource_reports(), context)?;

        let mut consumed: BTreeMap<RecordId, Vec<Decimal>> = BTreeMap::new();
        for row in &reports {
            consumed
                .entry(row.record.plan_id)
                .or_default()
                .push(row.record.resource_used);
        }
        let totals: BTreeMap<RecordId, Decimal> = consumed
            .into_iter()
            .map(|(plan_id, amounts)| (plan_id, total_consumption(amounts)))
            .collect();

        Ok(reports
            .into_iter()
            .filter_map(|row| {
                let plan = plans.get(&row.record.plan_id)?;
                let total_used = totals.get(&row.record.plan_id).copied().unwrap_or_default();
                Some(ResourceReportView::new(row, plan, total_used))
            })
            .collect())
    }

    pub fn delete_resource_report(
        &self,
        context: &AccessContext,
        id: RecordId,
    ) -> Result<(), ServiceError> {
        self.remove::<ResourceItemReport, _>(
            self.store.resource_reports(),
            context,
            id,
            "resource report",
        )
    }
}
