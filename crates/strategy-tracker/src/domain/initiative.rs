use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{RecordId, Tenanted};
use crate::scoring::{
    initiative_progress, remaining_days, resource_utilization, InitiativeFigures,
    InitiativeProgress, ResourceUtilization,
};

fn medium_label() -> String {
    "Medium".to_string()
}

fn high_label() -> String {
    "High".to_string()
}

/// A planned initiative under a focus area and dimension of the initiative catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativePlanning {
    pub focus_area: String,
    pub dimension: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub total_budget_planned: Decimal,
    #[serde(default)]
    pub total_hr_planned: Decimal,
    #[serde(default = "medium_label")]
    pub priority: String,
    #[serde(default = "medium_label")]
    pub baseline_status: String,
    #[serde(default = "high_label")]
    pub target_status: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeReport {
    pub initiative_id: RecordId,
    #[serde(default)]
    pub total_budget_spent: Decimal,
    #[serde(default)]
    pub total_actual_hr: Decimal,
    #[serde(default = "medium_label")]
    pub achieved_status: String,
    #[serde(default)]
    pub notes: String,
}

/// Report joined with its plan; every progress figure is computed on read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitiativeReportView {
    #[serde(flatten)]
    pub report: Tenanted<InitiativeReport>,
    pub initiative_name: String,
    #[serde(flatten)]
    pub progress: InitiativeProgress,
    pub remaining_days: Option<i64>,
}

impl InitiativeReportView {
    pub fn new(
        report: Tenanted<InitiativeReport>,
        plan: &InitiativePlanning,
        today: NaiveDate,
    ) -> Self {
        let progress = initiative_progress(&InitiativeFigures {
            budget_planned: plan.total_budget_planned,
            budget_spent: report.record.total_budget_spent,
            hr_planned: plan.total_hr_planned,
            hr_actual: report.record.total_actual_hr,
            baseline_status: &plan.baseline_status,
            target_status: &plan.target_status,
            achieved_status: &report.record.achieved_status,
        });

        Self {
            report,
            initiative_name: plan.name.clone(),
            progress,
            remaining_days: remaining_days(plan.end_date, today),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResourceType {
    #[serde(rename = "Person_hours")]
    PersonHours,
    Equipment,
    Material,
    #[serde(rename = "hr")]
    Hr,
    Budget,
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceItemPlan {
    pub initiative_id: RecordId,
    #[serde(default)]
    pub resource_type: ResourceType,
    pub resource_name: String,
    #[serde(default)]
    pub resource_required: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceItemReport {
    pub plan_id: RecordId,
    #[serde(default)]
    pub resource_used: Decimal,
    #[serde(default)]
    pub notes: String,
}

/// Resource report with consumption aggregated over every report of its plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceReportView {
    #[serde(flatten)]
    pub report: Tenanted<ResourceItemReport>,
    pub resource_name: String,
    pub resource_required: Decimal,
    #[serde(flatten)]
    pub utilization: ResourceUtilization,
}

impl ResourceReportView {
    pub fn new(
        report: Tenanted<ResourceItemReport>,
        plan: &ResourceItemPlan,
        total_used: Decimal,
    ) -> Self {
        Self {
            report,
            resource_name: plan.resource_name.clone(),
            resource_required: plan.resource_required,
            utilization: resource_utilization(plan.resource_required, total_used),
        }
    }
}
