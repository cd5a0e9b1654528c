use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ordinal::OrdinalLevel;

/// Read-time progress of an initiative report against its plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeProgress {
    pub budget_remaining: Decimal,
    pub budget_utilization_percent: Decimal,
    pub remaining_hr: Decimal,
    pub hr_utilization_percent: Decimal,
    pub status_achievement_percent: Decimal,
}

/// Planned and actual figures feeding [`initiative_progress`].
#[derive(Debug, Clone, Copy)]
pub struct InitiativeFigures<'a> {
    pub budget_planned: Decimal,
    pub budget_spent: Decimal,
    pub hr_planned: Decimal,
    pub hr_actual: Decimal,
    pub baseline_status: &'a str,
    pub target_status: &'a str,
    pub achieved_status: &'a str,
}

/// Aggregated consumption of one planned resource item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUtilization {
    pub total_used: Decimal,
    pub remaining: Decimal,
    pub utilization_percent: Decimal,
}

/// `max(planned - used, 0)`.
pub fn remaining_amount(planned: Decimal, used: Decimal) -> Decimal {
    planned
        .checked_sub(used)
        .map(|left| left.max(Decimal::ZERO))
        .unwrap_or(Decimal::ZERO)
}

/// `used / planned * 100` to one decimal; zero without a positive plan.
pub fn utilization_percent(used: Decimal, planned: Decimal) -> Decimal {
    if planned <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    used.checked_div(planned)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|percent| percent.round_dp(1))
        .unwrap_or(Decimal::ZERO)
}

/// Share of the baseline-to-target status gap that has been closed, clamped to
/// 0..=100 and rounded to one decimal. A target at or below the baseline counts as
/// fully achieved.
pub fn status_achievement_percent(baseline: &str, target: &str, achieved: &str) -> Decimal {
    let baseline = Decimal::from(OrdinalLevel::from_field(baseline).status_percent());
    let target = Decimal::from(OrdinalLevel::from_field(target).status_percent());
    let achieved = Decimal::from(OrdinalLevel::from_field(achieved).status_percent());

    if target <= baseline {
        return Decimal::new(1000, 1);
    }

    let percent = (achieved - baseline) / (target - baseline) * Decimal::ONE_HUNDRED;
    percent
        .round_dp(1)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

pub fn initiative_progress(figures: &InitiativeFigures<'_>) -> InitiativeProgress {
    InitiativeProgress {
        budget_remaining: remaining_amount(figures.budget_planned, figures.budget_spent),
        budget_utilization_percent: utilization_percent(figures.budget_spent, figures.budget_planned),
        remaining_hr: remaining_amount(figures.hr_planned, figures.hr_actual),
        hr_utilization_percent: utilization_percent(figures.hr_actual, figures.hr_planned),
        status_achievement_percent: status_achievement_percent(
            figures.baseline_status,
            figures.target_status,
            figures.achieved_status,
        ),
    }
}

/// Sum of the amounts consumed against one plan; zero if the sum overflows.
pub fn total_consumption<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
        .unwrap_or(Decimal::ZERO)
}

pub fn resource_utilization(required: Decimal, total_used: Decimal) -> ResourceUtilization {
    ResourceUtilization {
        total_used,
        remaining: remaining_amount(required, total_used),
        utilization_percent: utilization_percent(total_used, required),
    }
}

/// Days from `today` until `end`, never negative; `None` without an end date.
pub fn remaining_days(end: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    end.map(|end| (end - today).num_days().max(0))
}
