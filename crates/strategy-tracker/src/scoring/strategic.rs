use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Metrics stored on a strategic report, derived from its plan at save time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetrics {
    pub percent_achieved: Decimal,
    pub variance: Decimal,
    pub weighted_score: Decimal,
}

/// Planned values an achievement is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanTargets {
    pub baseline: Decimal,
    pub target: Decimal,
    pub weight: Decimal,
}

pub fn improvement_needed(baseline: Decimal, target: Decimal) -> Decimal {
    target.checked_sub(baseline).unwrap_or(Decimal::ZERO)
}

/// `(achievement - baseline) / (target - baseline) * 100` to two decimals.
/// Not clamped, so over- and under-achievement stay visible. Zero when target
/// equals baseline.
pub fn percent_achieved(baseline: Decimal, target: Decimal, achievement: Decimal) -> Decimal {
    let span = match target.checked_sub(baseline) {
        Some(span) if !span.is_zero() => span,
        _ => return Decimal::ZERO,
    };

    achievement
        .checked_sub(baseline)
        .and_then(|progress| progress.checked_div(span))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|percent| percent.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

pub fn report_metrics(plan: &PlanTargets, achievement: Decimal) -> ReportMetrics {
    let variance = plan
        .target
        .checked_sub(achievement)
        .unwrap_or(Decimal::ZERO);

    let weighted_score = plan
        .weight
        .checked_div(Decimal::ONE_HUNDRED)
        .and_then(|fraction| achievement.checked_mul(fraction))
        .unwrap_or(Decimal::ZERO);

    ReportMetrics {
        percent_achieved: percent_achieved(plan.baseline, plan.target, achievement),
        variance,
        weighted_score,
    }
}
