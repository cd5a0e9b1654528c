use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use strategy_tracker::catalog::CatalogKind;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_catalog_kind(raw: &str) -> Result<CatalogKind, String> {
    CatalogKind::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = CatalogKind::ALL.iter().map(|kind| kind.key()).collect();
        format!("unknown catalog '{raw}' (expected one of {})", known.join(", "))
    })
}
