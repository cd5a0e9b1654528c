use super::ordinal::OrdinalLevel;
use crate::catalog::ChoiceCatalog;

/// `likelihood * impact` on the five-point scale, 1 through 25.
pub fn severity_score(likelihood: &str, impact: &str) -> u8 {
    OrdinalLevel::from_field(likelihood).points() * OrdinalLevel::from_field(impact).points()
}

/// Catalog mitigation text for the risk, or an empty string when the category and
/// name do not resolve.
pub fn mitigation_action(catalog: &ChoiceCatalog, category: &str, name: &str) -> String {
    catalog.lookup_leaf(&[category, name]).to_string()
}
