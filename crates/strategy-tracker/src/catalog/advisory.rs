use serde::{Deserialize, Serialize};

use super::{CatalogKind, ChoiceCatalog};

/// Non-blocking report that a saved selection strays from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryNote {
    pub catalog: CatalogKind,
    pub field: String,
    pub value: String,
    pub message: String,
}

/// Walks a cascading selection level by level and reports the first value the
/// catalog does not offer. Once a level misses, the deeper values are free text and
/// are not checked.
pub fn check_selection(catalog: &ChoiceCatalog, selection: &[&str]) -> Option<AdvisoryNote> {
    let kind = catalog.kind();
    let names = kind.level_names();

    for (depth, value) in selection.iter().enumerate() {
        if value.is_empty() {
            return None;
        }

        let offered = catalog.options(&selection[..depth]);
        if offered.iter().any(|option| option == value) {
            continue;
        }

        let field = names.get(depth).copied().unwrap_or("selection");
        let message = match depth.checked_sub(1).and_then(|parent| selection.get(parent)) {
            Some(parent) => format!("'{value}' is not a listed {field} under '{parent}'"),
            None => format!("'{value}' is not a listed {field}"),
        };

        return Some(AdvisoryNote {
            catalog: kind,
            field: field.to_string(),
            value: (*value).to_string(),
            message,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalogs;

    #[test]
    fn listed_selection_has_no_note() {
        let catalogs = Catalogs::embedded().expect("catalogs");
        let note = check_selection(
            catalogs.strategy_map(),
            &[
                "Financial Perspective",
                "Revenue Growth & Diversification",
                "Enhance Total Revenue Performance",
                "Total revenue growth (%)",
            ],
        );
        assert_eq!(note, None);
    }

    #[test]
    fn reports_first_unlisted_level_only() {
        let catalogs = Catalogs::embedded().expect("catalogs");
        let note = check_selection(
            catalogs.strategy_map(),
            &[
                "Financial Perspective",
                "Community Outreach",
                "Host more events",
                "Events per quarter",
            ],
        )
        .expect("pillar is not listed");

        assert_eq!(note.catalog, CatalogKind::StrategyMap);
        assert_eq!(note.field, "focus_area");
        assert_eq!(note.value, "Community Outreach");
        assert!(note.message.contains("Financial Perspective"));
    }

    #[test]
    fn unlisted_top_level_names_the_field() {
        let catalogs = Catalogs::embedded().expect("catalogs");
        let note = check_selection(catalogs.risk(), &["Weather Risks", "Hail"])
            .expect("category is not listed");
        assert_eq!(note.field, "risk_category");
        assert_eq!(note.message, "'Weather Risks' is not a listed risk_category");
    }

    #[test]
    fn empty_values_stop_the_walk() {
        let catalogs = Catalogs::embedded().expect("catalogs");
        assert_eq!(check_selection(catalogs.initiative(), &["", "Anything"]), None);
    }
}
