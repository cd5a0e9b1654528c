//! Cascading choice catalogs.
//!
//! Each catalog is a fixed tree of option keys. Interior levels list the choices
//! offered beneath a parent selection, and a leaf may carry text (a KPI formula, a
//! risk mitigation or a value label). Lookups are total: an empty or unknown ancestor produces an empty
//! option list, and an unresolved leaf produces an empty string.

mod advisory;

pub use advisory::{check_selection, AdvisoryNote};

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::CatalogConfig;

/// The catalogs shipped with the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    /// perspective > focus area > objective > KPI, with formula text on the KPI.
    StrategyMap,
    /// SWOT type > pillar > factor.
    Swot,
    /// risk category > risk name, with mitigation text on the risk.
    Risk,
    /// focus area > dimension.
    Initiative,
    /// value category > value key, with the display label on the key.
    Values,
    /// organization sector > suggested mission statement.
    Mission,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 6] = [
        CatalogKind::StrategyMap,
        CatalogKind::Swot,
        CatalogKind::Risk,
        CatalogKind::Initiative,
        CatalogKind::Values,
        CatalogKind::Mission,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            CatalogKind::StrategyMap => "strategy_map",
            CatalogKind::Swot => "swot",
            CatalogKind::Risk => "risk",
            CatalogKind::Initiative => "initiative",
            CatalogKind::Values => "values",
            CatalogKind::Mission => "mission",
        }
    }

    /// Accepts the snake-case key or its kebab-case spelling.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == normalized)
    }

    /// Field names for each level, used when reporting selections.
    pub const fn level_names(self) -> &'static [&'static str] {
        match self {
            CatalogKind::StrategyMap => &["perspective", "focus_area", "objective", "kpi"],
            CatalogKind::Swot => &["swot_type", "pillar", "factor"],
            CatalogKind::Risk => &["risk_category", "risk_name"],
            CatalogKind::Initiative => &["focus_area", "dimension"],
            CatalogKind::Values => &["category", "value"],
            CatalogKind::Mission => &["sector", "statement"],
        }
    }

    fn embedded(self) -> &'static str {
        match self {
            CatalogKind::StrategyMap => include_str!("data/strategy_map.json"),
            CatalogKind::Swot => include_str!("data/swot.json"),
            CatalogKind::Risk => include_str!("data/risk.json"),
            CatalogKind::Initiative => include_str!("data/initiative.json"),
            CatalogKind::Values => include_str!("data/values.json"),
            CatalogKind::Mission => include_str!("data/mission.json"),
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Errors raised while loading catalog data. Lookups never fail.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{kind} catalog is not valid JSON: {source}")]
    Parse {
        kind: CatalogKind,
        source: serde_json::Error,
    },
    #[error("{kind} catalog entry '{path}' must be an object, a string, or an array of strings (found {found})")]
    Shape {
        kind: CatalogKind,
        path: String,
        found: &'static str,
    },
    #[error("failed to read {kind} catalog from {path:?}: {source}")]
    Io {
        kind: CatalogKind,
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogNode {
    key: String,
    text: Option<String>,
    children: Vec<CatalogNode>,
}

impl CatalogNode {
    fn leaf(key: &str) -> Self {
        Self {
            key: key.to_string(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[CatalogNode] {
        &self.children
    }
}

/// Immutable option tree for one [`CatalogKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceCatalog {
    kind: CatalogKind,
    roots: Vec<CatalogNode>,
}

impl ChoiceCatalog {
    /// Parses the JSON layout: objects nest, strings are leaf text, and arrays list
    /// text-less leaf keys. Declaration order is preserved.
    pub fn from_json_str(kind: CatalogKind, raw: &str) -> Result<Self, CatalogError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|source| CatalogError::Parse { kind, source })?;

        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(CatalogError::Shape {
                    kind,
                    path: String::new(),
                    found: json_type(&other),
                })
            }
        };

        let roots = build_children(kind, &map, &mut Vec::new())?;
        Ok(Self { kind, roots })
    }

    pub fn embedded(kind: CatalogKind) -> Result<Self, CatalogError> {
        Self::from_json_str(kind, kind.embedded())
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    pub fn list_level1(&self) -> Vec<&str> {
        self.options(&[])
    }

    pub fn list_level2(&self, level1: &str) -> Vec<&str> {
        self.options(&[level1])
    }

    pub fn list_level3(&self, level1: &str, level2: &str) -> Vec<&str> {
        self.options(&[level1, level2])
    }

    pub fn list_level4(&self, level1: &str, level2: &str, level3: &str) -> Vec<&str> {
        self.options(&[level1, level2, level3])
    }

    /// Options offered beneath `path`; the empty path lists the top level.
    pub fn options(&self, path: &[&str]) -> Vec<&str> {
        self.children_at(path)
            .map(|children| children.iter().map(CatalogNode::key).collect())
            .unwrap_or_default()
    }

    /// Leaf text at `path`, or `""` when the path does not resolve or carries no text.
    pub fn lookup_leaf(&self, path: &[&str]) -> &str {
        self.node(path)
            .and_then(CatalogNode::text)
            .unwrap_or("")
    }

    pub fn contains_path(&self, path: &[&str]) -> bool {
        self.node(path).is_some()
    }

    /// Top-level key whose second level lists `key`. Used where callers submit only
    /// the leaf, such as a value without its category.
    pub fn parent_of(&self, key: &str) -> Option<&str> {
        if key.is_empty() {
            return None;
        }
        self.roots
            .iter()
            .find(|root| root.children.iter().any(|child| child.key == key))
            .map(CatalogNode::key)
    }

    pub fn roots(&self) -> &[CatalogNode] {
        &self.roots
    }

    fn children_at(&self, path: &[&str]) -> Option<&[CatalogNode]> {
        let mut level: &[CatalogNode] = &self.roots;
        for key in path {
            if key.is_empty() {
                return None;
            }
            let node = level.iter().find(|node| node.key == *key)?;
            level = &node.children;
        }
        Some(level)
    }

    fn node(&self, path: &[&str]) -> Option<&CatalogNode> {
        let (last, parents) = path.split_last()?;
        if last.is_empty() {
            return None;
        }
        self.children_at(parents)?
            .iter()
            .find(|node| node.key == *last)
    }
}

fn build_children(
    kind: CatalogKind,
    map: &Map<String, Value>,
    path: &mut Vec<String>,
) -> Result<Vec<CatalogNode>, CatalogError> {
    map.iter()
        .map(|(key, value)| build_node(kind, key, value, path))
        .collect()
}

fn build_node(
    kind: CatalogKind,
    key: &str,
    value: &Value,
    path: &mut Vec<String>,
) -> Result<CatalogNode, CatalogError> {
    path.push(key.to_string());

    let node = match value {
        Value::String(text) => Ok(CatalogNode {
            key: key.to_string(),
            text: Some(text.clone()),
            children: Vec::new(),
        }),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(leaf) => Ok(CatalogNode::leaf(leaf)),
                other => Err(CatalogError::Shape {
                    kind,
                    path: path.join(" > "),
                    found: json_type(other),
                }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|children| CatalogNode {
                key: key.to_string(),
                text: None,
                children,
            }),
        Value::Object(map) => build_children(kind, map, path).map(|children| CatalogNode {
            key: key.to_string(),
            text: None,
            children,
        }),
        other => Err(CatalogError::Shape {
            kind,
            path: path.join(" > "),
            found: json_type(other),
        }),
    };

    path.pop();
    node
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The full set of catalogs, loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Catalogs {
    strategy_map: ChoiceCatalog,
    swot: ChoiceCatalog,
    risk: ChoiceCatalog,
    initiative: ChoiceCatalog,
    values: ChoiceCatalog,
    mission: ChoiceCatalog,
}

impl Catalogs {
    fn assemble<F>(mut load: F) -> Result<Self, CatalogError>
    where
        F: FnMut(CatalogKind) -> Result<ChoiceCatalog, CatalogError>,
    {
        Ok(Self {
            strategy_map: load(CatalogKind::StrategyMap)?,
            swot: load(CatalogKind::Swot)?,
            risk: load(CatalogKind::Risk)?,
            initiative: load(CatalogKind::Initiative)?,
            values: load(CatalogKind::Values)?,
            mission: load(CatalogKind::Mission)?,
        })
    }

    pub fn embedded() -> Result<Self, CatalogError> {
        Self::assemble(ChoiceCatalog::embedded)
    }

    /// Reads `<kind>.json` from `dir`, falling back to the embedded data for any
    /// catalog the directory does not provide.
    pub fn from_dir(dir: &Path) -> Result<Self, CatalogError> {
        Self::assemble(|kind| {
            let path = dir.join(format!("{}.json", kind.key()));
            if !path.is_file() {
                return ChoiceCatalog::embedded(kind);
            }
            let raw = std::fs::read_to_string(&path)
                .map_err(|source| CatalogError::Io { kind, path, source })?;
            ChoiceCatalog::from_json_str(kind, &raw)
        })
    }

    pub fn load(config: &CatalogConfig) -> Result<Self, CatalogError> {
        match &config.directory {
            Some(dir) => Self::from_dir(dir),
            None => Self::embedded(),
        }
    }

    pub fn get(&self, kind: CatalogKind) -> &ChoiceCatalog {
        match kind {
            CatalogKind::StrategyMap => &self.strategy_map,
            CatalogKind::Swot => &self.swot,
            CatalogKind::Risk => &self.risk,
            CatalogKind::Initiative => &self.initiative,
            CatalogKind::Values => &self.values,
            CatalogKind::Mission => &self.mission,
        }
    }

    pub fn strategy_map(&self) -> &ChoiceCatalog {
        &self.strategy_map
    }

    pub fn swot(&self) -> &ChoiceCatalog {
        &self.swot
    }

    pub fn risk(&self) -> &ChoiceCatalog {
        &self.risk
    }

    pub fn initiative(&self) -> &ChoiceCatalog {
        &self.initiative
    }

    pub fn values(&self) -> &ChoiceCatalog {
        &self.values
    }

    pub fn mission(&self) -> &ChoiceCatalog {
        &self.mission
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogs() -> Catalogs {
        Catalogs::embedded().expect("embedded catalogs parse")
    }

    #[test]
    fn strategy_map_lists_perspectives_in_declared_order() {
        let catalogs = catalogs();
        assert_eq!(
            catalogs.strategy_map().list_level1(),
            vec![
                "Financial Perspective",
                "Customer Perspective",
                "Internal Process Perspective",
                "Learning & Growth Perspective",
            ]
        );
    }

    #[test]
    fn cascades_through_four_levels_to_formula() {
        let catalogs = catalogs();
        let map = catalogs.strategy_map();

        let pillars = map.list_level2("Financial Perspective");
        assert_eq!(pillars.first(), Some(&"Revenue Growth & Diversification"));

        let objectives = map.list_level3("Financial Perspective", "Revenue Growth & Diversification");
        assert!(objectives.contains(&"Enhance Total Revenue Performance"));

        let kpis = map.list_level4(
            "Financial Perspective",
            "Revenue Growth & Diversification",
            "Enhance Total Revenue Performance",
        );
        assert!(kpis.contains(&"Total revenue growth (%)"));

        let formula = map.lookup_leaf(&[
            "Financial Perspective",
            "Revenue Growth & Diversification",
            "Enhance Total Revenue Performance",
            "Total revenue growth (%)",
        ]);
        assert_eq!(
            formula,
            "(Current revenue - Previous revenue) / Previous revenue * 100"
        );
    }

    #[test]
    fn unknown_or_empty_ancestors_yield_nothing() {
        let catalogs = catalogs();
        let map = catalogs.strategy_map();

        assert!(map.list_level2("Imaginary Perspective").is_empty());
        assert!(map.list_level2("").is_empty());
        assert!(map.list_level3("", "Revenue Growth & Diversification").is_empty());
        assert!(map
            .list_level4("Financial Perspective", "Nope", "Enhance Total Revenue Performance")
            .is_empty());
        assert_eq!(map.lookup_leaf(&["Financial Perspective", "Nope"]), "");
        assert_eq!(map.lookup_leaf(&[]), "");
    }

    #[test]
    fn keys_match_case_sensitively() {
        let catalogs = catalogs();
        assert!(catalogs
            .strategy_map()
            .list_level2("financial perspective")
            .is_empty());
    }

    #[test]
    fn every_listed_option_is_a_valid_ancestor() {
        let catalogs = catalogs();
        for kind in CatalogKind::ALL {
            let catalog = catalogs.get(kind);
            let depth = kind.level_names().len();
            let mut frontier: Vec<Vec<&str>> = vec![Vec::new()];

            for level in 0..depth {
                let mut next = Vec::new();
                for path in &frontier {
                    let options = catalog.options(path);
                    assert!(
                        !options.is_empty(),
                        "{kind} level {level} under {path:?} offers nothing"
                    );
                    for option in options {
                        let mut child = path.clone();
                        child.push(option);
                        assert!(catalog.contains_path(&child));
                        next.push(child);
                    }
                }
                frontier = next;
            }

            for leaf in &frontier {
                assert!(catalog.options(leaf).is_empty(), "{kind} {leaf:?} goes deeper");
            }
        }
    }

    #[test]
    fn every_kpi_and_risk_has_leaf_text() {
        let catalogs = catalogs();
        let map = catalogs.strategy_map();
        for perspective in map.list_level1() {
            for pillar in map.list_level2(perspective) {
                for objective in map.list_level3(perspective, pillar) {
                    for kpi in map.list_level4(perspective, pillar, objective) {
                        assert!(!map
                            .lookup_leaf(&[perspective, pillar, objective, kpi])
                            .is_empty());
                    }
                }
            }
        }

        let risk = catalogs.risk();
        for category in risk.list_level1() {
            for name in risk.list_level2(category) {
                assert!(!risk.lookup_leaf(&[category, name]).is_empty());
            }
        }
    }

    #[test]
    fn risk_mitigation_is_looked_up_by_category_and_name() {
        let catalogs = catalogs();
        let mitigation = catalogs
            .risk()
            .lookup_leaf(&["Financial Risks", "Revenue decline in key markets"]);
        assert!(mitigation.starts_with("Diversify revenue streams"));
        assert_eq!(
            catalogs
                .risk()
                .lookup_leaf(&["Operational Risks", "Revenue decline in key markets"]),
            ""
        );
    }

    #[test]
    fn array_leaves_have_no_text() {
        let catalogs = catalogs();
        let dimensions = catalogs.initiative().list_level2("Financial Sustainability");
        assert_eq!(dimensions.first(), Some(&"Revenue Diversification"));
        assert_eq!(
            catalogs
                .initiative()
                .lookup_leaf(&["Financial Sustainability", "Revenue Diversification"]),
            ""
        );
        assert!(catalogs
            .initiative()
            .contains_path(&["Financial Sustainability", "Revenue Diversification"]));
    }

    #[test]
    fn parser_keeps_declaration_order() {
        let catalog =
            ChoiceCatalog::from_json_str(CatalogKind::Initiative, r#"{"Zeta": ["b", "a"], "Alpha": []}"#)
                .expect("valid catalog");
        assert_eq!(catalog.list_level1(), vec!["Zeta", "Alpha"]);
        assert_eq!(catalog.list_level2("Zeta"), vec!["b", "a"]);
        assert!(catalog.list_level2("Alpha").is_empty());
    }

    #[test]
    fn parser_rejects_non_text_leaves() {
        let err = ChoiceCatalog::from_json_str(CatalogKind::Risk, r#"{"Financial": {"Loss": 3}}"#)
            .expect_err("numbers are not leaves");
        match err {
            CatalogError::Shape { path, found, .. } => {
                assert_eq!(path, "Financial > Loss");
                assert_eq!(found, "number");
            }
            other => panic!("expected shape error, got {other:?}"),
        }

        assert!(matches!(
            ChoiceCatalog::from_json_str(CatalogKind::Risk, "[]"),
            Err(CatalogError::Shape { .. })
        ));
        assert!(matches!(
            ChoiceCatalog::from_json_str(CatalogKind::Risk, "{"),
            Err(CatalogError::Parse { .. })
        ));
    }

    #[test]
    fn directory_overrides_only_the_files_it_provides() {
        let dir = std::env::temp_dir().join(format!("catalog-override-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        std::fs::write(dir.join("initiative.json"), r#"{"Only Area": ["Only Dimension"]}"#)
            .expect("write override");

        let catalogs = Catalogs::from_dir(&dir).expect("override loads");
        assert_eq!(catalogs.initiative().list_level1(), vec!["Only Area"]);
        assert_eq!(catalogs.strategy_map().list_level1().len(), 4);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn values_resolve_their_category_and_label() {
        let catalogs = catalogs();
        let values = catalogs.values();
        assert_eq!(values.list_level1().len(), 10);
        assert_eq!(values.parent_of("integrity"), Some("People & Culture"));
        assert_eq!(values.parent_of("compliance"), Some("Finance & Risk"));
        assert_eq!(values.parent_of("People & Culture"), None);
        assert_eq!(values.parent_of("punctuality"), None);
        assert_eq!(values.parent_of(""), None);
        assert_eq!(
            values.lookup_leaf(&["Technology & Digital", "data_driven"]),
            "Data-Driven Decision Making"
        );
    }

    #[test]
    fn missions_are_suggested_per_sector() {
        let catalogs = catalogs();
        let mission = catalogs.mission();
        let healthcare = mission.list_level2("healthcare");
        assert_eq!(healthcare.len(), 10);
        assert_eq!(
            healthcare.first(),
            Some(&"To provide accessible and quality healthcare for all")
        );
        assert!(mission.list_level2("Health").is_empty());
        assert!(mission.contains_path(&["agriculture", "To ensure food security and equitable access"]));
    }

    #[test]
    fn kind_parses_both_spellings() {
        assert_eq!(CatalogKind::parse("strategy-map"), Some(CatalogKind::StrategyMap));
        assert_eq!(CatalogKind::parse("risk"), Some(CatalogKind::Risk));
        assert_eq!(CatalogKind::parse("values"), Some(CatalogKind::Values));
        assert_eq!(CatalogKind::parse("vision"), None);
    }
}
