use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::OrganizationId;
use crate::access::Role;
use crate::catalog::ChoiceCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationType {
    SoleProprietorship,
    Partnership,
    Corporation,
    JointVenture,
    Cooperative,
    NonProfit,
    NonGovernmental,
    Governmental,
    Other,
}

/// Tenant profile as submitted on registration or edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationDraft {
    pub name: String,
    pub organization_type: OrganizationType,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact_person: String,
}

/// The tenant itself. Every other record points back at one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    #[serde(flatten)]
    pub profile: OrganizationDraft,
    pub created_at: DateTime<Utc>,
}

impl Organization {
    pub fn name(&self) -> &str {
        &self.profile.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementDraft {
    pub statement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vision {
    pub statement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub statement: String,
}

/// Mission statements offered for an organization's sector; empty for unlisted sectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionSuggestions {
    pub sector: String,
    pub statements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDraft {
    pub value: String,
}

/// Core value adopted by an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreValue {
    pub value: String,
    pub label: String,
    pub category: Option<String>,
}

impl CoreValue {
    /// Resolves the catalog label and category. An unlisted key is kept verbatim as
    /// its own label with no category.
    pub fn classify(catalog: &ChoiceCatalog, draft: ValueDraft) -> Self {
        let category = catalog.parent_of(&draft.value);
        let label = category
            .map(|category| catalog.lookup_leaf(&[category, draft.value.as_str()]))
            .filter(|label| !label.is_empty())
            .unwrap_or(draft.value.as_str())
            .to_string();
        let category = category.map(str::to_string);
        Self {
            value: draft.value,
            label,
            category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationDraft {
    pub email: String,
    #[serde(default = "default_invitation_role")]
    pub role: Role,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_invitation_role() -> Role {
    Role::Viewer
}
