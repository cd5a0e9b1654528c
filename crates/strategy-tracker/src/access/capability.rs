use std::fmt;

use serde::{Deserialize, Serialize};

/// Role granted by an accepted membership or carried on the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Editor,
    Viewer,
}

impl Role {
    /// Exact match on `editor` / `viewer`; anything else is no role at all.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "editor" => Some(Role::Editor),
            "viewer" => Some(Role::Viewer),
            _ => None,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Role::Editor => "editor",
            Role::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    VisionView,
    VisionCreate,
    VisionEdit,
    VisionDelete,
    MissionView,
    MissionCreate,
    MissionEdit,
    MissionDelete,
    OrganizationView,
    OrganizationEdit,
    InvitationView,
    InvitationSend,
    InvitationDelete,
}

impl Capability {
    pub const ALL: [Capability; 13] = [
        Capability::VisionView,
        Capability::VisionCreate,
        Capability::VisionEdit,
        Capability::VisionDelete,
        Capability::MissionView,
        Capability::MissionCreate,
        Capability::MissionEdit,
        Capability::MissionDelete,
        Capability::OrganizationView,
        Capability::OrganizationEdit,
        Capability::InvitationView,
        Capability::InvitationSend,
        Capability::InvitationDelete,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Capability::VisionView => "vision_view",
            Capability::VisionCreate => "vision_create",
            Capability::VisionEdit => "vision_edit",
            Capability::VisionDelete => "vision_delete",
            Capability::MissionView => "mission_view",
            Capability::MissionCreate => "mission_create",
            Capability::MissionEdit => "mission_edit",
            Capability::MissionDelete => "mission_delete",
            Capability::OrganizationView => "organization_view",
            Capability::OrganizationEdit => "organization_edit",
            Capability::InvitationView => "invitation_view",
            Capability::InvitationSend => "invitation_send",
            Capability::InvitationDelete => "invitation_delete",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Fixed set of capability flags, all denied unless a role grants them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapabilityMap {
    pub vision_view: bool,
    pub vision_create: bool,
    pub vision_edit: bool,
    pub vision_delete: bool,
    pub mission_view: bool,
    pub mission_create: bool,
    pub mission_edit: bool,
    pub mission_delete: bool,
    pub organization_view: bool,
    pub organization_edit: bool,
    pub invitation_view: bool,
    pub invitation_send: bool,
    pub invitation_delete: bool,
}

impl CapabilityMap {
    pub fn for_role(role: Option<Role>) -> Self {
        match role {
            Some(Role::Editor) => Self {
                vision_view: true,
                vision_create: true,
                vision_edit: true,
                vision_delete: true,
                mission_view: true,
                mission_create: true,
                mission_edit: true,
                mission_delete: true,
                organization_view: true,
                organization_edit: true,
                invitation_view: true,
                invitation_send: true,
                invitation_delete: true,
            },
            Some(Role::Viewer) => Self {
                vision_view: true,
                mission_view: true,
                organization_view: true,
                invitation_view: true,
                ..Self::default()
            },
            None => Self::default(),
        }
    }

    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::VisionView => self.vision_view,
            Capability::VisionCreate => self.vision_create,
            Capability::VisionEdit => self.vision_edit,
            Capability::VisionDelete => self.vision_delete,
            Capability::MissionView => self.mission_view,
            Capability::MissionCreate => self.mission_create,
            Capability::MissionEdit => self.mission_edit,
            Capability::MissionDelete => self.mission_delete,
            Capability::OrganizationView => self.organization_view,
            Capability::OrganizationEdit => self.organization_edit,
            Capability::InvitationView => self.invitation_view,
            Capability::InvitationSend => self.invitation_send,
            Capability::InvitationDelete => self.invitation_delete,
        }
    }

    pub fn granted(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|capability| self.allows(*capability))
            .collect()
    }
}
