//! Per-request role and permission resolution.
//!
//! An [`Identity`] arrives from the authentication layer. The service looks up the
//! caller's most recent accepted membership and hands both to
//! [`AccessContext::resolve`], which fixes the effective role, the capability map and
//! the tenant scope for the rest of the request.

mod capability;
mod membership;

pub use capability::{Capability, CapabilityMap, Role};
pub use membership::{latest_accepted, Membership, MembershipStatus, MembershipTransitionError};

use serde::{Deserialize, Serialize};

use crate::domain::OrganizationId;

/// Authenticated caller as reported by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    #[serde(default)]
    pub organization_id: Option<OrganizationId>,
    /// Fallback role attribute carried on the user account.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_superuser: bool,
}

/// Which organizations' rows a request may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "organization_id")]
pub enum TenantScope {
    Organization(OrganizationId),
    AllOrganizations,
}

impl TenantScope {
    pub fn admits(&self, organization_id: OrganizationId) -> bool {
        match self {
            TenantScope::Organization(own) => *own == organization_id,
            TenantScope::AllOrganizations => true,
        }
    }
}

/// Effective role: the accepted membership's role, else the identity's own role
/// attribute, else none.
pub fn resolve_role(accepted: Option<&Membership>, fallback: Option<&str>) -> Option<Role> {
    match accepted {
        Some(membership) => Some(membership.role),
        None => fallback.and_then(Role::parse),
    }
}

/// Everything a service operation needs to know about the caller. Built once per
/// request and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessContext {
    identity: Identity,
    role: Option<Role>,
    capabilities: CapabilityMap,
    scope: Option<TenantScope>,
}

impl AccessContext {
    pub fn resolve(identity: Identity, accepted: Option<&Membership>) -> Self {
        let role = resolve_role(accepted, identity.role.as_deref());
        let capabilities = CapabilityMap::for_role(role);
        let scope = if identity.is_superuser {
            Some(TenantScope::AllOrganizations)
        } else {
            identity.organization_id.map(TenantScope::Organization)
        };

        Self {
            identity,
            role,
            capabilities,
            scope,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn capabilities(&self) -> &CapabilityMap {
        &self.capabilities
    }

    /// `None` when the caller belongs to no organization and is not a superuser.
    pub fn scope(&self) -> Option<&TenantScope> {
        self.scope.as_ref()
    }

    pub fn home_organization(&self) -> Option<OrganizationId> {
        self.identity.organization_id
    }

    pub fn is_superuser(&self) -> bool {
        self.identity.is_superuser
    }

    /// Superusers pass every check; everyone else needs the capability flag.
    pub fn permits(&self, capability: Capability) -> bool {
        self.identity.is_superuser || self.capabilities.allows(capability)
    }
}
