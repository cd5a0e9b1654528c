//! Operations over tenant-owned records.
//!
//! Every operation takes the caller's [`AccessContext`]. Reads and writes go through
//! its [`TenantScope`]; derived fields are recomputed inside the same save; catalog
//! mismatches come back as [`AdvisoryNote`]s next to the stored row.

mod initiatives;
mod organization;
mod risks;
mod stakeholders;
mod strategy;
mod values;
pub mod validation;

#[cfg(test)]
mod tests;

pub use validation::{FieldError, ValidationErrors};

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::access::{AccessContext, Capability, Identity, MembershipTransitionError, TenantScope};
use crate::catalog::{AdvisoryNote, Catalogs};
use crate::domain::{Organization, OrganizationId, RecordId, Tenanted};
use crate::repository::{RecordRepository, RepositoryError, StrategyStore};
use validation::FieldChecks;

/// Why a caller was turned away before any row was touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("caller belongs to no organization")]
    NoOrganization,
    #[error("missing capability {0}")]
    MissingCapability(Capability),
}

/// Error raised by the strategy service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("forbidden: {0}")]
    Forbidden(#[from] AccessDenied),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Transition(#[from] MembershipTransitionError),
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::NotFound("record"),
            other => ServiceError::Repository(other),
        }
    }
}

/// Maps a repository miss onto the named record.
fn missing(what: &'static str) -> impl Fn(RepositoryError) -> ServiceError {
    move |error| match error {
        RepositoryError::NotFound => ServiceError::NotFound(what),
        other => ServiceError::Repository(other),
    }
}

/// A saved row plus any catalog advisories raised while saving it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Checked<T> {
    #[serde(flatten)]
    pub row: Tenanted<T>,
    pub advisories: Vec<AdvisoryNote>,
}

impl<T> Checked<T> {
    fn new(row: Tenanted<T>, advisories: Vec<AdvisoryNote>) -> Self {
        Self { row, advisories }
    }
}

/// Service composing the store, the choice catalogs and the access rules.
pub struct StrategyService<S> {
    store: Arc<S>,
    catalogs: Arc<Catalogs>,
}

impl<S> StrategyService<S>
where
    S: StrategyStore + 'static,
{
    pub fn new(store: Arc<S>, catalogs: Arc<Catalogs>) -> Self {
        Self { store, catalogs }
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Builds the per-request context: the latest accepted membership in the
    /// identity's organization decides the role, else the identity's own attribute.
    pub fn resolve_access(&self, identity: Identity) -> Result<AccessContext, ServiceError> {
        let accepted = match identity.organization_id {
            Some(organization_id) => self
                .store
                .memberships()
                .latest_accepted(&identity.email, organization_id)?,
            None => None,
        };

        let context = AccessContext::resolve(identity, accepted.as_ref().map(|row| &row.record));
        debug!(
            email = %context.identity().email,
            role = ?context.role(),
            superuser = context.is_superuser(),
            "resolved access context"
        );
        Ok(context)
    }

    fn scope<'c>(&self, context: &'c AccessContext) -> Result<&'c TenantScope, ServiceError> {
        context
            .scope()
            .ok_or(ServiceError::Forbidden(AccessDenied::NoOrganization))
    }

    /// Organization that owns records the caller creates at the top level.
    fn home_organization(&self, context: &AccessContext) -> Result<OrganizationId, ServiceError> {
        self.scope(context)?;
        context
            .home_organization()
            .ok_or(ServiceError::Forbidden(AccessDenied::NoOrganization))
    }

    fn organization(&self, id: OrganizationId) -> Result<Organization, ServiceError> {
        self.store
            .organizations()
            .fetch(id)?
            .ok_or(ServiceError::NotFound("organization"))
    }

    fn require(&self, context: &AccessContext, capability: Capability) -> Result<(), ServiceError> {
        self.scope(context)?;
        if context.permits(capability) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(AccessDenied::MissingCapability(
                capability,
            )))
        }
    }

    fn visible<T, R>(
        &self,
        repository: &R,
        context: &AccessContext,
        id: RecordId,
        what: &'static str,
    ) -> Result<Tenanted<T>, ServiceError>
    where
        R: RecordRepository<T> + ?Sized,
    {
        let scope = self.scope(context)?;
        repository
            .fetch(scope, id)
            .map_err(missing(what))?
            .ok_or(ServiceError::NotFound(what))
    }

    fn list_visible<T, R>(
        &self,
        repository: &R,
        context: &AccessContext,
    ) -> Result<Vec<Tenanted<T>>, ServiceError>
    where
        R: RecordRepository<T> + ?Sized,
    {
        let scope = self.scope(context)?;
        Ok(repository.list(scope)?)
    }

    fn replace<T, R>(
        &self,
        repository: &R,
        context: &AccessContext,
        id: RecordId,
        record: T,
        what: &'static str,
    ) -> Result<Tenanted<T>, ServiceError>
    where
        R: RecordRepository<T> + ?Sized,
    {
        let scope = self.scope(context)?;
        repository.update(scope, id, record).map_err(missing(what))
    }

    /// Replaces a child row whose `(field, owner)` parent was resolved for this
    /// write. A row never moves between organizations, so a parent owned by another
    /// one is rejected on that field.
    fn replace_owned<T, R>(
        &self,
        repository: &R,
        context: &AccessContext,
        id: RecordId,
        (parent_field, owner): (&'static str, OrganizationId),
        record: T,
        what: &'static str,
    ) -> Result<Tenanted<T>, ServiceError>
    where
        R: RecordRepository<T> + ?Sized,
    {
        let current = self.visible(repository, context, id, what)?;
        if current.organization_id != owner {
            warn!(
                record = what,
                %id,
                field = parent_field,
                owner = %current.organization_id,
                parent_owner = %owner,
                "parent belongs to another organization"
            );
            FieldChecks::new()
                .reject(parent_field, "belongs to a different organization than this record")
                .finish()?;
        }
        self.replace(repository, context, id, record, what)
    }

    fn remove<T, R>(
        &self,
        repository: &R,
        context: &AccessContext,
        id: RecordId,
        what: &'static str,
    ) -> Result<(), ServiceError>
    where
        R: RecordRepository<T> + ?Sized,
    {
        let scope = self.scope(context)?;
        repository.delete(scope, id).map_err(missing(what))?;
        debug!(record = what, %id, "deleted record");
        Ok(())
    }

    /// Deletes the visible rows that `belongs` to a parent being deleted and returns
    /// their ids so the next level down can follow.
    fn remove_children<T, R, F>(
        &self,
        repository: &R,
        context: &AccessContext,
        what: &'static str,
        belongs: F,
    ) -> Result<Vec<RecordId>, ServiceError>
    where
        R: RecordRepository<T> + ?Sized,
        F: Fn(&T) -> bool,
    {
        let scope = self.scope(context)?;
        let doomed: Vec<RecordId> = repository
            .list(scope)?
            .into_iter()
            .filter(|row| belongs(&row.record))
            .map(|row| row.id)
            .collect();
        for id in &doomed {
            repository.delete(scope, *id).map_err(missing(what))?;
        }
        if !doomed.is_empty() {
            debug!(record = what, count = doomed.len(), "removed dependent records");
        }
        Ok(doomed)
    }
}

fn advise(note: Option<AdvisoryNote>) -> Vec<AdvisoryNote> {
    match note {
        Some(note) => {
            warn!(
                catalog = %note.catalog,
                field = %note.field,
                value = %note.value,
                "selection is not listed in the catalog"
            );
            vec![note]
        }
        None => Vec::new(),
    }
}
