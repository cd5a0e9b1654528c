use tracing::info;

use super::validation::FieldChecks;
use super::{advise, Checked, ServiceError, StrategyService};
use crate::access::AccessContext;
use crate::catalog::{AdvisoryNote, CatalogKind};
use crate::domain::{CoreValue, OrganizationId, RecordId, Tenanted, ValueDraft};
use crate::repository::StrategyStore;

impl<S> StrategyService<S>
where
    S: StrategyStore + 'static,
{
    /// An organization adopts each value once.
    fn check_value(
        &self,
        context: &AccessContext,
        organization_id: OrganizationId,
        draft: &ValueDraft,
        replacing: Option<RecordId>,
    ) -> Result<(), ServiceError> {
        let mut checks = FieldChecks::new();
        checks.required("value", &draft.value);
        let adopted = self
            .list_visible(self.store.values(), context)?
            .into_iter()
            .any(|row| {
                row.organization_id == organization_id
                    && row.record.value == draft.value
                    && Some(row.id) != replacing
            });
        if adopted {
            checks.reject("value", "already adopted by this organization");
        }
        checks.finish()?;
        Ok(())
    }

    fn classify_value(&self, draft: ValueDraft) -> (CoreValue, Vec<AdvisoryNote>) {
        let value = CoreValue::classify(self.catalogs.values(), draft);
        let note = value.category.is_none().then(|| AdvisoryNote {
            catalog: CatalogKind::Values,
            field: "value".to_string(),
            value: value.value.clone(),
            message: format!("'{}' is not a listed value", value.value),
        });
        (value, advise(note))
    }

    pub fn create_value(
        &self,
        context: &AccessContext,
        draft: ValueDraft,
    ) -> Result<Checked<CoreValue>, ServiceError> {
        let organization_id = self.home_organization(context)?;
        self.check_value(context, organization_id, &draft, None)?;
        let (value, advisories) = self.classify_value(draft);
        let row = self.store.values().insert(organization_id, value)?;
        info!(
            organization = %organization_id,
            id = %row.id,
            value = %row.record.value,
            category = ?row.record.category,
            "adopted core value"
        );
        Ok(Checked::new(row, advisories))
    }

    pub fn update_value(
        &self,
        context: &AccessContext,
        id: RecordId,
        draft: ValueDraft,
    ) -> Result<Checked<CoreValue>, ServiceError> {
        let current = self.value(context, id)?;
        self.check_value(context, current.organization_id, &draft, Some(id))?;
        let (value, advisories) = self.classify_value(draft);
        let row = self.replace(self.store.values(), context, id, value, "core value")?;
        Ok(Checked::new(row, advisories))
    }

    pub fn value(&self, context: &AccessContext, id: RecordId) -> Result<Tenanted<CoreValue>, ServiceError> {
        self.visible(self.store.values(), context, id, "core value")
    }

    /// In catalog category order, unlisted values last, then by label.
    pub fn values(&self, context: &AccessContext) -> Result<Vec<Tenanted<CoreValue>>, ServiceError> {
        let categories = self.catalogs.values().list_level1();
        let mut rows = self.list_visible(self.store.values(), context)?;
        rows.sort_by_cached_key(|row| {
            let position = row
                .record
                .category
                .as_deref()
                .and_then(|category| categories.iter().position(|listed| *listed == category))
                .unwrap_or(categories.len());
            (position, row.record.label.clone())
        });
        Ok(rows)
    }

    pub fn delete_value(&self, context: &AccessContext, id: RecordId) -> Result<(), ServiceError> {
        self.remove(self.store.values(), context, id, "core value")
    }
}
