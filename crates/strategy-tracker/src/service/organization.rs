use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::validation::FieldChecks;
use super::{advise, missing, Checked, ServiceError, StrategyService};
use crate::access::{AccessContext, Capability, Identity, Membership, Role, TenantScope};
use crate::catalog::{check_selection, AdvisoryNote};
use crate::domain::{
    InvitationDraft, Mission, MissionSuggestions, Organization, OrganizationDraft,
    OrganizationId, RecordId, StatementDraft, Tenanted, Vision,
};
use crate::repository::StrategyStore;

fn check_statement(draft: &StatementDraft) -> Result<(), ServiceError> {
    FieldChecks::new()
        .required("statement", &draft.statement)
        .finish()?;
    Ok(())
}

impl<S> StrategyService<S>
where
    S: StrategyStore + 'static,
{
    /// Creates a tenant and records the registering identity as its first editor.
    pub fn register_organization(
        &self,
        identity: &Identity,
        draft: OrganizationDraft,
    ) -> Result<Organization, ServiceError> {
        FieldChecks::new()
            .required("name", &draft.name)
            .email("email", Some(identity.email.as_str()))
            .finish()?;

        let now = Utc::now();
        let organization = self.store.organizations().insert(draft, now)?;

        let mut founder = Membership::invite(identity.email.clone(), Role::Editor, None, None, now);
        founder.accept(now)?;
        self.store.memberships().insert(organization.id, founder)?;

        info!(
            organization = %organization.id,
            name = %organization.name(),
            "registered organization"
        );
        Ok(organization)
    }

    pub fn organization_profile(&self, context: &AccessContext) -> Result<Organization, ServiceError> {
        self.require(context, Capability::OrganizationView)?;
        self.organization(self.home_organization(context)?)
    }

    pub fn update_organization(
        &self,
        context: &AccessContext,
        draft: OrganizationDraft,
    ) -> Result<Organization, ServiceError> {
        self.require(context, Capability::OrganizationEdit)?;
        FieldChecks::new().required("name", &draft.name).finish()?;
        let id = self.home_organization(context)?;
        self.store
            .organizations()
            .update(id, draft)
            .map_err(missing("organization"))
    }

    pub fn create_vision(
        &self,
        context: &AccessContext,
        draft: StatementDraft,
    ) -> Result<Tenanted<Vision>, ServiceError> {
        self.require(context, Capability::VisionCreate)?;
        check_statement(&draft)?;
        let organization_id = self.home_organization(context)?;
        let row = self.store.visions().insert(
            organization_id,
            Vision {
                statement: draft.statement,
            },
        )?;
        info!(organization = %organization_id, id = %row.id, "created vision");
        Ok(row)
    }

    pub fn visions(&self, context: &AccessContext) -> Result<Vec<Tenanted<Vision>>, ServiceError> {
        self.require(context, Capability::VisionView)?;
        self.list_visible(self.store.visions(), context)
    }

    pub fn update_vision(
        &self,
        context: &AccessContext,
        id: RecordId,
        draft: StatementDraft,
    ) -> Result<Tenanted<Vision>, ServiceError> {
        self.require(context, Capability::VisionEdit)?;
        check_statement(&draft)?;
        let vision = Vision {
            statement: draft.statement,
        };
        self.replace(self.store.visions(), context, id, vision, "vision")
    }

    pub fn delete_vision(&self, context: &AccessContext, id: RecordId) -> Result<(), ServiceError> {
        self.require(context, Capability::VisionDelete)?;
        self.remove(self.store.visions(), context, id, "vision")
    }

    /// Statements suggested for the caller's sector.
    pub fn mission_suggestions(
        &self,
        context: &AccessContext,
    ) -> Result<MissionSuggestions, ServiceError> {
        self.require(context, Capability::MissionView)?;
        let organization = self.organization(self.home_organization(context)?)?;
        let statements = self
            .catalogs
            .mission()
            .list_level2(&organization.profile.sector)
            .into_iter()
            .map(str::to_string)
            .collect();
        Ok(MissionSuggestions {
            sector: organization.profile.sector,
            statements,
        })
    }

    /// Only sectors with suggestions are held to them; free text elsewhere is normal.
    fn review_mission(
        &self,
        organization_id: OrganizationId,
        statement: &str,
    ) -> Result<Vec<AdvisoryNote>, ServiceError> {
        let sector = self.organization(organization_id)?.profile.sector;
        let catalog = self.catalogs.mission();
        if catalog.list_level2(&sector).is_empty() {
            return Ok(Vec::new());
        }
        Ok(advise(check_selection(catalog, &[sector.as_str(), statement])))
    }

    pub fn create_mission(
        &self,
        context: &AccessContext,
        draft: StatementDraft,
    ) -> Result<Checked<Mission>, ServiceError> {
        self.require(context, Capability::MissionCreate)?;
        check_statement(&draft)?;
        let organization_id = self.home_organization(context)?;
        let advisories = self.review_mission(organization_id, &draft.statement)?;
        let row = self.store.missions().insert(
            organization_id,
            Mission {
                statement: draft.statement,
            },
        )?;
        info!(organization = %organization_id, id = %row.id, "created mission");
        Ok(Checked::new(row, advisories))
    }

    pub fn missions(&self, context: &AccessContext) -> Result<Vec<Tenanted<Mission>>, ServiceError> {
        self.require(context, Capability::MissionView)?;
        self.list_visible(self.store.missions(), context)
    }

    pub fn update_mission(
        &self,
        context: &AccessContext,
        id: RecordId,
        draft: StatementDraft,
    ) -> Result<Checked<Mission>, ServiceError> {
        self.require(context, Capability::MissionEdit)?;
        check_statement(&draft)?;
        let current: Tenanted<Mission> = self.visible(self.store.missions(), context, id, "mission")?;
        let advisories = self.review_mission(current.organization_id, &draft.statement)?;
        let mission = Mission {
            statement: draft.statement,
        };
        let row = self.replace(self.store.missions(), context, id, mission, "mission")?;
        Ok(Checked::new(row, advisories))
    }

    pub fn delete_mission(&self, context: &AccessContext, id: RecordId) -> Result<(), ServiceError> {
        self.require(context, Capability::MissionDelete)?;
        self.remove(self.store.missions(), context, id, "mission")
    }

    /// Creates a pending membership carrying a fresh redemption token.
    pub fn send_invitation(
        &self,
        context: &AccessContext,
        draft: InvitationDraft,
    ) -> Result<Tenanted<Membership>, ServiceError> {
        self.require(context, Capability::InvitationSend)?;
        FieldChecks::new()
            .required("email", &draft.email)
            .email("email", Some(draft.email.as_str()))
            .finish()?;

        let organization_id = self.home_organization(context)?;
        let invitation = Membership::invite(
            draft.email,
            draft.role,
            Some(context.identity().email.clone()),
            draft.message,
            Utc::now(),
        );
        let row = self.store.memberships().insert(organization_id, invitation)?;
        info!(
            organization = %organization_id,
            invitee = %row.record.email,
            role = %row.record.role,
            "sent invitation"
        );
        Ok(row)
    }

    pub fn invitations(
        &self,
        context: &AccessContext,
    ) -> Result<Vec<Tenanted<Membership>>, ServiceError> {
        self.require(context, Capability::InvitationView)?;
        self.list_visible(self.store.memberships(), context)
    }

    pub fn cancel_invitation(
        &self,
        context: &AccessContext,
        id: RecordId,
    ) -> Result<Tenanted<Membership>, ServiceError> {
        self.require(context, Capability::InvitationSend)?;
        let mut row: Tenanted<Membership> =
            self.visible(self.store.memberships(), context, id, "invitation")?;
        row.record.cancel(Utc::now())?;
        self.replace(self.store.memberships(), context, id, row.record, "invitation")
    }

    pub fn delete_invitation(&self, context: &AccessContext, id: RecordId) -> Result<(), ServiceError> {
        self.require(context, Capability::InvitationDelete)?;
        self.remove::<Membership, _>(self.store.memberships(), context, id, "invitation")
    }

    /// Redeems an invitation token. Only the invited address may redeem it; any
    /// other caller sees the token as unknown.
    pub fn accept_invitation(
        &self,
        identity: &Identity,
        token: Uuid,
    ) -> Result<Tenanted<Membership>, ServiceError> {
        let mut row = self
            .store
            .memberships()
            .find_by_token(token)?
            .ok_or(ServiceError::NotFound("invitation"))?;

        if !row.record.is_for(&identity.email) {
            warn!(%token, caller = %identity.email, "invitation redeemed by another address");
            return Err(ServiceError::NotFound("invitation"));
        }

        if let Err(error) = row.record.accept(Utc::now()) {
            warn!(%token, status = %error.0, "invitation is no longer pending");
            return Err(error.into());
        }

        let scope = TenantScope::Organization(row.organization_id);
        let accepted = self
            .store
            .memberships()
            .update(&scope, row.id, row.record)
            .map_err(missing("invitation"))?;
        info!(
            organization = %accepted.organization_id,
            member = %accepted.record.email,
            role = %accepted.record.role,
            "accepted invitation"
        );
        Ok(accepted)
    }
}
