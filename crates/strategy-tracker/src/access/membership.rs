use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::capability::Role;
use crate::domain::{OrganizationId, Tenanted};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Pending,
    Accepted,
    Cancelled,
}

impl MembershipStatus {
    pub const fn key(self) -> &'static str {
        match self {
            MembershipStatus::Pending => "pending",
            MembershipStatus::Accepted => "accepted",
            MembershipStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Only pending invitations may change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invitation is {0} and can no longer change")]
pub struct MembershipTransitionError(pub MembershipStatus);

/// Invitation of an e-mail address into an organization under a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub email: String,
    pub role: Role,
    pub status: MembershipStatus,
    pub invited_by: Option<String>,
    pub token: Uuid,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl Membership {
    pub fn invite(
        email: String,
        role: Role,
        invited_by: Option<String>,
        message: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            email,
            role,
            status: MembershipStatus::Pending,
            invited_by,
            token: Uuid::new_v4(),
            message,
            created_at,
            responded_at: None,
        }
    }

    pub fn accept(&mut self, at: DateTime<Utc>) -> Result<(), MembershipTransitionError> {
        self.transition(MembershipStatus::Accepted, at)
    }

    pub fn cancel(&mut self, at: DateTime<Utc>) -> Result<(), MembershipTransitionError> {
        self.transition(MembershipStatus::Cancelled, at)
    }

    fn transition(
        &mut self,
        next: MembershipStatus,
        at: DateTime<Utc>,
    ) -> Result<(), MembershipTransitionError> {
        if self.status != MembershipStatus::Pending {
            return Err(MembershipTransitionError(self.status));
        }
        self.status = next;
        self.responded_at = Some(at);
        Ok(())
    }

    pub fn is_for(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email)
    }
}

/// Most recent accepted membership for `email` in `organization_id`, ordered by
/// response time, then creation time, then id.
pub fn latest_accepted<'a, I>(
    memberships: I,
    email: &str,
    organization_id: OrganizationId,
) -> Option<&'a Tenanted<Membership>>
where
    I: IntoIterator<Item = &'a Tenanted<Membership>>,
{
    memberships
        .into_iter()
        .filter(|row| {
            row.organization_id == organization_id
                && row.record.status == MembershipStatus::Accepted
                && row.record.is_for(email)
        })
        .max_by_key(|row| (row.record.responded_at, row.record.created_at, row.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordId;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn invitation(role: Role) -> Membership {
        Membership::invite(
            "ana@example.org".to_string(),
            role,
            Some("owner@example.org".to_string()),
            None,
            at(8),
        )
    }

    #[test]
    fn pending_invitation_can_be_accepted_once() {
        let mut membership = invitation(Role::Viewer);
        membership.accept(at(9)).expect("pending accepts");
        assert_eq!(membership.status, MembershipStatus::Accepted);
        assert_eq!(membership.responded_at, Some(at(9)));

        assert_eq!(
            membership.accept(at(10)),
            Err(MembershipTransitionError(MembershipStatus::Accepted))
        );
        assert_eq!(
            membership.cancel(at(10)),
            Err(MembershipTransitionError(MembershipStatus::Accepted))
        );
        assert_eq!(membership.responded_at, Some(at(9)));
    }

    #[test]
    fn cancelled_invitation_is_terminal() {
        let mut membership = invitation(Role::Editor);
        membership.cancel(at(9)).expect("pending cancels");
        assert_eq!(
            membership.accept(at(10)),
            Err(MembershipTransitionError(MembershipStatus::Cancelled))
        );
    }

    #[test]
    fn tokens_are_unique_per_invitation() {
        assert_ne!(invitation(Role::Viewer).token, invitation(Role::Viewer).token);
    }

    #[test]
    fn latest_accepted_prefers_most_recent_response() {
        let org = OrganizationId(7);
        let mut early = invitation(Role::Viewer);
        early.accept(at(9)).expect("accept");
        let mut late = invitation(Role::Editor);
        late.accept(at(11)).expect("accept");
        let pending = invitation(Role::Editor);
        let mut elsewhere = invitation(Role::Editor);
        elsewhere.accept(at(12)).expect("accept");

        let rows = vec![
            Tenanted::new(RecordId(1), org, early),
            Tenanted::new(RecordId(2), org, late),
            Tenanted::new(RecordId(3), org, pending),
            Tenanted::new(RecordId(4), OrganizationId(8), elsewhere),
        ];

        let found = latest_accepted(&rows, "ANA@example.org", org).expect("accepted membership");
        assert_eq!(found.id, RecordId(2));
        assert!(latest_accepted(&rows, "bob@example.org", org).is_none());
    }
}
