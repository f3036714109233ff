// tasktracker-service/src/models/invitations.rs
use crate::models::{MembershipRole, UserSummary, WorkspaceSummary};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// Invitations expire after 7 days
pub const INVITATION_TTL_DAYS: i64 = 7;

// Derived from the row, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Expired,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: String,
    pub workspace_id: String,
    pub email: String,
    pub role: MembershipRole,
    pub token: String,
    pub invited_by_id: String,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invitation {
    pub fn new(
        workspace_id: String,
        email: String,
        role: MembershipRole,
        token: String,
        invited_by_id: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            workspace_id,
            email,
            role,
            token,
            invited_by_id,
            expires_at: now + Duration::days(INVITATION_TTL_DAYS),
            accepted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted_at.is_some()
    }

    // Pending = not accepted and not past expiry
    pub fn is_active(&self) -> bool {
        !self.is_accepted() && !self.is_expired()
    }

    pub fn status(&self) -> InvitationStatus {
        if self.is_accepted() {
            InvitationStatus::Accepted
        } else if self.is_expired() {
            InvitationStatus::Expired
        } else {
            InvitationStatus::Pending
        }
    }

    // Re-invite on the same (workspace, email) pair
    pub fn reissue(&mut self, role: MembershipRole, token: String, invited_by_id: String) {
        let now = Utc::now();
        self.role = role;
        self.token = token;
        self.invited_by_id = invited_by_id;
        self.expires_at = now + Duration::days(INVITATION_TTL_DAYS);
        self.accepted_at = None;
        self.updated_at = now;
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InvitationView {
    #[serde(flatten)]
    pub invitation: Invitation,
    pub status: InvitationStatus,
    pub workspace: Option<WorkspaceSummary>,
    pub inviter: Option<UserSummary>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateInvitationRequest {
    pub email: String,
    pub role: MembershipRole,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInvitationResponse {
    pub success: bool,
    pub workspace_id: String,
}
