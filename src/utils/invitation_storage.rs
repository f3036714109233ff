// tasktracker-service/src/utils/invitation_storage.rs
use crate::models::{Invitation, Membership, MembershipRole, ServiceError};
use crate::utils::storage::{unique_violation, Store};
use crate::utils::workspace_storage::insert_membership_row;
use chrono::Utc;
use log::info;

impl Store {
    // Insert, or re-issue the row already keyed on (workspace_id, email)
    pub fn upsert_invitation(
        &self,
        workspace_id: &str,
        email: &str,
        role: MembershipRole,
        token: String,
        invited_by_id: &str,
    ) -> Result<Invitation, ServiceError> {
        self.write(|tables| {
            if tables.invitations.values().any(|i| i.token == token) {
                return Err(unique_violation("invitations.token"));
            }

            let existing = tables
                .invitations
                .values_mut()
                .find(|i| i.workspace_id == workspace_id && i.email == email);

            let invitation = match existing {
                Some(row) => {
                    row.reissue(role, token, invited_by_id.to_string());
                    info!("✅ Re-issued invitation: {}", row.id);
                    row.clone()
                }
                None => {
                    let row = Invitation::new(
                        workspace_id.to_string(),
                        email.to_string(),
                        role,
                        token,
                        invited_by_id.to_string(),
                    );
                    tables.invitations.insert(row.id.clone(), row.clone());
                    info!("✅ Saved invitation: {}", row.id);
                    row
                }
            };
            Ok(invitation)
        })
    }

    pub fn find_invitation_by_id(&self, id: &str) -> Result<Option<Invitation>, ServiceError> {
        self.read(|tables| tables.invitations.get(id).cloned())
    }

    pub fn find_invitation_by_token(&self, token: &str) -> Result<Option<Invitation>, ServiceError> {
        self.read(|tables| tables.invitations.values().find(|i| i.token == token).cloned())
    }

    pub fn find_invitation(&self, workspace_id: &str, email: &str) -> Result<Option<Invitation>, ServiceError> {
        self.read(|tables| {
            tables
                .invitations
                .values()
                .find(|i| i.workspace_id == workspace_id && i.email == email)
                .cloned()
        })
    }

    // Newest first
    pub fn invitations_for_workspace(&self, workspace_id: &str) -> Result<Vec<Invitation>, ServiceError> {
        self.read(|tables| {
            let mut rows: Vec<Invitation> = tables
                .invitations
                .values()
                .filter(|i| i.workspace_id == workspace_id)
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            rows
        })
    }

    pub fn invitations_for_email(&self, email: &str) -> Result<Vec<Invitation>, ServiceError> {
        self.read(|tables| {
            let mut rows: Vec<Invitation> = tables
                .invitations
                .values()
                .filter(|i| i.email == email)
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            rows
        })
    }

    // Membership creation and the acceptance marker land in one write
    pub fn accept_invitation(&self, invitation_id: &str, user_id: &str) -> Result<(Invitation, Membership), ServiceError> {
        self.write(|tables| {
            let invitation = tables
                .invitations
                .get(invitation_id)
                .cloned()
                .ok_or_else(|| ServiceError::NotFound("Invitation not found".to_string()))?;

            if invitation.is_accepted() {
                return Err(ServiceError::BadRequest("Invitation already accepted".to_string()));
            }

            let membership = insert_membership_row(
                tables,
                Membership::new(user_id.to_string(), invitation.workspace_id.clone(), invitation.role),
            )?;

            let row = tables
                .invitations
                .get_mut(invitation_id)
                .ok_or_else(|| ServiceError::NotFound("Invitation not found".to_string()))?;
            let now = Utc::now();
            row.accepted_at = Some(now);
            row.updated_at = now;

            info!("✅ Invitation {} accepted by user {}", invitation_id, user_id);
            Ok((row.clone(), membership))
        })
    }

    pub fn delete_invitation(&self, invitation_id: &str) -> Result<bool, ServiceError> {
        self.write(|tables| {
            let deleted = tables.invitations.remove(invitation_id).is_some();
            if deleted {
                info!("✅ Deleted invitation: {}", invitation_id);
            }
            Ok(deleted)
        })
    }
}
