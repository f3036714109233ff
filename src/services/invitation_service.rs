// tasktracker-service/src/services/invitation_service.rs
//
// PENDING -> ACCEPTED (terminal), EXPIRED is derived from expiresAt, and a
// cancelled invitation is deleted outright.
use crate::models::{
    AcceptInvitationResponse, ActivityAction, CreateInvitationRequest, EntityType, Invitation, InvitationView,
    MembershipRole, ServiceError,
};
use crate::services::activity_service::ActivityService;
use crate::services::email_service::{invitation_email, Mailer};
use crate::services::guard::WorkspaceGuard;
use crate::utils::tokens::generate_invitation_token;
use crate::utils::validation::normalize_email;
use crate::utils::Store;
use log::{error, info, warn};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct InvitationService {
    store: Store,
    guard: WorkspaceGuard,
    activities: ActivityService,
    mailer: Arc<dyn Mailer>,
    frontend_url: String,
}

impl InvitationService {
    pub fn new(
        store: Store,
        guard: WorkspaceGuard,
        activities: ActivityService,
        mailer: Arc<dyn Mailer>,
        frontend_url: &str,
    ) -> Self {
        Self {
            store,
            guard,
            activities,
            mailer,
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn invitation_link(&self, token: &str) -> String {
        format!("{}/register?token={}", self.frontend_url, token)
    }

    pub async fn create(
        &self,
        user_id: &str,
        workspace_id: &str,
        request: CreateInvitationRequest,
    ) -> Result<InvitationView, ServiceError> {
        let access = self.guard.check(user_id, workspace_id, MembershipRole::Admin)?;
        if request.role == MembershipRole::Owner && access.role() != MembershipRole::Owner {
            return Err(ServiceError::Forbidden(
                "Only owners can invite new owners".to_string(),
            ));
        }

        let email = normalize_email(&request.email)?;
        if let Some(existing_user) = self.store.find_user_by_email(&email)? {
            if self.store.find_membership(&existing_user.id, workspace_id)?.is_some() {
                return Err(ServiceError::Conflict(format!(
                    "{} is already a member of this workspace",
                    email
                )));
            }
        }
        if let Some(existing) = self.store.find_invitation(workspace_id, &email)? {
            if existing.is_active() {
                return Err(ServiceError::Conflict(format!(
                    "A pending invitation for {} already exists",
                    email
                )));
            }
        }

        let token = generate_invitation_token();
        let invitation = self
            .store
            .upsert_invitation(workspace_id, &email, request.role, token, user_id)?;

        self.activities.record(
            workspace_id,
            ActivityAction::Created,
            EntityType::Invitation,
            &invitation.id,
            user_id,
            json!({ "email": invitation.email, "role": invitation.role }),
        )?;

        let view = self.view(invitation)?;
        let workspace_name = view.workspace.as_ref().map(|w| w.name.as_str()).unwrap_or("a workspace");
        let inviter_name = view
            .inviter
            .as_ref()
            .map(|u| u.name.clone().unwrap_or_else(|| u.email.clone()))
            .unwrap_or_else(|| "A teammate".to_string());
        let link = self.invitation_link(&view.invitation.token);
        let (subject, html) = invitation_email(workspace_name, &inviter_name, &link);

        if let Err(e) = self.mailer.send(&view.invitation.email, &subject, &html).await {
            error!("❌ Failed to send invitation email to {}: {}", view.invitation.email, e);
            return Err(e);
        }

        info!("📧 Invitation {} sent to {}", view.invitation.id, view.invitation.email);
        Ok(view)
    }

    pub fn get_by_token(&self, token: &str) -> Result<InvitationView, ServiceError> {
        let invitation = self.pending_by_token(token)?;
        self.view(invitation)
    }

    // Resolves a token to an invitation that can still be accepted
    pub fn pending_by_token(&self, token: &str) -> Result<Invitation, ServiceError> {
        let invitation = self
            .store
            .find_invitation_by_token(token)?
            .ok_or_else(|| ServiceError::NotFound("Invitation not found".to_string()))?;

        if invitation.is_accepted() {
            return Err(ServiceError::BadRequest("Invitation already accepted".to_string()));
        }
        if invitation.is_expired() {
            return Err(ServiceError::BadRequest("Invitation has expired".to_string()));
        }
        Ok(invitation)
    }

    // Pending invitation addressed to exactly this email
    pub fn pending_for_email(&self, token: &str, email: &str) -> Result<Invitation, ServiceError> {
        let invitation = self.pending_by_token(token)?;
        if invitation.email != email.trim().to_lowercase() {
            warn!("❌ Invitation {} is not addressed to {}", invitation.id, email);
            return Err(ServiceError::Forbidden(
                "This invitation was sent to a different email address".to_string(),
            ));
        }
        Ok(invitation)
    }

    pub fn accept(&self, user_id: &str, token: &str) -> Result<AcceptInvitationResponse, ServiceError> {
        let user = self
            .store
            .find_user_by_id(user_id)?
            .ok_or_else(|| ServiceError::Unauthorized("User not found".to_string()))?;
        let invitation = self.pending_for_email(token, &user.email)?;

        if self.store.find_membership(user_id, &invitation.workspace_id)?.is_some() {
            return Err(ServiceError::Conflict(
                "You are already a member of this workspace".to_string(),
            ));
        }

        let (invitation, membership) = self.store.accept_invitation(&invitation.id, user_id)?;
        self.activities.record(
            &invitation.workspace_id,
            ActivityAction::Accepted,
            EntityType::Invitation,
            &invitation.id,
            user_id,
            json!({ "membershipId": membership.id, "role": membership.role }),
        )?;

        info!("✅ {} joined workspace {} as {}", user.email, invitation.workspace_id, membership.role);
        Ok(AcceptInvitationResponse {
            success: true,
            workspace_id: invitation.workspace_id,
        })
    }

    pub fn list(&self, user_id: &str, workspace_id: &str) -> Result<Vec<InvitationView>, ServiceError> {
        self.guard.member(user_id, workspace_id)?;
        self.store
            .invitations_for_workspace(workspace_id)?
            .into_iter()
            .map(|invitation| self.view(invitation))
            .collect()
    }

    // Pending invitations addressed to the caller
    pub fn mine(&self, user_id: &str) -> Result<Vec<InvitationView>, ServiceError> {
        let user = self
            .store
            .find_user_by_id(user_id)?
            .ok_or_else(|| ServiceError::Unauthorized("User not found".to_string()))?;

        self.store
            .invitations_for_email(&user.email)?
            .into_iter()
            .filter(Invitation::is_active)
            .map(|invitation| self.view(invitation))
            .collect()
    }

    pub fn cancel(&self, user_id: &str, invitation_id: &str) -> Result<InvitationView, ServiceError> {
        let invitation = self
            .store
            .find_invitation_by_id(invitation_id)?
            .ok_or_else(|| ServiceError::NotFound("Invitation not found".to_string()))?;
        self.guard.check(user_id, &invitation.workspace_id, MembershipRole::Admin)?;

        if !self.store.delete_invitation(&invitation.id)? {
            return Err(ServiceError::NotFound("Invitation not found".to_string()));
        }
        self.activities.record(
            &invitation.workspace_id,
            ActivityAction::Cancelled,
            EntityType::Invitation,
            &invitation.id,
            user_id,
            json!({ "email": invitation.email }),
        )?;

        info!("🗑️ Invitation {} cancelled", invitation.id);
        self.view(invitation)
    }

    fn view(&self, invitation: Invitation) -> Result<InvitationView, ServiceError> {
        let workspace = self
            .store
            .find_workspace_by_id(&invitation.workspace_id)?
            .map(|w| w.summary());
        let inviter = self
            .store
            .find_user_by_id(&invitation.invited_by_id)?
            .map(|u| u.summary());

        Ok(InvitationView {
            status: invitation.status(),
            invitation,
            workspace,
            inviter,
        })
    }
}
