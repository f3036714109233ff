// tasktracker-service/src/services/membership_service.rs
//
// Role policy:
//   read workspace / resources   any member
//   add member                   OWNER or ADMIN (granting OWNER needs OWNER)
//   change member role           OWNER
//   view member roster           OWNER or ADMIN
use crate::models::{
    ActivityAction, EntityType, MemberView, Membership, MembershipRole, ServiceError,
};
use crate::services::activity_service::ActivityService;
use crate::services::guard::WorkspaceGuard;
use crate::utils::validation::normalize_email;
use crate::utils::Store;
use log::{error, info};
use serde_json::json;

#[derive(Clone)]
pub struct MembershipService {
    store: Store,
    guard: WorkspaceGuard,
    activities: ActivityService,
}

impl MembershipService {
    pub fn new(store: Store, guard: WorkspaceGuard, activities: ActivityService) -> Self {
        Self {
            store,
            guard,
            activities,
        }
    }

    pub fn get_membership(&self, user_id: &str, workspace_id: &str) -> Result<Option<Membership>, ServiceError> {
        self.store.find_membership(user_id, workspace_id)
    }

    // Conflict when the (user, workspace) pair already exists
    pub fn create_membership(
        &self,
        user_id: &str,
        workspace_id: &str,
        role: MembershipRole,
    ) -> Result<Membership, ServiceError> {
        if self.store.find_membership(user_id, workspace_id)?.is_some() {
            return Err(ServiceError::Conflict(
                "User is already a member of this workspace".to_string(),
            ));
        }
        self.store
            .insert_membership(Membership::new(user_id.to_string(), workspace_id.to_string(), role))
    }

    pub fn add_member(
        &self,
        acting_user_id: &str,
        workspace_id: &str,
        email: &str,
        role: MembershipRole,
    ) -> Result<MemberView, ServiceError> {
        let access = self.guard.check(acting_user_id, workspace_id, MembershipRole::Admin)?;
        if role == MembershipRole::Owner && access.role() != MembershipRole::Owner {
            return Err(ServiceError::Forbidden(
                "Only owners can grant the OWNER role".to_string(),
            ));
        }

        let email = normalize_email(email)?;
        let user = match self.store.find_user_by_email(&email)? {
            Some(user) => user,
            None => {
                error!("❌ No user registered with email: {}", email);
                return Err(ServiceError::NotFound(format!("No user with email {}", email)));
            }
        };

        let membership = self.create_membership(&user.id, workspace_id, role)?;
        self.activities.record(
            workspace_id,
            ActivityAction::Added,
            EntityType::Membership,
            &membership.id,
            acting_user_id,
            json!({ "userId": user.id, "email": user.email, "role": role }),
        )?;

        info!("✅ Added {} to workspace {} as {}", user.email, workspace_id, role);
        Ok(MemberView {
            membership,
            user: Some(user.summary()),
        })
    }

    pub fn update_role(
        &self,
        acting_user_id: &str,
        workspace_id: &str,
        membership_id: &str,
        role: MembershipRole,
    ) -> Result<Membership, ServiceError> {
        self.guard.check(acting_user_id, workspace_id, MembershipRole::Owner)?;

        let target = self
            .store
            .find_membership_by_id(membership_id)?
            .filter(|m| m.workspace_id == workspace_id)
            .ok_or_else(|| ServiceError::NotFound("Membership not found".to_string()))?;

        let previous = target.role;
        let membership = self.store.set_membership_role(&target.id, role)?;
        self.activities.record(
            workspace_id,
            ActivityAction::RoleUpdated,
            EntityType::Membership,
            &membership.id,
            acting_user_id,
            json!({ "userId": membership.user_id, "from": previous, "to": role }),
        )?;

        info!("✅ Membership {} role changed {} -> {}", membership.id, previous, role);
        Ok(membership)
    }

    pub fn list_members(&self, acting_user_id: &str, workspace_id: &str) -> Result<Vec<MemberView>, ServiceError> {
        self.guard.check(acting_user_id, workspace_id, MembershipRole::Admin)?;

        self.store
            .memberships_for_workspace(workspace_id)?
            .into_iter()
            .map(|membership| {
                let user = self.store.find_user_by_id(&membership.user_id)?.map(|u| u.summary());
                Ok(MemberView { membership, user })
            })
            .collect()
    }
}
