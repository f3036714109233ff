// tasktracker-service/src/services/guard.rs
//
// Tenancy boundary. Every read or write against workspace-owned rows goes
// through `WorkspaceGuard::check` first, including fetches by primary key,
// which re-derive the owning workspace from the row itself.
use crate::models::{Membership, MembershipRole, ServiceError};
use crate::utils::Store;
use log::warn;

/// Where a request may carry its workspace id, in order of preference.
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkspaceRef<'a> {
    pub path: Option<&'a str>,
    pub body: Option<&'a str>,
    pub query: Option<&'a str>,
}

impl<'a> WorkspaceRef<'a> {
    pub fn path(id: &'a str) -> Self {
        Self {
            path: Some(id),
            ..Default::default()
        }
    }

    pub fn resolve(&self) -> Result<&'a str, ServiceError> {
        [self.path, self.body, self.query]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|id| !id.is_empty())
            .ok_or_else(|| ServiceError::BadRequest("workspaceId is required".to_string()))
    }
}

// What the guard resolved, handed back so callers skip a second lookup
#[derive(Debug, Clone)]
pub struct WorkspaceAccess {
    pub workspace_id: String,
    pub membership: Membership,
}

impl WorkspaceAccess {
    pub fn role(&self) -> MembershipRole {
        self.membership.role
    }
}

#[derive(Clone)]
pub struct WorkspaceGuard {
    store: Store,
}

impl WorkspaceGuard {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    // Any membership at all; Viewer is the lowest role
    pub fn member(&self, user_id: &str, workspace_id: &str) -> Result<WorkspaceAccess, ServiceError> {
        self.check(user_id, workspace_id, MembershipRole::Viewer)
    }

    pub fn check(
        &self,
        user_id: &str,
        workspace_id: &str,
        min_role: MembershipRole,
    ) -> Result<WorkspaceAccess, ServiceError> {
        let membership = match self.store.find_membership(user_id, workspace_id)? {
            Some(membership) => membership,
            None => {
                warn!("❌ User {} is not a member of workspace {}", user_id, workspace_id);
                return Err(ServiceError::Forbidden(
                    "You are not a member of this workspace".to_string(),
                ));
            }
        };

        if !membership.role.at_least(min_role) {
            warn!(
                "❌ User {} has role {} in workspace {}, {} required",
                user_id, membership.role, workspace_id, min_role
            );
            return Err(ServiceError::Forbidden(format!(
                "This action requires the {} role",
                min_role
            )));
        }

        Ok(WorkspaceAccess {
            workspace_id: workspace_id.to_string(),
            membership,
        })
    }

    pub fn check_ref(
        &self,
        user_id: &str,
        workspace: WorkspaceRef<'_>,
        min_role: MembershipRole,
    ) -> Result<WorkspaceAccess, ServiceError> {
        let workspace_id = workspace.resolve()?;
        self.check(user_id, workspace_id, min_role)
    }
}
