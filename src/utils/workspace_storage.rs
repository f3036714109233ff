// tasktracker-service/src/utils/workspace_storage.rs
//
// Workspaces and the membership join table.
use crate::models::{Membership, MembershipRole, ServiceError, Workspace, WorkspaceCounts};
use crate::utils::storage::{unique_violation, Store, Tables};
use chrono::Utc;
use log::info;

fn membership_exists(tables: &Tables, user_id: &str, workspace_id: &str) -> bool {
    tables
        .memberships
        .values()
        .any(|m| m.user_id == user_id && m.workspace_id == workspace_id)
}

pub(crate) fn insert_membership_row(tables: &mut Tables, membership: Membership) -> Result<Membership, ServiceError> {
    if membership_exists(tables, &membership.user_id, &membership.workspace_id) {
        return Err(unique_violation("memberships(user_id, workspace_id)"));
    }
    tables.memberships.insert(membership.id.clone(), membership.clone());
    Ok(membership)
}

impl Store {
    // Workspace and its first OWNER membership are written together
    pub fn insert_workspace_with_owner(
        &self,
        workspace: Workspace,
        owner_id: &str,
    ) -> Result<(Workspace, Membership), ServiceError> {
        self.write(|tables| {
            if tables.workspaces.values().any(|w| w.slug == workspace.slug) {
                return Err(unique_violation("workspaces.slug"));
            }
            let membership = Membership::new(owner_id.to_string(), workspace.id.clone(), MembershipRole::Owner);
            tables.workspaces.insert(workspace.id.clone(), workspace.clone());
            let membership = insert_membership_row(tables, membership)?;
            info!("✅ Saved workspace: {} ({})", workspace.id, workspace.slug);
            Ok((workspace, membership))
        })
    }

    pub fn find_workspace_by_id(&self, id: &str) -> Result<Option<Workspace>, ServiceError> {
        self.read(|tables| tables.workspaces.get(id).cloned())
    }

    pub fn slug_exists(&self, slug: &str) -> Result<bool, ServiceError> {
        self.read(|tables| tables.workspaces.values().any(|w| w.slug == slug))
    }

    // Workspaces the user belongs to, paired with their membership
    pub fn workspaces_for_user(&self, user_id: &str) -> Result<Vec<(Workspace, Membership)>, ServiceError> {
        self.read(|tables| {
            let mut rows: Vec<(Workspace, Membership)> = tables
                .memberships
                .values()
                .filter(|m| m.user_id == user_id)
                .filter_map(|m| tables.workspaces.get(&m.workspace_id).map(|w| (w.clone(), m.clone())))
                .collect();
            rows.sort_by(|a, b| a.0.created_at.cmp(&b.0.created_at));
            rows
        })
    }

    pub fn workspace_counts(&self, workspace_id: &str) -> Result<WorkspaceCounts, ServiceError> {
        self.read(|tables| WorkspaceCounts {
            members: tables.memberships.values().filter(|m| m.workspace_id == workspace_id).count(),
            projects: tables
                .projects
                .values()
                .filter(|p| p.workspace_id == workspace_id && !p.is_archived())
                .count(),
            tasks: tables
                .tasks
                .values()
                .filter(|t| t.workspace_id == workspace_id && !t.is_archived())
                .count(),
        })
    }

    pub fn find_membership(&self, user_id: &str, workspace_id: &str) -> Result<Option<Membership>, ServiceError> {
        self.read(|tables| {
            tables
                .memberships
                .values()
                .find(|m| m.user_id == user_id && m.workspace_id == workspace_id)
                .cloned()
        })
    }

    pub fn find_membership_by_id(&self, id: &str) -> Result<Option<Membership>, ServiceError> {
        self.read(|tables| tables.memberships.get(id).cloned())
    }

    pub fn insert_membership(&self, membership: Membership) -> Result<Membership, ServiceError> {
        self.write(|tables| {
            let membership = insert_membership_row(tables, membership)?;
            info!(
                "✅ Saved membership: user {} in workspace {} as {}",
                membership.user_id, membership.workspace_id, membership.role
            );
            Ok(membership)
        })
    }

    // Rejects demoting the last OWNER of a workspace
    pub fn set_membership_role(&self, membership_id: &str, role: MembershipRole) -> Result<Membership, ServiceError> {
        self.write(|tables| {
            let current = tables
                .memberships
                .get(membership_id)
                .cloned()
                .ok_or_else(|| ServiceError::NotFound("Membership not found".to_string()))?;

            if current.role == MembershipRole::Owner && role != MembershipRole::Owner {
                let owners = tables
                    .memberships
                    .values()
                    .filter(|m| m.workspace_id == current.workspace_id && m.role == MembershipRole::Owner)
                    .count();
                if owners <= 1 {
                    return Err(ServiceError::BadRequest(
                        "A workspace must keep at least one owner".to_string(),
                    ));
                }
            }

            let membership = tables
                .memberships
                .get_mut(membership_id)
                .ok_or_else(|| ServiceError::NotFound("Membership not found".to_string()))?;
            membership.role = role;
            membership.updated_at = Utc::now();
            Ok(membership.clone())
        })
    }

    pub fn memberships_for_workspace(&self, workspace_id: &str) -> Result<Vec<Membership>, ServiceError> {
        self.read(|tables| {
            let mut rows: Vec<Membership> = tables
                .memberships
                .values()
                .filter(|m| m.workspace_id == workspace_id)
                .cloned()
                .collect();
            rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            rows
        })
    }
}
