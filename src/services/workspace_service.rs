// tasktracker-service/src/services/workspace_service.rs
use crate::models::{
    ActivityAction, CreateWorkspaceRequest, EntityType, ServiceError, Workspace, WorkspaceView,
};
use crate::services::activity_service::ActivityService;
use crate::services::guard::WorkspaceGuard;
use crate::utils::validation::{require_non_empty, slugify};
use crate::utils::Store;
use log::info;
use serde_json::json;

#[derive(Clone)]
pub struct WorkspaceService {
    store: Store,
    guard: WorkspaceGuard,
    activities: ActivityService,
}

impl WorkspaceService {
    pub fn new(store: Store, guard: WorkspaceGuard, activities: ActivityService) -> Self {
        Self {
            store,
            guard,
            activities,
        }
    }

    pub fn list_for_user(&self, user_id: &str) -> Result<Vec<WorkspaceView>, ServiceError> {
        self.store
            .workspaces_for_user(user_id)?
            .into_iter()
            .map(|(workspace, membership)| {
                let counts = self.store.workspace_counts(&workspace.id)?;
                Ok(WorkspaceView {
                    workspace,
                    role: membership.role,
                    counts,
                })
            })
            .collect()
    }

    pub fn get(&self, user_id: &str, workspace_id: &str) -> Result<WorkspaceView, ServiceError> {
        let access = self.guard.member(user_id, workspace_id)?;
        let workspace = self
            .store
            .find_workspace_by_id(workspace_id)?
            .ok_or_else(|| ServiceError::NotFound("Workspace not found".to_string()))?;

        Ok(WorkspaceView {
            counts: self.store.workspace_counts(&workspace.id)?,
            workspace,
            role: access.role(),
        })
    }

    // The creator becomes the first OWNER
    pub fn create(&self, user_id: &str, request: CreateWorkspaceRequest) -> Result<WorkspaceView, ServiceError> {
        let name = require_non_empty(&request.name, "name")?;
        let slug = self.unique_slug(&name)?;
        let description = request.description.filter(|d| !d.trim().is_empty());

        let (workspace, membership) = self
            .store
            .insert_workspace_with_owner(Workspace::new(name, slug, description, user_id.to_string()), user_id)?;

        self.activities.record(
            &workspace.id,
            ActivityAction::Created,
            EntityType::Workspace,
            &workspace.id,
            user_id,
            json!({ "name": workspace.name, "slug": workspace.slug }),
        )?;

        info!("✅ Workspace {} created by {}", workspace.slug, user_id);
        Ok(WorkspaceView {
            counts: self.store.workspace_counts(&workspace.id)?,
            workspace,
            role: membership.role,
        })
    }

    // acme, acme-2, acme-3, ...
    fn unique_slug(&self, name: &str) -> Result<String, ServiceError> {
        let base = match slugify(name) {
            slug if slug.is_empty() => "workspace".to_string(),
            slug => slug,
        };

        if !self.store.slug_exists(&base)? {
            return Ok(base);
        }
        let mut suffix = 2;
        loop {
            let candidate = format!("{}-{}", base, suffix);
            if !self.store.slug_exists(&candidate)? {
                return Ok(candidate);
            }
            suffix += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MembershipRole;

    fn service() -> WorkspaceService {
        let store = Store::in_memory();
        let guard = WorkspaceGuard::new(store.clone());
        let activities = ActivityService::new(store.clone(), guard.clone());
        WorkspaceService::new(store, guard, activities)
    }

    fn request(name: &str) -> CreateWorkspaceRequest {
        CreateWorkspaceRequest {
            name: name.to_string(),
            description: None,
        }
    }

    #[test]
    fn creator_is_owner_and_slugs_are_deduplicated() {
        let service = service();
        let first = service.create("u-1", request("Acme Corp")).unwrap();
        let second = service.create("u-2", request("acme corp")).unwrap();
        let third = service.create("u-3", request("ACME  CORP!")).unwrap();

        assert_eq!(first.role, MembershipRole::Owner);
        assert_eq!(first.workspace.slug, "acme-corp");
        assert_eq!(second.workspace.slug, "acme-corp-2");
        assert_eq!(third.workspace.slug, "acme-corp-3");
        assert_eq!(first.counts.members, 1);
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(matches!(service().create("u-1", request("   ")), Err(ServiceError::BadRequest(_))));
    }

    #[test]
    fn only_members_see_a_workspace() {
        let service = service();
        let ws = service.create("u-1", request("Acme")).unwrap();

        assert_eq!(service.list_for_user("u-1").unwrap().len(), 1);
        assert!(service.list_for_user("u-2").unwrap().is_empty());
        assert!(service.get("u-1", &ws.workspace.id).is_ok());
        assert!(matches!(
            service.get("u-2", &ws.workspace.id),
            Err(ServiceError::Forbidden(_))
        ));
    }
}
