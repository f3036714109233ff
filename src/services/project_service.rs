// tasktracker-service/src/services/project_service.rs
use crate::models::{
    apply_list, normalize_project_key, ActivityAction, CreateProjectRequest, EntityType, ListParams, MembershipRole,
    Page, Project, ServiceError, UpdateProjectRequest, PROJECT_FILTER_FIELDS,
};
use crate::services::activity_service::ActivityService;
use crate::services::guard::{WorkspaceGuard, WorkspaceRef};
use crate::utils::validation::require_non_empty;
use crate::utils::Store;
use chrono::Utc;
use log::{debug, info};
use serde_json::json;

#[derive(Clone)]
pub struct ProjectService {
    store: Store,
    guard: WorkspaceGuard,
    activities: ActivityService,
}

impl ProjectService {
    pub fn new(store: Store, guard: WorkspaceGuard, activities: ActivityService) -> Self {
        Self {
            store,
            guard,
            activities,
        }
    }

    pub fn list(&self, user_id: &str, params: &ListParams) -> Result<Page<Project>, ServiceError> {
        let workspace_id = params
            .workspace_id()
            .ok_or_else(|| ServiceError::BadRequest("filter.workspaceId is required".to_string()))?;
        self.guard.member(user_id, workspace_id)?;

        let rows = self.store.active_projects(workspace_id)?;
        let page = apply_list(rows, params, PROJECT_FILTER_FIELDS);
        debug!("Listing {} of {} projects in {}", page.items.len(), page.total, workspace_id);
        Ok(page)
    }

    // Fetch by id, then guard against the row's own workspace
    pub fn get_one(&self, user_id: &str, project_id: &str) -> Result<Project, ServiceError> {
        let project = self
            .store
            .find_project_by_id(project_id)?
            .ok_or_else(|| ServiceError::NotFound("Project not found".to_string()))?;
        self.guard.member(user_id, &project.workspace_id)?;
        Ok(project)
    }

    pub fn create(&self, user_id: &str, request: CreateProjectRequest) -> Result<Project, ServiceError> {
        let access = self.guard.check_ref(
            user_id,
            WorkspaceRef {
                body: request.workspace_id.as_deref(),
                ..Default::default()
            },
            MembershipRole::Viewer,
        )?;

        let name = require_non_empty(&request.name, "name")?;
        let key = normalize_project_key(&require_non_empty(&request.key, "key")?);
        self.ensure_key_free(&access.workspace_id, &key)?;

        let description = request.description.filter(|d| !d.trim().is_empty());
        let project = self
            .store
            .insert_project(Project::new(access.workspace_id.clone(), name, key, description))?;

        self.activities.record(
            &project.workspace_id,
            ActivityAction::Created,
            EntityType::Project,
            &project.id,
            user_id,
            json!({ "name": project.name, "key": project.key }),
        )?;

        info!("✅ Project {} created in workspace {}", project.key, project.workspace_id);
        Ok(project)
    }

    pub fn update(&self, user_id: &str, project_id: &str, patch: UpdateProjectRequest) -> Result<Project, ServiceError> {
        let mut project = self.get_one(user_id, project_id)?;
        let mut changed = Vec::new();

        if let Some(name) = patch.name {
            project.name = require_non_empty(&name, "name")?;
            changed.push("name");
        }
        if let Some(key) = patch.key {
            let key = normalize_project_key(&require_non_empty(&key, "key")?);
            if key != project.key {
                self.ensure_key_free(&project.workspace_id, &key)?;
                project.key = key;
                changed.push("key");
            }
        }
        if let Some(description) = patch.description {
            project.description = description;
            changed.push("description");
        }
        project.updated_at = Utc::now();

        let project = self.store.update_project(project)?;
        self.activities.record(
            &project.workspace_id,
            ActivityAction::Updated,
            EntityType::Project,
            &project.id,
            user_id,
            json!({ "changes": changed }),
        )?;

        info!("✅ Project {} updated: {:?}", project.id, changed);
        Ok(project)
    }

    // Soft delete; archiving an archived project changes nothing
    pub fn remove(&self, user_id: &str, project_id: &str) -> Result<Project, ServiceError> {
        let mut project = self.get_one(user_id, project_id)?;
        if project.is_archived() {
            debug!("Project {} already archived", project.id);
            return Ok(project);
        }

        let now = Utc::now();
        project.archived_at = Some(now);
        project.updated_at = now;
        let project = self.store.update_project(project)?;

        self.activities.record(
            &project.workspace_id,
            ActivityAction::Archived,
            EntityType::Project,
            &project.id,
            user_id,
            json!({ "key": project.key }),
        )?;

        info!("🗑️ Project {} archived", project.id);
        Ok(project)
    }

    // Friendly message; the store's unique index is the real guarantee
    fn ensure_key_free(&self, workspace_id: &str, key: &str) -> Result<(), ServiceError> {
        if self.store.find_project_by_key(workspace_id, key)?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Project key {} already exists in this workspace",
                key
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ListQuery, Workspace};

    struct Fixture {
        service: ProjectService,
        store: Store,
        ws_a: String,
        ws_b: String,
    }

    fn fixture() -> Fixture {
        let store = Store::in_memory();
        let guard = WorkspaceGuard::new(store.clone());
        let activities = ActivityService::new(store.clone(), guard.clone());
        let (a, _) = store
            .insert_workspace_with_owner(
                Workspace::new("A".to_string(), "a".to_string(), None, "alice".to_string()),
                "alice",
            )
            .unwrap();
        let (b, _) = store
            .insert_workspace_with_owner(
                Workspace::new("B".to_string(), "b".to_string(), None, "bruno".to_string()),
                "bruno",
            )
            .unwrap();
        Fixture {
            service: ProjectService::new(store.clone(), guard, activities),
            store,
            ws_a: a.id,
            ws_b: b.id,
        }
    }

    fn request(workspace_id: &str, key: &str) -> CreateProjectRequest {
        CreateProjectRequest {
            workspace_id: Some(workspace_id.to_string()),
            name: format!("Project {}", key),
            key: key.to_string(),
            description: None,
        }
    }

    fn params(workspace_id: &str) -> ListParams {
        ListParams::parse(&ListQuery::default()).unwrap().with_workspace(workspace_id)
    }

    #[test]
    fn keys_are_unique_within_a_workspace_only() {
        let f = fixture();
        let created = f.service.create("alice", request(&f.ws_a, " acm ")).unwrap();
        assert_eq!(created.key, "ACM");

        assert!(f.service.create("bruno", request(&f.ws_b, "ACM")).is_ok());
        assert!(matches!(
            f.service.create("alice", request(&f.ws_a, "acm")),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn cross_workspace_access_is_forbidden() {
        let f = fixture();
        let project = f.service.create("bruno", request(&f.ws_b, "OPS")).unwrap();

        assert!(matches!(f.service.get_one("alice", &project.id), Err(ServiceError::Forbidden(_))));
        assert!(matches!(
            f.service.remove("alice", &project.id),
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            f.service.create("alice", request(&f.ws_b, "NEW")),
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(f.service.list("alice", &params(&f.ws_b)), Err(ServiceError::Forbidden(_))));
    }

    #[test]
    fn missing_workspace_is_bad_request() {
        let f = fixture();
        let mut req = request(&f.ws_a, "ACM");
        req.workspace_id = None;
        assert!(matches!(f.service.create("alice", req), Err(ServiceError::BadRequest(_))));

        let params = ListParams::parse(&ListQuery::default()).unwrap();
        assert!(matches!(f.service.list("alice", &params), Err(ServiceError::BadRequest(_))));
    }

    #[test]
    fn archiving_twice_is_a_no_op() {
        let f = fixture();
        let project = f.service.create("alice", request(&f.ws_a, "ACM")).unwrap();

        let first = f.service.remove("alice", &project.id).unwrap();
        let second = f.service.remove("alice", &project.id).unwrap();
        assert!(first.archived_at.is_some());
        assert_eq!(first.archived_at, second.archived_at);

        let page = f.service.list("alice", &params(&f.ws_a)).unwrap();
        assert_eq!(page.total, 0);

        let archived = f
            .store
            .activities_for_workspace(&f.ws_a)
            .unwrap()
            .into_iter()
            .filter(|a| a.kind == "ARCHIVED_PROJECT")
            .count();
        assert_eq!(archived, 1);
    }

    #[test]
    fn renaming_a_key_rechecks_uniqueness() {
        let f = fixture();
        f.service.create("alice", request(&f.ws_a, "ACM")).unwrap();
        let ops = f.service.create("alice", request(&f.ws_a, "OPS")).unwrap();

        let patch = UpdateProjectRequest {
            key: Some("acm".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            f.service.update("alice", &ops.id, patch),
            Err(ServiceError::Conflict(_))
        ));

        let patch = UpdateProjectRequest {
            name: Some("Operations".to_string()),
            description: Some(Some("Run things".to_string())),
            ..Default::default()
        };
        let updated = f.service.update("alice", &ops.id, patch).unwrap();
        assert_eq!(updated.name, "Operations");
        assert_eq!(updated.key, "OPS");
        assert_eq!(updated.description.as_deref(), Some("Run things"));
    }
}
