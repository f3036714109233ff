// tasktracker-service/src/services/task_service.rs
use crate::models::{
    apply_list, ActivityAction, CreateTaskRequest, EntityType, ListParams, MembershipRole, Page, ServiceError, Task,
    TaskView, UpdateTaskRequest, TASK_FILTER_FIELDS,
};
use crate::services::activity_service::ActivityService;
use crate::services::guard::{WorkspaceGuard, WorkspaceRef};
use crate::utils::validation::require_non_empty;
use crate::utils::Store;
use chrono::Utc;
use log::{debug, info, warn};
use serde_json::json;

#[derive(Clone)]
pub struct TaskService {
    store: Store,
    guard: WorkspaceGuard,
    activities: ActivityService,
}

impl TaskService {
    pub fn new(store: Store, guard: WorkspaceGuard, activities: ActivityService) -> Self {
        Self {
            store,
            guard,
            activities,
        }
    }

    pub fn list(&self, user_id: &str, params: &ListParams) -> Result<Page<TaskView>, ServiceError> {
        let workspace_id = params
            .workspace_id()
            .ok_or_else(|| ServiceError::BadRequest("filter.workspaceId is required".to_string()))?;
        self.guard.member(user_id, workspace_id)?;

        let rows = self.store.active_tasks(workspace_id)?;
        let page = apply_list(rows, params, TASK_FILTER_FIELDS);
        debug!("Listing {} of {} tasks in {}", page.items.len(), page.total, workspace_id);

        let views = page
            .items
            .into_iter()
            .map(|task| self.view(task))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            items: views,
            total: page.total,
            start: page.start,
        })
    }

    // `scope` is the workspace id from a nested route; a task outside it is NotFound
    pub fn get_one(&self, user_id: &str, task_id: &str, scope: Option<&str>) -> Result<TaskView, ServiceError> {
        let task = self.load(user_id, task_id, scope)?;
        self.view(task)
    }

    pub fn create(
        &self,
        user_id: &str,
        request: CreateTaskRequest,
        scope: Option<&str>,
    ) -> Result<TaskView, ServiceError> {
        let access = self.guard.check_ref(
            user_id,
            WorkspaceRef {
                path: scope,
                body: request.workspace_id.as_deref(),
                query: None,
            },
            MembershipRole::Viewer,
        )?;
        let workspace_id = access.workspace_id;

        require_non_empty(&request.title, "title")?;
        if let Some(assignee_id) = request.assignee_id.as_deref() {
            self.validate_assignee(&workspace_id, assignee_id)?;
        }
        if let Some(project_id) = request.project_id.as_deref() {
            self.validate_project(&workspace_id, project_id)?;
        }

        let task = self
            .store
            .insert_task(request.into_task(workspace_id, user_id.to_string()))?;

        self.activities.record(
            &task.workspace_id,
            ActivityAction::Created,
            EntityType::Task,
            &task.id,
            user_id,
            json!({ "title": task.title, "projectId": task.project_id }),
        )?;

        info!("✅ Task {} created in workspace {}", task.id, task.workspace_id);
        self.view(task)
    }

    pub fn update(
        &self,
        user_id: &str,
        task_id: &str,
        patch: UpdateTaskRequest,
        scope: Option<&str>,
    ) -> Result<TaskView, ServiceError> {
        let mut task = self.load(user_id, task_id, scope)?;

        if let Some(title) = patch.title.as_deref() {
            require_non_empty(title, "title")?;
        }
        if let Some(Some(assignee_id)) = patch.assignee_id.as_ref() {
            self.validate_assignee(&task.workspace_id, assignee_id)?;
        }
        if let Some(Some(project_id)) = patch.project_id.as_ref() {
            self.validate_project(&task.workspace_id, project_id)?;
        }

        let changed = changed_fields(&patch);
        patch.apply_to(&mut task);
        let task = self.store.update_task(task)?;

        self.activities.record(
            &task.workspace_id,
            ActivityAction::Updated,
            EntityType::Task,
            &task.id,
            user_id,
            json!({ "changes": changed }),
        )?;

        info!("✅ Task {} updated: {:?}", task.id, changed);
        self.view(task)
    }

    // Soft delete; archiving an archived task changes nothing
    pub fn remove(&self, user_id: &str, task_id: &str, scope: Option<&str>) -> Result<TaskView, ServiceError> {
        let mut task = self.load(user_id, task_id, scope)?;
        if task.is_archived() {
            debug!("Task {} already archived", task.id);
            return self.view(task);
        }

        let now = Utc::now();
        task.archived_at = Some(now);
        task.updated_at = now;
        let task = self.store.update_task(task)?;

        self.activities.record(
            &task.workspace_id,
            ActivityAction::Archived,
            EntityType::Task,
            &task.id,
            user_id,
            json!({ "title": task.title }),
        )?;

        info!("🗑️ Task {} archived", task.id);
        self.view(task)
    }

    fn load(&self, user_id: &str, task_id: &str, scope: Option<&str>) -> Result<Task, ServiceError> {
        let task = self
            .store
            .find_task_by_id(task_id)?
            .filter(|t| scope.map_or(true, |ws| t.workspace_id == ws))
            .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))?;
        self.guard.member(user_id, &task.workspace_id)?;
        Ok(task)
    }

    // Assignee must hold a membership in the task's workspace
    fn validate_assignee(&self, workspace_id: &str, assignee_id: &str) -> Result<(), ServiceError> {
        if self.store.find_membership(assignee_id, workspace_id)?.is_none() {
            warn!("❌ Assignee {} is not a member of workspace {}", assignee_id, workspace_id);
            return Err(ServiceError::BadRequest(
                "Assignee is not a member of this workspace".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_project(&self, workspace_id: &str, project_id: &str) -> Result<(), ServiceError> {
        match self.store.find_project_by_id(project_id)? {
            Some(project) if project.workspace_id == workspace_id && !project.is_archived() => Ok(()),
            _ => {
                warn!("❌ Project {} is not usable in workspace {}", project_id, workspace_id);
                Err(ServiceError::BadRequest(
                    "Project does not belong to this workspace".to_string(),
                ))
            }
        }
    }

    fn view(&self, task: Task) -> Result<TaskView, ServiceError> {
        let assignee = match task.assignee_id.as_deref() {
            Some(id) => self.store.find_user_by_id(id)?.map(|u| u.summary()),
            None => None,
        };
        let reporter = self.store.find_user_by_id(&task.reporter_id)?.map(|u| u.summary());
        let project = match task.project_id.as_deref() {
            Some(id) => self.store.find_project_by_id(id)?.map(|p| p.summary()),
            None => None,
        };

        Ok(TaskView {
            task,
            assignee,
            reporter,
            project,
        })
    }
}

fn changed_fields(patch: &UpdateTaskRequest) -> Vec<&'static str> {
    let fields = [
        ("title", patch.title.is_some()),
        ("description", patch.description.is_some()),
        ("status", patch.status.is_some()),
        ("priority", patch.priority.is_some()),
        ("dueDate", patch.due_date.is_some()),
        ("startDate", patch.start_date.is_some()),
        ("estimateMinutes", patch.estimate_minutes.is_some()),
        ("assigneeId", patch.assignee_id.is_some()),
        ("projectId", patch.project_id.is_some()),
    ];
    fields
        .iter()
        .filter(|(_, present)| *present)
        .map(|(name, _)| *name)
        .collect()
}
