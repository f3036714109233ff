// tasktracker-service/src/services/activity_service.rs
use crate::models::{
    apply_list, Activity, ActivityAction, EntityType, ListParams, Page, ServiceError, ACTIVITY_FILTER_FIELDS,
};
use crate::services::guard::WorkspaceGuard;
use crate::utils::Store;
use log::info;
use serde_json::Value;

#[derive(Clone)]
pub struct ActivityService {
    store: Store,
    guard: WorkspaceGuard,
}

impl ActivityService {
    pub fn new(store: Store, guard: WorkspaceGuard) -> Self {
        Self { store, guard }
    }

    pub fn record(
        &self,
        workspace_id: &str,
        action: ActivityAction,
        entity: EntityType,
        entity_id: &str,
        user_id: &str,
        metadata: Value,
    ) -> Result<Activity, ServiceError> {
        let activity = Activity::new(workspace_id, action, entity, entity_id, user_id, metadata);
        self.store.append_activity(activity)
    }

    // Always ordered by createdAt, newest first unless ASC is asked for
    pub fn list(&self, user_id: &str, params: &ListParams) -> Result<Page<Activity>, ServiceError> {
        let workspace_id = params
            .workspace_id()
            .ok_or_else(|| ServiceError::BadRequest("filter.workspaceId is required".to_string()))?;
        self.guard.member(user_id, workspace_id)?;

        info!("📋 Fetching activity for workspace: {}", workspace_id);

        let rows = self.store.activities_for_workspace(workspace_id)?;
        Ok(apply_list(rows, params, ACTIVITY_FILTER_FIELDS))
    }
}
