// tasktracker-service/src/utils/activity_storage.rs
use crate::models::{Activity, ServiceError};
use crate::utils::storage::Store;
use log::debug;

impl Store {
    // Append-only: there is no update or delete counterpart
    pub fn append_activity(&self, activity: Activity) -> Result<Activity, ServiceError> {
        self.write(|tables| {
            debug!("Recording activity {} on {}", activity.kind, activity.entity_id);
            tables.activities.push(activity.clone());
            Ok(activity)
        })
    }

    pub fn activities_for_workspace(&self, workspace_id: &str) -> Result<Vec<Activity>, ServiceError> {
        self.read(|tables| {
            tables
                .activities
                .iter()
                .filter(|a| a.workspace_id == workspace_id)
                .cloned()
                .collect()
        })
    }
}
