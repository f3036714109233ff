// tasktracker-service/src/utils/task_storage.rs
use crate::models::{ServiceError, Task};
use crate::utils::storage::Store;
use log::info;

impl Store {
    pub fn insert_task(&self, task: Task) -> Result<Task, ServiceError> {
        self.write(|tables| {
            tables.tasks.insert(task.id.clone(), task.clone());
            info!("✅ Saved task: {}", task.id);
            Ok(task)
        })
    }

    pub fn update_task(&self, task: Task) -> Result<Task, ServiceError> {
        self.write(|tables| match tables.tasks.get_mut(&task.id) {
            Some(row) => {
                *row = task.clone();
                Ok(task)
            }
            None => Err(ServiceError::NotFound("Task not found".to_string())),
        })
    }

    pub fn find_task_by_id(&self, id: &str) -> Result<Option<Task>, ServiceError> {
        self.read(|tables| tables.tasks.get(id).cloned())
    }

    // Non-archived tasks of a workspace
    pub fn active_tasks(&self, workspace_id: &str) -> Result<Vec<Task>, ServiceError> {
        self.read(|tables| {
            tables
                .tasks
                .values()
                .filter(|t| t.workspace_id == workspace_id && !t.is_archived())
                .cloned()
                .collect()
        })
    }
}
