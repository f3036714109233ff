// tasktracker-service/src/utils/project_storage.rs
use crate::models::{Project, ServiceError};
use crate::utils::storage::{unique_violation, Store, Tables};
use log::info;

// Archived projects keep their key reserved
fn key_taken(tables: &Tables, workspace_id: &str, key: &str, except_id: Option<&str>) -> bool {
    tables
        .projects
        .values()
        .any(|p| p.workspace_id == workspace_id && p.key == key && Some(p.id.as_str()) != except_id)
}

impl Store {
    pub fn insert_project(&self, project: Project) -> Result<Project, ServiceError> {
        self.write(|tables| {
            if key_taken(tables, &project.workspace_id, &project.key, None) {
                return Err(unique_violation("projects(workspace_id, key)"));
            }
            tables.projects.insert(project.id.clone(), project.clone());
            info!("✅ Saved project: {} ({})", project.id, project.key);
            Ok(project)
        })
    }

    // Replace an existing row, re-checking the key index
    pub fn update_project(&self, project: Project) -> Result<Project, ServiceError> {
        self.write(|tables| {
            if !tables.projects.contains_key(&project.id) {
                return Err(ServiceError::NotFound("Project not found".to_string()));
            }
            if key_taken(tables, &project.workspace_id, &project.key, Some(&project.id)) {
                return Err(unique_violation("projects(workspace_id, key)"));
            }
            tables.projects.insert(project.id.clone(), project.clone());
            Ok(project)
        })
    }

    pub fn find_project_by_id(&self, id: &str) -> Result<Option<Project>, ServiceError> {
        self.read(|tables| tables.projects.get(id).cloned())
    }

    pub fn find_project_by_key(&self, workspace_id: &str, key: &str) -> Result<Option<Project>, ServiceError> {
        self.read(|tables| {
            tables
                .projects
                .values()
                .find(|p| p.workspace_id == workspace_id && p.key == key)
                .cloned()
        })
    }

    // Non-archived projects of a workspace
    pub fn active_projects(&self, workspace_id: &str) -> Result<Vec<Project>, ServiceError> {
        self.read(|tables| {
            tables
                .projects
                .values()
                .filter(|p| p.workspace_id == workspace_id && !p.is_archived())
                .cloned()
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(workspace_id: &str, key: &str) -> Project {
        Project::new(workspace_id.to_string(), format!("Project {}", key), key.to_string(), None)
    }

    #[test]
    fn keys_are_unique_per_workspace() {
        let store = Store::in_memory();
        store.insert_project(project("ws-1", "ACM")).unwrap();
        store.insert_project(project("ws-2", "ACM")).unwrap();

        assert!(matches!(
            store.insert_project(project("ws-1", "ACM")),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn updates_recheck_the_key_index() {
        let store = Store::in_memory();
        store.insert_project(project("ws-1", "ACM")).unwrap();
        let mut other = store.insert_project(project("ws-1", "OPS")).unwrap();

        other.name = "Operations".to_string();
        assert!(store.update_project(other.clone()).is_ok());

        other.key = "ACM".to_string();
        assert!(matches!(store.update_project(other), Err(ServiceError::Conflict(_))));
    }
}
