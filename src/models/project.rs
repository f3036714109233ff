// tasktracker-service/src/models/project.rs
use crate::models::{contains_ci, double_option, value_matches_str, ListRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use uuid::Uuid;

pub const PROJECT_FILTER_FIELDS: &[&str] = &["key", "name"];

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub workspace_id: String,
    pub name: String,
    pub key: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn new(workspace_id: String, name: String, key: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            workspace_id,
            name,
            key,
            description,
            created_at: now,
            updated_at: now,
            archived_at: None,
        }
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            key: self.key.clone(),
        }
    }
}

impl ListRecord for Project {
    fn matches_field(&self, field: &str, value: &Value) -> bool {
        match field {
            "key" => value_matches_str(value, Some(&self.key)),
            "name" => value_matches_str(value, Some(&self.name)),
            _ => true,
        }
    }

    fn matches_search(&self, needle: &str) -> bool {
        contains_ci(Some(&self.name), needle) || contains_ci(self.description.as_deref(), needle)
    }

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        let primary = match field {
            "name" | "title" => self.name.cmp(&other.name),
            "key" => self.key.cmp(&other.key),
            "updatedAt" => self.updated_at.cmp(&other.updated_at),
            _ => Ordering::Equal,
        };
        primary
            .then_with(|| self.created_at.cmp(&other.created_at))
            .then_with(|| self.id.cmp(&other.id))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub key: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub workspace_id: Option<String>,
    pub name: String,
    pub key: String,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

// Keys are stored trimmed and upper-cased: " acm " and "ACM" collide
pub fn normalize_project_key(key: &str) -> String {
    key.trim().to_uppercase()
}
