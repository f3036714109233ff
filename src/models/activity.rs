// tasktracker-service/src/models/activity.rs
use crate::models::{value_matches_str, ListRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

pub const ACTIVITY_FILTER_FIELDS: &[&str] = &["entityType", "entityId", "userId", "type"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityAction {
    Created,
    Updated,
    Archived,
    Added,
    RoleUpdated,
    Accepted,
    Cancelled,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::Created => "created",
            ActivityAction::Updated => "updated",
            ActivityAction::Archived => "archived",
            ActivityAction::Added => "added",
            ActivityAction::RoleUpdated => "role_updated",
            ActivityAction::Accepted => "accepted",
            ActivityAction::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Workspace,
    Membership,
    Project,
    Task,
    Invitation,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Workspace => "Workspace",
            EntityType::Membership => "Membership",
            EntityType::Project => "Project",
            EntityType::Task => "Task",
            EntityType::Invitation => "Invitation",
        }
    }
}

// Append-only audit record
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub workspace_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub entity_type: String,
    pub entity_id: String,
    pub user_id: String,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    pub fn new(
        workspace_id: &str,
        action: ActivityAction,
        entity: EntityType,
        entity_id: &str,
        user_id: &str,
        metadata: Value,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            workspace_id: workspace_id.to_string(),
            // e.g. CREATED_PROJECT
            kind: format!("{}_{}", action.as_str(), entity.as_str()).to_uppercase(),
            entity_type: entity.as_str().to_string(),
            entity_id: entity_id.to_string(),
            user_id: user_id.to_string(),
            metadata,
            created_at: Utc::now(),
        }
    }
}

impl ListRecord for Activity {
    fn matches_field(&self, field: &str, value: &Value) -> bool {
        match field {
            "entityType" => value_matches_str(value, Some(&self.entity_type)),
            "entityId" => value_matches_str(value, Some(&self.entity_id)),
            "userId" => value_matches_str(value, Some(&self.user_id)),
            "type" => value_matches_str(value, Some(&self.kind)),
            _ => true,
        }
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.kind.to_lowercase().contains(needle) || self.metadata.to_string().to_lowercase().contains(needle)
    }

    fn compare_by(&self, other: &Self, _field: &str) -> Ordering {
        self.created_at
            .cmp(&other.created_at)
            .then_with(|| self.id.cmp(&other.id))
    }
}
