// tasktracker-service/src/models/task.rs
use crate::models::{contains_ci, double_option, value_matches_str, ListRecord, ProjectSummary, UserSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use uuid::Uuid;

pub const TASK_FILTER_FIELDS: &[&str] = &["status", "priority", "projectId", "assigneeId", "reporterId"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Backlog,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "BACKLOG",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "LOW",
            TaskPriority::Medium => "MEDIUM",
            TaskPriority::High => "HIGH",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub workspace_id: String,
    pub project_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub estimate_minutes: Option<u32>,
    // Creator, never changes after insert
    pub reporter_id: String,
    pub assignee_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }
}

impl ListRecord for Task {
    fn matches_field(&self, field: &str, value: &Value) -> bool {
        match field {
            "status" => value_matches_str(value, Some(self.status.as_str())),
            "priority" => value_matches_str(value, Some(self.priority.as_str())),
            "projectId" => value_matches_str(value, self.project_id.as_deref()),
            "assigneeId" => value_matches_str(value, self.assignee_id.as_deref()),
            "reporterId" => value_matches_str(value, Some(&self.reporter_id)),
            _ => true,
        }
    }

    fn matches_search(&self, needle: &str) -> bool {
        contains_ci(Some(&self.title), needle) || contains_ci(self.description.as_deref(), needle)
    }

    // Ties fall back to creation time, then id, so pages are stable
    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        let primary = match field {
            "title" | "name" => self.title.cmp(&other.title),
            "status" => self.status.cmp(&other.status),
            "priority" => self.priority.cmp(&other.priority),
            "dueDate" => self.due_date.cmp(&other.due_date),
            "updatedAt" => self.updated_at.cmp(&other.updated_at),
            _ => Ordering::Equal,
        };
        primary
            .then_with(|| self.created_at.cmp(&other.created_at))
            .then_with(|| self.id.cmp(&other.id))
    }
}

// Task with its related rows resolved for display
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub assignee: Option<UserSummary>,
    pub reporter: Option<UserSummary>,
    pub project: Option<ProjectSummary>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub workspace_id: Option<String>,
    pub project_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub estimate_minutes: Option<u32>,
    pub assignee_id: Option<String>,
}

impl CreateTaskRequest {
    pub fn into_task(self, workspace_id: String, reporter_id: String) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4().to_string(),
            workspace_id,
            project_id: self.project_id,
            title: self.title.trim().to_string(),
            description: self.description,
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            due_date: self.due_date,
            start_date: self.start_date,
            estimate_minutes: self.estimate_minutes,
            reporter_id,
            assignee_id: self.assignee_id,
            created_at: now,
            updated_at: now,
            archived_at: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub estimate_minutes: Option<Option<u32>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Option<String>>,
}

impl UpdateTaskRequest {
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(start_date) = self.start_date {
            task.start_date = start_date;
        }
        if let Some(estimate) = self.estimate_minutes {
            task.estimate_minutes = estimate;
        }
        if let Some(assignee_id) = self.assignee_id {
            task.assignee_id = assignee_id;
        }
        if let Some(project_id) = self.project_id {
            task.project_id = project_id;
        }
        task.updated_at = Utc::now();
    }
}
