// tasktracker-service/src/models/workspace.rs
use crate::models::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_by_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workspace {
    pub fn new(name: String, slug: String, description: Option<String>, created_by_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            slug,
            description,
            created_by_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> WorkspaceSummary {
        WorkspaceSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// Privilege-ordered workspace role: `Owner > Admin > Member > Viewer`.
///
/// The derived ordering follows the discriminants, so `role >= MembershipRole::Admin`
/// reads as "at least admin".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipRole {
    Viewer = 0,
    Member = 1,
    Admin = 2,
    Owner = 3,
}

impl MembershipRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipRole::Owner => "OWNER",
            MembershipRole::Admin => "ADMIN",
            MembershipRole::Member => "MEMBER",
            MembershipRole::Viewer => "VIEWER",
        }
    }

    pub fn at_least(&self, minimum: MembershipRole) -> bool {
        *self >= minimum
    }
}

impl fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: String,
    pub user_id: String,
    pub workspace_id: String,
    pub role: MembershipRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(user_id: String, workspace_id: String, role: MembershipRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            workspace_id,
            role,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkspaceSummary {
    pub id: String,
    pub name: String,
    pub slug: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct WorkspaceCounts {
    pub members: usize,
    pub projects: usize,
    pub tasks: usize,
}

// A workspace as seen by one of its members
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WorkspaceView {
    #[serde(flatten)]
    pub workspace: Workspace,
    pub role: MembershipRole,
    pub counts: WorkspaceCounts,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MemberView {
    #[serde(flatten)]
    pub membership: Membership,
    pub user: Option<UserSummary>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateWorkspaceRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AddMemberRequest {
    pub email: String,
    pub role: MembershipRole,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateMemberRoleRequest {
    pub role: MembershipRole,
}
