// tasktracker-service/src/services/mod.rs
use crate::config::AppConfig;
use crate::utils::Store;
use std::sync::Arc;

pub mod activity_service;
pub mod auth_service;
pub mod email_service;
pub mod guard;
pub mod invitation_service;
pub mod membership_service;
pub mod project_service;
pub mod task_service;
pub mod workspace_service;

use activity_service::ActivityService;
use auth_service::AuthService;
use email_service::Mailer;
use guard::WorkspaceGuard;
use invitation_service::InvitationService;
use membership_service::MembershipService;
use project_service::ProjectService;
use task_service::TaskService;
use workspace_service::WorkspaceService;

// Everything handlers need, built once at startup and shared through web::Data
pub struct AppState {
    pub config: AppConfig,
    pub auth: AuthService,
    pub workspaces: WorkspaceService,
    pub memberships: MembershipService,
    pub projects: ProjectService,
    pub tasks: TaskService,
    pub invitations: InvitationService,
    pub activities: ActivityService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Store, mailer: Arc<dyn Mailer>) -> Self {
        let guard = WorkspaceGuard::new(store.clone());
        let activities = ActivityService::new(store.clone(), guard.clone());
        let invitations = InvitationService::new(
            store.clone(),
            guard.clone(),
            activities.clone(),
            mailer,
            &config.frontend_url,
        );

        Self {
            auth: AuthService::new(
                store.clone(),
                config.jwt_keys(),
                config.auth_mode,
                config.bcrypt_cost,
                invitations.clone(),
            ),
            workspaces: WorkspaceService::new(store.clone(), guard.clone(), activities.clone()),
            memberships: MembershipService::new(store.clone(), guard.clone(), activities.clone()),
            projects: ProjectService::new(store.clone(), guard.clone(), activities.clone()),
            tasks: TaskService::new(store, guard, activities.clone()),
            invitations,
            activities,
            config,
        }
    }
}
