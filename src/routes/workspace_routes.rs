// tasktracker-service/src/routes/workspace_routes.rs
use crate::models::{AddMemberRequest, CreateWorkspaceRequest, ServiceError, UpdateMemberRoleRequest};
use crate::services::AppState;
use crate::utils::get_user_id_from_request;
use actix_web::{get, patch, post, web, HttpRequest, HttpResponse};
use log::info;

// Get all workspaces the user belongs to, with their role
#[get("/workspaces")]
async fn list_workspaces(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    info!("📋 Fetching workspaces for user: {}", user_id);

    let workspaces = state.workspaces.list_for_user(&user_id)?;
    info!("✅ Found {} workspaces for user", workspaces.len());
    Ok(HttpResponse::Ok().json(workspaces))
}

// Create a new workspace
#[post("/workspaces")]
async fn create_workspace(
    req: HttpRequest,
    state: web::Data<AppState>,
    data: web::Json<CreateWorkspaceRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    info!("🏢 Creating workspace: {} for user: {}", data.name, user_id);

    let workspace = state.workspaces.create(&user_id, data.into_inner())?;
    Ok(HttpResponse::Created().json(workspace))
}

#[get("/workspaces/{workspace_id}")]
async fn get_workspace(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let workspace = state.workspaces.get(&user_id, &path.into_inner())?;
    Ok(HttpResponse::Ok().json(workspace))
}

// Get the member roster
#[get("/workspaces/{workspace_id}/members")]
async fn list_members(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let workspace_id = path.into_inner();
    info!("👥 Fetching members of workspace: {}", workspace_id);

    let members = state.memberships.list_members(&user_id, &workspace_id)?;
    Ok(HttpResponse::Ok().json(members))
}

// Add an existing user to the workspace
#[post("/workspaces/{workspace_id}/members")]
async fn add_member(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    data: web::Json<AddMemberRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let workspace_id = path.into_inner();
    info!("➕ Adding {} to workspace: {} as {}", data.email, workspace_id, data.role);

    let member = state
        .memberships
        .add_member(&user_id, &workspace_id, &data.email, data.role)?;
    Ok(HttpResponse::Created().json(member))
}

// Change a member's role
#[patch("/workspaces/{workspace_id}/members/{membership_id}")]
async fn update_member_role(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    data: web::Json<UpdateMemberRoleRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let (workspace_id, membership_id) = path.into_inner();
    info!(
        "🔄 Updating membership {} in workspace {} to {}",
        membership_id, workspace_id, data.role
    );

    let membership = state
        .memberships
        .update_role(&user_id, &workspace_id, &membership_id, data.role)?;
    Ok(HttpResponse::Ok().json(membership))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_workspaces)
        .service(create_workspace)
        .service(get_workspace)
        .service(list_members)
        .service(add_member)
        .service(update_member_role);
}
