// tasktracker-service/src/routes/invitation_routes.rs
use crate::models::{CreateInvitationRequest, ServiceError};
use crate::services::AppState;
use crate::utils::get_user_id_from_request;
use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use log::info;

// Create a new workspace invitation and email the link
#[post("/invitations/workspaces/{workspace_id}")]
async fn create_invitation(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    data: web::Json<CreateInvitationRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let workspace_id = path.into_inner();
    info!("📧 Creating invitation to workspace: {} for email: {}", workspace_id, data.email);

    let invitation = state
        .invitations
        .create(&user_id, &workspace_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(invitation))
}

// Get all invitations for a workspace
#[get("/invitations/workspaces/{workspace_id}")]
async fn get_workspace_invitations(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let workspace_id = path.into_inner();
    info!("📋 Fetching invitations for workspace: {}", workspace_id);

    let invitations = state.invitations.list(&user_id, &workspace_id)?;
    info!("✅ Found {} invitations for workspace", invitations.len());
    Ok(HttpResponse::Ok().json(invitations))
}

// Get pending invitations addressed to the current user
#[get("/invitations/mine")]
async fn get_my_invitations(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    info!("📋 Fetching invitations for user: {}", user_id);

    let invitations = state.invitations.mine(&user_id)?;
    Ok(HttpResponse::Ok().json(invitations))
}

// Public: the register page resolves the token before an account exists
#[get("/invitations/token/{token}")]
async fn get_invitation_by_token(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let invitation = state.invitations.get_by_token(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(invitation))
}

#[post("/invitations/accept/{token}")]
async fn accept_invitation(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    info!("🤝 User {} accepting invitation", user_id);

    let response = state.invitations.accept(&user_id, &path.into_inner())?;
    Ok(HttpResponse::Ok().json(response))
}

// Cancel (hard delete) an invitation
#[delete("/invitations/{invitation_id}")]
async fn cancel_invitation(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let invitation_id = path.into_inner();
    info!("🗑️ Cancelling invitation: {}", invitation_id);

    let invitation = state.invitations.cancel(&user_id, &invitation_id)?;
    Ok(HttpResponse::Ok().json(invitation))
}

pub fn init_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_invitation_by_token);
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_invitation)
        .service(get_workspace_invitations)
        .service(get_my_invitations)
        .service(accept_invitation)
        .service(cancel_invitation);
}
