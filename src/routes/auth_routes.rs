// tasktracker-service/src/routes/auth_routes.rs
use crate::config::AuthMode;
use crate::models::{DevLoginRequest, LoginRequest, RefreshRequest, RegisterRequest, ServiceError};
use crate::services::AppState;
use crate::utils::get_user_id_from_request;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use log::{info, warn};
use serde_json::json;

// Register a new user, optionally joining a workspace through an invite token
#[post("/auth/register")]
async fn register(
    state: web::Data<AppState>,
    data: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!("📝 Register request for email: {}", data.email);
    let response = state.auth.register(data.into_inner())?;
    Ok(HttpResponse::Created().json(response))
}

// Login and get a token pair
#[post("/auth/login")]
async fn login(state: web::Data<AppState>, data: web::Json<LoginRequest>) -> Result<HttpResponse, ServiceError> {
    info!("🔑 Login request for email: {}", data.email);
    let response = state.auth.login(data.into_inner())?;
    Ok(HttpResponse::Ok().json(response))
}

// Passwordless find-or-create, only mounted with AUTH_MODE=dev
#[post("/auth/dev-login")]
async fn dev_login(
    state: web::Data<AppState>,
    data: web::Json<DevLoginRequest>,
) -> Result<HttpResponse, ServiceError> {
    warn!("⚠️ Dev login for email: {}", data.email);
    let response = state.auth.dev_login(data.into_inner())?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/auth/refresh")]
async fn refresh(state: web::Data<AppState>, data: web::Json<RefreshRequest>) -> Result<HttpResponse, ServiceError> {
    info!("🔄 Token refresh request");
    let tokens = state.auth.refresh(&data.refresh_token)?;
    Ok(HttpResponse::Ok().json(tokens))
}

// Get the current user
#[get("/auth/me")]
async fn me(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let user = state.auth.me(&user_id)?;
    Ok(HttpResponse::Ok().json(user))
}

// Tokens are stateless; the client drops them
#[post("/auth/logout")]
async fn logout(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    info!("👋 User logged out: {}", user_id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Logged out" })))
}

// Exactly one login path per mode
pub fn init_public_routes(cfg: &mut web::ServiceConfig, mode: AuthMode) {
    match mode {
        AuthMode::Password => {
            cfg.service(register).service(login);
        }
        AuthMode::Dev => {
            cfg.service(dev_login);
        }
    }
    cfg.service(refresh);
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(me).service(logout);
}
