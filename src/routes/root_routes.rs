// tasktracker-service/src/routes/root_routes.rs
// third-party dependencies
use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

// GET ROUTES
#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
        "endpoints": [
            "/auth",
            "/workspaces",
            "/projects",
            "/tasks",
            "/invitations",
            "/activities",
            "/health"
        ]
    }))
}

// Liveness check
#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "ok": true }))
}

// Register routes function for easy import
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(health);
}
