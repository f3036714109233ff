// tasktracker-service/src/routes/mod.rs
use crate::models::{Page, ServiceError};
use crate::services::AppState;
use crate::utils::auth_middleware::Authentication;
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use log::debug;
use serde::Serialize;

pub mod activity_routes;
pub mod auth_routes;
pub mod invitation_routes;
pub mod project_routes;
pub mod root_routes;
pub mod task_routes;
pub mod workspace_routes;

// Public routes first, then everything else behind the bearer token check
pub fn configure(cfg: &mut web::ServiceConfig, state: web::Data<AppState>) {
    let keys = state.auth.keys().clone();
    let mode = state.auth.mode();

    cfg.app_data(state)
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            debug!("Rejected JSON body: {}", err);
            ServiceError::BadRequest(err.to_string()).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            debug!("Rejected query string: {}", err);
            ServiceError::BadRequest(err.to_string()).into()
        }))
        .configure(root_routes::init_routes)
        .configure(|cfg| auth_routes::init_public_routes(cfg, mode))
        .configure(invitation_routes::init_public_routes)
        .service(
            web::scope("")
                .wrap(Authentication::new(keys))
                .configure(auth_routes::init_routes)
                .configure(workspace_routes::init_routes)
                .configure(project_routes::init_routes)
                .configure(task_routes::init_routes)
                .configure(invitation_routes::init_routes)
                .configure(activity_routes::init_routes),
        );
}

// List body plus the Content-Range header paginating clients read
pub(crate) fn paged<T: Serialize>(page: Page<T>, resource: &str) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CONTENT_RANGE, page.content_range(resource)))
        .json(page.items)
}
