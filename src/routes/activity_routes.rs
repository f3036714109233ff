// tasktracker-service/src/routes/activity_routes.rs
use crate::models::{ListParams, ListQuery, ServiceError};
use crate::routes::paged;
use crate::services::AppState;
use crate::utils::get_user_id_from_request;
use actix_web::{get, web, HttpRequest, HttpResponse};

// Workspace audit trail, newest first
#[get("/activities")]
async fn list_activities(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let params = ListParams::parse(&query)?;

    let page = state.activities.list(&user_id, &params)?;
    Ok(paged(page, "activities"))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_activities);
}
