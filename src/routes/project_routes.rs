// tasktracker-service/src/routes/project_routes.rs
use crate::models::{CreateProjectRequest, ListParams, ListQuery, ServiceError, UpdateProjectRequest};
use crate::routes::paged;
use crate::services::AppState;
use crate::utils::get_user_id_from_request;
use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse};
use log::info;

// List projects; filter={"workspaceId":...} is required
#[get("/projects")]
async fn list_projects(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let params = ListParams::parse(&query)?;

    let page = state.projects.list(&user_id, &params)?;
    info!("✅ Returning {} of {} projects", page.items.len(), page.total);
    Ok(paged(page, "projects"))
}

#[get("/projects/{project_id}")]
async fn get_project(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let project = state.projects.get_one(&user_id, &path.into_inner())?;
    Ok(HttpResponse::Ok().json(project))
}

#[post("/projects")]
async fn create_project(
    req: HttpRequest,
    state: web::Data<AppState>,
    data: web::Json<CreateProjectRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    info!("📁 Creating project {} for user: {}", data.key, user_id);

    let project = state.projects.create(&user_id, data.into_inner())?;
    Ok(HttpResponse::Created().json(project))
}

#[patch("/projects/{project_id}")]
async fn update_project(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    data: web::Json<UpdateProjectRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let project_id = path.into_inner();
    info!("✏️ Updating project: {}", project_id);

    let project = state.projects.update(&user_id, &project_id, data.into_inner())?;
    Ok(HttpResponse::Ok().json(project))
}

// Archive (soft delete)
#[delete("/projects/{project_id}")]
async fn delete_project(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let project_id = path.into_inner();
    info!("🗑️ Archiving project: {}", project_id);

    let project = state.projects.remove(&user_id, &project_id)?;
    Ok(HttpResponse::Ok().json(project))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_projects)
        .service(get_project)
        .service(create_project)
        .service(update_project)
        .service(delete_project);
}
