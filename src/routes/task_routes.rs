// tasktracker-service/src/routes/task_routes.rs
//
// Tasks are reachable flat (/tasks) and nested under their workspace
// (/workspaces/{id}/tasks); the nested form scopes every lookup to the path id.
use crate::models::{CreateTaskRequest, ListParams, ListQuery, ServiceError, UpdateTaskRequest};
use crate::routes::paged;
use crate::services::AppState;
use crate::utils::get_user_id_from_request;
use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse};
use log::info;

// FLAT ROUTES

#[get("/tasks")]
async fn list_tasks(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let params = ListParams::parse(&query)?;

    let page = state.tasks.list(&user_id, &params)?;
    info!("✅ Returning {} of {} tasks", page.items.len(), page.total);
    Ok(paged(page, "tasks"))
}

#[get("/tasks/{task_id}")]
async fn get_task(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let task = state.tasks.get_one(&user_id, &path.into_inner(), None)?;
    Ok(HttpResponse::Ok().json(task))
}

#[post("/tasks")]
async fn create_task(
    req: HttpRequest,
    state: web::Data<AppState>,
    data: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    info!("📝 Creating task \"{}\" for user: {}", data.title, user_id);

    let task = state.tasks.create(&user_id, data.into_inner(), None)?;
    Ok(HttpResponse::Created().json(task))
}

#[patch("/tasks/{task_id}")]
async fn update_task(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    data: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let task_id = path.into_inner();
    info!("✏️ Updating task: {}", task_id);

    let task = state.tasks.update(&user_id, &task_id, data.into_inner(), None)?;
    Ok(HttpResponse::Ok().json(task))
}

#[delete("/tasks/{task_id}")]
async fn delete_task(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let task_id = path.into_inner();
    info!("🗑️ Archiving task: {}", task_id);

    let task = state.tasks.remove(&user_id, &task_id, None)?;
    Ok(HttpResponse::Ok().json(task))
}

// NESTED ROUTES

#[get("/workspaces/{workspace_id}/tasks")]
async fn list_workspace_tasks(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let params = ListParams::parse(&query)?.with_workspace(&path.into_inner());

    let page = state.tasks.list(&user_id, &params)?;
    Ok(paged(page, "tasks"))
}

#[post("/workspaces/{workspace_id}/tasks")]
async fn create_workspace_task(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    data: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let workspace_id = path.into_inner();
    info!("📝 Creating task \"{}\" in workspace: {}", data.title, workspace_id);

    let task = state.tasks.create(&user_id, data.into_inner(), Some(&workspace_id))?;
    Ok(HttpResponse::Created().json(task))
}

#[get("/workspaces/{workspace_id}/tasks/{task_id}")]
async fn get_workspace_task(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let (workspace_id, task_id) = path.into_inner();
    let task = state.tasks.get_one(&user_id, &task_id, Some(&workspace_id))?;
    Ok(HttpResponse::Ok().json(task))
}

#[patch("/workspaces/{workspace_id}/tasks/{task_id}")]
async fn update_workspace_task(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    data: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let (workspace_id, task_id) = path.into_inner();
    info!("✏️ Updating task {} in workspace {}", task_id, workspace_id);

    let task = state
        .tasks
        .update(&user_id, &task_id, data.into_inner(), Some(&workspace_id))?;
    Ok(HttpResponse::Ok().json(task))
}

#[delete("/workspaces/{workspace_id}/tasks/{task_id}")]
async fn delete_workspace_task(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let (workspace_id, task_id) = path.into_inner();
    info!("🗑️ Archiving task {} in workspace {}", task_id, workspace_id);

    let task = state.tasks.remove(&user_id, &task_id, Some(&workspace_id))?;
    Ok(HttpResponse::Ok().json(task))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_tasks)
        .service(get_task)
        .service(create_task)
        .service(update_task)
        .service(delete_task)
        .service(list_workspace_tasks)
        .service(create_workspace_task)
        .service(get_workspace_task)
        .service(update_workspace_task)
        .service(delete_workspace_task);
}
