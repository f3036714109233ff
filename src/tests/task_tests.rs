use super::{as_user, content_range, context, init_app, list_uri, send};
use crate::models::MembershipRole;
use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;

#[actix_rt::test]
async fn test_create_and_read_a_task() {
    let ctx = context();
    let ann = ctx.user("ann@acme.com");
    let bob = ctx.user("bob@acme.com");
    let ws = ctx.workspace(&ann, "Acme");
    ctx.join(&ws, &ann, &bob, MembershipRole::Member);
    let app = init_app!(ctx);

    let (_, _, project) = send!(
        app,
        as_user(test::TestRequest::post().uri("/projects"), &ann)
            .set_json(json!({ "workspaceId": ws, "name": "Core", "key": "ACM" }))
    );

    let (status, _, task) = send!(
        app,
        as_user(test::TestRequest::post().uri("/tasks"), &ann).set_json(json!({
            "workspaceId": ws,
            "projectId": project["id"],
            "title": "Ship it",
            "priority": "HIGH",
            "assigneeId": bob.id
        }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["status"], "BACKLOG");
    assert_eq!(task["priority"], "HIGH");
    assert_eq!(task["reporterId"], ann.id.as_str());
    assert_eq!(task["assignee"]["email"], "bob@acme.com");
    assert_eq!(task["project"]["key"], "ACM");

    let uri = format!("/tasks/{}", task["id"].as_str().unwrap());
    let (status, _, fetched) = send!(app, as_user(test::TestRequest::get().uri(&uri), &bob));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Ship it");
}

#[actix_rt::test]
async fn test_assignee_must_belong_to_the_workspace() {
    let ctx = context();
    let ann = ctx.user("ann@acme.com");
    let eve = ctx.user("eve@evil.com");
    let ws = ctx.workspace(&ann, "Acme");
    let app = init_app!(ctx);

    let (status, _, _) = send!(
        app,
        as_user(test::TestRequest::post().uri("/tasks"), &ann)
            .set_json(json!({ "workspaceId": ws, "title": "Ship it", "assigneeId": eve.id }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, task) = send!(
        app,
        as_user(test::TestRequest::post().uri("/tasks"), &ann).set_json(json!({ "workspaceId": ws, "title": "Ship it" }))
    );
    let uri = format!("/tasks/{}", task["id"].as_str().unwrap());

    let (status, _, _) = send!(
        app,
        as_user(test::TestRequest::patch().uri(&uri), &ann).set_json(json!({ "assigneeId": eve.id }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_project_from_another_workspace_is_rejected() {
    let ctx = context();
    let ann = ctx.user("ann@acme.com");
    let acme = ctx.workspace(&ann, "Acme");
    let other = ctx.workspace(&ann, "Other");
    let app = init_app!(ctx);

    let (_, _, project) = send!(
        app,
        as_user(test::TestRequest::post().uri("/projects"), &ann)
            .set_json(json!({ "workspaceId": other, "name": "Core", "key": "ACM" }))
    );

    let (status, _, _) = send!(
        app,
        as_user(test::TestRequest::post().uri("/tasks"), &ann)
            .set_json(json!({ "workspaceId": acme, "title": "Ship it", "projectId": project["id"] }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_patch_null_unassigns() {
    let ctx = context();
    let ann = ctx.user("ann@acme.com");
    let ws = ctx.workspace(&ann, "Acme");
    let app = init_app!(ctx);

    let (_, _, task) = send!(
        app,
        as_user(test::TestRequest::post().uri("/tasks"), &ann).set_json(json!({
            "workspaceId": ws,
            "title": "Ship it",
            "description": "Before Friday",
            "assigneeId": ann.id
        }))
    );
    let uri = format!("/tasks/{}", task["id"].as_str().unwrap());

    let (status, _, updated) = send!(
        app,
        as_user(test::TestRequest::patch().uri(&uri), &ann).set_json(json!({ "assigneeId": null, "status": "IN_PROGRESS" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert!(updated["assigneeId"].is_null());
    assert!(updated["assignee"].is_null());
    assert_eq!(updated["status"], "IN_PROGRESS");
    // Absent fields are left alone
    assert_eq!(updated["description"], "Before Friday");
}

#[actix_rt::test]
async fn test_task_list_filters_and_search() {
    let ctx = context();
    let ann = ctx.user("ann@acme.com");
    let ws = ctx.workspace(&ann, "Acme");
    let app = init_app!(ctx);

    for (title, status) in [
        ("Write docs", "BACKLOG"),
        ("Fix login bug", "IN_PROGRESS"),
        ("Fix signup bug", "DONE"),
        ("Plan sprint", "DONE"),
    ] {
        send!(
            app,
            as_user(test::TestRequest::post().uri("/tasks"), &ann)
                .set_json(json!({ "workspaceId": ws, "title": title, "status": status }))
        );
    }

    let (status, headers, body) = send!(
        app,
        as_user(
            test::TestRequest::get().uri(&list_uri("/tasks", json!({ "workspaceId": ws, "status": "DONE" }), None)),
            &ann
        )
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(content_range(&headers), "tasks 0-1/2");

    let (_, _, body) = send!(
        app,
        as_user(
            test::TestRequest::get().uri(&list_uri("/tasks", json!({ "workspaceId": ws, "q": "BUG" }), None)),
            &ann
        )
    );
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, _, body) = send!(
        app,
        as_user(
            test::TestRequest::get().uri(&list_uri(
                "/tasks",
                json!({ "workspaceId": ws, "q": "bug", "status": "DONE" }),
                None
            )),
            &ann
        )
    );
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Fix signup bug");
}

#[actix_rt::test]
async fn test_nested_routes_are_scoped_to_their_workspace() {
    let ctx = context();
    let ann = ctx.user("ann@acme.com");
    let acme = ctx.workspace(&ann, "Acme");
    let other = ctx.workspace(&ann, "Other");
    let app = init_app!(ctx);

    let (status, _, task) = send!(
        app,
        as_user(test::TestRequest::post().uri(&format!("/workspaces/{}/tasks", acme)), &ann)
            .set_json(json!({ "title": "Nested" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["workspaceId"], acme.as_str());
    let task_id = task["id"].as_str().unwrap().to_string();

    let (status, headers, body) = send!(
        app,
        as_user(test::TestRequest::get().uri(&format!("/workspaces/{}/tasks", acme)), &ann)
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(content_range(&headers), "tasks 0-0/1");

    let (status, _, _) = send!(
        app,
        as_user(test::TestRequest::get().uri(&format!("/workspaces/{}/tasks/{}", acme, task_id)), &ann)
    );
    assert_eq!(status, StatusCode::OK);

    // Same task through a workspace it does not live in
    let (status, _, _) = send!(
        app,
        as_user(test::TestRequest::get().uri(&format!("/workspaces/{}/tasks/{}", other, task_id)), &ann)
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = send!(
        app,
        as_user(test::TestRequest::patch().uri(&format!("/workspaces/{}/tasks/{}", other, task_id)), &ann)
            .set_json(json!({ "title": "Moved" }))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, archived) = send!(
        app,
        as_user(test::TestRequest::delete().uri(&format!("/workspaces/{}/tasks/{}", acme, task_id)), &ann)
    );
    assert_eq!(status, StatusCode::OK);
    assert!(archived["archivedAt"].is_string());

    let (_, headers, body) = send!(
        app,
        as_user(test::TestRequest::get().uri(&format!("/workspaces/{}/tasks", acme)), &ann)
    );
    assert!(body.as_array().unwrap().is_empty());
    assert_eq!(content_range(&headers), "tasks */0");
}

#[actix_rt::test]
async fn test_outsiders_cannot_touch_tasks() {
    let ctx = context();
    let ann = ctx.user("ann@acme.com");
    let eve = ctx.user("eve@evil.com");
    let ws = ctx.workspace(&ann, "Acme");
    let app = init_app!(ctx);

    let (_, _, task) = send!(
        app,
        as_user(test::TestRequest::post().uri("/tasks"), &ann).set_json(json!({ "workspaceId": ws, "title": "Secret" }))
    );
    let uri = format!("/tasks/{}", task["id"].as_str().unwrap());

    let (status, _, _) = send!(app, as_user(test::TestRequest::get().uri(&uri), &eve));
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = send!(app, as_user(test::TestRequest::delete().uri(&uri), &eve));
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = send!(
        app,
        as_user(test::TestRequest::get().uri(&list_uri("/tasks", json!({ "workspaceId": ws }), None)), &eve)
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
}
