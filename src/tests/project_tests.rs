use super::{as_user, content_range, context, init_app, list_uri, send};
use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;

#[actix_rt::test]
async fn test_project_list_is_paged_with_content_range() {
    let ctx = context();
    let ann = ctx.user("ann@acme.com");
    let ws = ctx.workspace(&ann, "Acme");
    let app = init_app!(ctx);

    for i in 0..25 {
        let (status, _, _) = send!(
            app,
            as_user(test::TestRequest::post().uri("/projects"), &ann).set_json(json!({
                "workspaceId": ws,
                "name": format!("Project {}", i),
                "key": format!("P{}", i)
            }))
        );
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, headers, body) = send!(
        app,
        as_user(
            test::TestRequest::get().uri(&list_uri("/projects", json!({ "workspaceId": ws }), Some((0, 9)))),
            &ann
        )
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 10);
    assert_eq!(content_range(&headers), "projects 0-9/25");

    let (_, headers, body) = send!(
        app,
        as_user(
            test::TestRequest::get().uri(&list_uri("/projects", json!({ "workspaceId": ws }), Some((20, 29)))),
            &ann
        )
    );
    assert_eq!(body.as_array().unwrap().len(), 5);
    assert_eq!(content_range(&headers), "projects 20-24/25");

    let (_, headers, body) = send!(
        app,
        as_user(
            test::TestRequest::get().uri(&list_uri("/projects", json!({ "workspaceId": ws, "key": "P7" }), None)),
            &ann
        )
    );
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Project 7");
    assert_eq!(content_range(&headers), "projects 0-0/1");
}

#[actix_rt::test]
async fn test_project_keys_are_unique_per_workspace() {
    let ctx = context();
    let ann = ctx.user("ann@acme.com");
    let acme = ctx.workspace(&ann, "Acme");
    let other = ctx.workspace(&ann, "Other");
    let app = init_app!(ctx);

    let (status, _, created) = send!(
        app,
        as_user(test::TestRequest::post().uri("/projects"), &ann)
            .set_json(json!({ "workspaceId": acme, "name": "Core", "key": "acm" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["key"], "ACM");

    let (status, _, _) = send!(
        app,
        as_user(test::TestRequest::post().uri("/projects"), &ann)
            .set_json(json!({ "workspaceId": acme, "name": "Again", "key": " ACM " }))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, _) = send!(
        app,
        as_user(test::TestRequest::post().uri("/projects"), &ann)
            .set_json(json!({ "workspaceId": other, "name": "Elsewhere", "key": "ACM" }))
    );
    assert_eq!(status, StatusCode::CREATED);
}

#[actix_rt::test]
async fn test_project_requests_need_a_workspace() {
    let ctx = context();
    let ann = ctx.user("ann@acme.com");
    let app = init_app!(ctx);

    let (status, _, _) = send!(
        app,
        as_user(test::TestRequest::post().uri("/projects"), &ann).set_json(json!({ "name": "Core", "key": "ACM" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send!(app, as_user(test::TestRequest::get().uri("/projects"), &ann));
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_projects_are_tenant_isolated() {
    let ctx = context();
    let ann = ctx.user("ann@acme.com");
    let eve = ctx.user("eve@evil.com");
    let ws = ctx.workspace(&ann, "Acme");
    let app = init_app!(ctx);

    let (_, _, project) = send!(
        app,
        as_user(test::TestRequest::post().uri("/projects"), &ann)
            .set_json(json!({ "workspaceId": ws, "name": "Core", "key": "ACM" }))
    );
    let uri = format!("/projects/{}", project["id"].as_str().unwrap());

    let (status, _, _) = send!(app, as_user(test::TestRequest::get().uri(&uri), &eve));
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = send!(
        app,
        as_user(test::TestRequest::patch().uri(&uri), &eve).set_json(json!({ "name": "Mine now" }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = send!(
        app,
        as_user(
            test::TestRequest::get().uri(&list_uri("/projects", json!({ "workspaceId": ws }), None)),
            &eve
        )
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = send!(
        app,
        as_user(test::TestRequest::post().uri("/projects"), &eve)
            .set_json(json!({ "workspaceId": ws, "name": "Sneaky", "key": "SNK" }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = send!(app, as_user(test::TestRequest::get().uri("/projects/missing"), &ann));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_archived_projects_leave_the_list() {
    let ctx = context();
    let ann = ctx.user("ann@acme.com");
    let ws = ctx.workspace(&ann, "Acme");
    let app = init_app!(ctx);

    let (_, _, project) = send!(
        app,
        as_user(test::TestRequest::post().uri("/projects"), &ann)
            .set_json(json!({ "workspaceId": ws, "name": "Core", "key": "ACM" }))
    );
    let uri = format!("/projects/{}", project["id"].as_str().unwrap());

    let (status, _, first) = send!(app, as_user(test::TestRequest::delete().uri(&uri), &ann));
    assert_eq!(status, StatusCode::OK);
    assert!(first["archivedAt"].is_string());

    let (status, _, second) = send!(app, as_user(test::TestRequest::delete().uri(&uri), &ann));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["archivedAt"], first["archivedAt"]);

    let (_, headers, body) = send!(
        app,
        as_user(
            test::TestRequest::get().uri(&list_uri("/projects", json!({ "workspaceId": ws }), None)),
            &ann
        )
    );
    assert!(body.as_array().unwrap().is_empty());
    assert_eq!(content_range(&headers), "projects */0");

    // Still readable by id
    let (status, _, fetched) = send!(app, as_user(test::TestRequest::get().uri(&uri), &ann));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["key"], "ACM");
}

#[actix_rt::test]
async fn test_renaming_a_key_onto_another_conflicts() {
    let ctx = context();
    let ann = ctx.user("ann@acme.com");
    let ws = ctx.workspace(&ann, "Acme");
    let app = init_app!(ctx);

    send!(
        app,
        as_user(test::TestRequest::post().uri("/projects"), &ann)
            .set_json(json!({ "workspaceId": ws, "name": "Core", "key": "ACM" }))
    );
    let (_, _, web) = send!(
        app,
        as_user(test::TestRequest::post().uri("/projects"), &ann)
            .set_json(json!({ "workspaceId": ws, "name": "Web", "key": "WEB" }))
    );
    let uri = format!("/projects/{}", web["id"].as_str().unwrap());

    let (status, _, _) = send!(
        app,
        as_user(test::TestRequest::patch().uri(&uri), &ann).set_json(json!({ "key": "acm" }))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, body) = send!(
        app,
        as_user(test::TestRequest::patch().uri(&uri), &ann).set_json(json!({ "description": "Site" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Site");
    assert_eq!(body["key"], "WEB");
}
