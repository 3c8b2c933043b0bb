// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::{router, AppState, USER_ID_HEADER, USER_NAME_HEADER};
use crate::model::fixtures::{demo_diagram, DEMO_DIAGRAM_ID, DEMO_USER_ID};
use crate::store::MemoryStore;

fn app() -> Router {
    router(AppState::new(MemoryStore::with_diagrams([demo_diagram(1)])))
}

struct Reply {
    status: StatusCode,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("json body")
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("utf-8 body")
    }
}

async fn send(app: &Router, method: &str, uri: &str, user: Option<&str>, body: Option<Value>) -> Reply {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        request = request.header(USER_ID_HEADER, user).header(USER_NAME_HEADER, user);
    }
    let body = match body {
        Some(body) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).expect("request"))
        .await
        .expect("router is infallible");
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("collect body")
        .to_vec();
    Reply {
        status,
        content_type,
        body,
    }
}

fn demo_uri(suffix: &str) -> String {
    format!("/api/diagrams/{DEMO_DIAGRAM_ID}{suffix}")
}

#[tokio::test]
async fn requests_without_identity_are_unauthorized() {
    let app = app();
    let reply = send(&app, "GET", "/api/diagrams", None, None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert!(reply.json()["error"].as_str().is_some_and(|msg| msg.contains(USER_ID_HEADER)));

    let reply = send(&app, "GET", "/api/diagrams/public", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json().as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn create_then_list_own_diagrams() {
    let app = app();
    let reply = send(
        &app,
        "POST",
        "/api/diagrams",
        Some("alice"),
        Some(json!({
            "name": "Scrap rate",
            "creator": "Alice",
            "effectLabel": "Too much scrap",
            "roots": [{ "label": "Machine", "children": [{ "label": "Worn tooling", "status": "issue" }] }]
        })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    let created = reply.json();
    assert_eq!(created["creatorId"], "alice");
    assert_eq!(created["roots"][0]["children"][0]["status"], "issue");

    let own = send(&app, "GET", "/api/diagrams", Some("alice"), None).await.json();
    assert_eq!(own.as_array().map(Vec::len), Some(1));
    assert_eq!(own[0]["id"], created["id"]);

    let page = send(&app, "GET", "/api/diagrams/public?limit=1&page=2", None, None).await.json();
    assert_eq!(page["total"], 2);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["data"][0]["id"], created["id"]);

    let stats = send(&app, "GET", "/api/diagrams/stats", Some("alice"), None).await.json();
    assert_eq!(stats["totalDiagrams"], 2);
    assert_eq!(stats["creatorStats"]["Alice"], 1);
}

#[tokio::test]
async fn invalid_create_bodies_are_bad_requests() {
    let app = app();
    let reply = send(
        &app,
        "POST",
        "/api/diagrams",
        Some("alice"),
        Some(json!({ "name": " ", "creator": "Alice", "effectLabel": "E" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = send(
        &app,
        "POST",
        "/api/diagrams",
        Some("alice"),
        Some(json!({ "name": "N", "creator": "Alice", "effectLabel": "E", "roots": [{ "label": "x", "status": "done" }] })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn diagrams_are_owner_guarded() {
    let app = app();
    assert_eq!(send(&app, "GET", &demo_uri(""), Some(DEMO_USER_ID), None).await.status, StatusCode::OK);
    assert_eq!(send(&app, "GET", &demo_uri(""), Some("mallory"), None).await.status, StatusCode::FORBIDDEN);
    assert_eq!(
        send(&app, "DELETE", &demo_uri(""), Some("mallory"), None).await.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        send(&app, "GET", "/api/diagrams/nope", Some(DEMO_USER_ID), None).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        send(&app, "GET", "/api/diagrams/.hidden", Some(DEMO_USER_ID), None).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn update_and_delete_whole_diagrams() {
    let app = app();
    let reply = send(
        &app,
        "PUT",
        &demo_uri(""),
        Some(DEMO_USER_ID),
        Some(json!({ "name": "Renamed", "roots": [{ "label": "People" }] })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let updated = reply.json();
    assert_eq!(updated["name"], "Renamed");
    assert_eq!(updated["roots"].as_array().map(Vec::len), Some(1));
    assert_eq!(updated["effectLabel"], "Orders ship late");

    let reply = send(&app, "DELETE", &demo_uri(""), Some(DEMO_USER_ID), None).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    assert_eq!(
        send(&app, "GET", &demo_uri(""), Some(DEMO_USER_ID), None).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn bone_routes_insert_patch_and_delete_by_path() {
    let app = app();
    let owner = Some(DEMO_USER_ID);

    let reply = send(&app, "POST", &demo_uri("/bones/effect"), owner, Some(json!({ "label": "Methods" }))).await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.json()["roots"][5]["label"], "Methods");

    let reply = send(
        &app,
        "POST",
        &demo_uri("/bones/bone-5"),
        owner,
        Some(json!({ "label": "No written SOP" })),
    )
    .await;
    assert_eq!(reply.json()["roots"][5]["children"][0]["label"], "No written SOP");

    let reply = send(
        &app,
        "PUT",
        &demo_uri("/bones/bone-0"),
        owner,
        Some(json!({ "status": "resolved", "info": "Hiring approved" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let patched = reply.json();
    assert_eq!(patched["roots"][0]["status"], "resolved");
    assert_eq!(patched["roots"][0]["label"], "People");
    assert_eq!(patched["roots"][0]["children"].as_array().map(Vec::len), Some(3));

    let reply = send(&app, "PUT", &demo_uri("/bones/effect"), owner, Some(json!({ "label": "Orders late" }))).await;
    assert_eq!(reply.json()["effectLabel"], "Orders late");

    let reply = send(&app, "DELETE", &demo_uri("/bones/bone-1"), owner, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["roots"][1]["label"], "Technology");
}

#[tokio::test]
async fn bone_route_failures_map_to_status_codes() {
    let app = app();
    let owner = Some(DEMO_USER_ID);

    let cases = [
        ("POST", "/bones/bone-0", Some(json!({ "label": "  " })), StatusCode::BAD_REQUEST),
        ("DELETE", "/bones/bone-9", None, StatusCode::NOT_FOUND),
        ("DELETE", "/bones/garbage", None, StatusCode::NOT_FOUND),
        ("DELETE", "/bones/effect", None, StatusCode::BAD_REQUEST),
        ("PUT", "/bones/bone-0", Some(json!({ "status": "done" })), StatusCode::BAD_REQUEST),
        (
            "PUT",
            "/bones/effect",
            Some(json!({ "label": "Renamed", "status": "issue" })),
            StatusCode::BAD_REQUEST,
        ),
        ("PUT", "/bones/effect", Some(json!({ "status": "" })), StatusCode::BAD_REQUEST),
    ];
    for (method, suffix, body, expected) in cases {
        let reply = send(&app, method, &demo_uri(suffix), owner, body).await;
        assert_eq!(reply.status, expected, "{method} {suffix}");
    }

    let reply = send(&app, "DELETE", &demo_uri("/bones/bone-0"), Some("mallory"), None).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let unchanged = send(&app, "GET", &demo_uri(""), owner, None).await.json();
    assert_eq!(unchanged["roots"].as_array().map(Vec::len), Some(5));
    assert_eq!(unchanged["effectLabel"], "Orders ship late");
}

#[tokio::test]
async fn layout_and_svg_render_the_stored_diagram() {
    let app = app();
    let owner = Some(DEMO_USER_ID);

    let collapsed = send(&app, "GET", &demo_uri("/layout"), owner, None).await.json();
    let reply = send(
        &app,
        "GET",
        &demo_uri("/layout?width=800&height=400&theme=dark&expanded=bone-1,bone-1-0&selected=bone-2"),
        owner,
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let expanded = reply.json();
    assert_eq!(expanded["theme"], "dark");
    assert_eq!(expanded["canvas"]["width"], 800.0);
    let count = |layout: &Value| layout["primitives"].as_array().map(Vec::len).unwrap_or_default();
    assert!(count(&expanded) > count(&collapsed));

    let reply = send(&app, "GET", &demo_uri("/layout?theme=sepia"), owner, None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let reply = send(&app, "GET", &demo_uri("/layout?width=0"), owner, None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = send(&app, "GET", &demo_uri("/svg"), owner, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.content_type.as_deref(), Some("image/svg+xml"));
    assert!(reply.text().starts_with("<svg "));
    assert!(reply.text().contains("data-path=\"bone-0\""));
}
