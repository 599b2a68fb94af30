//! Metafield group storage and JSON API against `PostgreSQL`.
//!
//! Each test gets a fresh database from `sqlx::test` with the admin
//! migrations applied. Needs `DATABASE_URL`; run with `--ignored`.

#![allow(clippy::unwrap_used)]

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use metafield_groups_admin::db::{MetafieldGroupRepository, RepositoryError};
use metafield_groups_admin::models::{GroupName, MetafieldSelection};
use metafield_groups_core::MetafieldGroupId;
use metafield_groups_integration_tests::app;

fn name(raw: &str) -> GroupName {
    GroupName::parse(raw).unwrap()
}

async fn send(pool: PgPool, request: Request<Body>) -> (StatusCode, Value) {
    let response = app(pool).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_create_then_list(pool: PgPool) {
    let repo = MetafieldGroupRepository::new(&pool);

    let first = repo.create(&name("Apparel")).await.unwrap();
    let second = repo.create(&name("Food")).await.unwrap();
    assert!(first.metafields.is_empty());

    let groups = repo.list().await.unwrap();
    let ids: Vec<MetafieldGroupId> = groups.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_delete_removes_group(pool: PgPool) {
    let repo = MetafieldGroupRepository::new(&pool);
    let group = repo.create(&name("Apparel")).await.unwrap();

    assert_eq!(repo.delete(group.id).await.unwrap(), group.id);
    assert!(repo.list().await.unwrap().is_empty());
    assert!(matches!(
        repo.delete(group.id).await,
        Err(RepositoryError::NotFound)
    ));
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_assignment_round_trip(pool: PgPool) {
    let repo = MetafieldGroupRepository::new(&pool);
    let group = repo.create(&name("Apparel")).await.unwrap();
    let selection = MetafieldSelection::from_ids([
        "gid://shopify/MetafieldDefinition/3",
        "gid://shopify/MetafieldDefinition/1",
    ]);

    repo.update_metafields(group.id, &selection).await.unwrap();

    let reloaded = repo.get(group.id).await.unwrap().unwrap();
    assert_eq!(reloaded.metafields, selection.as_slice());
    assert!(reloaded.updated_at >= reloaded.created_at);
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_combined_action_over_http(pool: PgPool) {
    let form = |body: String| {
        Request::post("/api/groups")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    };

    let (status, created) = send(pool.clone(), form("name=Apparel".to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["name"], "Apparel");
    assert_eq!(created["metafields"], serde_json::json!([]));
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        pool.clone(),
        form(format!("groupId={id}&metafields=%5B%22gid%3A%2F%2Fshopify%2FMetafieldDefinition%2F1%22%5D")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, serde_json::json!({"success": true}));

    let (_, listed) = send(pool.clone(), Request::get("/api/groups").body(Body::empty()).unwrap()).await;
    assert_eq!(
        listed[0]["metafields"],
        serde_json::json!(["gid://shopify/MetafieldDefinition/1"])
    );

    let (status, deleted) = send(pool.clone(), form(format!("deleteId={id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, serde_json::json!({"success": true, "deletedId": id}));
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_delete_missing_group_is_not_found(pool: PgPool) {
    let request = Request::delete(format!("/api/groups/{}", MetafieldGroupId::generate()))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(pool, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Group not found");
}
