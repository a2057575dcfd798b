//! Region leadership and complaint import

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

use common::TestApp;

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_leader_is_promoted_and_scoped() {
    let app = TestApp::spawn().await;
    let owner = app.session("owner").await;
    let driver = app.session("user").await;

    let led = app
        .post(
            "/api/v1/regions",
            &owner.token,
            json!({ "name": format!("North {}", Uuid::new_v4()), "leader_id": driver.id }),
        )
        .await;
    assert_eq!(led.status, StatusCode::CREATED, "{}", led.body);
    assert_eq!(led.body["leader"]["id"], driver.id.to_string());
    assert_eq!(led.body["leader"]["role"], "leader");
    let led_id = led.body["id"].as_str().unwrap().to_string();

    let other = app
        .post(
            "/api/v1/regions",
            &owner.token,
            json!({ "name": format!("South {}", Uuid::new_v4()) }),
        )
        .await;
    let other_id = other.body["id"].as_str().unwrap().to_string();

    // Role is read from the database, so the old token already carries leadership
    let mine = app.get("/api/v1/regions/my-regions", &driver.token).await;
    assert_eq!(mine.status, StatusCode::OK);
    assert_eq!(mine.body.as_array().unwrap().len(), 1);

    let visible = app
        .get(&format!("/api/v1/regions/{}", led_id), &driver.token)
        .await;
    assert_eq!(visible.status, StatusCode::OK);

    let hidden = app
        .get(&format!("/api/v1/regions/{}", other_id), &driver.token)
        .await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);

    let removed = app
        .request(
            Method::DELETE,
            &format!("/api/v1/regions/{}/leader", led_id),
            Some(&owner.token),
            None,
        )
        .await;
    assert_eq!(removed.status, StatusCode::OK, "{}", removed.body);

    let user = app
        .get(&format!("/api/v1/users/{}", driver.id), &owner.token)
        .await;
    assert_eq!(user.body["role"], "user");

    let again = app
        .request(
            Method::DELETE,
            &format!("/api/v1/regions/{}/leader", led_id),
            Some(&owner.token),
            None,
        )
        .await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
}

fn complaint(number: i32) -> Value {
    json!({
        "complaint_number": number,
        "client": "ACME",
        "description": "Parcel left outside",
        "problem_type": "delivery",
        "compensation_value": 15.5,
        "courier": "Dana",
        "address": "Main Street 12",
        "delivery_date": "2024-03-04"
    })
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_region_with_unknown_leader_is_not_created() {
    let app = TestApp::spawn().await;
    let owner = app.session("owner").await;
    let name = format!("Ghost {}", Uuid::new_v4());

    let created = app
        .post(
            "/api/v1/regions",
            &owner.token,
            json!({ "name": name, "leader_id": Uuid::new_v4() }),
        )
        .await;
    assert_eq!(created.status, StatusCode::NOT_FOUND);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM regions WHERE name = $1")
        .bind(&name)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_bulk_import_skips_duplicates() {
    let app = TestApp::spawn().await;
    let admin = app.session("admin").await;
    let number = (Uuid::new_v4().as_u128() % 1_000_000_000) as i32 + 1;

    let first = app
        .post(
            "/api/v1/complaints/bulk",
            &admin.token,
            json!([complaint(number), complaint(number + 1)]),
        )
        .await;
    assert_eq!(first.status, StatusCode::CREATED, "{}", first.body);
    assert_eq!(first.body["total_created"], 2);
    assert_eq!(first.body["total_skipped"], 0);

    let second = app
        .post(
            "/api/v1/complaints/bulk",
            &admin.token,
            json!([complaint(number), complaint(number + 2)]),
        )
        .await;
    assert_eq!(second.body["total_created"], 1);
    assert_eq!(second.body["total_skipped"], 1);
    assert_eq!(second.body["total_processed"], 2);

    let ids: Vec<i64> = first.body["created"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    let status = app
        .post(
            "/api/v1/complaints/bulk-status",
            &admin.token,
            json!({ "complaint_ids": ids, "status": "accepted" }),
        )
        .await;
    assert_eq!(status.status, StatusCode::OK);
    assert_eq!(status.body["success"], true);
    assert_eq!(status.body["updated_count"], 2);

    let nothing = app
        .post(
            "/api/v1/complaints/bulk-status",
            &admin.token,
            json!({ "complaint_ids": [2147483000], "status": "accepted" }),
        )
        .await;
    assert_eq!(nothing.body["success"], false);

    let page = app
        .get("/api/v1/complaints?limit=1&sort_order=asc", &admin.token)
        .await;
    assert_eq!(page.status, StatusCode::OK, "{}", page.body);
    assert_eq!(page.body["data"].as_array().unwrap().len(), 1);
    assert_eq!(page.body["meta"]["limit"], 1);

    let stats = app
        .get("/api/v1/complaints/stats?year=2024", &admin.token)
        .await;
    assert_eq!(stats.status, StatusCode::OK);
    assert!(stats.body["by_status"]["accepted"].as_i64().unwrap() >= 2);
}
