//! Cars, work entries, settings and routes lists end to end

mod common;

use axum::http::{Method, StatusCode};
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use common::{TestApp, unique_plate};

async fn create_car(app: &TestApp, token: &str, owner: &str) -> String {
    let car = app
        .post(
            "/api/v1/cars",
            token,
            json!({ "name": "Van", "license_plate": unique_plate(), "owner": owner }),
        )
        .await;
    assert_eq!(car.status, StatusCode::CREATED, "{}", car.body);
    car.body["id"].as_str().unwrap().to_string()
}

async fn insert_route_list(
    app: &TestApp,
    route: &str,
    date: NaiveDate,
    stops: i32,
    packages: i32,
) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO routes_lists (route, date, number_of_stops, number_of_packages) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(route)
    .bind(date)
    .bind(stops)
    .bind(packages)
    .fetch_one(&app.pool)
    .await
    .unwrap()
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_reassigning_a_car_moves_it_between_users() {
    let app = TestApp::spawn().await;
    let admin = app.session("admin").await;
    let first = app.session("user").await;
    let second = app.session("user").await;
    let car_id = create_car(&app, &admin.token, "own_company").await;

    let assigned = app
        .patch(
            &format!("/api/v1/cars/{}/assign", car_id),
            &admin.token,
            json!({ "assigned_user_id": first.id }),
        )
        .await;
    assert_eq!(assigned.status, StatusCode::OK, "{}", assigned.body);
    assert_eq!(assigned.body["assigned_user"]["id"], first.id.to_string());

    let moved = app
        .patch(
            &format!("/api/v1/cars/{}/assign", car_id),
            &admin.token,
            json!({ "assigned_user_id": second.id }),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK, "{}", moved.body);

    let first_user = app
        .get(&format!("/api/v1/users/{}", first.id), &admin.token)
        .await;
    assert!(first_user.body["car_id"].is_null());

    let second_user = app
        .get(&format!("/api/v1/users/{}", second.id), &admin.token)
        .await;
    assert_eq!(second_user.body["car_id"], car_id);

    let released = app
        .request(
            Method::POST,
            &format!("/api/v1/cars/{}/unassign", car_id),
            Some(&admin.token),
            None,
        )
        .await;
    assert_eq!(released.status, StatusCode::OK);
    assert!(released.body["assigned_user_id"].is_null());

    let second_user = app
        .get(&format!("/api/v1/users/{}", second.id), &admin.token)
        .await;
    assert!(second_user.body["car_id"].is_null());
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_work_entry_financials_follow_car_owner() {
    let app = TestApp::spawn().await;
    let admin = app.session("admin").await;
    let driver = app.session("user").await;
    let car_id = create_car(&app, &admin.token, "own_company").await;

    let pay = app
        .patch(
            &format!("/api/v1/users/{}/paid-per-stop", driver.id),
            &admin.token,
            json!({ "paid_per_stop": 2.5 }),
        )
        .await;
    assert_eq!(pay.status, StatusCode::OK, "{}", pay.body);

    app.patch(
        &format!("/api/v1/cars/{}/assign", car_id),
        &admin.token,
        json!({ "assigned_user_id": driver.id }),
    )
    .await;

    // Car defaults to the driver's assignment
    let entry = app
        .post(
            "/api/v1/work-entries",
            &driver.token,
            json!({ "stops_completed": 100, "work_date": "2024-05-02" }),
        )
        .await;
    assert_eq!(entry.status, StatusCode::CREATED, "{}", entry.body);
    assert_eq!(entry.body["car_id"], car_id);
    assert_eq!(entry.body["revenue"], 600.0);
    assert_eq!(entry.body["driver_pay"], 250.0);
    assert_eq!(entry.body["company_profit"], 350.0);

    let mine = app
        .get("/api/v1/work-entries/my-entries?month=2024-05-20", &driver.token)
        .await;
    assert_eq!(mine.status, StatusCode::OK);
    assert_eq!(mine.body.as_array().unwrap().len(), 1);

    let other_month = app
        .get("/api/v1/work-entries/my-entries?month=2024-06-01", &driver.token)
        .await;
    assert!(other_month.body.as_array().unwrap().is_empty());

    let listing = app.get("/api/v1/work-entries", &driver.token).await;
    assert_eq!(listing.status, StatusCode::FORBIDDEN);

    let summary = app
        .get(
            &format!("/api/v1/work-entries/summary?user_id={}", driver.id),
            &admin.token,
        )
        .await;
    assert_eq!(summary.status, StatusCode::OK, "{}", summary.body);
    assert_eq!(summary.body["total_stops"], 100);
    assert_eq!(summary.body["total_revenue"], 600.0);
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_only_the_author_edits_a_work_entry() {
    let app = TestApp::spawn().await;
    let admin = app.session("admin").await;
    let driver = app.session("user").await;

    let entry = app
        .post(
            "/api/v1/work-entries",
            &driver.token,
            json!({ "stops_completed": 10, "work_date": "2024-05-03" }),
        )
        .await;
    assert_eq!(entry.status, StatusCode::CREATED, "{}", entry.body);
    let uri = format!("/api/v1/work-entries/{}", entry.body["id"].as_str().unwrap());

    let by_admin = app
        .patch(&uri, &admin.token, json!({ "stops_completed": 11 }))
        .await;
    assert_eq!(by_admin.status, StatusCode::FORBIDDEN);

    let by_driver = app
        .patch(&uri, &driver.token, json!({ "stops_completed": 12 }))
        .await;
    assert_eq!(by_driver.status, StatusCode::OK);
    assert_eq!(by_driver.body["stops_completed"], 12);
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_settings_reject_bad_rates() {
    let app = TestApp::spawn().await;
    let owner = app.session("owner").await;

    let settings = app.get("/api/v1/settings", &owner.token).await;
    assert_eq!(settings.status, StatusCode::OK);
    assert!(settings.body.as_array().unwrap().len() >= 4);

    let negative = app
        .patch("/api/v1/settings/company_car_rate", &owner.token, json!({ "value": -1 }))
        .await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);

    let unknown = app
        .patch("/api/v1/settings/no_such_key", &owner.token, json!({ "value": "x" }))
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let name = app
        .patch(
            "/api/v1/settings/own_company_display_name",
            &owner.token,
            json!({ "value": "Own Company" }),
        )
        .await;
    assert_eq!(name.status, StatusCode::OK, "{}", name.body);
    assert_eq!(name.body["value"], "Own Company");
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_transfer_to_helper_route() {
    let app = TestApp::spawn().await;
    let admin = app.session("admin").await;
    let date = NaiveDate::from_ymd_opt(2024, 7, 9).unwrap();
    let source = insert_route_list(&app, &format!("R-{}", Uuid::new_v4()), date, 20, 10).await;
    let helper = format!("Helper-{}", Uuid::new_v4());

    let moved = app
        .post(
            &format!("/api/v1/routes-lists/{}/transfer", source),
            &admin.token,
            json!({ "target_route": helper, "number_of_stops": 5, "number_of_packages": 3 }),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK, "{}", moved.body);
    assert_eq!(moved.body["source_route"]["number_of_stops"], 15);
    assert_eq!(moved.body["source_route"]["number_of_packages"], 7);
    assert_eq!(moved.body["target_route"]["route"], helper);
    assert_eq!(moved.body["target_route"]["date"], "2024-07-09");

    // Same helper again adds to the existing record
    let again = app
        .post(
            &format!("/api/v1/routes-lists/{}/transfer", source),
            &admin.token,
            json!({ "target_route": helper, "number_of_stops": 5, "number_of_packages": 0 }),
        )
        .await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.body["target_route"]["number_of_stops"], 10);
    assert_eq!(again.body["target_route"]["id"], moved.body["target_route"]["id"]);

    let too_many = app
        .post(
            &format!("/api/v1/routes-lists/{}/transfer", source),
            &admin.token,
            json!({ "target_route": helper, "number_of_stops": 50, "number_of_packages": 0 }),
        )
        .await;
    assert_eq!(too_many.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_transfer_needs_matching_dates() {
    let app = TestApp::spawn().await;
    let owner = app.session("owner").await;
    let source = insert_route_list(
        &app,
        "Source",
        NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
        10,
        10,
    )
    .await;
    let target = insert_route_list(
        &app,
        "Target",
        NaiveDate::from_ymd_opt(2024, 8, 2).unwrap(),
        0,
        0,
    )
    .await;

    let response = app
        .post(
            &format!("/api/v1/routes-lists/{}/transfer", source),
            &owner.token,
            json!({ "target_route_id": target, "number_of_stops": 1, "number_of_packages": 1 }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let missing = app
        .post(
            "/api/v1/routes-lists/2147483000/transfer",
            &owner.token,
            json!({ "target_route_id": target, "number_of_stops": 1, "number_of_packages": 1 }),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_user_and_car_side_assignments_do_not_deadlock() {
    let app = TestApp::spawn().await;
    let admin = app.session("admin").await;
    let first = app.session("user").await;
    let second = app.session("user").await;
    let car_id = create_car(&app, &admin.token, "own_company").await;

    for _ in 0..15 {
        let user_path = format!("/api/v1/users/{}", first.id);
        let car_path = format!("/api/v1/cars/{}/assign", car_id);
        let (from_user, from_car) = tokio::join!(
            app.patch(
                &user_path,
                &admin.token,
                json!({ "car_id": car_id }),
            ),
            app.patch(
                &car_path,
                &admin.token,
                json!({ "assigned_user_id": second.id }),
            ),
        );
        assert_eq!(from_user.status, StatusCode::OK, "{}", from_user.body);
        assert_eq!(from_car.status, StatusCode::OK, "{}", from_car.body);
    }

    let holders: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE car_id = $1::uuid")
        .bind(&car_id)
        .fetch_all(&app.pool)
        .await
        .unwrap();
    let assigned: Option<Uuid> =
        sqlx::query_scalar("SELECT assigned_user_id FROM cars WHERE id = $1::uuid")
            .bind(&car_id)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(holders.len(), 1);
    assert_eq!(assigned, Some(holders[0]));
}
