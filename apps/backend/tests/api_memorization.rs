//! Memorization API tests.
//!
//! These run against the in-memory store with a controllable clock.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use serde_json::Value;
use uuid::Uuid;

use common::fixtures;
use common::TestContext;

fn server(ctx: &TestContext) -> TestServer {
    TestServer::new(ctx.router()).unwrap()
}

async fn memorize(server: &TestServer, user: Uuid, unit: Option<u32>) -> Value {
    let (name, value) = TestContext::user_header(user);
    let response = server
        .post("/api/memorization/memorize")
        .add_header(name, value)
        .json(&fixtures::memorize_request(unit))
        .await;
    response.assert_status_ok();
    response.json()
}

async fn plan(server: &TestServer, user: Uuid) -> Value {
    let (name, value) = TestContext::user_header(user);
    let response = server
        .get("/api/memorization/plan")
        .add_header(name, value)
        .await;
    response.assert_status_ok();
    response.json()
}

/// Test the health check needs no learner id.
#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    let response = server.get("/health").await;

    response.assert_status_ok();
    response.assert_text("OK");
}

/// Test requests without X-User-Id are rejected.
#[tokio::test]
async fn test_missing_user_header() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    let response = server.get("/api/memorization/plan").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "unauthorized");
}

/// Test a malformed learner id is rejected.
#[tokio::test]
async fn test_invalid_user_header() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    let response = server
        .get("/api/memorization/plan")
        .add_header(
            axum::http::HeaderName::from_static("x-user-id"),
            axum::http::HeaderValue::from_static("not-a-uuid"),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

/// Test a new learner starts at page 1 with nothing due.
#[tokio::test]
async fn test_plan_for_new_learner() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    let body = plan(&server, Uuid::new_v4()).await;

    assert_eq!(body["today"], "2024-03-01");
    assert_eq!(body["new_units"], serde_json::json!([1]));
    assert!(body["due_reviews"].as_array().unwrap().is_empty());
    assert_eq!(body["due_total"], 0);
    assert_eq!(body["settings"]["daily_new_units_target"], 1);
    assert_eq!(body["settings"]["daily_review_units_target"], 5);
    assert_eq!(body["rewards"]["points"], 0);
}

/// Test memorizing the suggested unit advances the cursor.
#[tokio::test]
async fn test_memorize_next_unit() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let user = Uuid::new_v4();

    let body = memorize(&server, user, None).await;

    assert_eq!(body["unit"]["unit_number"], 1);
    assert_eq!(body["unit"]["status"], "memorized");
    assert_eq!(body["unit"]["review_count"], 0);
    assert_eq!(body["unit"]["next_review_at"], "2024-03-02T08:00:00Z");
    assert_eq!(body["newly_memorized"], true);
    assert_eq!(body["cursor_unit"], 2);
    assert_eq!(body["counters"]["new_units_done_today"], 1);
    assert_eq!(body["rewards"]["points"], 50);

    // Today's new-unit target is met, so nothing else is suggested.
    let body = plan(&server, user).await;
    assert!(body["new_units"].as_array().unwrap().is_empty());
    assert_eq!(body["new_remaining"], 0);
}

/// Test memorizing a unit twice does not award points again.
#[tokio::test]
async fn test_memorize_same_unit_twice() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let user = Uuid::new_v4();

    memorize(&server, user, Some(9)).await;
    let body = memorize(&server, user, Some(9)).await;

    assert_eq!(body["newly_memorized"], false);
    assert_eq!(body["rewards"]["points"], 50);
    assert_eq!(body["counters"]["new_units_done_today"], 1);
}

/// Test units outside 1..=604 are rejected.
#[tokio::test]
async fn test_memorize_out_of_range() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let (name, value) = TestContext::user_header(Uuid::new_v4());

    for unit in [0, 605] {
        let response = server
            .post("/api/memorization/memorize")
            .add_header(name.clone(), value.clone())
            .json(&fixtures::memorize_request(Some(unit)))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

/// Test reviewing a unit that was never memorized.
#[tokio::test]
async fn test_review_unknown_unit() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let (name, value) = TestContext::user_header(Uuid::new_v4());

    let response = server
        .post("/api/memorization/review")
        .add_header(name, value)
        .json(&fixtures::review_request(3, "good"))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

/// Test an unknown quality is rejected by the JSON extractor.
#[tokio::test]
async fn test_review_invalid_quality() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let user = Uuid::new_v4();
    memorize(&server, user, Some(1)).await;
    let (name, value) = TestContext::user_header(user);

    let response = server
        .post("/api/memorization/review")
        .add_header(name, value)
        .json(&fixtures::review_request(1, "again"))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

/// Test the review cycle: due the next day, then pushed out by the interval table.
#[tokio::test]
async fn test_review_flow() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let user = Uuid::new_v4();
    memorize(&server, user, Some(1)).await;

    let body = plan(&server, user).await;
    assert!(body["due_reviews"].as_array().unwrap().is_empty());

    ctx.advance_days(1);
    let body = plan(&server, user).await;
    assert_eq!(body["today"], "2024-03-02");
    assert_eq!(body["due_total"], 1);
    assert_eq!(body["due_reviews"][0]["unit_number"], 1);
    assert_eq!(body["counters"]["new_units_done_today"], 0);

    let (name, value) = TestContext::user_header(user);
    let response = server
        .post("/api/memorization/review")
        .add_header(name, value)
        .json(&fixtures::review_request(1, "good"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["unit"]["review_count"], 1);
    assert_eq!(body["unit"]["status"], "reviewed");
    assert_eq!(body["unit"]["next_review_at"], "2024-03-05T08:00:00Z");
    assert_eq!(body["points_awarded"], 20);
    assert_eq!(body["counters"]["review_units_done_today"], 1);

    let body = plan(&server, user).await;
    assert_eq!(body["due_total"], 0);
}

/// Test meeting both daily targets grows the streak and awards the bonus once.
#[tokio::test]
async fn test_daily_goal_bonus() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let user = Uuid::new_v4();
    let (name, value) = TestContext::user_header(user);

    server
        .put("/api/settings")
        .add_header(name.clone(), value.clone())
        .json(&fixtures::settings_request(Some(1), Some(1)))
        .await
        .assert_status_ok();

    memorize(&server, user, Some(1)).await;
    ctx.advance_days(1);

    let body = memorize(&server, user, Some(2)).await;
    assert_eq!(body["goal"]["goal_met"], false);

    let response = server
        .post("/api/memorization/review")
        .add_header(name.clone(), value.clone())
        .json(&fixtures::review_request(1, "easy"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["goal"]["goal_met"], true);
    assert_eq!(body["goal"]["bonus_awarded"], true);
    assert_eq!(body["rewards"]["streak"], 1);
    // Two memorized pages, one easy review and the bonus.
    assert_eq!(body["rewards"]["points"], 50 + 50 + 30 + 100);

    let body = memorize(&server, user, Some(3)).await;
    assert_eq!(body["goal"]["bonus_awarded"], false);
    assert_eq!(body["rewards"]["streak"], 1);
    assert_eq!(body["rewards"]["points"], 50 + 50 + 30 + 100 + 50);
}

/// Test progress returns the full record.
#[tokio::test]
async fn test_progress() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let user = Uuid::new_v4();
    memorize(&server, user, Some(3)).await;
    memorize(&server, user, Some(1)).await;
    let (name, value) = TestContext::user_header(user);

    let response = server
        .get("/api/memorization/progress")
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let units: Vec<u64> = body["units"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["unit_number"].as_u64().unwrap())
        .collect();
    assert_eq!(units, vec![3, 1]);
    assert_eq!(body["settings"]["cursor_unit"], 2);
    assert_eq!(body["settings"]["started_at"], "2024-03-01T08:00:00Z");
}

/// Test learners do not see each other's progress.
#[tokio::test]
async fn test_learners_are_isolated() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    memorize(&server, Uuid::new_v4(), Some(1)).await;

    let body = plan(&server, Uuid::new_v4()).await;

    assert_eq!(body["new_units"], serde_json::json!([1]));
    assert_eq!(body["rewards"]["points"], 0);
}
