use axum::http::{Method, StatusCode};
use chrono::{NaiveDate, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;

use user_api::models::calculate_age;
use user_api::UserRepository;

use crate::common::{send, send_raw, send_with_headers, test_app};

fn expected_age(dob: &str) -> i64 {
    let dob = NaiveDate::parse_from_str(dob, "%Y-%m-%d").unwrap();
    calculate_age(dob, Utc::now().date_naive()) as i64
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let (app, _) = test_app();

    let response = send(&app, Method::GET, "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({"status": "ok", "message": "User API is running"})
    );
}

#[tokio::test]
async fn test_create_user_returns_created() {
    let (app, _) = test_app();

    let response = send(
        &app,
        Method::POST,
        "/api/v1/users/",
        Some(json!({"name": "Ada", "dob": "1990-05-10"})),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(
        response.body,
        json!({"id": 1, "name": "Ada", "dob": "1990-05-10", "age": expected_age("1990-05-10")})
    );
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let (app, _) = test_app();

    let created = send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({"name": "Grace Hopper", "dob": "1906-12-09"})),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_i64().unwrap();

    let fetched = send(&app, Method::GET, &format!("/api/v1/users/{}", id), None).await;

    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["name"], "Grace Hopper");
    assert_eq!(fetched.body["dob"], "1906-12-09");
    assert_eq!(fetched.body["age"], expected_age("1906-12-09"));
}

#[tokio::test]
async fn test_create_accepts_rfc3339_dob() {
    let (app, _) = test_app();

    let response = send(
        &app,
        Method::POST,
        "/api/v1/users/",
        Some(json!({"name": "Ada", "dob": "1990-05-10T00:00:00Z"})),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["dob"], "1990-05-10");
}

#[tokio::test]
async fn test_born_today_omits_age() {
    let (app, _) = test_app();
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();

    let response = send(
        &app,
        Method::POST,
        "/api/v1/users/",
        Some(json!({"name": "Newborn", "dob": today})),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.body.get("age").is_none());
}

#[tokio::test]
async fn test_create_validation_failures() {
    let (app, repository) = test_app();

    let cases = vec![
        json!({"dob": "1990-05-10"}),
        json!({"name": "", "dob": "1990-05-10"}),
        json!({"name": "a".repeat(101), "dob": "1990-05-10"}),
        json!({"name": "Ada"}),
        json!({"name": null, "dob": "1990-05-10"}),
    ];

    for body in cases {
        let response = send(&app, Method::POST, "/api/v1/users/", Some(body.clone())).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(response.body["code"], 400);
        assert_eq!(response.body["message"], "Validation failed");
    }

    assert!(repository.is_empty().await);
}

#[tokio::test]
async fn test_create_malformed_body_is_invalid_input() {
    let (app, repository) = test_app();

    let response = send_raw(&app, Method::POST, "/api/v1/users/", "{\"name\": \"Ada\",").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Invalid input");
    assert!(response.body["details"].is_string());

    let response = send(
        &app,
        Method::POST,
        "/api/v1/users/",
        Some(json!({"name": "Ada", "dob": "10/05/1990"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Invalid input");

    let response = send(
        &app,
        Method::POST,
        "/api/v1/users/",
        Some(json!({"name": 42, "dob": "1990-05-10"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Invalid input");

    assert!(repository.is_empty().await);
}

#[tokio::test]
async fn test_list_users_empty() {
    let (app, _) = test_app();

    let response = send(&app, Method::GET, "/api/v1/users/", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn test_list_users_newest_first() {
    let (app, _) = test_app();

    for (name, dob) in [("Ada", "1815-12-10"), ("Grace", "1906-12-09"), ("Linus", "1969-12-28")] {
        let response = send(
            &app,
            Method::POST,
            "/api/v1/users/",
            Some(json!({"name": name, "dob": dob})),
        )
        .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let response = send(&app, Method::GET, "/api/v1/users", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let names: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Linus", "Grace", "Ada"]);
}

#[tokio::test]
async fn test_get_missing_user_is_not_found() {
    let (app, _) = test_app();

    let response = send(&app, Method::GET, "/api/v1/users/99", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!({"code": 404, "message": "User not found"}));
}

#[tokio::test]
async fn test_non_numeric_ids_are_bad_requests() {
    let (app, _) = test_app();
    let body = json!({"name": "Ada", "dob": "1990-05-10"});

    for uri in ["/api/v1/users/abc", "/api/v1/users/1.5", "/api/v1/users/99999999999"] {
        let get = send(&app, Method::GET, uri, None).await;
        let put = send(&app, Method::PUT, uri, Some(body.clone())).await;
        let delete = send(&app, Method::DELETE, uri, None).await;

        for response in [get, put, delete] {
            assert_eq!(response.status, StatusCode::BAD_REQUEST, "uri: {}", uri);
            assert_eq!(response.body["message"], "Invalid input");
        }
    }
}

#[tokio::test]
async fn test_update_user() {
    let (app, _) = test_app();

    let created = send(
        &app,
        Method::POST,
        "/api/v1/users/",
        Some(json!({"name": "Ada", "dob": "1990-05-10"})),
    )
    .await;
    let id = created.body["id"].as_i64().unwrap();

    let updated = send(
        &app,
        Method::PUT,
        &format!("/api/v1/users/{}", id),
        Some(json!({"name": "Ada Lovelace", "dob": "1815-12-10"})),
    )
    .await;

    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(
        updated.body,
        json!({"id": id, "name": "Ada Lovelace", "dob": "1815-12-10", "age": expected_age("1815-12-10")})
    );

    let fetched = send(&app, Method::GET, &format!("/api/v1/users/{}", id), None).await;
    assert_eq!(fetched.body, updated.body);
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() {
    let (app, _) = test_app();

    let response = send(
        &app,
        Method::PUT,
        "/api/v1/users/5",
        Some(json!({"name": "Ada", "dob": "1990-05-10"})),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_with_empty_name_leaves_storage_unchanged() {
    let (app, repository) = test_app();

    let created = send(
        &app,
        Method::POST,
        "/api/v1/users/",
        Some(json!({"name": "Ada", "dob": "1990-05-10"})),
    )
    .await;
    let id = created.body["id"].as_i64().unwrap();
    let uri = format!("/api/v1/users/{}", id);

    for body in [json!({"name": "", "dob": "1815-12-10"}), json!({"dob": "1815-12-10"})] {
        let response = send(&app, Method::PUT, &uri, Some(body)).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["message"], "Validation failed");
    }

    let fetched = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched.body, created.body);

    let stored = repository.get_by_id(id as i32).await.unwrap();
    assert_eq!(stored.created_at, stored.updated_at);
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let (app, _) = test_app();

    let created = send(
        &app,
        Method::POST,
        "/api/v1/users/",
        Some(json!({"name": "Ada", "dob": "1990-05-10"})),
    )
    .await;
    let uri = format!("/api/v1/users/{}", created.body["id"].as_i64().unwrap());

    let deleted = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(deleted.body, serde_json::Value::Null);

    let fetched = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched.status, StatusCode::NOT_FOUND);

    let deleted_again = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(deleted_again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (app, _) = test_app();

    let response = send_with_headers(
        &app,
        Method::GET,
        "/health",
        None,
        &[("X-Request-ID", "req-12345"), ("User-Agent", "integration-test")],
    )
    .await;

    assert_eq!(response.headers["x-request-id"], "req-12345");
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let (app, _) = test_app();

    let first = send(&app, Method::GET, "/api/v1/users/", None).await;
    let second = send(&app, Method::GET, "/api/v1/users/", None).await;

    let first_id = first.headers["x-request-id"].to_str().unwrap().to_string();
    let second_id = second.headers["x-request-id"].to_str().unwrap().to_string();
    assert!(!first_id.is_empty());
    assert_ne!(first_id, second_id);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (app, _) = test_app();

    let response = send(&app, Method::GET, "/api/v2/users", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["code"], 404);
}

#[tokio::test]
async fn test_wrong_method_is_json_error() {
    let (app, _) = test_app();

    let response = send(&app, Method::PATCH, "/api/v1/users/7", None).await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.body, json!({"code": 405, "message": "Method not allowed"}));
}
