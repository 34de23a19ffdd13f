#![allow(clippy::disallowed_methods)]

mod common;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use dispatch_core::{Coordinate, JobStatus, LoginForm, RegisterForm};
use gateway::{AuthUpstream, JobsUpstream, UpstreamError};
use reqwest::{Client, Url};
use serde_json::{Value, json};

use common::{TestResult, closed_port, spawn_server};

fn jobs_payload() -> Value {
    json!([
        {
            "id": 1,
            "title": "Leaking boiler",
            "type": 3,
            "status": "assigned",
            "contractor": "John Doe",
            "latitude": "40.7128",
            "longitude": "-74.0060",
            "address": "1 Main St",
            "created_at": "2024-05-01T10:00:00Z"
        },
        {
            "id": 2,
            "title": "Broken window",
            "status": "new",
            "contractor": null,
            "latitude": 51.5072,
            "longitude": -0.1276,
            "address": "2 High St"
        }
    ])
}

fn login_form(password: &str) -> LoginForm {
    LoginForm {
        email: "ops@example.com".into(),
        password: password.into(),
    }
}

async fn fake_auth_api() -> TestResult<Url> {
    let router = Router::new()
        .route(
            "/api/users/login",
            post(|Json(body): Json<Value>| async move {
                if body["password"] == "correct-horse" {
                    (
                        StatusCode::OK,
                        Json(json!({
                            "message": "Welcome back",
                            "user": {"id": "u-1", "username": "ops", "email": "ops@example.com"},
                            "token": "tok-123"
                        })),
                    )
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"message": "Invalid credentials"})),
                    )
                }
            }),
        )
        .route(
            "/api/users/register",
            post(|| async { (StatusCode::CONFLICT, Json(json!({"error": "taken"}))) }),
        );
    let addr = spawn_server(router).await?;
    Ok(Url::parse(&format!("http://{addr}"))?)
}

#[tokio::test]
async fn test_fetch_jobs_keeps_wire_coordinates() -> TestResult {
    let router = Router::new().route("/api/jobs", get(|| async { Json(jobs_payload()) }));
    let addr = spawn_server(router).await?;
    let upstream = JobsUpstream::new(Client::new(), Url::parse(&format!("http://{addr}/api/jobs"))?);

    let jobs = upstream.fetch_jobs().await?;

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].latitude, Coordinate::Text("40.7128".into()));
    assert_eq!(jobs[0].job_type, Some(3));
    assert_eq!(jobs[0].status, JobStatus::Assigned);
    assert_eq!(jobs[1].contractor, None);
    assert_eq!(jobs[1].latitude, Coordinate::from(51.5072));
    Ok(())
}

#[tokio::test]
async fn test_fetch_jobs_reports_http_status() -> TestResult {
    let router = Router::new().route(
        "/api/jobs",
        get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let addr = spawn_server(router).await?;
    let upstream = JobsUpstream::new(Client::new(), Url::parse(&format!("http://{addr}/api/jobs"))?);

    let err = upstream.fetch_jobs().await.unwrap_err();
    assert!(matches!(err, UpstreamError::Status(502)));
    assert_eq!(err.to_string(), "HTTP error! status: 502");
    Ok(())
}

#[tokio::test]
async fn test_fetch_jobs_rejects_bad_body() -> TestResult {
    let router = Router::new().route("/api/jobs", get(|| async { Json(json!({"jobs": []})) }));
    let addr = spawn_server(router).await?;
    let upstream = JobsUpstream::new(Client::new(), Url::parse(&format!("http://{addr}/api/jobs"))?);

    assert!(matches!(
        upstream.fetch_jobs().await,
        Err(UpstreamError::Body(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_login_success_carries_user_and_token() -> TestResult {
    let auth = AuthUpstream::new(Client::new(), fake_auth_api().await?);

    let response = auth.login(&login_form("correct-horse")).await;

    assert!(response.success);
    assert_eq!(response.message, "Welcome back");
    assert_eq!(response.token.as_deref(), Some("tok-123"));
    assert_eq!(response.user.map(|u| u.username), Some("ops".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_login_failure_uses_upstream_message() -> TestResult {
    let auth = AuthUpstream::new(Client::new(), fake_auth_api().await?);

    let response = auth.login(&login_form("wrong")).await;

    assert!(!response.success);
    assert_eq!(response.message, "Invalid credentials");
    assert!(response.token.is_none());
    Ok(())
}

#[tokio::test]
async fn test_register_failure_without_message_uses_fallback() -> TestResult {
    let auth = AuthUpstream::new(Client::new(), fake_auth_api().await?);
    let form = RegisterForm {
        username: "ops".into(),
        email: "ops@example.com".into(),
        password: "secret1".into(),
    };

    let response = auth.register(&form).await;

    assert!(!response.success);
    assert_eq!(response.message, "Registration failed");
    Ok(())
}

#[tokio::test]
async fn test_unreachable_auth_api_is_a_failure_response() -> TestResult {
    let addr = closed_port().await?;
    let auth = AuthUpstream::new(Client::new(), Url::parse(&format!("http://{addr}"))?);

    let response = auth.login(&login_form("anything")).await;

    assert!(!response.success);
    assert_eq!(response.message, "Login failed");
    Ok(())
}

#[tokio::test]
async fn test_unreadable_success_body_is_a_failure_response() -> TestResult {
    let router = Router::new().route(
        "/api/users/register",
        post(|| async { (StatusCode::OK, "<html>gateway ok</html>") }),
    );
    let addr = spawn_server(router).await?;
    let auth = AuthUpstream::new(Client::new(), Url::parse(&format!("http://{addr}"))?);
    let form = RegisterForm {
        username: "ops".into(),
        email: "ops@example.com".into(),
        password: "secret1".into(),
    };

    let response = auth.register(&form).await;

    assert!(!response.success);
    assert_eq!(response.message, "Registration failed");
    assert!(response.user.is_none());
    assert!(response.token.is_none());
    Ok(())
}
