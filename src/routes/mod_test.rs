use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use super::test_support::send;
use super::*;
use crate::state::test_helpers::{self, MockLlm};

#[test]
fn parse_id_accepts_integers_only() {
    assert_eq!(parse_id("42", "bad").unwrap(), 42);
    assert!(matches!(parse_id("abc", "bad"), Err(ApiError::BadRequest(ref m)) if m == "bad"));
    assert!(parse_id("1.5", "bad").is_err());
}

#[tokio::test]
async fn healthz_reports_backend_without_llm() {
    let (status, json) = send(app(test_helpers::test_app_state()), "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["storage"], "memory");
    assert!(json["llm"].is_null());
}

#[tokio::test]
async fn healthz_reports_llm_model() {
    let state = test_helpers::test_app_state_with_llm(Arc::new(MockLlm::replying("x")));
    let (_, json) = send(app(state), "GET", "/healthz", None).await;
    assert_eq!(json["llm"], "mock");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (status, _) = send(app(test_helpers::test_app_state()), "GET", "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let response = app(test_helpers::test_app_state())
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .header("origin", "http://example.test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers().get("access-control-allow-origin").unwrap(), "*");
}

// =========================================================================
// RequestLocale
// =========================================================================

async fn extract_locale(state: &AppState, accept_language: Option<&str>) -> Locale {
    let mut builder = Request::builder().uri("/");
    if let Some(value) = accept_language {
        builder = builder.header("accept-language", value);
    }
    let (mut parts, ()) = builder.body(()).unwrap().into_parts();
    let RequestLocale(locale) = RequestLocale::from_request_parts(&mut parts, state).await.unwrap();
    locale
}

#[tokio::test]
async fn locale_from_header() {
    let state = test_helpers::test_app_state();
    assert_eq!(extract_locale(&state, Some("en-US,en;q=0.9")).await, Locale::En);
    assert_eq!(extract_locale(&state, Some("fr, ar;q=0.5")).await, Locale::Ar);
}

#[tokio::test]
async fn locale_falls_back_to_configured_default() {
    let state = test_helpers::test_app_state().with_locale(Locale::En);
    assert_eq!(extract_locale(&state, None).await, Locale::En);
    assert_eq!(extract_locale(&state, Some("de-DE")).await, Locale::En);
}
