use super::*;

// =============================================================================
// LlmError::status
// =============================================================================

#[test]
fn status_present_for_api_response() {
    let err = LlmError::ApiResponse { status: 402, body: "payment required".into() };
    assert_eq!(err.status(), Some(402));
}

#[test]
fn status_absent_for_transport_failure() {
    let err = LlmError::ApiRequest("connection refused".into());
    assert_eq!(err.status(), None);
}

#[test]
fn status_absent_for_empty_completion() {
    assert_eq!(LlmError::EmptyCompletion.status(), None);
}

#[test]
fn body_present_only_for_api_response() {
    let err = LlmError::ApiResponse { status: 401, body: r#"{"error":"bad key"}"#.into() };
    assert_eq!(err.body(), Some(r#"{"error":"bad key"}"#));
    assert_eq!(LlmError::ApiRequest("timeout".into()).body(), None);
}

// =============================================================================
// Display
// =============================================================================

#[test]
fn display_missing_api_key_names_var() {
    let err = LlmError::MissingApiKey { var: "AIML_API_KEY".into() };
    assert_eq!(err.to_string(), "no API key in AIML_API_KEY");
}

#[test]
fn display_api_response_hides_body() {
    let err = LlmError::ApiResponse { status: 500, body: "secret upstream detail".into() };
    let text = err.to_string();
    assert!(text.contains("500"));
    assert!(!text.contains("secret upstream detail"));
}

// =============================================================================
// Message constructors
// =============================================================================

#[test]
fn message_user_sets_role() {
    let msg = Message::user("hi");
    assert_eq!(msg.role, "user");
    assert_eq!(msg.content, "hi");
}

#[test]
fn message_assistant_sets_role() {
    let msg = Message::assistant("hello");
    assert_eq!(msg.role, "assistant");
}

#[test]
fn message_serializes_role_and_content_only() {
    let json = serde_json::to_value(Message::user("hi")).unwrap();
    assert_eq!(json, serde_json::json!({ "role": "user", "content": "hi" }));
}
