use super::*;
use time::macros::datetime;

// =============================================================================
// derive_title
// =============================================================================

#[test]
fn derive_title_truncates_long_content() {
    assert_eq!(derive_title("Hello world, this is a long test message"), "Hello world, this is a long te...");
}

#[test]
fn derive_title_keeps_short_content() {
    assert_eq!(derive_title("Hi there"), "Hi there");
}

#[test]
fn derive_title_keeps_exactly_thirty_chars() {
    let content = "a".repeat(TITLE_MAX_CHARS);
    assert_eq!(derive_title(&content), content);
}

#[test]
fn derive_title_truncates_thirty_one_chars() {
    let content = "b".repeat(TITLE_MAX_CHARS + 1);
    assert_eq!(derive_title(&content), format!("{}...", "b".repeat(TITLE_MAX_CHARS)));
}

#[test]
fn derive_title_counts_characters_not_bytes() {
    let content = "مرحبا بك في المساعد الذكي أوبن لايف اليوم";
    let title = derive_title(content);
    assert!(title.ends_with("..."));
    assert_eq!(title.chars().count(), TITLE_MAX_CHARS + 3);
}

#[test]
fn derive_title_empty_content() {
    assert_eq!(derive_title(""), "");
}

// =============================================================================
// Role
// =============================================================================

#[test]
fn role_parse_accepts_known_roles() {
    assert_eq!(Role::parse("user"), Some(Role::User));
    assert_eq!(Role::parse("assistant"), Some(Role::Assistant));
}

#[test]
fn role_parse_rejects_unknown() {
    assert_eq!(Role::parse("system"), None);
    assert_eq!(Role::parse("User"), None);
}

#[test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_value(Role::Assistant).unwrap(), serde_json::json!("assistant"));
}

// =============================================================================
// Wire shape
// =============================================================================

#[test]
fn message_serializes_camel_case() {
    let msg = Message {
        id: 7,
        chat_id: 3,
        content: "hello".into(),
        role: Role::User,
        created_at: datetime!(2024-05-01 12:00:00 UTC),
    };
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["chatId"], 3);
    assert_eq!(json["role"], "user");
    assert_eq!(json["createdAt"], "2024-05-01T12:00:00Z");
}

#[test]
fn chat_serializes_created_at_rfc3339() {
    let chat = Chat { id: 1, title: "new".into(), created_at: datetime!(2024-05-01 08:30:00 UTC) };
    let json = serde_json::to_value(&chat).unwrap();
    assert_eq!(json["title"], "new");
    assert_eq!(json["createdAt"], "2024-05-01T08:30:00Z");
}

#[test]
fn user_never_serializes_password() {
    let user = User { id: 1, username: "sara".into(), password: "salt$digest".into() };
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["username"], "sara");
    assert!(json.get("password").is_none());
}
