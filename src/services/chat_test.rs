use std::sync::Arc;

use super::*;
use crate::llm::types::LlmError;
use crate::state::test_helpers::{self, MockLlm, reply};

// =========================================================================
// create_chat / add_message
// =========================================================================

#[tokio::test]
async fn create_chat_requires_title() {
    let state = test_helpers::test_app_state();
    assert!(matches!(create_chat(&state, None).await, Err(ChatError::Validation(_))));
    assert!(matches!(create_chat(&state, Some("  ")).await, Err(ChatError::Validation(_))));
    let chat = create_chat(&state, Some("new")).await.unwrap();
    assert_eq!(chat.title, "new");
}

#[tokio::test]
async fn add_message_validates_fields() {
    let state = test_helpers::test_app_state();
    let chat = create_chat(&state, Some("new")).await.unwrap();

    let err = add_message(&state, None, Some("hi"), Some("user")).await.unwrap_err();
    assert_eq!(err.to_string(), "chatId is required");

    let err = add_message(&state, Some(chat.id), None, Some("user")).await.unwrap_err();
    assert_eq!(err.to_string(), "content is required");

    let err = add_message(&state, Some(chat.id), Some("hi"), Some("system")).await.unwrap_err();
    assert!(matches!(err, ChatError::Validation(_)));
}

#[tokio::test]
async fn add_message_unknown_chat_is_not_found() {
    let state = test_helpers::test_app_state();
    let err = add_message(&state, Some(77), Some("hi"), Some("user")).await.unwrap_err();
    assert!(matches!(err, ChatError::ChatNotFound(77)));
    assert!(state.store.get_messages_by_chat(77).await.unwrap().is_empty());
}

#[tokio::test]
async fn add_message_first_user_message_renames_chat() {
    let state = test_helpers::test_app_state();
    let chat = create_chat(&state, Some("new")).await.unwrap();
    add_message(&state, Some(chat.id), Some("Hello world, this is a long test message"), Some("user"))
        .await
        .unwrap();
    let chat = state.store.get_chat(chat.id).await.unwrap().unwrap();
    assert_eq!(chat.title, "Hello world, this is a long te...");
}

// =========================================================================
// post_chat_message
// =========================================================================

#[tokio::test]
async fn post_chat_message_stores_both_turns() {
    let llm = Arc::new(MockLlm::replying("Hello from the assistant"));
    let state = test_helpers::test_app_state_with_llm(llm.clone());
    let chat = create_chat(&state, Some("new")).await.unwrap();

    let reply_msg = post_chat_message(&state, Some(chat.id), Some("Hi")).await.unwrap();
    assert_eq!(reply_msg.role, Role::Assistant);
    assert_eq!(reply_msg.content, "Hello from the assistant");

    let messages = state.store.get_messages_by_chat(chat.id).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "Hi");
    assert_eq!(messages[1].id, reply_msg.id);

    let chat = state.store.get_chat(chat.id).await.unwrap().unwrap();
    assert_eq!(chat.title, "Hi");
}

#[tokio::test]
async fn post_chat_message_sends_prior_history_once() {
    let llm = Arc::new(MockLlm::new(vec![Ok(reply("first reply")), Ok(reply("second reply"))]));
    let state = test_helpers::test_app_state_with_llm(llm.clone());
    let chat = create_chat(&state, Some("new")).await.unwrap();

    post_chat_message(&state, Some(chat.id), Some("one")).await.unwrap();
    post_chat_message(&state, Some(chat.id), Some("two")).await.unwrap();

    let calls = llm.calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, &*state.system_prompt);
    let contents: Vec<&str> = calls[1].1.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "first reply", "two"]);
    let roles: Vec<&str> = calls[1].1.iter().map(|m| m.role.as_str()).collect();
    assert_eq!(roles, vec!["user", "assistant", "user"]);
}

#[tokio::test]
async fn post_chat_message_failure_keeps_user_message() {
    let llm = Arc::new(MockLlm::failing_with_status(401));
    let state = test_helpers::test_app_state_with_llm(llm);
    let chat = create_chat(&state, Some("new")).await.unwrap();

    let err = post_chat_message(&state, Some(chat.id), Some("Hello")).await.unwrap_err();
    assert!(matches!(err, ChatError::Completion(CompletionError::InvalidCredential)));

    let messages = state.store.get_messages_by_chat(chat.id).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "Hello");
}

#[tokio::test]
async fn post_chat_message_without_llm_is_unavailable() {
    let state = test_helpers::test_app_state();
    let chat = create_chat(&state, Some("new")).await.unwrap();
    let err = post_chat_message(&state, Some(chat.id), Some("Hello")).await.unwrap_err();
    assert!(matches!(err, ChatError::Completion(CompletionError::Unavailable(_))));
}

#[tokio::test]
async fn post_chat_message_transport_error_is_unavailable() {
    let llm = Arc::new(MockLlm::new(vec![Err(LlmError::ApiRequest("dns failure".into()))]));
    let state = test_helpers::test_app_state_with_llm(llm);
    let chat = create_chat(&state, Some("new")).await.unwrap();
    let err = post_chat_message(&state, Some(chat.id), Some("Hello")).await.unwrap_err();
    assert!(matches!(err, ChatError::Completion(CompletionError::Unavailable(ref d)) if d.contains("dns failure")));
}

#[tokio::test]
async fn post_chat_message_requires_fields() {
    let state = test_helpers::test_app_state_with_llm(Arc::new(MockLlm::replying("x")));
    let chat = create_chat(&state, Some("new")).await.unwrap();

    for (chat_id, text) in [(None, Some("hi")), (Some(chat.id), None), (Some(chat.id), Some("   "))] {
        let err = post_chat_message(&state, chat_id, text).await.unwrap_err();
        assert_eq!(err.to_string(), "chatId and message are required");
    }
    assert!(state.store.get_messages_by_chat(chat.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn post_chat_message_unknown_chat_stores_nothing() {
    let llm = Arc::new(MockLlm::replying("x"));
    let state = test_helpers::test_app_state_with_llm(llm.clone());
    let err = post_chat_message(&state, Some(5), Some("hi")).await.unwrap_err();
    assert!(matches!(err, ChatError::ChatNotFound(5)));
    assert!(state.store.get_messages_by_chat(5).await.unwrap().is_empty());
    assert!(llm.calls.lock().unwrap().is_empty());
}
