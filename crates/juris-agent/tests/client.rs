// End-to-end checks of the streaming client against a local mock server.

use std::sync::Arc;

use futures_util::StreamExt;
use httpmock::prelude::*;
use juris_agent::{CompletionRequest, FinalResult, StaticCredentials, StreamEvent, XaiClient};
use juris_core::config::{SearchConfig, DEFAULT_SYSTEM_PROMPT};

const CHAT_PATH: &str = "/v1/chat/completions";

const SSE_BODY: &str = concat!(
    "data: {\"choices\":[{\"delta\":{\"content\":\"Bon\"}}]}\n\n",
    "data: {\"choices\":[{\"delta\":{\"content\":\"jour\"}}]}\n\n",
    "data: {\"citations\":[\"art. 1234\"]}\n\n",
    "data: [DONE]\n\n",
);

fn client_for(endpoint: String) -> XaiClient {
    XaiClient::new(Arc::new(StaticCredentials::new("test-key", endpoint)))
}

fn request(model: &str) -> CompletionRequest {
    CompletionRequest::new(
        model,
        "Qu'est-ce que l'article 1234 ?",
        DEFAULT_SYSTEM_PROMPT,
        &SearchConfig::default(),
    )
}

async fn collect(client: &XaiClient, model: &str) -> Vec<StreamEvent> {
    client.stream(request(model)).collect().await
}

#[tokio::test]
async fn streams_deltas_then_final_result() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(CHAT_PATH)
                .header("authorization", "Bearer test-key")
                .header("content-type", "application/json")
                .body_contains("\"model\":\"grok-3-latest\"")
                .body_contains("\"stream\":true")
                .body_contains("\"allowed_websites\":[\"legifrance.gouv.fr\",\"juricaf.org\"]");
            then.status(200)
                .header("content-type", "text/event-stream")
                .body(SSE_BODY);
        })
        .await;

    let events = collect(&client_for(server.url(CHAT_PATH)), "grok-3-latest").await;

    mock.assert_async().await;
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].as_text_delta(), Some("Bon"));
    assert_eq!(events[1].as_text_delta(), Some("jour"));
    match &events[2] {
        StreamEvent::Final(result) => {
            assert_eq!(result.complete_text, "Bonjour");
            assert_eq!(result.citations, vec!["art. 1234".to_string()]);
        }
        other => panic!("expected final result, got {other:?}"),
    }
}

#[tokio::test]
async fn model_is_taken_from_each_request() {
    let server = MockServer::start_async().await;
    let mini = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(CHAT_PATH)
                .body_contains("\"model\":\"grok-3-mini\"");
            then.status(200).body("data: [DONE]\n\n");
        })
        .await;

    let client = client_for(server.url(CHAT_PATH));
    let events = collect(&client, "grok-3-mini").await;

    mini.assert_async().await;
    assert!(matches!(events.as_slice(), [StreamEvent::Final(r)] if r.complete_text.is_empty()));
}

#[tokio::test]
async fn nothing_is_sent_until_polled() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(CHAT_PATH);
            then.status(200).body(SSE_BODY);
        })
        .await;

    let client = client_for(server.url(CHAT_PATH));
    let mut events = client.stream(request("grok-3-latest"));
    assert_eq!(mock.hits_async().await, 0);

    assert_eq!(events.next().await.unwrap().as_text_delta(), Some("Bon"));
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn api_error_status_is_a_single_error_event() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(CHAT_PATH);
            then.status(400).body("{\"error\":\"Model not found: grok-42\"}");
        })
        .await;

    let events = collect(&client_for(server.url(CHAT_PATH)), "grok-42").await;

    assert_eq!(events.len(), 1);
    match &events[0] {
        StreamEvent::Error { message } => {
            assert!(message.contains("400"), "{message}");
            assert!(message.contains("Model not found"), "{message}");
        }
        other => panic!("expected error, got {other:?}"),
    }
}

#[tokio::test]
async fn rate_limit_is_reported_not_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(CHAT_PATH);
            then.status(429).header("retry-after", "2");
        })
        .await;

    let events = collect(&client_for(server.url(CHAT_PATH)), "grok-3-latest").await;

    mock.assert_hits_async(1).await;
    assert_eq!(
        events,
        vec![StreamEvent::Error {
            message: "Rate limited, retry after 2000ms".to_string()
        }]
    );
}

#[tokio::test]
async fn refused_connection_is_a_single_error_event() {
    // nothing listens on port 1
    let client = client_for(format!("http://127.0.0.1:1{CHAT_PATH}"));
    let events = collect(&client, "grok-3-latest").await;

    assert_eq!(events.len(), 1);
    match &events[0] {
        StreamEvent::Error { message } => assert!(message.starts_with("HTTP error")),
        other => panic!("expected error, got {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_streams_are_independent() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(CHAT_PATH).body_contains("grok-3-fast");
            then.status(200)
                .body("data: {\"choices\":[{\"delta\":{\"content\":\"rapide\"}}],\"citations\":[\"f\"]}\n\ndata: [DONE]\n\n");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(CHAT_PATH).body_contains("grok-3-mini");
            then.status(200)
                .body("data: {\"choices\":[{\"delta\":{\"content\":\"court\"}}]}\n\ndata: [DONE]\n\n");
        })
        .await;

    let client = client_for(server.url(CHAT_PATH));
    let (fast, mini) = tokio::join!(
        collect(&client, "grok-3-fast"),
        collect(&client, "grok-3-mini")
    );

    assert_eq!(
        fast.last(),
        Some(&StreamEvent::Final(FinalResult {
            complete_text: "rapide".to_string(),
            citations: vec!["f".to_string()],
            ..Default::default()
        }))
    );
    assert_eq!(
        mini.last(),
        Some(&StreamEvent::Final(FinalResult {
            complete_text: "court".to_string(),
            ..Default::default()
        }))
    );
}
