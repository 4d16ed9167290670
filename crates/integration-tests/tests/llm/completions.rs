use std::sync::Arc;

use integration_tests::{FailingProvider, FixedProvider, TestServer};
use serde_json::{Value, json};

#[tokio::test]
async fn single_response() {
    let server = TestServer::start("").await;
    let response = server.client.chat("/llm", "Hello", false).await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "application/json");

    let body: Value = response.json().await.unwrap();

    insta::assert_json_snapshot!(body, {
        ".id" => "[id]",
        ".created" => "[created]"
    }, @r#"
    {
      "id": "[id]",
      "object": "chat.completion",
      "created": "[created]",
      "model": "gemini-3-flash",
      "choices": [
        {
          "index": 0,
          "message": {
            "role": "assistant",
            "content": "Hello",
            "refusal": null,
            "annotation": []
          },
          "logprobs": null,
          "finish_reason": "stop"
        }
      ],
      "usage": {
        "prompt_tokens": 0,
        "completion_tokens": 5,
        "total_tokens": 5
      }
    }
    "#);
}

#[tokio::test]
async fn empty_text() {
    let server = TestServer::with_provider("", Arc::new(FixedProvider::new(""))).await;
    let body: Value = server.client.chat("/llm", "anything", false).await.json().await.unwrap();

    assert_eq!(body["choices"][0]["message"]["content"], "");
    assert_eq!(body["usage"]["completion_tokens"], 0);
    assert_eq!(body["usage"]["total_tokens"], 0);
}

#[tokio::test]
async fn non_ascii_usage() {
    let server = TestServer::with_provider("", Arc::new(FixedProvider::new("你好, world"))).await;
    let body: Value = server.client.chat("/llm", "anything", false).await.json().await.unwrap();

    insta::assert_json_snapshot!(body["usage"], @r#"
    {
      "prompt_tokens": 0,
      "completion_tokens": 11,
      "total_tokens": 11
    }
    "#);
}

#[tokio::test]
async fn ids_are_fresh_per_request() {
    let server = TestServer::start("").await;

    let first: Value = server.client.chat("/llm", "same", false).await.json().await.unwrap();
    let second: Value = server.client.chat("/llm", "same", false).await.json().await.unwrap();

    assert_ne!(first["id"], second["id"]);
    assert_eq!(first["choices"], second["choices"]);
    assert_eq!(first["usage"], second["usage"]);
}

#[tokio::test]
async fn multi_part_user_content() {
    let server = TestServer::start("").await;

    let request = json!({
        "model": "test-model",
        "messages": [{
            "role": "user",
            "content": [
                { "type": "text", "text": "Look at" },
                { "type": "image_url", "image_url": { "url": "https://example.com/cat.png" } },
                { "type": "text", "text": "this" }
            ]
        }]
    });

    let body: Value = server
        .client
        .post("/llm/v1/chat/completions", &request)
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["choices"][0]["message"]["content"], "Look at\nthis");
}

#[tokio::test]
async fn empty_messages_are_rejected() {
    let server = TestServer::start("").await;

    let request = json!({ "model": "test-model", "messages": [] });
    let response = server.client.post("/llm/v1/chat/completions", &request).await;

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    insta::assert_json_snapshot!(body, @r#"
    {
      "error": {
        "message": "Invalid request: messages must not be empty",
        "type": "invalid_request_error",
        "code": 400
      }
    }
    "#);
}

#[tokio::test]
async fn provider_errors_map_to_bad_gateway() {
    let server = TestServer::with_provider("", Arc::new(FailingProvider)).await;
    let response = server.client.chat("/llm", "Hello", true).await;

    assert_eq!(response.status(), 502);

    let body: Value = response.json().await.unwrap();
    insta::assert_json_snapshot!(body, @r#"
    {
      "error": {
        "message": "Provider error: upstream unavailable",
        "type": "api_error",
        "code": 502
      }
    }
    "#);
}
