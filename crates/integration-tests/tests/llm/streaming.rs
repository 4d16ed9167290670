use std::sync::Arc;

use indoc::indoc;
use integration_tests::{FixedProvider, TestServer, sse_payloads};
use serde_json::Value;

#[tokio::test]
async fn single_chunk() {
    let server = TestServer::start("").await;
    let response = server.client.chat("/llm", "Hi", true).await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "text/event-stream");

    let body = response.text().await.unwrap();
    assert!(body.starts_with("data: "));
    assert!(body.ends_with("\n\n"));

    let payloads = sse_payloads(&body);
    assert_eq!(payloads.len(), 1);

    let chunk: Value = serde_json::from_str(payloads[0]).unwrap();

    insta::assert_json_snapshot!(chunk, {
        ".id" => "[id]",
        ".created" => "[created]"
    }, @r#"
    {
      "id": "[id]",
      "object": "chat.completion.chunk",
      "created": "[created]",
      "model": "gemini-3-flash",
      "choices": [
        {
          "index": 0,
          "delta": {
            "content": "Hi"
          },
          "logprobs": null,
          "finish_reason": null
        }
      ]
    }
    "#);
}

#[tokio::test]
async fn no_done_marker_by_default() {
    let server = TestServer::start("").await;
    let body = server.client.chat("/llm", "Hi", true).await.text().await.unwrap();

    assert!(!body.contains("[DONE]"));
}

#[tokio::test]
async fn done_marker_when_configured() {
    let config = indoc! {r#"
        [llm]
        done_marker = true
    "#};

    let server = TestServer::start(config).await;
    let body = server.client.chat("/llm", "Hi", true).await.text().await.unwrap();

    let payloads = sse_payloads(&body);
    assert_eq!(payloads.len(), 2);
    assert_eq!(payloads[1], "[DONE]");
}

#[tokio::test]
async fn multi_line_text_stays_in_one_event() {
    let text = "first paragraph\n\nsecond paragraph";
    let server = TestServer::with_provider("", Arc::new(FixedProvider::new(text))).await;

    let body = server.client.chat("/llm", "anything", true).await.text().await.unwrap();
    let payloads = sse_payloads(&body);
    assert_eq!(payloads.len(), 1);

    let chunk: Value = serde_json::from_str(payloads[0]).unwrap();
    assert_eq!(chunk["choices"][0]["delta"]["content"], text);
}
