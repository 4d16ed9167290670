mod completions;
mod streaming;

use indoc::indoc;
use integration_tests::TestServer;
use serde_json::Value;

#[tokio::test]
async fn list_models() {
    let server = TestServer::start("").await;
    let body: Value = server.client.get("/llm/v1/models").await.json().await.unwrap();

    insta::assert_json_snapshot!(body, {
        ".data[].created" => "[created]"
    }, @r#"
    {
      "object": "list",
      "data": [
        {
          "id": "gemini-3-flash",
          "object": "model",
          "created": "[created]",
          "owned_by": "echo"
        }
      ]
    }
    "#);
}

#[tokio::test]
async fn custom_path_and_model() {
    let config = indoc! {r#"
        [llm]
        path = "/custom"
        model = "house-model"
    "#};

    let server = TestServer::start(config).await;
    let body: Value = server.client.chat("/custom", "Hello", false).await.json().await.unwrap();

    assert_eq!(body["model"], "house-model");
    assert_eq!(server.client.chat("/llm", "Hello", false).await.status(), 404);
}

#[tokio::test]
async fn disabled_llm_is_not_exposed() {
    let config = indoc! {r#"
        [llm]
        enabled = false
    "#};

    let server = TestServer::start(config).await;

    assert_eq!(server.client.get("/llm/v1/models").await.status(), 404);
}
