use integration_tests::TestServer;
use serde_json::Value;

#[tokio::test]
async fn health_endpoint() {
    let server = TestServer::start("").await;
    let response = server.client.get("/health").await;

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    insta::assert_json_snapshot!(body, @r#"
    {
      "status": "healthy"
    }
    "#);
}

#[tokio::test]
async fn health_endpoint_on_custom_path() {
    let config = indoc::indoc! {r#"
        [server.health]
        path = "/status"
    "#};

    let server = TestServer::start(config).await;

    assert_eq!(server.client.get("/status").await.status(), 200);
    assert_eq!(server.client.get("/health").await.status(), 404);
}

#[tokio::test]
async fn health_endpoint_disabled() {
    let config = indoc::indoc! {r#"
        [server.health]
        enabled = false
    "#};

    let server = TestServer::start(config).await;

    assert_eq!(server.client.get("/health").await.status(), 404);
}
