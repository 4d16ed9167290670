use std::{net::SocketAddr, sync::Arc, time::Duration};

use async_trait::async_trait;
use config::Config;
use llm::{ChatCompletionRequest, EchoProvider, LlmError, Provider};
use serde_json::{Value, json};
use server::ServeConfig;
use tokio::{net::TcpListener, time::timeout};

pub struct TestClient {
    base_url: String,
    client: reqwest::Client,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub async fn post(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap()
    }

    /// Posts a single user message to the chat completion endpoint under `prefix`.
    pub async fn chat(&self, prefix: &str, content: &str, stream: bool) -> reqwest::Response {
        let body = json!({
            "model": "test-model",
            "messages": [{ "role": "user", "content": content }],
            "stream": stream,
        });

        self.post(&format!("{prefix}/v1/chat/completions"), &body).await
    }
}

/// Answers every request with the same text.
pub struct FixedProvider {
    text: String,
}

impl FixedProvider {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl Provider for FixedProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn generate(&self, _: &ChatCompletionRequest) -> Result<String, LlmError> {
        Ok(self.text.clone())
    }
}

/// Fails every request like an unreachable upstream would.
pub struct FailingProvider;

#[async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _: &ChatCompletionRequest) -> Result<String, LlmError> {
        Err(LlmError::ProviderError("upstream unavailable".to_string()))
    }
}

pub struct TestServer {
    pub client: TestClient,
    pub address: SocketAddr,
    _handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Starts a server answering with the echo provider.
    pub async fn start(config_toml: &str) -> Self {
        Self::with_provider(config_toml, Arc::new(EchoProvider)).await
    }

    pub async fn with_provider(config_toml: &str, provider: Arc<dyn Provider>) -> Self {
        let config: Config = toml::from_str(config_toml).unwrap();
        config.validate().unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        let serve_config = ServeConfig {
            listen_address: address,
            config,
            provider,
        };

        let (tx, mut rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            drop(listener);

            let result = server::serve(serve_config).await;
            let _ = tx.send(result);
        });

        tokio::time::sleep(Duration::from_millis(100)).await;

        if let Ok(Err(e)) = rx.try_recv() {
            eprintln!("Server failed to start: {e}");
            std::process::exit(1);
        }

        let client = TestClient::new(format!("http://{address}"));

        let mut retries = 10;
        while retries > 0 {
            let probe = client.client.get(format!("{}/", client.base_url)).send();

            if let Ok(Ok(_)) = timeout(Duration::from_millis(100), probe).await {
                break;
            }

            retries -= 1;
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestServer {
            client,
            address,
            _handle: handle,
        }
    }
}

/// Splits an event stream body into the payloads of its `data:` events.
pub fn sse_payloads(body: &str) -> Vec<&str> {
    body.split("\n\n")
        .filter(|event| !event.is_empty())
        .filter_map(|event| event.strip_prefix("data: "))
        .collect()
}
