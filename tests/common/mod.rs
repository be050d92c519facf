//! Shared test setup.

#![allow(dead_code)]

pub mod mocks;

use axum_test::TestServer;
use concierge::api::routes::app_router;
use concierge::{AppState, ConciergeConfig, ConfigManager};
use mocks::{MockEmbedder, MockLLMClient, MockLLMFactory};
use std::path::PathBuf;
use std::sync::Arc;

pub const FAQ_CSV: &str = "question,answer\n\
How long do refunds take?,Refunds are issued within 5 business days.\n\
What is the return window?,Items can be returned within 30 days.\n\
How much is shipping?,Standard shipping is free on orders over $50.\n\
Do you honor coupons?,One coupon can be applied per order.\n";

/// A running server plus a test client sharing its state.
///
/// The chat agents reach the support API over HTTP, so the app is served on
/// a real port and `support_api.base_url` points at it.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub llm: MockLLMClient,
    pub base_url: String,
}

pub struct TestAppBuilder {
    llm: MockLLMClient,
    embedder: MockEmbedder,
    faq_path: Option<PathBuf>,
    default_order_id: Option<String>,
    upload_dir: Option<PathBuf>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            llm: MockLLMClient::new("Mock answer"),
            embedder: MockEmbedder::new(),
            faq_path: None,
            default_order_id: Some("ORD123".to_string()),
            upload_dir: None,
        }
    }

    pub fn llm(mut self, llm: MockLLMClient) -> Self {
        self.llm = llm;
        self
    }

    pub fn embedder(mut self, embedder: MockEmbedder) -> Self {
        self.embedder = embedder;
        self
    }

    pub fn faq_path(mut self, path: PathBuf) -> Self {
        self.faq_path = Some(path);
        self
    }

    pub fn default_order_id(mut self, id: Option<&str>) -> Self {
        self.default_order_id = id.map(str::to_string);
        self
    }

    pub fn upload_dir(mut self, path: PathBuf) -> Self {
        self.upload_dir = Some(path);
        self
    }

    pub async fn spawn(self) -> TestApp {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("No local address");
        let base_url = format!("http://{}", addr);

        let mut config = ConciergeConfig::default();
        config.support_api.base_url = base_url.clone();
        config.support_api.timeout_secs = 5;
        config.chat.default_order_id = self.default_order_id;
        config.server.upload_dir = self.upload_dir;
        if let Some(path) = self.faq_path {
            config.rag.faq_path = path;
        }

        let config_manager = Arc::new(ConfigManager::from_config(config));
        let state = AppState::with_providers(
            config_manager,
            Arc::new(MockLLMFactory::new(self.llm.clone())),
            Arc::new(self.embedder),
        )
        .expect("Failed to build app state");

        let served = app_router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, served).await.ok();
        });

        let server =
            TestServer::new(app_router(state.clone())).expect("Failed to create test server");

        TestApp {
            server,
            state,
            llm: self.llm,
            base_url,
        }
    }
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn spawn_app() -> TestApp {
    TestAppBuilder::new().spawn().await
}
