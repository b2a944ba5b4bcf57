//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;

use crud_api::config::AppConfig;
use crud_api::http::{AppState, HttpServer};
use crud_api::lifecycle::{startup, Shutdown};
use serde_json::Value;

/// A running server bound to an ephemeral port.
///
/// The server stops when this value is dropped.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get_json(&self, path: &str) -> Value {
        let res = self.client.get(self.url(path)).send().await.expect("Server unreachable");
        assert_eq!(res.status(), 200, "GET {path}");
        res.json().await.expect("Body is not JSON")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Server unreachable")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Default config for tests: in-memory stores and a generous rate limit.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.rate_limit.max_requests = 10_000;
    config
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config()).await
}

pub async fn spawn_app_with(config: AppConfig) -> TestApp {
    let state = startup::build_state(&config).expect("Stores failed to open");
    spawn_app_with_state(config, state).await
}

/// Serve `state` directly, for tests that swap in their own stores.
pub async fn spawn_app_with_state(config: AppConfig, state: AppState) -> TestApp {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, state);

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    TestApp { addr, client, shutdown }
}
