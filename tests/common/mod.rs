//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use request_conditions::config::{AppConfig, RuleConfig};
use request_conditions::http::HttpServer;
use request_conditions::lifecycle::Shutdown;

/// A server running on an ephemeral port.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub updates: mpsc::UnboundedSender<AppConfig>,
    pub shutdown: Shutdown,
    pub handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Build a config holding the given `(name, conditions)` rules.
#[allow(dead_code)]
pub fn config_with_rules(rules: &[(&str, &str)]) -> AppConfig {
    let mut config = AppConfig::default();
    config.observability.metrics_enabled = false;
    config.rules = rules
        .iter()
        .map(|(name, conditions)| RuleConfig {
            name: name.to_string(),
            conditions: conditions.to_string(),
        })
        .collect();
    config
}

/// Start the server on 127.0.0.1 with an OS-assigned port.
#[allow(dead_code)]
pub async fn start_server(config: AppConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (updates, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    let handle = tokio::spawn(async move {
        server.run(listener, config_updates, server_shutdown).await
    });

    // Listener is already bound; give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        addr,
        updates,
        shutdown,
        handle,
    }
}

/// A client that never pools connections across tests.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
