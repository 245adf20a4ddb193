//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the echo handler
//! - Wire up middleware (tracing, request ID, timeout, concurrency, rules)
//! - Bind server to listener
//! - Swap the rule table when a reloaded config arrives

use arc_swap::ArcSwap;
use axum::{
    extract::{Extension, OriginalUri},
    http::Method,
    middleware::from_fn_with_state,
    routing::any,
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::http::middleware::{rules_middleware, MatchedRules};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::shutdown;
use crate::routing::{RuleError, RuleTable};

/// Live rule table shared between the middleware and the reload loop.
pub type SharedRules = Arc<ArcSwap<RuleTable>>;

/// HTTP server that evaluates the configured rules for every request.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    rules: SharedRules,
}

impl HttpServer {
    /// Create a new HTTP server, compiling the configured rules.
    pub fn new(config: AppConfig) -> Result<Self, RuleError> {
        let table = RuleTable::from_config(&config.rules)?;
        tracing::info!(rules = table.len(), "Rules compiled");

        let rules: SharedRules = Arc::new(ArcSwap::from_pointee(table));
        let router = Self::build_router(&config, rules.clone());
        Ok(Self {
            router,
            config,
            rules,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, rules: SharedRules) -> Router {
        Router::new()
            .route("/{*path}", any(echo_handler))
            .route("/", any(echo_handler))
            .layer(from_fn_with_state(rules, rules_middleware))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(set_request_id_layer())
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                    .layer(GlobalConcurrencyLimitLayer::new(config.listener.max_connections)),
            )
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configs received on `config_updates` replace the rule table; the server
    /// stops when `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<AppConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rules = self.rules.load().len(),
            "HTTP server starting"
        );

        let rules = self.rules.clone();
        let reload_task = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match RuleTable::from_config(&config.rules) {
                    Ok(table) => {
                        tracing::info!(rules = table.len(), "Rule table swapped");
                        rules.store(Arc::new(table));
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Reloaded rules rejected, keeping current table");
                    }
                }
            }
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        // Serve with graceful shutdown
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await;

        reload_task.abort();
        tracing::info!("HTTP server stopped");
        served
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Handle to the live rule table.
    pub fn rules(&self) -> SharedRules {
        self.rules.clone()
    }

    /// The fully layered router, for serving without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

#[derive(Debug, Serialize)]
struct EchoResponse {
    method: String,
    uri: String,
    matched_rules: Vec<String>,
}

/// Reports what the rule middleware decided for this request.
async fn echo_handler(
    method: Method,
    OriginalUri(uri): OriginalUri,
    Extension(MatchedRules(matched)): Extension<MatchedRules>,
) -> Json<EchoResponse> {
    Json(EchoResponse {
        method: method.to_string(),
        uri: uri.to_string(),
        matched_rules: matched,
    })
}
