//! HTTP server: router assembly, CORS and the listen loop.

use axum::Router;
use log::info;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::api;
use crate::config::ServerConfig;
use crate::store::{AppState, StoreBackend};

/// WOW Scales HTTP server.
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: ServerConfig, store: StoreBackend) -> Self {
        let router = build_router(AppState::new(store), &config.cors_origins);
        Self { config, router }
    }

    pub fn bind_addr(&self) -> String {
        self.config.bind_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Binds and serves until ctrl-c.
    pub async fn start(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        let local_addr = listener.local_addr()?;
        info!(
            "event=server_start module=server status=ok addr={} store={:?} cors_origins={}",
            local_addr,
            self.config.store,
            self.config.cors_origins.len()
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("event=server_stop module=server status=ok");
        Ok(())
    }
}

/// Routes plus the CORS layer. An empty origin list allows any origin.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let cors = if cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    api::routes(state).layer(cors)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; serve until the process is killed.
        std::future::pending::<()>().await;
    }
}
