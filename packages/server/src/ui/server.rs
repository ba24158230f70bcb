//! Server execution logic.

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::config::{Protocol, ServerConfig};

use super::{
    handler::{debug_room_state, get_room, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Time open TLS connections get to finish after a shutdown signal
const TLS_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Server errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TLS requires both a key and a certificate")]
    MissingTlsFiles,

    #[error("Failed to load TLS certificate {cert:?} / key {key:?}: {source}")]
    Tls {
        cert: PathBuf,
        key: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Presence relay server
///
/// # Example
///
/// ```ignore
/// let bound = Server::new(build_app_state(room)).bind(&config).await?;
/// tracing::info!("listening on {}", bound.local_addr());
/// bound.serve().await?;
/// ```
pub struct Server {
    app_state: Arc<AppState>,
}

impl Server {
    pub fn new(app_state: Arc<AppState>) -> Self {
        Self { app_state }
    }

    /// Build the router with every endpoint
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/room", get(get_room))
            .route("/debug/room", get(debug_room_state))
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone())
    }

    /// Load TLS material (for `https`) and bind the listening socket
    ///
    /// Nothing is listening when this returns an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the key or certificate cannot be loaded, or if the
    /// server fails to bind to the configured address.
    pub async fn bind(self, config: &ServerConfig) -> Result<BoundServer, ServerError> {
        let tls = match config.protocol {
            Protocol::Http => None,
            Protocol::Https => {
                let files = config.tls_files().ok_or(ServerError::MissingTlsFiles)?;
                let rustls = RustlsConfig::from_pem_file(&files.cert, &files.key)
                    .await
                    .map_err(|source| ServerError::Tls {
                        cert: files.cert.clone(),
                        key: files.key.clone(),
                        source,
                    })?;
                Some(rustls)
            }
        };

        let bind_addr = format!("{}:{}", config.host, config.port);
        let bind_error = |source: std::io::Error| ServerError::Bind {
            addr: bind_addr.clone(),
            source,
        };
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;

        let listener = match tls {
            None => BoundListener::Plain(listener),
            Some(rustls) => BoundListener::Tls {
                listener: listener.into_std().map_err(bind_error)?,
                config: rustls,
            },
        };

        Ok(BoundServer {
            app: self.router(),
            listener,
            local_addr,
        })
    }
}

enum BoundListener {
    Plain(tokio::net::TcpListener),
    Tls {
        listener: std::net::TcpListener,
        config: RustlsConfig,
    },
}

/// A server whose socket is bound and ready to accept connections
pub struct BoundServer {
    app: Router,
    listener: BoundListener,
    local_addr: SocketAddr,
}

impl BoundServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_tls(&self) -> bool {
        matches!(self.listener, BoundListener::Tls { .. })
    }

    /// Serve until a shutdown signal arrives
    pub async fn serve(self) -> Result<(), ServerError> {
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        match self.listener {
            BoundListener::Plain(listener) => {
                axum::serve(listener, self.app)
                    .with_graceful_shutdown(shutdown_signal())
                    .await
                    .map_err(ServerError::Serve)?;
            }
            BoundListener::Tls { listener, config } => {
                let handle = axum_server::Handle::new();
                let shutdown = handle.clone();
                tokio::spawn(async move {
                    shutdown_signal().await;
                    shutdown.graceful_shutdown(Some(TLS_SHUTDOWN_GRACE));
                });

                axum_server::from_tcp_rustls(listener, config)
                    .handle(handle)
                    .serve(self.app.into_make_service())
                    .await
                    .map_err(ServerError::Serve)?;
            }
        }

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::build_app_state,
        domain::{Room, RoomId, Timestamp},
    };
    use clap::Parser;

    fn create_test_server() -> Server {
        Server::new(build_app_state(Room::new(RoomId::main(), Timestamp::new(0))))
    }

    fn parse_config(args: &[&str]) -> ServerConfig {
        let mut argv = vec!["hiroba-server"];
        argv.extend_from_slice(args);
        ServerConfig::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn test_bind_plaintext_on_ephemeral_port() {
        // テスト項目: http 設定ではエフェメラルポートに平文で bind できる
        // given (前提条件):
        let config = parse_config(&["--host", "127.0.0.1", "--port", "0"]);

        // when (操作):
        let bound = create_test_server().bind(&config).await.unwrap();

        // then (期待する結果):
        assert_ne!(bound.local_addr().port(), 0);
        assert!(!bound.is_tls());
    }

    #[tokio::test]
    async fn test_bind_fails_when_port_is_taken() {
        // テスト項目: 使用中のポートへの bind は Bind エラーになる
        // given (前提条件):
        let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port().to_string();
        let config = parse_config(&["--host", "127.0.0.1", "--port", &port]);

        // when (操作):
        let result = create_test_server().bind(&config).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ServerError::Bind { .. })));
    }

    #[tokio::test]
    async fn test_bind_https_with_unreadable_files_fails_before_listening() {
        // テスト項目: 鍵・証明書が読めない https 設定はソケットを開く前にエラーになる
        // given (前提条件):
        let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port().to_string();
        let config = parse_config(&[
            "--host",
            "127.0.0.1",
            "--port",
            &port,
            "--protocol",
            "https",
            "--ssl-key-path",
            "/nonexistent/hiroba/key.pem",
            "--ssl-cert-path",
            "/nonexistent/hiroba/cert.pem",
        ]);

        // when (操作):
        let result = create_test_server().bind(&config).await;

        // then (期待する結果): 使用中のポートでも Bind ではなく Tls エラーになる
        assert!(matches!(result, Err(ServerError::Tls { .. })));
    }

    #[tokio::test]
    async fn test_bind_https_without_files_is_rejected() {
        // テスト項目: 鍵・証明書を持たない https 設定は MissingTlsFiles エラーになる
        // given (前提条件):
        let mut config = parse_config(&["--host", "127.0.0.1", "--port", "0"]);
        config.protocol = Protocol::Https;

        // when (操作):
        let result = create_test_server().bind(&config).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ServerError::MissingTlsFiles)));
    }
}
