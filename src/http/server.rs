//! HTTP server startup logic.
//!
//! The listener is built from a `TcpSocket` so the accept backlog can be set
//! explicitly; `TcpListener::bind` would use the platform default.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::{TcpListener, TcpSocket};

use crate::config::HttpServerConfig;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid http.host or http.port: {0}")]
    Address(String),

    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Bind a listener on the configured address with the configured backlog.
pub fn bind_listener(config: &HttpServerConfig) -> Result<TcpListener, ServerError> {
    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| ServerError::Address(format!("{}: {}", config.bind_address(), e)))?;

    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;

    Ok(socket.listen(config.backlog)?)
}

/// Serve `app` on `listener` until a shutdown signal arrives.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, listener: TcpListener) -> Result<(), ServerError> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "Starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    fn local_config(host: &str) -> HttpServerConfig {
        HttpServerConfig {
            host: host.to_string(),
            port: 0,
            backlog: 128,
            ..HttpServerConfig::default()
        }
    }

    #[tokio::test]
    async fn binds_ephemeral_port() {
        let listener = bind_listener(&local_config("127.0.0.1")).unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn rejects_hostname() {
        let err = bind_listener(&local_config("not an address")).unwrap_err();
        assert!(matches!(err, ServerError::Address(_)));
    }

    #[tokio::test]
    async fn serves_requests_on_bound_listener() {
        let listener = bind_listener(&local_config("127.0.0.1")).unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/", get(|| async { "up" }));

        tokio::spawn(start_server(app, listener));

        let body = reqwest::get(format!("http://{addr}/"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "up");
    }
}
