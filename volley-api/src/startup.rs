//! Server startup and shutdown logic

use axum::Router;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::task::JoinHandle;
use volley_config::ServerConfig;

use crate::app::{create_app, AppConfig};
use crate::errors::{ServerError, ServerResult};

/// How long in-flight requests get to finish once shutdown starts
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Server application struct
pub struct Server {
    config: ServerConfig,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the complete application router
    pub fn build_app(&self) -> Router {
        create_app(&AppConfig::from(&self.config))
    }

    /// Run until Ctrl-C or SIGTERM
    pub async fn start(self) -> ServerResult<()> {
        self.start_with_shutdown(shutdown_signal()).await
    }

    /// Run until `signal` resolves, then shut both listeners down gracefully
    pub async fn start_with_shutdown<F>(self, signal: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send,
    {
        let running = self.spawn().await?;
        signal.await;
        running.stop().await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Bind every configured listener and return once they are accepting
    /// connections. Port 0 binds are resolved to the real port.
    pub async fn spawn(self) -> ServerResult<RunningServer> {
        install_crypto_provider();

        let app = self.build_app();
        let plain_addr = parse_addr(&self.config.bind_address)?;

        // Load certificates before binding anything so a bad path leaves no
        // listener behind.
        let tls = match &self.config.tls {
            Some(tls) => {
                let addr = parse_addr(&tls.bind_address)?;
                let rustls = RustlsConfig::from_pem_file(&tls.cert_file, &tls.key_file)
                    .await
                    .map_err(|source| ServerError::Tls {
                        cert_file: tls.cert_file.clone(),
                        key_file: tls.key_file.clone(),
                        source,
                    })?;
                Some((addr, rustls))
            }
            None => None,
        };

        self.log_config_summary();

        let plain_handle = Handle::new();
        let plain_task = tokio::spawn(
            axum_server::bind(plain_addr)
                .handle(plain_handle.clone())
                .serve(app.clone().into_make_service()),
        );
        let plain = Listener::ready(plain_addr, plain_handle, plain_task).await?;
        tracing::info!("Listening on http://{}", plain.addr);

        let tls = match tls {
            Some((addr, rustls)) => {
                let handle = Handle::new();
                let task = tokio::spawn(
                    axum_server::bind_rustls(addr, rustls)
                        .handle(handle.clone())
                        .serve(app.into_make_service()),
                );
                match Listener::ready(addr, handle, task).await {
                    Ok(listener) => {
                        tracing::info!("Listening on https://{}", listener.addr);
                        Some(listener)
                    }
                    Err(e) => {
                        plain.handle.shutdown();
                        return Err(e);
                    }
                }
            }
            None => None,
        };

        Ok(RunningServer { plain, tls })
    }

    /// Log configuration summary
    fn log_config_summary(&self) {
        tracing::info!("=== Volley Stub Service Configuration ===");
        tracing::info!("Bind Address: {}", self.config.bind_address);
        match &self.config.tls {
            Some(tls) => tracing::info!("TLS: {} ({})", tls.bind_address, tls.cert_file),
            None => tracing::info!("TLS: Disabled"),
        }
        tracing::info!("Slow Delay: {}ms", self.config.slow_delay.as_millis());
        tracing::info!(
            "Tracing: {}",
            if self.config.enable_tracing { "Enabled" } else { "Disabled" }
        );
        tracing::info!("=========================================");
    }
}

/// A bound listener and the task serving it
struct Listener {
    addr: SocketAddr,
    handle: Handle,
    task: JoinHandle<std::io::Result<()>>,
}

impl Listener {
    async fn ready(
        requested: SocketAddr,
        handle: Handle,
        task: JoinHandle<std::io::Result<()>>,
    ) -> ServerResult<Self> {
        match handle.listening().await {
            Some(addr) => Ok(Self { addr, handle, task }),
            // The serve future has already returned; surface its error
            None => match task.await? {
                Err(source) => Err(ServerError::Bind {
                    address: requested,
                    source,
                }),
                Ok(()) => Err(ServerError::Bind {
                    address: requested,
                    source: std::io::Error::other("listener exited before accepting connections"),
                }),
            },
        }
    }

    async fn stop(self) -> ServerResult<()> {
        self.handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        self.task.await??;
        Ok(())
    }
}

/// Handle on the listeners started by [`Server::spawn`]
pub struct RunningServer {
    plain: Listener,
    tls: Option<Listener>,
}

impl RunningServer {
    /// Address the plaintext listener is bound to
    pub fn plain_addr(&self) -> SocketAddr {
        self.plain.addr
    }

    /// Address the TLS listener is bound to, if TLS is configured
    pub fn tls_addr(&self) -> Option<SocketAddr> {
        self.tls.as_ref().map(|listener| listener.addr)
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn stop(self) -> ServerResult<()> {
        tracing::info!("Stopping listeners");
        let RunningServer { plain, tls } = self;
        plain.stop().await?;
        if let Some(tls) = tls {
            tls.stop().await?;
        }
        Ok(())
    }
}

fn parse_addr(address: &str) -> ServerResult<SocketAddr> {
    address.parse().map_err(|source| ServerError::InvalidAddress {
        address: address.to_string(),
        source,
    })
}

/// rustls needs a process-wide provider; the first install wins.
fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Graceful shutdown signal
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
