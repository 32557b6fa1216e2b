//! `GridlockServer` builder and accept loop.
//!
//! This is the entry point for running a Gridlock server. It ties the
//! layers together: transport → protocol → room registry.

use std::sync::Arc;

use gridlock_protocol::{Codec, JsonCodec};
use gridlock_room::{RegistryConfig, RegistryHandle};
use gridlock_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::GridlockError;

/// Shared server state passed to each connection handler task.
///
/// Room state lives in the registry actor, so nothing here needs a lock.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) registry: RegistryHandle,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Gridlock server.
///
/// # Example
///
/// ```rust,ignore
/// use gridlock::prelude::*;
///
/// let server = GridlockServer::builder()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct GridlockServerBuilder {
    bind_addr: String,
    registry_config: RegistryConfig,
}

impl GridlockServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            registry_config: RegistryConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the room registry configuration.
    pub fn registry_config(mut self, config: RegistryConfig) -> Self {
        self.registry_config = config;
        self
    }

    /// Binds the listener and starts the room registry.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`. Must be called from
    /// inside a Tokio runtime.
    pub async fn build(self) -> Result<GridlockServer<JsonCodec>, GridlockError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let registry = RegistryHandle::spawn(self.registry_config);

        let state = Arc::new(ServerState {
            registry,
            codec: JsonCodec,
        });

        Ok(GridlockServer { transport, state })
    }
}

impl Default for GridlockServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Gridlock server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct GridlockServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl GridlockServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> GridlockServerBuilder {
        GridlockServerBuilder::new()
    }
}

impl<C: Codec> GridlockServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Returns a handle to the room registry, for diagnostics.
    pub fn registry(&self) -> RegistryHandle {
        self.state.registry.clone()
    }

    /// Runs the accept loop until the task is cancelled.
    pub async fn run(self) -> Result<(), GridlockError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs the accept loop until `signal` resolves, then stops the
    /// listener and the room registry.
    ///
    /// Spawns one handler task per accepted connection. Once the
    /// registry stops, each handler closes its socket.
    pub async fn run_until<F>(mut self, signal: F) -> Result<(), GridlockError>
    where
        F: Future<Output = ()>,
    {
        tracing::info!("Gridlock server running");
        tokio::pin!(signal);

        loop {
            tokio::select! {
                accepted = self.transport.accept() => match accepted {
                    Ok(conn) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(conn, state).await {
                                tracing::debug!(error = %e, "connection ended with error");
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                    }
                },
                () = &mut signal => break,
            }
        }

        tracing::info!("Gridlock server shutting down");
        self.transport.shutdown().await?;
        self.state.registry.shutdown().await?;
        Ok(())
    }
}
