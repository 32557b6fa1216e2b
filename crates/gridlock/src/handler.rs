//! Per-connection handler: event routing in both directions.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Register an outbound channel with the room registry
//!   2. Loop, racing two sources:
//!      - a frame from the client → decode → forward to the registry
//!      - an event from the registry → encode → send to the client
//!   3. On close or error, the guard reports the disconnect
//!
//! If the registry stops, the outbound channel closes and the handler
//! closes the socket from its side.

use std::sync::Arc;

use gridlock_protocol::{ClientEvent, Codec, ServerEvent};
use gridlock_room::RegistryHandle;
use gridlock_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::GridlockError;

/// Drop guard that frees the connection's seat when the handler exits.
///
/// Runs on every exit path, including panics. `Drop` is synchronous, so
/// the notification is sent from a spawned task.
struct DisconnectGuard {
    conn_id: ConnectionId,
    registry: RegistryHandle,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let registry = self.registry.clone();
        tokio::spawn(async move {
            if let Err(e) = registry.disconnect(conn_id).await {
                tracing::debug!(%conn_id, error = %e, "disconnect not delivered");
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), GridlockError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let (outbound_tx, mut outbound) = mpsc::unbounded_channel::<ServerEvent>();
    state.registry.register(conn_id, outbound_tx).await?;
    let _guard = DisconnectGuard {
        conn_id,
        registry: state.registry.clone(),
    };

    loop {
        tokio::select! {
            frame = conn.recv() => {
                let data = match frame {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%conn_id, "connection closed");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%conn_id, error = %e, "recv error");
                        break;
                    }
                };

                let event: ClientEvent = match state.codec.decode(&data) {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::debug!(%conn_id, error = %e, "failed to decode event");
                        continue;
                    }
                };
                tracing::trace!(%conn_id, event = event.name(), "event received");
                state.registry.dispatch(conn_id, event).await?;
            }
            event = outbound.recv() => {
                let Some(event) = event else {
                    // Registry dropped our sender: server is shutting down.
                    tracing::debug!(%conn_id, "registry gone, closing connection");
                    let _ = conn.close().await;
                    break;
                };
                send_event(&conn, &state.codec, &event).await?;
            }
        }
    }

    // _guard drops here → registry frees the seat.
    Ok(())
}

/// Encodes and sends one event.
async fn send_event<C: Codec>(
    conn: &WebSocketConnection,
    codec: &C,
    event: &ServerEvent,
) -> Result<(), GridlockError> {
    let bytes = codec.encode(event)?;
    conn.send(&bytes).await?;
    tracing::trace!(conn_id = %conn.id(), event = event.name(), "event sent");
    Ok(())
}
