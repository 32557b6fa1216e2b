//! Registry actor: a single Tokio task that owns the [`RoomRegistry`].
//!
//! Connection handlers never touch room state directly. They send
//! commands through a [`RegistryHandle`]; the actor applies them one at a
//! time and pushes the resulting events into each recipient's outbound
//! channel. One task, one queue, no locks.

use std::collections::HashMap;
use std::time::Instant;

use gridlock_protocol::{ClientEvent, RoomId, ServerEvent};
use gridlock_transport::ConnectionId;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior};

use crate::{AdmissionError, Delivery, RegistryConfig, RoomError, RoomInfo, RoomRegistry};

/// Channel sender for delivering outbound events to one connection.
///
/// Unbounded and fire-and-forget: if the connection is gone the event
/// is dropped.
pub type ConnectionSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to the registry actor.
pub(crate) enum RegistryCommand {
    /// Start routing outbound events for a new connection.
    Register {
        conn: ConnectionId,
        sender: ConnectionSender,
    },

    /// An inbound event from a connection.
    Event {
        conn: ConnectionId,
        event: ClientEvent,
    },

    /// The connection closed; free its seat.
    Disconnect { conn: ConnectionId },

    /// Snapshot one room.
    GetInfo {
        room_id: RoomId,
        reply: oneshot::Sender<Option<RoomInfo>>,
    },

    /// Count rooms.
    RoomCount { reply: oneshot::Sender<usize> },

    /// Stop the actor.
    Shutdown,
}

/// Handle to the running registry actor.
///
/// Cheap to clone; every connection handler holds one.
#[derive(Clone)]
pub struct RegistryHandle {
    sender: mpsc::Sender<RegistryCommand>,
}

impl RegistryHandle {
    /// Spawns the registry actor on the current Tokio runtime.
    pub fn spawn(config: RegistryConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.command_buffer.max(1));
        let actor = RegistryActor {
            registry: RoomRegistry::new(),
            senders: HashMap::new(),
            config,
            receiver: rx,
        };
        tokio::spawn(actor.run());
        Self { sender: tx }
    }

    async fn send(&self, cmd: RegistryCommand) -> Result<(), RoomError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    /// Registers the outbound channel for `conn`. Must precede any
    /// [`dispatch`](Self::dispatch) for the same connection.
    pub async fn register(
        &self,
        conn: ConnectionId,
        sender: ConnectionSender,
    ) -> Result<(), RoomError> {
        self.send(RegistryCommand::Register { conn, sender }).await
    }

    /// Forwards an inbound event (fire-and-forget).
    pub async fn dispatch(
        &self,
        conn: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), RoomError> {
        self.send(RegistryCommand::Event { conn, event }).await
    }

    /// Reports that `conn` is gone.
    pub async fn disconnect(&self, conn: ConnectionId) -> Result<(), RoomError> {
        self.send(RegistryCommand::Disconnect { conn }).await
    }

    /// Returns a snapshot of one room.
    pub async fn room_info(&self, room_id: RoomId) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RegistryCommand::GetInfo {
            room_id: room_id.clone(),
            reply: reply_tx,
        })
        .await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable)?
            .ok_or(RoomError::NotFound(room_id))
    }

    /// Returns the number of rooms in the registry.
    pub async fn room_count(&self) -> Result<usize, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RegistryCommand::RoomCount { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)
    }

    /// Tells the actor to stop.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.send(RegistryCommand::Shutdown).await
    }
}

/// The actor's state. Runs inside one Tokio task.
struct RegistryActor {
    registry: RoomRegistry,
    /// Per-connection outbound channels.
    senders: HashMap<ConnectionId, ConnectionSender>,
    config: RegistryConfig,
    receiver: mpsc::Receiver<RegistryCommand>,
}

impl RegistryActor {
    async fn run(mut self) {
        tracing::info!(
            empty_room_grace = ?self.config.empty_room_grace,
            "room registry started"
        );

        let mut reaper = self.config.empty_room_grace.map(|_| {
            let mut interval = tokio::time::interval(self.config.reap_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    match cmd {
                        Some(RegistryCommand::Shutdown) | None => break,
                        Some(cmd) => self.handle(cmd),
                    }
                }
                _ = next_reap(&mut reaper) => self.reap(),
            }
        }

        tracing::info!(rooms = self.registry.room_count(), "room registry stopped");
    }

    fn handle(&mut self, cmd: RegistryCommand) {
        match cmd {
            RegistryCommand::Register { conn, sender } => {
                self.senders.insert(conn, sender);
            }
            RegistryCommand::Event { conn, event } => {
                let deliveries = self.handle_event(conn, event);
                self.deliver(deliveries);
            }
            RegistryCommand::Disconnect { conn } => {
                self.senders.remove(&conn);
                let deliveries = self.registry.disconnect(conn, now());
                self.deliver(deliveries);
            }
            RegistryCommand::GetInfo { room_id, reply } => {
                let _ = reply.send(self.registry.room_info(&room_id));
            }
            RegistryCommand::RoomCount { reply } => {
                let _ = reply.send(self.registry.room_count());
            }
            RegistryCommand::Shutdown => {}
        }
    }

    fn handle_event(&mut self, conn: ConnectionId, event: ClientEvent) -> Vec<Delivery> {
        let name = event.name();
        match event {
            ClientEvent::CreateRoom(room_id) => {
                admission(conn, name, self.registry.create_room(conn, room_id))
            }
            ClientEvent::JoinRoom(room_id) => {
                admission(conn, name, self.registry.join_room(conn, room_id))
            }
            ClientEvent::JoinOrCreate(room_id) => {
                admission(conn, name, self.registry.join_or_create(conn, room_id))
            }
            ClientEvent::MakeMove(request) => {
                match self.registry.make_move(conn, request) {
                    Ok(deliveries) => deliveries,
                    Err(reason) => {
                        tracing::debug!(%conn, %reason, "move rejected");
                        Vec::new()
                    }
                }
            }
            ClientEvent::Restart => self.registry.restart(conn),
        }
    }

    /// Pushes each event into its recipient's channel. Recipients that
    /// have gone away are skipped silently.
    fn deliver(&self, deliveries: Vec<Delivery>) {
        for Delivery { to, event } in deliveries {
            if let Some(sender) = self.senders.get(&to) {
                let _ = sender.send(event);
            }
        }
    }

    fn reap(&mut self) {
        if let Some(grace) = self.config.empty_room_grace {
            let reaped = self.registry.reap_idle(now(), grace);
            if reaped > 0 {
                tracing::debug!(reaped, remaining = self.registry.room_count(), "reaper sweep");
            }
        }
    }
}

/// Turns an admission result into deliveries: the success fan-out, or
/// one rejection event back to the requester.
fn admission(
    conn: ConnectionId,
    event: &'static str,
    result: Result<Vec<Delivery>, AdmissionError>,
) -> Vec<Delivery> {
    match result {
        Ok(deliveries) => deliveries,
        Err(e) => {
            tracing::debug!(%conn, event, error = %e, "admission rejected");
            vec![Delivery::new(conn, e.to_event())]
        }
    }
}

/// Current time from Tokio's clock, so paused-time tests see the same
/// instants the reaper does.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Resolves on the reaper's next tick, or never when reaping is off.
async fn next_reap(reaper: &mut Option<Interval>) {
    match reaper {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
