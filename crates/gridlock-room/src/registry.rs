//! The room registry: every room, and which connection sits where.
//!
//! `RoomRegistry` is plain synchronous state. Each method handles one
//! inbound event to completion and returns the [`Delivery`] list it
//! produced; it never touches a socket or a channel. The registry actor
//! (see `actor.rs`) owns one instance and is the only thing that calls
//! it, which is what keeps event handling single-threaded without locks.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use gridlock_protocol::{MoveRequest, RoomId, ServerEvent, Symbol};
use gridlock_transport::ConnectionId;

use crate::{AdmissionError, MoveRejection, Room, RoomInfo};

/// One outbound event addressed to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub to: ConnectionId,
    pub event: ServerEvent,
}

impl Delivery {
    pub fn new(to: ConnectionId, event: ServerEvent) -> Self {
        Self { to, event }
    }
}

/// The seat a connection was given. Written once, on admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub room_id: RoomId,
    pub symbol: Symbol,
}

/// All rooms, keyed by id, plus the connection → seat index.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
    bindings: HashMap<ConnectionId, Binding>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------
    // Admission
    // -----------------------------------------------------------------

    /// Opens `room_id` and seats `conn` as `X`.
    ///
    /// # Errors
    /// [`AdmissionError::RoomExists`] if the id is taken,
    /// [`AdmissionError::AlreadySeated`] if `conn` already has a seat.
    pub fn create_room(
        &mut self,
        conn: ConnectionId,
        room_id: RoomId,
    ) -> Result<Vec<Delivery>, AdmissionError> {
        self.ensure_unseated(conn)?;
        if self.rooms.contains_key(&room_id) {
            return Err(AdmissionError::RoomExists(room_id));
        }

        let mut room = Room::new(room_id.clone());
        room.seat(Symbol::X, conn);
        let init = ServerEvent::Init(room.snapshot().for_seat(Symbol::X));
        self.rooms.insert(room_id.clone(), room);
        self.bind(conn, room_id, Symbol::X);

        Ok(vec![Delivery::new(conn, init)])
    }

    /// Seats `conn` as `O` in an existing room, then sends both seats a
    /// fresh `init` so they start from the same snapshot.
    ///
    /// # Errors
    /// [`AdmissionError::NoSuchRoom`], [`AdmissionError::RoomFull`] when
    /// seat `O` is taken, or [`AdmissionError::AlreadySeated`].
    pub fn join_room(
        &mut self,
        conn: ConnectionId,
        room_id: RoomId,
    ) -> Result<Vec<Delivery>, AdmissionError> {
        self.ensure_unseated(conn)?;
        let room = self
            .rooms
            .get(&room_id)
            .ok_or_else(|| AdmissionError::NoSuchRoom(room_id.clone()))?;
        if room.occupant(Symbol::O).is_some() {
            return Err(AdmissionError::RoomFull(room_id));
        }

        Ok(self.seat_existing(conn, room_id, Symbol::O))
    }

    /// Creates the room when it is missing. Otherwise takes the first
    /// open seat, `X` before `O`, so a room its creator left can be
    /// filled again.
    ///
    /// # Errors
    /// [`AdmissionError::RoomFull`] when both seats are taken, or
    /// [`AdmissionError::AlreadySeated`].
    pub fn join_or_create(
        &mut self,
        conn: ConnectionId,
        room_id: RoomId,
    ) -> Result<Vec<Delivery>, AdmissionError> {
        self.ensure_unseated(conn)?;
        let Some(room) = self.rooms.get(&room_id) else {
            return self.create_room(conn, room_id);
        };
        let open = Symbol::ALL
            .into_iter()
            .find(|&symbol| room.occupant(symbol).is_none())
            .ok_or_else(|| AdmissionError::RoomFull(room_id.clone()))?;

        Ok(self.seat_existing(conn, room_id, open))
    }

    /// Puts `conn` in an open seat of an existing room and sends every
    /// seat-holder an `init` tagged with its own symbol.
    fn seat_existing(
        &mut self,
        conn: ConnectionId,
        room_id: RoomId,
        symbol: Symbol,
    ) -> Vec<Delivery> {
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return Vec::new();
        };

        room.seat(symbol, conn);
        if room.phase().is_ready() {
            tracing::debug!(%room_id, "both seats taken");
        }
        let snapshot = room.snapshot();
        let deliveries = room
            .occupants()
            .map(|(seat, occupant)| {
                Delivery::new(occupant, ServerEvent::Init(snapshot.for_seat(seat)))
            })
            .collect();
        self.bind(conn, room_id, symbol);

        deliveries
    }

    fn ensure_unseated(&self, conn: ConnectionId) -> Result<(), AdmissionError> {
        match self.bindings.get(&conn) {
            Some(binding) => Err(AdmissionError::AlreadySeated {
                conn,
                room_id: binding.room_id.clone(),
            }),
            None => Ok(()),
        }
    }

    fn bind(&mut self, conn: ConnectionId, room_id: RoomId, symbol: Symbol) {
        tracing::info!(%room_id, %conn, %symbol, "player seated");
        self.bindings.insert(conn, Binding { room_id, symbol });
    }

    // -----------------------------------------------------------------
    // Turn engine
    // -----------------------------------------------------------------

    /// Applies a move for `conn`'s seat and broadcasts the new board.
    ///
    /// The mark placed is always the seat's own symbol. A `symbol` in the
    /// request is only compared against it.
    ///
    /// # Errors
    /// Any [`MoveRejection`]; the room is unchanged in every case.
    pub fn make_move(
        &mut self,
        conn: ConnectionId,
        request: MoveRequest,
    ) -> Result<Vec<Delivery>, MoveRejection> {
        let binding = self
            .bindings
            .get(&conn)
            .ok_or(MoveRejection::NotSeated(conn))?;
        if let Some(claimed) = request.symbol {
            if claimed != binding.symbol {
                return Err(MoveRejection::SymbolMismatch {
                    seat: binding.symbol,
                    claimed,
                });
            }
        }
        let room = self
            .rooms
            .get_mut(&binding.room_id)
            .ok_or_else(|| MoveRejection::RoomGone(binding.room_id.clone()))?;

        let snapshot = room.apply_move(request.index, binding.symbol)?;
        tracing::debug!(
            room_id = %room.id(),
            %conn,
            symbol = %binding.symbol,
            index = request.index,
            board = %snapshot.board,
            "move applied"
        );

        Ok(room
            .occupants()
            .map(|(_, occupant)| Delivery::new(occupant, ServerEvent::UpdateBoard(snapshot)))
            .collect())
    }

    // -----------------------------------------------------------------
    // Restart
    // -----------------------------------------------------------------

    /// Starts a new game in `conn`'s room with the opener alternated.
    ///
    /// Each seat-holder gets `restartGame` tagged with its own symbol.
    /// A no-op for unseated connections.
    pub fn restart(&mut self, conn: ConnectionId) -> Vec<Delivery> {
        let Some(room) = self.room_of_mut(conn) else {
            tracing::debug!(%conn, "restart from unseated connection ignored");
            return Vec::new();
        };

        let starter = room.restart();
        tracing::info!(room_id = %room.id(), %conn, %starter, "game restarted");

        let snapshot = room.snapshot();
        room.occupants()
            .map(|(symbol, occupant)| {
                Delivery::new(occupant, ServerEvent::RestartGame(snapshot.for_seat(symbol)))
            })
            .collect()
    }

    // -----------------------------------------------------------------
    // Disconnect
    // -----------------------------------------------------------------

    /// Frees `conn`'s seat, discards the game in progress, and tells the
    /// remaining seat-holder. The room itself stays.
    pub fn disconnect(&mut self, conn: ConnectionId, now: Instant) -> Vec<Delivery> {
        let Some(binding) = self.bindings.remove(&conn) else {
            return Vec::new();
        };
        let Some(room) = self.rooms.get_mut(&binding.room_id) else {
            return Vec::new();
        };

        room.vacate(conn, now);
        room.reset();
        tracing::info!(
            room_id = %binding.room_id,
            %conn,
            symbol = %binding.symbol,
            phase = %room.phase(),
            "player left"
        );

        room.occupants()
            .map(|(_, occupant)| Delivery::new(occupant, ServerEvent::PlayerLeft))
            .collect()
    }

    // -----------------------------------------------------------------
    // Reaping
    // -----------------------------------------------------------------

    /// Removes rooms that have been seat-less for at least `grace`.
    ///
    /// Returns the number of rooms removed.
    pub fn reap_idle(&mut self, now: Instant, grace: Duration) -> usize {
        let before = self.rooms.len();
        self.rooms.retain(|room_id, room| {
            let expired = room.idle_for(now).is_some_and(|idle| idle >= grace);
            if expired {
                tracing::info!(%room_id, "idle room reaped");
            }
            !expired
        });
        before - self.rooms.len()
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn room_info(&self, room_id: &RoomId) -> Option<RoomInfo> {
        self.rooms.get(room_id).map(Room::info)
    }

    /// Returns the seat `conn` was admitted to, if any.
    pub fn binding(&self, conn: ConnectionId) -> Option<&Binding> {
        self.bindings.get(&conn)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn room_of_mut(&mut self, conn: ConnectionId) -> Option<&mut Room> {
        let binding = self.bindings.get(&conn)?;
        self.rooms.get_mut(&binding.room_id)
    }
}
