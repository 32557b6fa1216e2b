//! Error types for the room layer.
//!
//! Three kinds, handled differently by the registry actor:
//!
//! - [`AdmissionError`] is reported back to the requester as an event.
//! - [`MoveRejection`] is logged and otherwise swallowed.
//! - [`RoomError`] is returned to callers of [`RegistryHandle`](crate::RegistryHandle).

use gridlock_protocol::{RoomId, ServerEvent, Symbol};
use gridlock_transport::ConnectionId;

/// A create/join request that could not be admitted. Nothing was mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionError {
    /// `createRoom` for an id that is already in the registry.
    #[error("room {0} already exists")]
    RoomExists(RoomId),

    /// `joinRoom` for an id that isn't in the registry.
    #[error("room {0} not found")]
    NoSuchRoom(RoomId),

    /// Seat `O` is already taken.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The connection already holds a seat somewhere.
    #[error("{conn} already seated in room {room_id}")]
    AlreadySeated { conn: ConnectionId, room_id: RoomId },
}

impl AdmissionError {
    /// The rejection event sent back to the requester.
    pub fn to_event(&self) -> ServerEvent {
        match self {
            Self::RoomExists(_) => ServerEvent::RoomExists,
            Self::NoSuchRoom(_) => ServerEvent::NoRoom,
            Self::RoomFull(_) => ServerEvent::Full,
            Self::AlreadySeated { .. } => ServerEvent::AlreadySeated,
        }
    }
}

/// Why a move was not applied. Never sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejection {
    /// The connection has no seat.
    #[error("{0} is not seated in any room")]
    NotSeated(ConnectionId),

    /// The connection's room is no longer in the registry.
    #[error("room {0} no longer exists")]
    RoomGone(RoomId),

    /// The index is off the board.
    #[error("cell index {0} is out of range")]
    InvalidIndex(usize),

    /// The target cell already holds a symbol.
    #[error("cell {0} is occupied")]
    CellOccupied(usize),

    /// It is the other seat's turn.
    #[error("not {actual}'s turn, {expected} to move")]
    WrongTurn { expected: Symbol, actual: Symbol },

    /// The payload claimed a symbol other than the sender's seat.
    #[error("claimed {claimed} but seated as {seat}")]
    SymbolMismatch { seat: Symbol, claimed: Symbol },
}

/// Errors from talking to the registry actor.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room with this id.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The registry's command channel is closed.
    #[error("room registry is unavailable")]
    Unavailable,
}
