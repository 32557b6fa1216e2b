//! Named events exchanged over a connection.
//!
//! Every frame is one event, adjacently tagged:
//!
//! ```text
//! {"event": "makeMove", "data": {"index": 4}}
//! {"event": "playerLeft"}
//! ```
//!
//! Events without a payload omit `data` entirely.

use serde::{Deserialize, Serialize};

use crate::{GameSnapshot, RoomId, SeatSnapshot, Symbol};

/// Client → server events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Open a new room and take seat `X`.
    CreateRoom(RoomId),

    /// Take seat `O` in an existing room.
    JoinRoom(RoomId),

    /// Create the room if it doesn't exist, otherwise join it.
    JoinOrCreate(RoomId),

    /// Place the sender's mark on a cell.
    MakeMove(MoveRequest),

    /// Clear the board and start a new game in the sender's room.
    Restart,
}

impl ClientEvent {
    /// Wire name of the event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateRoom(_) => "createRoom",
            Self::JoinRoom(_) => "joinRoom",
            Self::JoinOrCreate(_) => "joinOrCreate",
            Self::MakeMove(_) => "makeMove",
            Self::Restart => "restart",
        }
    }
}

/// Payload of [`ClientEvent::MakeMove`].
///
/// `symbol` is accepted for compatibility with clients that echo their
/// own mark, but the server never trusts it: the mark placed is always
/// the one bound to the sender's seat. A `symbol` that disagrees with the
/// seat gets the move dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<Symbol>,
}

/// Server → client events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Seat assigned; sent on create and to both seats on join.
    Init(SeatSnapshot),

    /// A move was applied.
    UpdateBoard(GameSnapshot),

    /// A new game started in the room.
    RestartGame(SeatSnapshot),

    /// The other seat-holder disconnected and the board was reset.
    PlayerLeft,

    /// `createRoom` for an id that is already taken.
    RoomExists,

    /// `joinRoom` for an id that doesn't exist.
    NoRoom,

    /// `joinRoom` for a room whose `O` seat is taken.
    Full,

    /// Create/join from a connection that already holds a seat.
    AlreadySeated,
}

impl ServerEvent {
    /// Wire name of the event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::UpdateBoard(_) => "updateBoard",
            Self::RestartGame(_) => "restartGame",
            Self::PlayerLeft => "playerLeft",
            Self::RoomExists => "roomExists",
            Self::NoRoom => "noRoom",
            Self::Full => "full",
            Self::AlreadySeated => "alreadySeated",
        }
    }
}
