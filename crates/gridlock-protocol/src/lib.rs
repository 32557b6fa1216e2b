//! Wire protocol for Gridlock.
//!
//! This crate defines what travels between a client and the server:
//!
//! - **Types** ([`Symbol`], [`Board`], [`RoomId`], [`GameSnapshot`],
//!   [`SeatSnapshot`]): the game data carried inside events.
//! - **Events** ([`ClientEvent`], [`ServerEvent`]): named messages,
//!   one per frame, shaped as `{"event": "...", "data": ...}`.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how events are turned
//!   into bytes and back.
//! - **Errors** ([`ProtocolError`]).
//!
//! The protocol layer knows nothing about connections or rooms; it only
//! knows how messages look.
//!
//! ```text
//! Transport (frames) → Protocol (events) → Room registry (game state)
//! ```

mod codec;
mod error;
mod events;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use events::{ClientEvent, MoveRequest, ServerEvent};
pub use types::{Board, GameSnapshot, RoomId, SeatSnapshot, Symbol, CELL_COUNT};
