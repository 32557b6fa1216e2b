//! # Gridlock
//!
//! A room server for two-player tic-tac-toe.
//!
//! Clients connect over WebSocket, open or join a named room, and take
//! turns placing marks on a shared 9-cell board. The server owns the
//! authoritative board: it decides who sits where, whose turn it is, and
//! which moves land. Every accepted change is pushed to both seats.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gridlock::prelude::*;
//!
//! # async fn run() -> Result<(), GridlockError> {
//! let server = GridlockServer::builder()
//!     .bind("0.0.0.0:3000")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::GridlockError;
pub use server::{GridlockServer, GridlockServerBuilder};

/// Re-exports for the common case.
pub mod prelude {
    pub use crate::{GridlockError, GridlockServer, GridlockServerBuilder};
    pub use gridlock_protocol::{
        Board, ClientEvent, Codec, GameSnapshot, JsonCodec, MoveRequest, RoomId,
        SeatSnapshot, ServerEvent, Symbol,
    };
    pub use gridlock_room::{RegistryConfig, RegistryHandle, RoomError, RoomInfo, RoomPhase};
    pub use gridlock_transport::ConnectionId;
}
