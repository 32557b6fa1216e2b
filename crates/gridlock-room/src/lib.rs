//! Room registry and turn engine for Gridlock.
//!
//! Every room is two seats (`X` and `O`) and one 9-cell board. The
//! registry admits connections into seats, applies legal moves, restarts
//! games with an alternating opener, and resets a room when a player
//! leaves. It never declares a winner; clients decide when a game is over.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: synchronous state: rooms plus connection bindings
//! - [`RegistryHandle`]: send commands to the actor that owns the registry
//! - [`Room`]: one room's seats, board and turn engine
//! - [`RoomPhase`]: derived lifecycle view
//! - [`RegistryConfig`]: reaper and channel settings

mod actor;
mod config;
mod error;
mod registry;
mod room;

pub use actor::{ConnectionSender, RegistryHandle};
pub use config::{RegistryConfig, RoomPhase};
pub use error::{AdmissionError, MoveRejection, RoomError};
pub use registry::{Binding, Delivery, RoomRegistry};
pub use room::{Room, RoomInfo};
