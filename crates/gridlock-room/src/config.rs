//! Registry configuration and the derived room phase.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RegistryConfig
// ---------------------------------------------------------------------------

/// Configuration for the room registry actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// How long a room may sit with both seats empty before the reaper
    /// removes it. `None` (the default) keeps every room for the life of
    /// the process.
    pub empty_room_grace: Option<Duration>,

    /// How often the reaper sweeps. Ignored when `empty_room_grace` is
    /// `None`.
    pub reap_interval: Duration,

    /// Capacity of the registry's command channel. When full, connection
    /// handlers wait before forwarding more events.
    pub command_buffer: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            empty_room_grace: None,
            reap_interval: Duration::from_secs(30),
            command_buffer: 256,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomPhase
// ---------------------------------------------------------------------------

/// Where a room stands, derived from how many seats are taken.
///
/// ```text
///            create            join
///   (none) ─────────→ Waiting ──────→ Ready
///                       ↑  │            │
///                  join │  │ disconnect │ disconnect
///                       │  ↓            │
///                      Empty ←──────────┘ (via Waiting)
/// ```
///
/// There is no "finished" phase: the server never decides that a game
/// is over, clients do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomPhase {
    /// Both seats are open. Removed by the reaper if one is configured.
    Empty,
    /// Exactly one seat is taken.
    WaitingForOpponent,
    /// Both seats are taken.
    Ready,
}

impl RoomPhase {
    /// Derives the phase from the number of occupied seats.
    pub fn from_occupied(occupied: usize) -> Self {
        match occupied {
            0 => Self::Empty,
            1 => Self::WaitingForOpponent,
            _ => Self::Ready,
        }
    }

    /// Returns `true` if both players are present.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl std::fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::WaitingForOpponent => write!(f, "WaitingForOpponent"),
            Self::Ready => write!(f, "Ready"),
        }
    }
}
