//! Unified error type for the Gridlock server.

use gridlock_protocol::ProtocolError;
use gridlock_room::RoomError;
use gridlock_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` lift sub-crate
/// errors into this one.
#[derive(Debug, thiserror::Error)]
pub enum GridlockError {
    /// Binding, accepting, or frame I/O failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An event could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The room registry could not be reached, or a room is missing.
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::SendFailed(std::io::Error::other("gone"));
        let gridlock_err: GridlockError = err.into();
        assert!(matches!(gridlock_err, GridlockError::Transport(_)));
        assert!(gridlock_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let json_err = serde_json::from_str::<u8>("not json").unwrap_err();
        let gridlock_err: GridlockError = ProtocolError::Decode(json_err).into();
        assert!(matches!(gridlock_err, GridlockError::Protocol(_)));
        assert!(gridlock_err.to_string().starts_with("decode failed"));
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::NotFound(gridlock_protocol::RoomId::from("R1"));
        let gridlock_err: GridlockError = err.into();
        assert!(matches!(gridlock_err, GridlockError::Room(_)));
        assert_eq!(gridlock_err.to_string(), "room R1 not found");
    }
}
