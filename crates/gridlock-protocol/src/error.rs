//! Error types for the protocol layer.
//!
//! Each Gridlock crate defines its own error enum, so a `ProtocolError`
//! always means a frame could not be turned into an event (or back),
//! never a networking or game-rule problem.

/// Errors that can occur while encoding or decoding events.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed.
    ///
    /// Common causes: malformed JSON, an unknown event name, a missing
    /// `data` field, or a payload of the wrong shape (e.g. a negative
    /// cell index).
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
