/// Errors raised by the durable backing of discovery and session state.
///
/// None of these escape gameplay calls; callers log them and keep their
/// in-memory state.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("backing store unavailable")]
    Unavailable,

    #[error("failed to read '{key}': {reason}")]
    Read { key: String, reason: String },

    #[error("failed to write '{key}': {reason}")]
    Write { key: String, reason: String },

    #[error("malformed data under '{key}': {reason}")]
    Malformed { key: String, reason: String },

    #[error("unsupported record format version {0}")]
    UnsupportedVersion(u32),

    #[error("failed to encode records: {0}")]
    Encode(String),
}
