//! Error types for save/load.

use std::fmt;

/// A save blob could not be turned back into a game state.
///
/// Never fatal: the store logs it, discards the blob and starts fresh.
#[derive(Debug, Clone, PartialEq)]
pub enum CorruptionError {
    /// A character outside the base64 alphabet, at byte offset `position`.
    InvalidAlphabet { position: usize },
    /// Blob ends mid-quad or with missing padding.
    Truncated { len: usize },
    /// Decoded bytes are not UTF-8 text.
    NotUtf8,
    /// The JSON did not parse into a save tree.
    Malformed(String),
    /// Save predates the oldest layout this build can migrate.
    IncompatibleVersion { found: u32, min_compatible: u32 },
}

impl fmt::Display for CorruptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorruptionError::InvalidAlphabet { position } => {
                write!(f, "invalid character in save blob at offset {position}")
            }
            CorruptionError::Truncated { len } => {
                write!(f, "save blob truncated or badly padded ({len} chars)")
            }
            CorruptionError::NotUtf8 => write!(f, "save blob does not decode to UTF-8 text"),
            CorruptionError::Malformed(msg) => write!(f, "malformed save data: {msg}"),
            CorruptionError::IncompatibleVersion {
                found,
                min_compatible,
            } => write!(
                f,
                "save version {found} is too old (minimum compatible is {min_compatible})"
            ),
        }
    }
}

impl std::error::Error for CorruptionError {}

impl From<serde_json::Error> for CorruptionError {
    fn from(e: serde_json::Error) -> Self {
        CorruptionError::Malformed(e.to_string())
    }
}

/// Durable storage rejected a write (quota exceeded, storage disabled, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct StorageError(pub String);

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "storage write failed: {}", self.0)
    }
}

impl std::error::Error for StorageError {}
