//! Save blob obfuscation.
//!
//! The JSON save is base64-encoded before it goes into localStorage so that
//! casual edits in devtools break the blob instead of silently changing
//! money. This is not encryption and offers no integrity guarantee.
//!
//! Decoding is strict: wrong length, characters outside the alphabet or
//! padding in the middle all fail, so a damaged blob is reported as
//! corruption instead of half-decoding.

use base64::engine::general_purpose::STANDARD;
use base64::{DecodeError, Engine};

use super::error::CorruptionError;

/// Encode UTF-8 text as padded base64.
pub fn obfuscate(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Reverse [`obfuscate`].
pub fn reveal(blob: &str) -> Result<String, CorruptionError> {
    let bytes = STANDARD.decode(blob).map_err(|e| match e {
        DecodeError::InvalidByte(position, _) | DecodeError::InvalidLastSymbol(position, _) => {
            CorruptionError::InvalidAlphabet { position }
        }
        _ => CorruptionError::Truncated { len: blob.len() },
    })?;
    String::from_utf8(bytes).map_err(|_| CorruptionError::NotUtf8)
}
