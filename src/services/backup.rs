//! Portable backup of the token table.
//!
//! The export is the full ordered token list wrapped in a versioned JSON
//! envelope, zstd-compressed and base64-encoded so it survives copy-paste
//! and file transfer. A restore replaces the whole table, ids included.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::constants::backup::{COMPRESSION_LEVEL, FORMAT, VERSION};
use crate::db::Store;
use crate::models::token::Token;

/// Errors raised by backup export/restore.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The blob failed to decode, decompress or parse. The table is left
    /// untouched when this is returned.
    #[error("Malformed backup: {0}")]
    Malformed(String),

    /// The envelope parsed but is not a format/version we restore.
    #[error("Unsupported backup format: {0}")]
    Unsupported(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for BackupError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Self-describing envelope around the serialized token list.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    format: String,
    version: u32,
    tokens: Vec<Token>,
}

pub struct BackupCodec {
    store: Store,
}

impl BackupCodec {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Serializes the full token list into a printable blob.
    pub async fn export(&self) -> Result<String, BackupError> {
        let tokens = self.store.token_repo().list(0, 0).await?;

        let envelope = Envelope {
            format: FORMAT.to_string(),
            version: VERSION,
            tokens,
        };

        let json = serde_json::to_vec(&envelope)
            .map_err(|e| BackupError::Database(e.to_string()))?;
        let compressed = zstd::encode_all(json.as_slice(), COMPRESSION_LEVEL)
            .map_err(|e| BackupError::Database(e.to_string()))?;

        info!(tokens = envelope.tokens.len(), "Token backup exported");
        Ok(BASE64.encode(compressed))
    }

    /// Restores a blob, replacing the entire table.
    ///
    /// The blob is decoded, decompressed and parsed to completion before
    /// anything is deleted; any failure up to that point returns an error
    /// with the existing data intact. Restores are expected to run under
    /// administrative mutual exclusion: a crash between the wipe and the
    /// bulk insert leaves the table empty.
    pub async fn import(&self, blob: &str) -> Result<u64, BackupError> {
        let tokens = Self::decode(blob)?;

        let restored = self.store.token_repo().replace_all(&tokens).await?;

        info!(tokens = restored, "Token backup restored");
        Ok(restored)
    }

    fn decode(blob: &str) -> Result<Vec<Token>, BackupError> {
        let compressed = BASE64
            .decode(blob.trim())
            .map_err(|e| BackupError::Malformed(format!("base64: {e}")))?;

        let json = zstd::decode_all(compressed.as_slice())
            .map_err(|e| BackupError::Malformed(format!("zstd: {e}")))?;

        let envelope: Envelope = serde_json::from_slice(&json)
            .map_err(|e| BackupError::Malformed(format!("json: {e}")))?;

        if envelope.format != FORMAT {
            return Err(BackupError::Unsupported(envelope.format));
        }
        if envelope.version != VERSION {
            return Err(BackupError::Unsupported(format!(
                "version {}",
                envelope.version
            )));
        }

        Ok(envelope.tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_garbage_base64() {
        assert!(matches!(
            BackupCodec::decode("not//valid@@base64!!"),
            Err(BackupError::Malformed(_))
        ));
    }

    #[test]
    fn decode_rejects_uncompressed_payload() {
        let blob = BASE64.encode(b"{\"format\":\"gatekey-tokens\"}");
        assert!(matches!(
            BackupCodec::decode(&blob),
            Err(BackupError::Malformed(_))
        ));
    }

    #[test]
    fn decode_rejects_foreign_format() {
        let json = serde_json::json!({
            "format": "someone-elses-backup",
            "version": 1,
            "tokens": []
        });
        let compressed =
            zstd::encode_all(serde_json::to_vec(&json).unwrap().as_slice(), 3).unwrap();
        let blob = BASE64.encode(compressed);

        assert!(matches!(
            BackupCodec::decode(&blob),
            Err(BackupError::Unsupported(_))
        ));
    }
}
