use serde::Serialize;
use thiserror::Error;

/// Conditions the decoder recovers from while scanning a payload.
///
/// These are never returned as a hard failure: they are collected into
/// [`DecodedPayload::diagnostics`](crate::DecodedPayload) next to the readings
/// that could still be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PayloadError {
    #[error("truncated input at offset {offset}: expected {expected} bytes, got {actual}")]
    TruncatedInput {
        offset: usize,
        expected: usize,
        actual: usize,
    },

    #[error("unrecognized sensor type {type_id:#04x} on channel {channel} at offset {offset}")]
    UnrecognizedType { offset: usize, channel: u8, type_id: u8 },
}
