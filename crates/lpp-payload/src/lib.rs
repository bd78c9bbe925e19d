pub mod cayenne_lpp;
mod error;
mod reading;

pub use cayenne_lpp::CayenneLppDecoder;
pub use error::PayloadError;
pub use reading::{DecodedPayload, Reading, ReadingKind};

/// Trait for decoding binary sensor payloads into channel-tagged readings
///
/// Decoding never fails outright: malformed input yields whatever could be
/// decoded, with the problems listed in [`DecodedPayload::diagnostics`].
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PayloadDecoder: Send + Sync {
    /// Decode a raw (already base64-unwrapped) payload
    fn decode(&self, bytes: &[u8]) -> DecodedPayload;
}
