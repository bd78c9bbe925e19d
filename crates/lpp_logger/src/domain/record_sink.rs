use crate::domain::{DomainResult, SensorRecord};
use async_trait::async_trait;

/// Destination for mapped sensor records
///
/// Implementations should:
/// - Persist the record durably before returning
/// - Never interleave concurrent writes
/// - Return SinkError if the record could not be written
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Write a single record
    async fn write(&self, record: &SensorRecord) -> DomainResult<()>;
}
