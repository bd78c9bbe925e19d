use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid uplink JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Uplink has no 'data' field")]
    MissingPayload,

    #[error("Invalid base64 payload: {0}")]
    InvalidPayloadEncoding(#[from] base64::DecodeError),

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Invalid MQTT configuration: {0}")]
    InvalidMqttConfig(String),

    #[error("MQTT transport error: {0}")]
    TransportError(String),

    #[error("Record sink error: {0}")]
    SinkError(#[from] anyhow::Error),
}
