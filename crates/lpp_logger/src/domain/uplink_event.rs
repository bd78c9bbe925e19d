use crate::domain::{DomainError, DomainResult};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;

/// Device metadata ChirpStack attaches to every event
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub dev_eui: String,
    pub device_name: String,
}

/// ChirpStack uplink event as published on `application/+/device/+/event/up`
///
/// Only the fields the logger needs are modelled; everything else in the
/// event is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UplinkEvent {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub device_info: Option<DeviceInfo>,
}

impl UplinkEvent {
    pub fn from_json(message: &[u8]) -> DomainResult<Self> {
        Ok(serde_json::from_slice(message)?)
    }

    /// Base64-decoded application payload
    pub fn payload_bytes(&self) -> DomainResult<Vec<u8>> {
        match self.data.as_deref() {
            Some(data) if !data.is_empty() => Ok(STANDARD.decode(data)?),
            _ => Err(DomainError::MissingPayload),
        }
    }

    pub fn device(&self) -> DomainResult<&DeviceInfo> {
        self.device_info
            .as_ref()
            .ok_or_else(|| DomainError::MalformedEnvelope("missing 'deviceInfo'".to_string()))
    }
}
