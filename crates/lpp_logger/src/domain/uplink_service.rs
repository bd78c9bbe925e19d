use crate::domain::{DomainResult, RecordSink, SensorRecord, UplinkEvent};
use lpp_payload::PayloadDecoder;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Domain service that turns one uplink message into one logged record
///
/// Flow:
/// 1. Parse the ChirpStack envelope and extract the base64 payload
/// 2. Check the device metadata is present
/// 3. Decode the Cayenne LPP payload
/// 4. Map the readings into a SensorRecord
/// 5. Write it via the sink trait
pub struct UplinkService {
    decoder: Arc<dyn PayloadDecoder>,
    sink: Arc<dyn RecordSink>,
}

impl UplinkService {
    pub fn new(decoder: Arc<dyn PayloadDecoder>, sink: Arc<dyn RecordSink>) -> Self {
        Self { decoder, sink }
    }

    /// Process a raw uplink message body; returns the record that was written
    pub async fn process_uplink(&self, message: &[u8]) -> DomainResult<SensorRecord> {
        let event = UplinkEvent::from_json(message)?;
        let payload = event.payload_bytes()?;
        let device = event.device()?;

        debug!(
            dev_eui = %device.dev_eui,
            device_name = %device.device_name,
            payload_size = payload.len(),
            "Decoding uplink payload"
        );

        let decoded = self.decoder.decode(&payload);

        for diagnostic in &decoded.diagnostics {
            warn!(
                dev_eui = %device.dev_eui,
                diagnostic = %diagnostic,
                "Payload decoded with problems"
            );
        }

        debug!(
            dev_eui = %device.dev_eui,
            fields = %serde_json::Value::Object(decoded.to_field_map()),
            "Decoded payload"
        );

        let record =
            SensorRecord::from_payload(chrono::Local::now().naive_local(), device, &decoded);

        self.sink.write(&record).await?;

        info!(
            dev_eui = %record.dev_eui,
            device_name = %record.device_name,
            populated_fields = record.populated_fields(),
            "Sensor record written"
        );

        Ok(record)
    }
}
