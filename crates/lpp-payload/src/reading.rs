use crate::PayloadError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Semantic category of a decoded reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingKind {
    Temperature,
    Humidity,
    Analog,
    Unknown,
}

impl ReadingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingKind::Temperature => "temperature",
            ReadingKind::Humidity => "humidity",
            ReadingKind::Analog => "analog",
            ReadingKind::Unknown => "unknown",
        }
    }
}

/// One channel-tagged measurement, already scaled to physical units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub channel: u8,
    pub kind: ReadingKind,
    pub value: Option<f64>,
}

impl Reading {
    pub fn new(channel: u8, kind: ReadingKind, value: f64) -> Self {
        Self {
            channel,
            kind,
            value: Some(value),
        }
    }
}

/// Readings in stream order plus whatever the decoder had to skip or give up on.
///
/// Channels may repeat; nothing is overwritten here.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DecodedPayload {
    pub readings: Vec<Reading>,
    pub diagnostics: Vec<PayloadError>,
}

impl DecodedPayload {
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Value of the last reading matching `channel` and `kind`.
    pub fn latest(&self, channel: u8, kind: ReadingKind) -> Option<f64> {
        self.readings
            .iter()
            .rev()
            .find(|r| r.channel == channel && r.kind == kind)
            .and_then(|r| r.value)
    }

    pub fn is_truncated(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, PayloadError::TruncatedInput { .. }))
    }

    /// Flattens the readings into `{kind}_{channel}` keys, later readings
    /// replacing earlier ones.
    pub fn to_field_map(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        for reading in &self.readings {
            let key = format!("{}_{}", reading.kind.as_str(), reading.channel);
            let value = match reading.value {
                Some(v) if reading.kind == ReadingKind::Analog => Value::from(v as u64),
                Some(v) => Value::from(v),
                None => Value::Null,
            };
            fields.insert(key, value);
        }
        fields
    }
}
