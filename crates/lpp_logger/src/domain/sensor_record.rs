use crate::domain::DeviceInfo;
use chrono::NaiveDateTime;
use lpp_payload::{DecodedPayload, ReadingKind};

/// Column order of the sensor log
pub const CSV_HEADERS: [&str; 13] = [
    "timestamp",
    "device_name",
    "dev_eui",
    "temperature",
    "humidity",
    "f1_415nm",
    "f2_445nm",
    "f3_480nm",
    "f4_515nm",
    "f5_555nm",
    "f6_590nm",
    "f7_630nm",
    "f8_680nm",
];

pub const TEMPERATURE_CHANNEL: u8 = 1;
pub const HUMIDITY_CHANNEL: u8 = 2;
/// Spectral channels F1..F8 arrive as analog inputs on consecutive channels
pub const FIRST_SPECTRAL_CHANNEL: u8 = 3;
pub const SPECTRAL_CHANNEL_COUNT: usize = 8;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// One row of the sensor log
#[derive(Debug, Clone, PartialEq)]
pub struct SensorRecord {
    pub timestamp: NaiveDateTime,
    pub device_name: String,
    pub dev_eui: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub spectral: [Option<f64>; SPECTRAL_CHANNEL_COUNT],
}

impl SensorRecord {
    /// Pick the logged fields out of a decoded payload. When a channel repeats,
    /// the last reading wins.
    pub fn from_payload(
        timestamp: NaiveDateTime,
        device: &DeviceInfo,
        payload: &DecodedPayload,
    ) -> Self {
        let spectral = std::array::from_fn(|i| {
            payload.latest(FIRST_SPECTRAL_CHANNEL + i as u8, ReadingKind::Analog)
        });

        Self {
            timestamp,
            device_name: device.device_name.clone(),
            dev_eui: device.dev_eui.clone(),
            temperature: payload.latest(TEMPERATURE_CHANNEL, ReadingKind::Temperature),
            humidity: payload.latest(HUMIDITY_CHANNEL, ReadingKind::Humidity),
            spectral,
        }
    }

    /// Number of measurement columns that have a value
    pub fn populated_fields(&self) -> usize {
        [self.temperature, self.humidity]
            .iter()
            .chain(self.spectral.iter())
            .filter(|v| v.is_some())
            .count()
    }

    /// Render the row in [`CSV_HEADERS`] order; missing values are empty.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(CSV_HEADERS.len());
        row.push(self.timestamp.format(TIMESTAMP_FORMAT).to_string());
        row.push(self.device_name.clone());
        row.push(self.dev_eui.clone());
        row.push(format_scaled(self.temperature));
        row.push(format_scaled(self.humidity));
        row.extend(self.spectral.iter().map(|v| format_raw(*v)));
        row
    }
}

// Scaled values always keep a decimal point ("15.0")
fn format_scaled(value: Option<f64>) -> String {
    value.map(|v| format!("{v:?}")).unwrap_or_default()
}

// Raw analog counts are whole numbers ("65535")
fn format_raw(value: Option<f64>) -> String {
    value.map(|v| format!("{v}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpp_payload::Reading;

    fn device() -> DeviceInfo {
        DeviceInfo {
            dev_eui: "70b3d57ed005c9a1".to_string(),
            device_name: "node-a".to_string(),
        }
    }

    fn timestamp() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_micro_opt(10, 15, 30, 123456)
            .unwrap()
    }

    fn payload(readings: Vec<Reading>) -> DecodedPayload {
        DecodedPayload {
            readings,
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn test_full_mapping() {
        let mut readings = vec![
            Reading::new(1, ReadingKind::Temperature, 15.0),
            Reading::new(2, ReadingKind::Humidity, 50.0),
        ];
        for ch in 3..=10u8 {
            readings.push(Reading::new(ch, ReadingKind::Analog, f64::from(ch) * 100.0));
        }

        let record = SensorRecord::from_payload(timestamp(), &device(), &payload(readings));

        assert_eq!(
            record.to_row(),
            vec![
                "2024-05-02T10:15:30.123456",
                "node-a",
                "70b3d57ed005c9a1",
                "15.0",
                "50.0",
                "300",
                "400",
                "500",
                "600",
                "700",
                "800",
                "900",
                "1000",
            ]
        );
        assert_eq!(record.populated_fields(), 10);
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let readings = vec![Reading::new(5, ReadingKind::Analog, 65535.0)];

        let record = SensorRecord::from_payload(timestamp(), &device(), &payload(readings));
        let row = record.to_row();

        assert_eq!(row.len(), CSV_HEADERS.len());
        assert_eq!(row[3], "");
        assert_eq!(row[4], "");
        assert_eq!(row[5], "");
        assert_eq!(row[7], "65535");
        assert_eq!(record.populated_fields(), 1);
    }

    #[test]
    fn test_kind_must_match_channel() {
        // Humidity on channel 1 and analog on channel 2 are not logged columns
        let readings = vec![
            Reading::new(1, ReadingKind::Humidity, 40.0),
            Reading::new(2, ReadingKind::Analog, 12.0),
            Reading::new(3, ReadingKind::Temperature, 20.0),
        ];

        let record = SensorRecord::from_payload(timestamp(), &device(), &payload(readings));

        assert_eq!(record.temperature, None);
        assert_eq!(record.humidity, None);
        assert_eq!(record.spectral, [None; SPECTRAL_CHANNEL_COUNT]);
    }

    #[test]
    fn test_last_reading_wins() {
        let readings = vec![
            Reading::new(1, ReadingKind::Temperature, 10.0),
            Reading::new(1, ReadingKind::Temperature, -2.5),
        ];

        let record = SensorRecord::from_payload(timestamp(), &device(), &payload(readings));

        assert_eq!(record.temperature, Some(-2.5));
        assert_eq!(record.to_row()[3], "-2.5");
    }

    #[test]
    fn test_channels_past_f8_ignored() {
        let readings = vec![Reading::new(11, ReadingKind::Analog, 1.0)];

        let record = SensorRecord::from_payload(timestamp(), &device(), &payload(readings));

        assert_eq!(record.populated_fields(), 0);
    }
}
