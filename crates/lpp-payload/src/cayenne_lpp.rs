//! Cayenne LPP (Low Power Payload) decoder for the field sensor nodes.
//!
//! # Payload Format
//!
//! Each reading in a Cayenne LPP payload consists of:
//! - 1 byte: Channel number (0-255)
//! - 1 byte: Sensor type ID
//! - N bytes: Sensor data (size fixed by the type)
//!
//! Readings are concatenated with no length prefix, so the type table below is
//! the only thing that keeps the scan aligned.
//!
//! # Supported Sensor Types
//!
//! - Analog Input (2): 2 bytes, big-endian **unsigned**, raw units
//! - Temperature (103): 2 bytes, big-endian signed, 0.1 °C
//! - Humidity (104): 1 byte, unsigned, 0.5 %
//!
//! Analog inputs are nominally signed fixed-point in the Cayenne LPP
//! specification. The nodes in this deployment put raw spectral sensor counts
//! there, which are never negative and regularly exceed `i16::MAX`, so they are
//! read as `u16` and left unscaled.
//!
//! # References
//!
//! - [Cayenne LPP Specification](https://developers.mydevices.com/cayenne/docs/lora/)

use crate::{DecodedPayload, PayloadDecoder, PayloadError, Reading, ReadingKind};
use tracing::warn;

// Sensor type IDs from Cayenne LPP specification
pub const TYPE_ANALOG_INPUT: u8 = 2;
pub const TYPE_TEMPERATURE: u8 = 103;
pub const TYPE_HUMIDITY: u8 = 104;

// Data sizes for each type (in bytes, excluding channel and type bytes)
pub const SIZE_ANALOG: usize = 2;
pub const SIZE_TEMPERATURE: usize = 2;
pub const SIZE_HUMIDITY: usize = 1;

/// Channel byte + type byte
pub const HEADER_SIZE: usize = 2;

/// Width and interpretation of one known sensor type.
#[derive(Debug, Clone, Copy)]
struct SensorType {
    type_id: u8,
    kind: ReadingKind,
    size: usize,
    decode: fn(&[u8]) -> f64,
}

const SENSOR_TYPES: &[SensorType] = &[
    SensorType {
        type_id: TYPE_TEMPERATURE,
        kind: ReadingKind::Temperature,
        size: SIZE_TEMPERATURE,
        decode: decode_temperature,
    },
    SensorType {
        type_id: TYPE_HUMIDITY,
        kind: ReadingKind::Humidity,
        size: SIZE_HUMIDITY,
        decode: decode_humidity,
    },
    SensorType {
        type_id: TYPE_ANALOG_INPUT,
        kind: ReadingKind::Analog,
        size: SIZE_ANALOG,
        decode: decode_analog,
    },
];

fn read_i16_be(data: &[u8]) -> i16 {
    i16::from_be_bytes([data[0], data[1]])
}

fn read_u16_be(data: &[u8]) -> u16 {
    u16::from_be_bytes([data[0], data[1]])
}

fn decode_temperature(data: &[u8]) -> f64 {
    f64::from(read_i16_be(data)) / 10.0
}

fn decode_humidity(data: &[u8]) -> f64 {
    f64::from(data[0]) / 2.0
}

fn decode_analog(data: &[u8]) -> f64 {
    f64::from(read_u16_be(data))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CayenneLppDecoder;

impl CayenneLppDecoder {
    pub fn new() -> Self {
        Self
    }

    fn sensor_type(type_id: u8) -> Option<&'static SensorType> {
        SENSOR_TYPES.iter().find(|t| t.type_id == type_id)
    }

    /// Kind a type ID decodes to; [`ReadingKind::Unknown`] if it is not in the table.
    pub fn reading_kind(type_id: u8) -> ReadingKind {
        Self::sensor_type(type_id)
            .map(|t| t.kind)
            .unwrap_or(ReadingKind::Unknown)
    }

    /// Payload width of a type ID, excluding the header.
    pub fn data_size(type_id: u8) -> Option<usize> {
        Self::sensor_type(type_id).map(|t| t.size)
    }
}

impl PayloadDecoder for CayenneLppDecoder {
    fn decode(&self, bytes: &[u8]) -> DecodedPayload {
        let mut result = DecodedPayload::default();
        let mut offset = 0;

        while offset < bytes.len() {
            let remaining = bytes.len() - offset;
            if remaining < HEADER_SIZE {
                warn!(offset, remaining, "truncated Cayenne LPP header, stopping");
                result.diagnostics.push(PayloadError::TruncatedInput {
                    offset,
                    expected: HEADER_SIZE,
                    actual: remaining,
                });
                break;
            }

            let channel = bytes[offset];
            let type_id = bytes[offset + 1];
            let data_start = offset + HEADER_SIZE;

            // The format carries no length for unknown types: step over the
            // header only so the scan always advances.
            let Some(sensor) = Self::sensor_type(type_id) else {
                warn!(channel, type_id, offset, "skipping unknown Cayenne LPP type");
                result.diagnostics.push(PayloadError::UnrecognizedType {
                    offset,
                    channel,
                    type_id,
                });
                offset = data_start;
                continue;
            };

            let Some(data) = bytes.get(data_start..data_start + sensor.size) else {
                let actual = bytes.len() - data_start;
                warn!(
                    channel,
                    type_id,
                    offset,
                    expected = sensor.size,
                    actual,
                    "truncated Cayenne LPP value, stopping"
                );
                result.diagnostics.push(PayloadError::TruncatedInput {
                    offset: data_start,
                    expected: sensor.size,
                    actual,
                });
                break;
            };

            result
                .readings
                .push(Reading::new(channel, sensor.kind, (sensor.decode)(data)));
            offset = data_start + sensor.size;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(payload: &[u8]) -> DecodedPayload {
        CayenneLppDecoder::new().decode(payload)
    }

    #[test]
    fn test_empty_payload() {
        let result = decode(&[]);
        assert!(result.is_empty());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_temperature() {
        // Channel 1, Temperature (type 103), Value 15.0°C (raw: 150)
        let result = decode(&[0x01, 0x67, 0x00, 0x96]);
        assert_eq!(
            result.readings,
            vec![Reading::new(1, ReadingKind::Temperature, 15.0)]
        );
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_temperature_negative() {
        // Channel 5, Temperature (type 103), Value -0.1°C (raw: -1)
        let result = decode(&[0x05, 0x67, 0xFF, 0xFF]);
        assert_eq!(result.latest(5, ReadingKind::Temperature), Some(-0.1));
    }

    #[test]
    fn test_humidity() {
        // Channel 2, Humidity (type 104), Value 50% (raw: 100)
        let result = decode(&[0x02, 0x68, 0x64]);
        assert_eq!(
            result.readings,
            vec![Reading::new(2, ReadingKind::Humidity, 50.0)]
        );
    }

    #[test]
    fn test_humidity_full() {
        // Channel 1, Humidity (type 104), raw 255 -> 127.5
        let result = decode(&[0x01, 0x68, 0xFF]);
        assert_eq!(result.latest(1, ReadingKind::Humidity), Some(127.5));
    }

    #[test]
    fn test_analog_is_unsigned() {
        // 0xFFFF must stay 65535, not wrap to -1
        let result = decode(&[0x03, 0x02, 0xFF, 0xFF]);
        assert_eq!(
            result.readings,
            vec![Reading::new(3, ReadingKind::Analog, 65535.0)]
        );
    }

    #[test]
    fn test_analog_is_unscaled() {
        // Channel 4, raw 0x8001 = 32769
        let result = decode(&[0x04, 0x02, 0x80, 0x01]);
        assert_eq!(result.latest(4, ReadingKind::Analog), Some(32769.0));
    }

    #[test]
    fn test_multiple_sensors() {
        let payload = vec![
            0x01, 0x67, 0x01, 0x10, // Temp 27.2
            0x02, 0x68, 0x64, // Humidity 50
            0x03, 0x02, 0x04, 0xD2, // Analog 1234
        ];
        let result = decode(&payload);
        assert_eq!(
            result.readings,
            vec![
                Reading::new(1, ReadingKind::Temperature, 27.2),
                Reading::new(2, ReadingKind::Humidity, 50.0),
                Reading::new(3, ReadingKind::Analog, 1234.0),
            ]
        );
    }

    #[test]
    fn test_repeated_channel_keeps_both() {
        let payload = vec![
            0x03, 0x67, 0x00, 0x64, // Temp 10.0 on channel 3
            0x03, 0x02, 0x00, 0x07, // Analog 7 on channel 3
        ];
        let result = decode(&payload);
        assert_eq!(result.len(), 2);
        assert_eq!(result.latest(3, ReadingKind::Temperature), Some(10.0));
        assert_eq!(result.latest(3, ReadingKind::Analog), Some(7.0));
    }

    #[test]
    fn test_truncated_header() {
        // Complete humidity reading, then a dangling channel byte
        let result = decode(&[0x02, 0x68, 0x64, 0x07]);
        assert_eq!(
            result.readings,
            vec![Reading::new(2, ReadingKind::Humidity, 50.0)]
        );
        assert_eq!(
            result.diagnostics,
            vec![PayloadError::TruncatedInput {
                offset: 3,
                expected: HEADER_SIZE,
                actual: 1,
            }]
        );
    }

    #[test]
    fn test_truncated_value() {
        // Temperature with only 1 of 2 data bytes
        let result = decode(&[0x01, 0x67, 0x01]);
        assert!(result.is_empty());
        assert_eq!(
            result.diagnostics,
            vec![PayloadError::TruncatedInput {
                offset: 2,
                expected: SIZE_TEMPERATURE,
                actual: 1,
            }]
        );
        assert!(result.is_truncated());
    }

    #[test]
    fn test_unknown_type_skips_header_only() {
        let payload = vec![
            0x09, 0x63, // Channel 9, unknown type 99
            0x01, 0x67, 0x00, 0x96, // Temp 15.0
        ];
        let result = decode(&payload);
        assert_eq!(
            result.readings,
            vec![Reading::new(1, ReadingKind::Temperature, 15.0)]
        );
        assert_eq!(
            result.diagnostics,
            vec![PayloadError::UnrecognizedType {
                offset: 0,
                channel: 9,
                type_id: 0x63,
            }]
        );
    }

    #[test]
    fn test_consecutive_unknown_types() {
        let result = decode(&[0x01, 0xAA, 0x02, 0xBB, 0x03, 0xCC]);
        assert!(result.is_empty());
        assert_eq!(result.diagnostics.len(), 3);
        assert!(!result.is_truncated());
    }

    #[test]
    fn test_unknown_type_at_tail() {
        // Unknown type with trailing single byte: skip header, then truncated
        let result = decode(&[0x01, 0xAA, 0x05]);
        assert_eq!(result.diagnostics.len(), 2);
        assert!(matches!(
            result.diagnostics[0],
            PayloadError::UnrecognizedType { type_id: 0xAA, .. }
        ));
        assert!(matches!(
            result.diagnostics[1],
            PayloadError::TruncatedInput { offset: 2, .. }
        ));
    }

    #[test]
    fn test_reading_kind_lookup() {
        assert_eq!(
            CayenneLppDecoder::reading_kind(TYPE_TEMPERATURE),
            ReadingKind::Temperature
        );
        assert_eq!(
            CayenneLppDecoder::reading_kind(TYPE_HUMIDITY),
            ReadingKind::Humidity
        );
        assert_eq!(
            CayenneLppDecoder::reading_kind(TYPE_ANALOG_INPUT),
            ReadingKind::Analog
        );
        assert_eq!(CayenneLppDecoder::reading_kind(0x03), ReadingKind::Unknown);
    }

    #[test]
    fn test_data_size_lookup() {
        assert_eq!(CayenneLppDecoder::data_size(TYPE_TEMPERATURE), Some(2));
        assert_eq!(CayenneLppDecoder::data_size(TYPE_HUMIDITY), Some(1));
        assert_eq!(CayenneLppDecoder::data_size(TYPE_ANALOG_INPUT), Some(2));
        assert_eq!(CayenneLppDecoder::data_size(0x88), None);
    }
}
