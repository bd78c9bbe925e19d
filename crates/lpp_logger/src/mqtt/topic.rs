use crate::domain::{DomainError, DomainResult};

/// Parsed ChirpStack event topic
#[derive(Debug, Clone, PartialEq)]
pub struct UplinkTopic {
    pub application_id: String,
    pub dev_eui: String,
    pub event: String,
}

/// Parse a ChirpStack topic in the format
/// `application/{application_id}/device/{dev_eui}/event/{event}`
///
/// # Examples
/// ```
/// use lpp_logger::mqtt::parse_uplink_topic;
///
/// let parsed = parse_uplink_topic("application/42/device/70b3d57ed005c9a1/event/up").unwrap();
/// assert_eq!(parsed.application_id, "42");
/// assert_eq!(parsed.dev_eui, "70b3d57ed005c9a1");
/// assert_eq!(parsed.event, "up");
/// ```
pub fn parse_uplink_topic(topic: &str) -> DomainResult<UplinkTopic> {
    let parts: Vec<&str> = topic.split('/').collect();

    let ["application", application_id, "device", dev_eui, "event", event] = parts[..] else {
        return Err(DomainError::InvalidTopic(format!(
            "'{}': expected 'application/{{application_id}}/device/{{dev_eui}}/event/{{event}}'",
            topic
        )));
    };

    if application_id.is_empty() || dev_eui.is_empty() || event.is_empty() {
        return Err(DomainError::InvalidTopic(format!(
            "'{}': empty topic segment",
            topic
        )));
    }

    Ok(UplinkTopic {
        application_id: application_id.to_string(),
        dev_eui: dev_eui.to_string(),
        event: event.to_string(),
    })
}
