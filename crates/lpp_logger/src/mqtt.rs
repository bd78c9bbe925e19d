mod mqtt_settings;
pub(crate) mod subscriber;
mod topic;

pub use mqtt_settings::MqttSettings;
pub use subscriber::run_mqtt_subscriber;
pub use topic::{parse_uplink_topic, UplinkTopic};
