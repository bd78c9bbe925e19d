use crate::mqtt::MqttSettings;
use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    // MQTT configuration
    /// MQTT broker URL
    #[serde(default = "default_mqtt_broker_url")]
    pub mqtt_broker_url: String,

    /// Topic filter for ChirpStack uplink events
    #[serde(default = "default_mqtt_topic")]
    pub mqtt_topic: String,

    /// MQTT client identifier
    #[serde(default = "default_mqtt_client_id")]
    pub mqtt_client_id: String,

    /// MQTT keep-alive interval in seconds
    #[serde(default = "default_mqtt_keep_alive_secs")]
    pub mqtt_keep_alive_secs: u64,

    /// Delay between reconnect attempts in seconds
    #[serde(default = "default_mqtt_retry_delay_secs")]
    pub mqtt_retry_delay_secs: u64,

    /// Consecutive failed connections before the logger exits
    #[serde(default = "default_mqtt_max_retry_attempts")]
    pub mqtt_max_retry_attempts: u32,

    // Output configuration
    /// Path of the CSV sensor log
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

// MQTT defaults
fn default_mqtt_broker_url() -> String {
    "mqtt://localhost:1883".to_string()
}

fn default_mqtt_topic() -> String {
    "application/+/device/+/event/up".to_string()
}

fn default_mqtt_client_id() -> String {
    "lpp-logger".to_string()
}

fn default_mqtt_keep_alive_secs() -> u64 {
    60
}

fn default_mqtt_retry_delay_secs() -> u64 {
    5
}

fn default_mqtt_max_retry_attempts() -> u32 {
    10
}

// Output defaults
fn default_csv_path() -> String {
    "lora_sensor_data.csv".to_string()
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("LPP_LOGGER"))
            .build()?
            .try_deserialize()
    }

    pub fn mqtt_settings(&self) -> MqttSettings {
        MqttSettings {
            broker_url: self.mqtt_broker_url.clone(),
            topic: self.mqtt_topic.clone(),
            client_id: self.mqtt_client_id.clone(),
            keep_alive: Duration::from_secs(self.mqtt_keep_alive_secs),
            retry_delay: Duration::from_secs(self.mqtt_retry_delay_secs),
            max_retry_attempts: self.mqtt_max_retry_attempts,
        }
    }
}
