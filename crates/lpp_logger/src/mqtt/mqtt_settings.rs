use std::time::Duration;

/// Connection settings for the uplink subscriber
#[derive(Debug, Clone)]
pub struct MqttSettings {
    /// Broker address: `mqtt://host:port`, `tcp://host:port`, `host:port` or `host`
    pub broker_url: String,

    /// Topic filter to subscribe to
    pub topic: String,

    pub client_id: String,

    pub keep_alive: Duration,

    /// Delay before reconnecting after a connection error
    pub retry_delay: Duration,

    /// Consecutive failed connections before giving up
    pub max_retry_attempts: u32,
}

impl Default for MqttSettings {
    fn default() -> Self {
        Self {
            broker_url: "mqtt://localhost:1883".to_string(),
            topic: "application/+/device/+/event/up".to_string(),
            client_id: "lpp-logger".to_string(),
            keep_alive: Duration::from_secs(60),
            retry_delay: Duration::from_secs(5),
            max_retry_attempts: 10,
        }
    }
}
