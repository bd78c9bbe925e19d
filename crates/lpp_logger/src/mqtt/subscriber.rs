use crate::domain::{DomainError, DomainResult, UplinkService};
use crate::mqtt::{parse_uplink_topic, MqttSettings};
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, instrument, warn, Instrument, Span};

/// Run the MQTT uplink subscriber until shutdown
///
/// Subscribes to the configured ChirpStack topic filter and hands every
/// received message to the [`UplinkService`]. Connection errors are retried
/// with a fixed delay; the attempt counter resets once a connection is
/// acknowledged.
#[instrument(
    name = "mqtt_subscriber",
    skip_all,
    fields(
        broker_url = %settings.broker_url,
        topic = %settings.topic,
    )
)]
pub async fn run_mqtt_subscriber(
    settings: MqttSettings,
    service: Arc<UplinkService>,
    shutdown_token: CancellationToken,
) -> DomainResult<()> {
    info!("starting MQTT subscriber");

    let mut retry_count = 0;

    loop {
        if shutdown_token.is_cancelled() {
            debug!("MQTT subscriber cancelled before connection");
            break;
        }

        match run_mqtt_connection(&settings, &service, &shutdown_token, &mut retry_count).await {
            Ok(()) => {
                debug!("MQTT subscriber stopped cleanly");
                break;
            }
            Err(e @ DomainError::InvalidMqttConfig(_)) => return Err(e),
            Err(e) => {
                error!(error = %e, "MQTT connection error");

                retry_count += 1;
                if retry_count >= settings.max_retry_attempts {
                    error!(
                        max_retries = settings.max_retry_attempts,
                        "max retry attempts reached, stopping MQTT subscriber"
                    );
                    return Err(e);
                }

                warn!(
                    attempt = retry_count,
                    max_attempts = settings.max_retry_attempts,
                    "retrying MQTT connection"
                );

                tokio::select! {
                    _ = shutdown_token.cancelled() => break,
                    _ = tokio::time::sleep(settings.retry_delay) => {}
                }
            }
        }
    }

    info!("MQTT subscriber stopped");
    Ok(())
}

/// Run a single MQTT connection session
async fn run_mqtt_connection(
    settings: &MqttSettings,
    service: &UplinkService,
    shutdown_token: &CancellationToken,
    retry_count: &mut u32,
) -> DomainResult<()> {
    let (host, port) = parse_broker_url(&settings.broker_url)?;

    let mut mqtt_options = MqttOptions::new(&settings.client_id, host, port);
    mqtt_options.set_keep_alive(settings.keep_alive);
    mqtt_options.set_clean_session(true);

    let (client, mut eventloop) = AsyncClient::new(mqtt_options, 100);

    client
        .subscribe(&settings.topic, QoS::AtLeastOnce)
        .await
        .map_err(|e| DomainError::TransportError(format!("failed to subscribe: {}", e)))?;

    loop {
        tokio::select! {
            _ = shutdown_token.cancelled() => {
                debug!("shutdown signal received");
                let _ = client.disconnect().await;
                return Ok(());
            }
            event = eventloop.poll() => {
                match event {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        handle_mqtt_message(service, &publish.topic, &publish.payload).await;
                    }
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        *retry_count = 0;
                        info!(host, port, "connected to MQTT broker");
                    }
                    Ok(Event::Incoming(Packet::SubAck(_))) => {
                        info!(topic = %settings.topic, "subscribed to MQTT topic");
                    }
                    Ok(_) => {
                        // Pings and outgoing packets
                    }
                    Err(e) => {
                        return Err(DomainError::TransportError(format!(
                            "MQTT event loop error: {}",
                            e
                        )));
                    }
                }
            }
        }
    }
}

/// Handle an incoming MQTT message
///
/// Every message gets its own root span. Failures are logged and the message
/// is dropped; they never stop the subscriber.
pub(crate) async fn handle_mqtt_message(service: &UplinkService, topic: &str, payload: &[u8]) {
    let span = info_span!(
        parent: Span::none(),
        "mqtt_message",
        topic = %topic,
        payload_size = payload.len(),
        application_id = tracing::field::Empty,
        dev_eui = tracing::field::Empty,
    );

    async {
        match parse_uplink_topic(topic) {
            Ok(parsed) => {
                Span::current().record("application_id", parsed.application_id.as_str());
                Span::current().record("dev_eui", parsed.dev_eui.as_str());
            }
            Err(e) => {
                debug!(error = %e, "not a ChirpStack event topic");
            }
        }

        match service.process_uplink(payload).await {
            Ok(_) => {}
            Err(DomainError::MissingPayload) => {
                warn!("no 'data' field in uplink, skipping message");
            }
            Err(e) => {
                error!(
                    error = %e,
                    raw_payload = %String::from_utf8_lossy(payload),
                    "failed to process uplink"
                );
            }
        }
    }
    .instrument(span)
    .await
}

/// Parse broker URL in format mqtt://host:port or tcp://host:port or host:port
fn parse_broker_url(url: &str) -> DomainResult<(&str, u16)> {
    let url = url.trim_start_matches("mqtt://");
    let url = url.trim_start_matches("tcp://");

    let parts: Vec<&str> = url.split(':').collect();
    match parts[..] {
        [host] if !host.is_empty() => Ok((host, 1883)),
        [host, port] if !host.is_empty() => {
            let port = port.parse::<u16>().map_err(|_| {
                DomainError::InvalidMqttConfig(format!("invalid port in broker URL: {}", port))
            })?;
            Ok((host, port))
        }
        _ => Err(DomainError::InvalidMqttConfig(format!(
            "invalid broker URL format: {}",
            url
        ))),
    }
}
