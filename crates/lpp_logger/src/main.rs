use lpp_logger::config::ServiceConfig;
use lpp_logger::domain::UplinkService;
use lpp_logger::mqtt::run_mqtt_subscriber;
use lpp_logger::shutdown::spawn_signal_handlers;
use lpp_logger::storage::CsvRecordSink;
use lpp_logger::telemetry::{init_telemetry, TelemetryConfig};
use lpp_payload::CayenneLppDecoder;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    let config = match ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_telemetry(&TelemetryConfig {
        log_level: config.log_level.clone(),
    }) {
        eprintln!("Failed to initialize telemetry: {}", e);
        std::process::exit(1);
    }

    info!(
        broker_url = %config.mqtt_broker_url,
        topic = %config.mqtt_topic,
        csv_path = %config.csv_path,
        "Starting lpp-logger"
    );
    debug!("Configuration: {:?}", config);

    let sink = match CsvRecordSink::open(&config.csv_path) {
        Ok(sink) => sink,
        Err(e) => {
            error!("Failed to open sensor log: {}", e);
            std::process::exit(1);
        }
    };

    let service = Arc::new(UplinkService::new(
        Arc::new(CayenneLppDecoder::new()),
        Arc::new(sink),
    ));

    let shutdown_token = CancellationToken::new();
    spawn_signal_handlers(shutdown_token.clone());

    match run_mqtt_subscriber(config.mqtt_settings(), service, shutdown_token).await {
        Ok(()) => {
            info!("Application exiting normally");
        }
        Err(e) => {
            error!("Application exiting with error: {}", e);
            std::process::exit(1);
        }
    }
}
