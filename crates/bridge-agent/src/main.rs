use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use application::{
    CommandListener, ConverterHandler, FrameListener, InboundDispatcher, RefreshScheduler,
};
use domain::controller::Controller;
use domain::event::{EventPublisher, EventSink};
use infrastructure::config::{BridgeConfig, TransportKind};
use infrastructure::{
    ChannelEventSink, CompositeEventPublisher, ControllerWorker, FrameTransport, LoggingTransport,
    MqttClient, MqttEventPublisher, MqttFrameTransport, MqttPublisherClient, QueuedController,
    RetryPolicy, SinkPump,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to config directory
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// Override bridge ID
    #[arg(long)]
    bridge_id: Option<String>,

    /// Override MQTT host
    #[arg(long)]
    mqtt_host: Option<String>,

    /// Override MQTT port
    #[arg(long)]
    mqtt_port: Option<u16>,

    /// Log frames instead of handing them to the gateway
    #[arg(long)]
    dry_run: bool,
}

async fn run() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,bridge_agent=debug,application=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!(config_dir = %args.config_dir, "Loading configuration");
    let mut config = BridgeConfig::load(&args.config_dir)?;
    if let Some(id) = args.bridge_id {
        config.bridge_id = id;
    }
    if let Some(host) = args.mqtt_host {
        config.mqtt.host = host;
    }
    if let Some(port) = args.mqtt_port {
        config.mqtt.port = port;
    }
    if args.dry_run {
        config.controller.transport = TransportKind::Log;
    }

    let bridge_id = config.bridge_id.clone();
    info!(bridge_id = %bridge_id, controller = %config.controller.node_id, "Bridge starting");

    // MQTT
    let status_topic = format!("zwave/{}/status", bridge_id);
    let last_will = rumqttc::LastWill::new(
        &status_topic,
        serde_json::json!({ "status": "OFFLINE" }).to_string(),
        rumqttc::QoS::AtLeastOnce,
        true,
    );
    let mqtt_client = MqttClient::connect(
        &config.mqtt,
        &format!("zwave-bridge-{}", bridge_id),
        Some(last_will),
    );
    let publisher_client: Arc<dyn MqttPublisherClient> = Arc::new(mqtt_client.clone());

    let cancel = CancellationToken::new();

    // Controller link
    let transport: Arc<dyn FrameTransport> = match config.controller.transport {
        TransportKind::Mqtt => Arc::new(MqttFrameTransport::new(
            publisher_client.clone(),
            &bridge_id,
        )),
        TransportKind::Log => Arc::new(LoggingTransport),
    };
    let (controller, frame_rx) = QueuedController::new(config.controller.node_id);
    let controller: Arc<dyn Controller> = Arc::new(controller);
    let worker = ControllerWorker::new(
        frame_rx,
        transport,
        RetryPolicy {
            max_attempts: config.controller.max_attempts,
            backoff: Duration::from_millis(config.controller.retry_backoff_ms),
        },
    );
    let worker_handle = tokio::spawn(worker.run(cancel.clone()));

    // Event bus
    let mqtt_publisher: Arc<dyn EventPublisher> =
        Arc::new(MqttEventPublisher::new(publisher_client.clone()));
    let publisher: Arc<dyn EventPublisher> =
        Arc::new(CompositeEventPublisher::new(vec![mqtt_publisher]));
    let (sink, event_rx) = ChannelEventSink::new();
    let sink: Arc<dyn EventSink> = Arc::new(sink);
    let pump_handle =
        tokio::spawn(SinkPump::new(event_rx, publisher.clone()).run(cancel.clone()));

    // Converters and routing
    let network = Arc::new(bridge_agent::build_network(&config)?);
    let handler = Arc::new(ConverterHandler::new(controller.clone(), sink));
    let dispatcher = Arc::new(InboundDispatcher::new(network.clone(), handler.clone()));

    let scheduler = RefreshScheduler::new(network.clone(), handler, controller);
    let tick = Duration::from_millis(config.scheduler_tick_ms);
    let scheduler_cancel = cancel.clone();
    let scheduler_handle = tokio::spawn(async move { scheduler.run(tick, scheduler_cancel).await });

    let frame_listener =
        FrameListener::new(mqtt_client.clone(), bridge_id.clone(), dispatcher.clone());
    let frames_cancel = cancel.clone();
    tokio::spawn(async move { frame_listener.start(frames_cancel).await });

    let command_listener = CommandListener::new(mqtt_client.clone(), bridge_id.clone(), dispatcher);
    let commands_cancel = cancel.clone();
    tokio::spawn(async move { command_listener.start(commands_cancel).await });

    let online = serde_json::json!({ "status": "ONLINE" }).to_string();
    if let Err(e) = mqtt_client.publish(&status_topic, &online, true).await {
        warn!(error = %e, "Failed to publish ONLINE status");
    }

    // Heartbeat
    let heartbeat_handle = tokio::spawn(bridge_agent::run_heartbeat(
        publisher,
        bridge_id.clone(),
        network.clone(),
        Duration::from_secs(config.heartbeat_interval_secs),
        cancel.clone(),
    ));

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(err) => warn!(error = %err, "Unable to listen for shutdown signal"),
    }

    cancel.cancel();
    let _ = tokio::join!(worker_handle, pump_handle, scheduler_handle, heartbeat_handle);

    let offline = serde_json::json!({ "status": "OFFLINE" }).to_string();
    let _ = mqtt_client.publish(&status_topic, &offline, true).await;

    info!("Bridge stopped");
    Ok(())
}

fn main() {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run()) {
        eprintln!("Fatal error: {e:?}");
        std::process::exit(1);
    }
}
