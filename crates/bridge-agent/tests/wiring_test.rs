use std::sync::{Arc, Mutex};
use std::time::Duration;

use application::CapabilityKey;
use async_trait::async_trait;
use bridge_agent::{build_network, run_heartbeat};
use config::{Config, File, FileFormat};
use domain::DomainEvent;
use domain::command_class::CommandClassKind;
use domain::event::EventPublisher;
use domain::node::{EndpointId, NodeId};
use domain::value::ItemName;
use infrastructure::CompositeEventPublisher;
use infrastructure::config::BridgeConfig;
use tokio_util::sync::CancellationToken;

fn config_dir() -> String {
    format!("{}/config", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn test_shipped_config_builds_network() {
    let config = BridgeConfig::load(&config_dir()).expect("shipped config should load");
    let network = build_network(&config).unwrap();

    assert_eq!(network.binding_count(), 4);

    let relay = network
        .binding(&ItemName::new("Relay_Two").unwrap())
        .unwrap();
    assert_eq!(relay.endpoint, EndpointId::new(2));
    assert_eq!(relay.arguments.refresh_interval(), Ok(Some(300)));

    let wake_up = CapabilityKey::new(
        NodeId::new(12).unwrap(),
        EndpointId::ROOT,
        CommandClassKind::WakeUp,
    );
    assert_eq!(network.bindings_for(wake_up).len(), 1);
}

#[test]
fn test_binding_to_unknown_capability_is_skipped() {
    let toml = r#"
        bridge_id = "test"

        [mqtt]
        host = "localhost"
        port = 1883

        [controller]
        node_id = 1

        [[nodes]]
        id = 4
        command_classes = [{ kind = "BATTERY" }]

        [[items]]
        node_id = 4
        command_class = "BATTERY"
        item = { name = "Battery", item_type = "Number" }

        [[items]]
        node_id = 4
        command_class = "SWITCH_BINARY"
        item = { name = "Ghost", item_type = "Switch" }
    "#;
    let config: BridgeConfig = Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap();

    let network = build_network(&config).unwrap();
    assert_eq!(network.binding_count(), 1);
    assert!(network.binding(&ItemName::new("Ghost").unwrap()).is_none());
}

#[derive(Default)]
struct RecordingPublisher {
    events: Mutex<Vec<DomainEvent>>,
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(
        &self,
        event: DomainEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn test_heartbeat_goes_through_composite_publisher() {
    let config = BridgeConfig::load(&config_dir()).unwrap();
    let network = Arc::new(build_network(&config).unwrap());

    let recording = Arc::new(RecordingPublisher::default());
    let publishers: Vec<Arc<dyn EventPublisher>> = vec![recording.clone()];
    let composite: Arc<dyn EventPublisher> = Arc::new(CompositeEventPublisher::new(publishers));

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(run_heartbeat(
        composite,
        "hall".to_string(),
        network,
        Duration::from_secs(30),
        cancel.clone(),
    ));

    tokio::time::sleep(Duration::from_secs(65)).await;
    cancel.cancel();
    handle.await.unwrap();

    let events = recording.events.lock().unwrap();
    assert!(events.len() >= 2);
    match &events[0] {
        DomainEvent::BridgeHeartbeat {
            bridge_id,
            active_bindings,
            ..
        } => {
            assert_eq!(bridge_id, "hall");
            assert_eq!(*active_bindings, 4);
        }
        other => panic!("Unexpected event: {other:?}"),
    }
}
