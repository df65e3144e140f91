use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use domain::DomainError;
use domain::binding::ItemBinding;
use domain::command_class::{CommandClassInstance, CommandClassKind};
use domain::node::{Endpoint, EndpointId, Node, NodeId};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: u64,
}

fn default_keep_alive() -> u64 {
    20
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Frames are exchanged with a serial gateway over MQTT
    #[default]
    Mqtt,
    /// Frames are only logged
    Log,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ControllerConfig {
    pub node_id: NodeId,
    #[serde(default)]
    pub transport: TransportKind,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}
fn default_retry_backoff() -> u64 {
    500
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommandClassConfig {
    pub kind: CommandClassKind,
    #[serde(default = "default_version")]
    pub version: u8,
}

fn default_version() -> u8 {
    1
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EndpointConfig {
    pub id: EndpointId,
    #[serde(default)]
    pub command_classes: Vec<CommandClassConfig>,
}

/// A node as described in configuration: root command classes plus endpoints
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NodeConfig {
    pub id: NodeId,
    #[serde(default = "default_multi_channel_version")]
    pub multi_channel_version: u8,
    #[serde(default)]
    pub command_classes: Vec<CommandClassConfig>,
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
}

fn default_multi_channel_version() -> u8 {
    2
}

impl NodeConfig {
    pub fn to_node(&self) -> Node {
        fn kinds(ccs: &[CommandClassConfig]) -> Vec<CommandClassKind> {
            ccs.iter().map(|cc| cc.kind).collect()
        }

        self.endpoints.iter().fold(
            Node::new(self.id, kinds(&self.command_classes))
                .with_multi_channel_version(self.multi_channel_version),
            |node, ep| node.with_endpoint(Endpoint::new(ep.id, kinds(&ep.command_classes))),
        )
    }

    /// One fresh instance per configured (endpoint, command class).
    /// Multi-channel is carried by the node itself and gets no instance.
    pub fn instances(&self) -> Result<Vec<CommandClassInstance>, DomainError> {
        let root = self
            .command_classes
            .iter()
            .map(|cc| (EndpointId::ROOT, cc));
        let endpoints = self
            .endpoints
            .iter()
            .flat_map(|ep| ep.command_classes.iter().map(move |cc| (ep.id, cc)));

        root.chain(endpoints)
            .filter(|(_, cc)| cc.kind != CommandClassKind::MultiChannel)
            .map(|(endpoint, cc)| CommandClassInstance::new(cc.kind, self.id, endpoint, cc.version))
            .collect()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BridgeConfig {
    pub bridge_id: String,
    pub mqtt: MqttConfig,
    pub controller: ControllerConfig,
    #[serde(default = "default_scheduler_tick")]
    pub scheduler_tick_ms: u64,
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
    #[serde(default)]
    pub items: Vec<ItemBinding>,
}

fn default_scheduler_tick() -> u64 {
    1000
}
fn default_heartbeat_interval() -> u64 {
    30
}

impl BridgeConfig {
    /// Layered load: built-in defaults, `{dir}/default` (required),
    /// `{dir}/{RUN_MODE}` (optional), then `ZWAVE__*` environment variables.
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        Config::builder()
            .set_default("mqtt.host", "localhost")?
            .set_default("mqtt.port", 1883)?
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(true))
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            // e.g. ZWAVE__MQTT__HOST=10.0.0.1
            .add_source(Environment::with_prefix("ZWAVE").separator("__"))
            .build()?
            .try_deserialize()
    }
}
