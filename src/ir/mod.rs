//! Intermediate representation
//!
//! The IR is a plain tree: `Ir` owns its apps, an app owns its nodes and
//! modules, a node owns its endpoints. It is built once per run by the
//! [`IrBuilder`](crate::builder::IrBuilder), validated once and then handed
//! read-only to code generation.
//!
//! IR types serialize for inspection (`wolfes-cg --dump-ir`). The JSON shape
//! is not a stable interchange format.

pub mod enums;

use serde::Serialize;

use crate::version::Version;

pub use enums::{CodeEnum, Lang, ModuleType, MsgType, Platform, ProtocolType, TimerType};

// =============================================================================
// Leaf entities
// =============================================================================

/// Message carried by an endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRef {
    /// Where the message definition comes from
    pub msg_type: MsgType,
    /// Declared message type name
    pub name: String,
    /// Message definition source file, recorded verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timer {
    pub id: String,
    pub timer_type: TimerType,
    /// Period in milliseconds
    pub period_ms: u64,
    /// Callback function name
    pub callback: String,
}

/// A topic publisher or subscriber
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicEndpoint {
    pub id: String,
    pub topic_name: String,
    pub message: MessageRef,
    /// Publish function for publishers, callback for subscribers
    pub function: String,
}

/// A service server or client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceEndpoint {
    pub id: String,
    pub service_name: String,
    pub message: MessageRef,
    /// Response handler for servers, request function for clients
    pub function: String,
}

pub type TopicPub = TopicEndpoint;
pub type TopicSub = TopicEndpoint;
pub type ServiceServer = ServiceEndpoint;
pub type ServiceClient = ServiceEndpoint;

// =============================================================================
// Nodes, modules, apps
// =============================================================================

/// A unit of execution: one generated class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub classname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qos_config: Option<String>,
    pub timers: Vec<Timer>,
    pub topic_pubs: Vec<TopicPub>,
    pub topic_subs: Vec<TopicSub>,
    pub service_servers: Vec<ServiceServer>,
    pub service_clients: Vec<ServiceClient>,
}

impl Node {
    pub fn new(classname: impl Into<String>) -> Self {
        Self {
            classname: classname.into(),
            qos_config: None,
            timers: Vec::new(),
            topic_pubs: Vec::new(),
            topic_subs: Vec::new(),
            service_servers: Vec::new(),
            service_clients: Vec::new(),
        }
    }

    /// Number of timers and endpoints owned by this node
    pub fn entity_count(&self) -> usize {
        self.timers.len()
            + self.topic_pubs.len()
            + self.topic_subs.len()
            + self.service_servers.len()
            + self.service_clients.len()
    }
}

/// Module input or output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleIo {
    pub id: String,
    pub message: MessageRef,
}

/// Processing module.
///
/// Modules are accepted in documents but not populated yet; every module is
/// an empty placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Module {
    pub module_type: Option<ModuleType>,
    pub inputs: Vec<ModuleIo>,
    pub outputs: Vec<ModuleIo>,
}

impl Module {
    pub fn placeholder() -> Self {
        Self::default()
    }
}

/// A deployable application and its identifier scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct App {
    pub namespace: String,
    pub domain_id: u32,
    pub protocol_type: ProtocolType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduler_config: Option<String>,
    pub nodes: Vec<Node>,
    pub modules: Vec<Module>,
    /// Every identifier registered while building this app, in document order
    pub identifiers: Vec<String>,
}

// =============================================================================
// Root
// =============================================================================

/// Custom message definition to be generated alongside the app
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomMsg {
    pub msg_type: MsgType,
    pub src_file: String,
}

/// Root of the IR, one per compile run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ir {
    pub platform: Platform,
    pub lang: Lang,
    pub version: Version,
    pub apps: Vec<App>,
    /// Custom message resolution is not implemented; always empty
    pub custom_msgs: Vec<CustomMsg>,
}

impl Ir {
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.apps.iter().flat_map(|app| app.nodes.iter())
    }

    pub fn summary(&self) -> IrSummary {
        let mut summary = IrSummary {
            apps: self.apps.len(),
            ..IrSummary::default()
        };
        for app in &self.apps {
            summary.modules += app.modules.len();
        }
        for node in self.nodes() {
            summary.nodes += 1;
            summary.timers += node.timers.len();
            summary.topic_pubs += node.topic_pubs.len();
            summary.topic_subs += node.topic_subs.len();
            summary.service_servers += node.service_servers.len();
            summary.service_clients += node.service_clients.len();
        }
        summary
    }
}

/// Element counts of an IR tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IrSummary {
    pub apps: usize,
    pub nodes: usize,
    pub modules: usize,
    pub timers: usize,
    pub topic_pubs: usize,
    pub topic_subs: usize,
    pub service_servers: usize,
    pub service_clients: usize,
}

impl std::fmt::Display for IrSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} app(s), {} node(s), {} module(s), {} timer(s), {} pub(s), {} sub(s), {} server(s), {} client(s)",
            self.apps,
            self.nodes,
            self.modules,
            self.timers,
            self.topic_pubs,
            self.topic_subs,
            self.service_servers,
            self.service_clients
        )
    }
}
