use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::export::ExportSettings;
use crate::graph::{GraphError, NodeId, NodeParams, ParamValue, PortId, RuntimeGraph};
use crate::nodes_builtin::NodeKind;

pub const PROJECT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid graph document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown node kind '{0}'")]
    UnknownNodeKind(String),
    #[error("connection references missing node '{0}'")]
    MissingNode(String),
    #[error("node '{guid}' has no port {ordinal}")]
    MissingPort { guid: String, ordinal: usize },
    #[error("custom data does not match the node params: {0}")]
    InvalidCustomData(String),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// A graph document: settings plus enough to rebuild every node and
/// connection of a `RuntimeGraph`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub version: u32,
    #[serde(default)]
    pub settings: ProjectSettings,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            version: PROJECT_VERSION,
            settings: ProjectSettings::default(),
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    pub export: ExportSettings,
    pub log_level: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            export: ExportSettings::default(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub guid: String,
    pub kind: String,
    #[serde(default)]
    pub custom_data: String,
}

/// A port identified by its node guid and its ordinal among that node's
/// ports, inputs first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortAddress {
    pub node: String,
    pub port: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub output: PortAddress,
    pub input: PortAddress,
}

impl Project {
    pub fn from_graph(graph: &RuntimeGraph) -> Result<Self, ProjectError> {
        let mut nodes = Vec::new();
        for node in graph.nodes() {
            nodes.push(NodeRecord {
                guid: node.guid.clone(),
                kind: node.kind.name().to_string(),
                custom_data: encode_params(&node.params)?,
            });
        }

        let address = |port: PortId| -> Option<PortAddress> {
            let owner = graph.port(port)?.node;
            Some(PortAddress {
                node: graph.node(owner)?.guid.clone(),
                port: graph.port_ordinal(port)?,
            })
        };
        let connections = graph
            .connections()
            .filter_map(|connection| {
                Some(ConnectionRecord {
                    output: address(connection.output)?,
                    input: address(connection.input)?,
                })
            })
            .collect();

        Ok(Self {
            nodes,
            connections,
            ..Self::default()
        })
    }

    /// Recreates the graph: nodes first with fresh ports, then custom data,
    /// then connections in record order.
    pub fn build_graph(&self) -> Result<RuntimeGraph, ProjectError> {
        let mut graph = RuntimeGraph::new();
        let mut ids: HashMap<&str, NodeId> = HashMap::new();

        for record in &self.nodes {
            let kind = NodeKind::from_name(&record.kind)
                .ok_or_else(|| ProjectError::UnknownNodeKind(record.kind.clone()))?;
            let id = graph.add_node_with_guid(kind, record.guid.as_str())?;
            if !record.custom_data.is_empty() {
                set_custom_data(&mut graph, id, &record.custom_data);
            }
            ids.insert(record.guid.as_str(), id);
        }

        for record in &self.connections {
            let output = resolve(&graph, &ids, &record.output)?;
            let input = resolve(&graph, &ids, &record.input)?;
            graph.connect(output, input)?;
        }

        debug!(
            "built graph with {} nodes and {} connections",
            self.nodes.len(),
            self.connections.len()
        );
        Ok(graph)
    }

    pub fn from_json(text: &str) -> Result<Self, ProjectError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProjectError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

fn resolve(
    graph: &RuntimeGraph,
    ids: &HashMap<&str, NodeId>,
    address: &PortAddress,
) -> Result<PortId, ProjectError> {
    let node = ids
        .get(address.node.as_str())
        .copied()
        .ok_or_else(|| ProjectError::MissingNode(address.node.clone()))?;
    graph
        .port_at(node, address.port)
        .ok_or_else(|| ProjectError::MissingPort {
            guid: address.node.clone(),
            ordinal: address.port,
        })
}

/// The node's params as a compact JSON array in key order.
pub fn custom_data(graph: &RuntimeGraph, node: NodeId) -> Option<String> {
    encode_params(&graph.node(node)?.params).ok()
}

/// Applies `data` to the node's params. A payload that does not parse, or
/// whose length or variants differ from the node's params, is rejected and
/// the node falls back to its defaults. The node is invalidated either way.
/// Returns whether `data` was applied.
pub fn set_custom_data(graph: &mut RuntimeGraph, node: NodeId, data: &str) -> bool {
    let Some(runtime) = graph.node(node) else {
        return false;
    };
    let kind = runtime.kind;
    match decode_params(&runtime.params, data) {
        Ok(params) => {
            graph.replace_params(node, params);
            true
        }
        Err(err) => {
            warn!("{}: {}; restoring defaults", kind.name(), err);
            let defaults = kind.default_params();
            let restored = encode_params(&defaults)
                .and_then(|payload| decode_params(&defaults, &payload))
                .unwrap_or(defaults);
            graph.replace_params(node, restored);
            false
        }
    }
}

fn encode_params(params: &NodeParams) -> Result<String, ProjectError> {
    let values: Vec<&ParamValue> = params.values.values().collect();
    Ok(serde_json::to_string(&values)?)
}

fn decode_params(template: &NodeParams, data: &str) -> Result<NodeParams, ProjectError> {
    let values: Vec<ParamValue> = serde_json::from_str(data)?;
    if values.len() != template.values.len() {
        return Err(ProjectError::InvalidCustomData(format!(
            "expected {} values, got {}",
            template.values.len(),
            values.len()
        )));
    }
    let mut params = NodeParams::default();
    for ((key, expected), value) in template.values.iter().zip(values) {
        if !expected.same_variant(&value) {
            return Err(ProjectError::InvalidCustomData(format!(
                "'{}' expects {:?}, got {:?}",
                key, expected, value
            )));
        }
        params.values.insert(key.clone(), value);
    }
    Ok(params)
}
