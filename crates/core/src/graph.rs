use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::eval::{DirtyReason, EvalCacheStats, NodeEvalState};
use crate::nodes_builtin::NodeKind;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortId(u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortType {
    Any,
    Boolean,
    Integer,
    Float,
    Vector,
    Geometry,
    Curve,
    Collection,
    String,
}

impl PortType {
    fn is_numeric(self) -> bool {
        matches!(
            self,
            PortType::Boolean | PortType::Integer | PortType::Float | PortType::Vector
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    Input,
    Output,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PortCapacity {
    #[default]
    Single,
    Multiple,
}

#[derive(Debug, Clone)]
pub struct NodeDefinition {
    pub name: String,
    pub category: String,
    pub inputs: Vec<PortDefinition>,
    pub outputs: Vec<PortDefinition>,
}

#[derive(Debug, Clone)]
pub struct PortDefinition {
    pub name: String,
    pub port_type: PortType,
    pub capacity: PortCapacity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimePort {
    pub id: PortId,
    pub node: NodeId,
    pub name: String,
    pub direction: PortDirection,
    pub port_type: PortType,
    pub capacity: PortCapacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub output: PortId,
    pub input: PortId,
}

#[derive(Debug)]
pub struct RuntimeNode {
    pub id: NodeId,
    pub guid: String,
    pub kind: NodeKind,
    /// Inputs first, then outputs, in definition order.
    pub ports: Vec<PortId>,
    pub params: NodeParams,
    pub param_version: u64,
    pub(crate) eval: RefCell<NodeEvalState>,
}

impl RuntimeNode {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error("node {0:?} does not exist")]
    MissingNode(NodeId),
    #[error("port {0:?} does not exist")]
    MissingPort(PortId),
    #[error("connection {0:?} does not exist")]
    MissingConnection(ConnectionId),
    #[error("node {node:?} has no port named '{name}'")]
    UnknownPortName { node: NodeId, name: String },
    #[error("a connection must run from an output to an input ({output:?} -> {input:?})")]
    WrongPortDirection { output: PortId, input: PortId },
    #[error("cannot connect {from:?} to {to:?}")]
    IncompatiblePortTypes { from: PortType, to: PortType },
    #[error("input {input:?} already has a connection")]
    InputAlreadyConnected { input: PortId },
    #[error("connecting {from:?} to {to:?} would create a cycle")]
    CycleDetected { from: NodeId, to: NodeId },
    #[error("a node with guid '{0}' already exists")]
    DuplicateGuid(String),
    #[error("node {node:?} has no param named '{key}'")]
    UnknownParam { node: NodeId, key: String },
    #[error("graph has no Output node")]
    NoOutputNode,
}

/// Arena of runtime nodes, their ports and the connections between them.
#[derive(Debug)]
pub struct RuntimeGraph {
    nodes: BTreeMap<NodeId, RuntimeNode>,
    ports: BTreeMap<PortId, RuntimePort>,
    connections: BTreeMap<ConnectionId, Connection>,
    next_node_id: u64,
    next_port_id: u64,
    next_connection_id: u64,
    pub(crate) stats: Cell<EvalCacheStats>,
}

impl Default for RuntimeGraph {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            ports: BTreeMap::new(),
            connections: BTreeMap::new(),
            next_node_id: 1,
            next_port_id: 1,
            next_connection_id: 1,
            stats: Cell::new(EvalCacheStats::default()),
        }
    }
}

impl RuntimeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &RuntimeNode> {
        self.nodes.values()
    }

    pub fn node(&self, id: NodeId) -> Option<&RuntimeNode> {
        self.nodes.get(&id)
    }

    pub fn node_by_guid(&self, guid: &str) -> Option<&RuntimeNode> {
        self.nodes.values().find(|node| node.guid == guid)
    }

    pub fn port(&self, id: PortId) -> Option<&RuntimePort> {
        self.ports.get(&id)
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    pub fn stats(&self) -> EvalCacheStats {
        self.stats.get()
    }

    pub fn reset_stats(&self) {
        self.stats.set(EvalCacheStats::default());
    }

    /// Adds a node of `kind` with a generated guid.
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let guid = format!("node-{}", self.next_node_id);
        self.insert_node(kind, guid)
    }

    pub fn add_node_with_guid(
        &mut self,
        kind: NodeKind,
        guid: impl Into<String>,
    ) -> Result<NodeId, GraphError> {
        let guid = guid.into();
        if self.node_by_guid(&guid).is_some() {
            return Err(GraphError::DuplicateGuid(guid));
        }
        Ok(self.insert_node(kind, guid))
    }

    fn insert_node(&mut self, kind: NodeKind, guid: String) -> NodeId {
        let node_id = self.alloc_node_id();
        let def = kind.definition();
        let mut ports = Vec::with_capacity(def.inputs.len() + def.outputs.len());

        let inputs = def.inputs.into_iter().map(|p| (p, PortDirection::Input));
        let outputs = def.outputs.into_iter().map(|p| (p, PortDirection::Output));
        for (port, direction) in inputs.chain(outputs) {
            let port_id = self.alloc_port_id();
            self.ports.insert(
                port_id,
                RuntimePort {
                    id: port_id,
                    node: node_id,
                    name: port.name,
                    direction,
                    port_type: port.port_type,
                    capacity: port.capacity,
                },
            );
            ports.push(port_id);
        }

        self.nodes.insert(
            node_id,
            RuntimeNode {
                id: node_id,
                guid,
                kind,
                ports,
                params: kind.default_params(),
                param_version: 0,
                eval: RefCell::new(NodeEvalState::default()),
            },
        );
        debug!("added node {:?} ({})", node_id, kind.name());
        node_id
    }

    /// Removes the node and every connection touching it. Downstream inputs
    /// that lose their connection revert to their defaults.
    pub fn remove_node(&mut self, node_id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&node_id) else {
            return false;
        };
        let ports: HashSet<PortId> = node.ports.iter().copied().collect();
        let attached: Vec<ConnectionId> = self
            .connections
            .values()
            .filter(|c| ports.contains(&c.output) || ports.contains(&c.input))
            .map(|c| c.id)
            .collect();
        for connection in attached {
            // Only fails for ids that are already gone.
            let _ = self.disconnect(connection);
        }
        for port in ports {
            self.ports.remove(&port);
        }
        self.nodes.remove(&node_id);
        true
    }

    /// The `ordinal`-th port of `node`, counting inputs then outputs.
    pub fn port_at(&self, node: NodeId, ordinal: usize) -> Option<PortId> {
        self.nodes.get(&node)?.ports.get(ordinal).copied()
    }

    pub fn port_ordinal(&self, port: PortId) -> Option<usize> {
        let owner = self.ports.get(&port)?.node;
        self.nodes.get(&owner)?.ports.iter().position(|p| *p == port)
    }

    pub fn find_port(
        &self,
        node: NodeId,
        name: &str,
        direction: PortDirection,
    ) -> Result<PortId, GraphError> {
        let runtime = self.nodes.get(&node).ok_or(GraphError::MissingNode(node))?;
        runtime
            .ports
            .iter()
            .copied()
            .find(|id| {
                self.ports
                    .get(id)
                    .map(|p| p.name == name && p.direction == direction)
                    .unwrap_or(false)
            })
            .ok_or_else(|| GraphError::UnknownPortName {
                node,
                name: name.to_string(),
            })
    }

    pub fn input_port(&self, node: NodeId, name: &str) -> Result<PortId, GraphError> {
        self.find_port(node, name, PortDirection::Input)
    }

    pub fn output_port(&self, node: NodeId, name: &str) -> Result<PortId, GraphError> {
        self.find_port(node, name, PortDirection::Output)
    }

    /// Connections ending at `input`, in creation order.
    pub fn connections_to(&self, input: PortId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.input == input)
    }

    pub fn connections_from(&self, output: PortId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.output == output)
    }

    pub fn connect(&mut self, output: PortId, input: PortId) -> Result<ConnectionId, GraphError> {
        let from = self.ports.get(&output).ok_or(GraphError::MissingPort(output))?;
        let to = self.ports.get(&input).ok_or(GraphError::MissingPort(input))?;

        if from.direction != PortDirection::Output || to.direction != PortDirection::Input {
            return Err(GraphError::WrongPortDirection { output, input });
        }
        if !port_types_compatible(from.port_type, to.port_type) {
            return Err(GraphError::IncompatiblePortTypes {
                from: from.port_type,
                to: to.port_type,
            });
        }
        if to.capacity == PortCapacity::Single && self.connections_to(input).next().is_some() {
            return Err(GraphError::InputAlreadyConnected { input });
        }
        let (from_node, to_node) = (from.node, to.node);
        if from_node == to_node || self.is_upstream(to_node, from_node) {
            return Err(GraphError::CycleDetected {
                from: from_node,
                to: to_node,
            });
        }

        let id = self.alloc_connection_id();
        self.connections.insert(id, Connection { id, output, input });
        debug!("connected {:?} -> {:?}", output, input);
        self.invalidate(to_node, DirtyReason::ConnectionChanged);
        Ok(id)
    }

    /// Removes a connection. When the input has nothing else attached, its
    /// literal reverts to the node's default.
    pub fn disconnect(&mut self, id: ConnectionId) -> Result<(), GraphError> {
        let connection = self
            .connections
            .remove(&id)
            .ok_or(GraphError::MissingConnection(id))?;
        let Some(port) = self.ports.get(&connection.input) else {
            return Ok(());
        };
        let (node_id, name) = (port.node, port.name.clone());

        if self.connections_to(connection.input).next().is_none() {
            if let Some(node) = self.nodes.get_mut(&node_id) {
                if let Some(default) = node.kind.default_params().values.remove(&name) {
                    node.params.values.insert(name, default);
                    node.param_version = node.param_version.wrapping_add(1);
                }
            }
        }
        debug!("disconnected {:?} -> {:?}", connection.output, connection.input);
        self.invalidate(node_id, DirtyReason::ConnectionChanged);
        Ok(())
    }

    pub fn disconnect_between(&mut self, output: PortId, input: PortId) -> bool {
        let found = self
            .connections
            .values()
            .find(|c| c.output == output && c.input == input)
            .map(|c| c.id);
        found.map(|id| self.disconnect(id).is_ok()).unwrap_or(false)
    }

    /// The single entry point for editing a node. A no-op when `value`
    /// equals the stored one; otherwise the node and everything downstream
    /// are invalidated. Only keys the node kind declares are accepted.
    pub fn set_param(
        &mut self,
        node_id: NodeId,
        key: impl Into<String>,
        value: ParamValue,
    ) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(GraphError::MissingNode(node_id))?;
        let key = key.into();
        if !node.kind.default_params().values.contains_key(&key) {
            return Err(GraphError::UnknownParam { node: node_id, key });
        }
        let changed = node
            .params
            .values
            .get(&key)
            .map(|existing| existing != &value)
            .unwrap_or(true);

        if changed {
            node.params.values.insert(key, value);
            node.param_version = node.param_version.wrapping_add(1);
            self.invalidate(node_id, DirtyReason::ParamChanged);
        }
        Ok(())
    }

    /// Replaces every param at once and invalidates the node.
    pub(crate) fn replace_params(&mut self, node_id: NodeId, params: NodeParams) {
        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.params = params;
            node.param_version = node.param_version.wrapping_add(1);
        }
        self.invalidate(node_id, DirtyReason::ParamChanged);
    }

    /// Drops the node's cached results and pushes the invalidation to every
    /// node fed by one of its outputs, depth first.
    pub fn invalidate(&self, node_id: NodeId, reason: DirtyReason) {
        let Some(node) = self.nodes.get(&node_id) else {
            return;
        };
        node.eval.borrow_mut().clear(reason);
        debug!("invalidated {:?} ({}): {:?}", node_id, node.kind.name(), reason);

        for port in &node.ports {
            let downstream: Vec<NodeId> = self
                .connections_from(*port)
                .filter_map(|c| self.ports.get(&c.input).map(|p| p.node))
                .collect();
            for next in downstream {
                self.invalidate(next, DirtyReason::UpstreamChanged);
            }
        }
    }

    pub fn upstream_nodes(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut upstream = Vec::new();
        for connection in self.connections.values() {
            let Some(to) = self.ports.get(&connection.input) else {
                continue;
            };
            if to.node != node_id {
                continue;
            }
            if let Some(from) = self.ports.get(&connection.output) {
                if !upstream.contains(&from.node) {
                    upstream.push(from.node);
                }
            }
        }
        upstream
    }

    /// Whether `candidate` feeds `node` through any chain of connections.
    pub fn is_upstream(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut stack = vec![node];
        let mut seen = HashSet::new();
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            for upstream in self.upstream_nodes(current) {
                if upstream == candidate {
                    return true;
                }
                stack.push(upstream);
            }
        }
        false
    }

    pub fn output_node(&self) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|node| node.kind == NodeKind::Output)
            .map(|node| node.id)
    }

    fn alloc_node_id(&mut self) -> NodeId {
        let id = self.next_node_id;
        self.next_node_id += 1;
        NodeId(id)
    }

    fn alloc_port_id(&mut self) -> PortId {
        let id = self.next_port_id;
        self.next_port_id += 1;
        PortId(id)
    }

    fn alloc_connection_id(&mut self) -> ConnectionId {
        let id = self.next_connection_id;
        self.next_connection_id += 1;
        ConnectionId(id)
    }
}

pub fn port_types_compatible(from: PortType, to: PortType) -> bool {
    if from == to || from == PortType::Any || to == PortType::Any {
        return true;
    }
    if from.is_numeric() && to.is_numeric() {
        return true;
    }
    matches!(
        (from, to),
        (PortType::Geometry, PortType::Collection) | (PortType::Collection, PortType::Geometry)
    )
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NodeParams {
    pub values: BTreeMap<String, ParamValue>,
}

impl NodeParams {
    pub fn get_vec3(&self, key: &str, default: [f32; 3]) -> [f32; 3] {
        self.values
            .get(key)
            .and_then(|value| match value {
                ParamValue::Vec3(v) => Some(*v),
                _ => None,
            })
            .unwrap_or(default)
    }

    pub fn get_float(&self, key: &str, default: f32) -> f32 {
        self.values
            .get(key)
            .and_then(|value| match value {
                ParamValue::Float(v) => Some(*v),
                ParamValue::Int(v) => Some(*v as f32),
                _ => None,
            })
            .unwrap_or(default)
    }

    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        self.values
            .get(key)
            .and_then(|value| match value {
                ParamValue::Int(v) => Some(*v),
                _ => None,
            })
            .unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values
            .get(key)
            .and_then(|value| match value {
                ParamValue::Bool(v) => Some(*v),
                _ => None,
            })
            .unwrap_or(default)
    }

    pub fn get_string<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.values
            .get(key)
            .and_then(|value| match value {
                ParamValue::String(v) => Some(v.as_str()),
                _ => None,
            })
            .unwrap_or(default)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ParamValue {
    Float(f32),
    Int(i32),
    Bool(bool),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    String(String),
}

impl ParamValue {
    pub fn same_variant(&self, other: &ParamValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}
