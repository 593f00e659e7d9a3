use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::curve::CurveData;
use crate::geometry::GeometryData;
use crate::graph::{
    GraphError, NodeId, NodeParams, PortDirection, PortId, PortType, RuntimeGraph, RuntimeNode,
    RuntimePort,
};
use crate::port_value::{convert, PortValue};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalCacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyReason {
    NewNode,
    ParamChanged,
    UpstreamChanged,
    ConnectionChanged,
}

/// Per-node memoization. A node is dirty exactly when `outputs` is empty.
#[derive(Debug)]
pub(crate) struct NodeEvalState {
    outputs: Option<Vec<PortValue>>,
    multi: HashMap<(usize, usize), Vec<PortValue>>,
    computed: u64,
    dirty: Option<DirtyReason>,
}

impl Default for NodeEvalState {
    fn default() -> Self {
        Self {
            outputs: None,
            multi: HashMap::new(),
            computed: 0,
            dirty: Some(DirtyReason::NewNode),
        }
    }
}

impl NodeEvalState {
    pub(crate) fn clear(&mut self, reason: DirtyReason) {
        self.outputs = None;
        self.multi.clear();
        if self.dirty.is_none() {
            self.dirty = Some(reason);
        }
    }
}

/// Final values pulled from the Output node.
#[derive(Debug, Clone)]
pub struct OutputValues {
    pub geometry: Arc<GeometryData>,
    pub curve: Arc<CurveData>,
}

impl RuntimeGraph {
    /// Pulls the value of an output port, computing its node if it is dirty.
    pub fn get_value_for_port(&self, port: PortId) -> Result<PortValue, GraphError> {
        let (node, runtime_port, index) = self.resolve_output(port)?;
        trace!("pull {:?} '{}' of {}", port, runtime_port.name, node.name());
        let outputs = self.node_outputs(node);
        Ok(outputs
            .get(index)
            .cloned()
            .unwrap_or_else(|| PortValue::default_for(runtime_port.port_type)))
    }

    /// Pulls exactly `count` values from an output port.
    ///
    /// Nodes with a multi-value implementation produce one value per index and
    /// cache the result per count; every other node repeats its single value.
    pub fn get_values_for_port(
        &self,
        port: PortId,
        count: usize,
    ) -> Result<Vec<PortValue>, GraphError> {
        let (node, runtime_port, index) = self.resolve_output(port)?;
        if !node.kind.has_multi_values() {
            let value = self.get_value_for_port(port)?;
            return Ok(vec![value; count]);
        }

        let key = (index, count);
        let cached = node.eval.borrow().multi.get(&key).cloned();
        if let Some(values) = cached {
            self.record(true);
            return Ok(values);
        }

        let inputs = NodeInputs::new(self, node);
        let mut values = node
            .kind
            .compute_values(&node.params, &inputs, index, count);
        values.resize(count, PortValue::default_for(runtime_port.port_type));

        {
            let mut state = node.eval.borrow_mut();
            state.multi.insert(key, values.clone());
            state.computed += 1;
        }
        self.record(false);
        debug!("computed {} values for {}", count, node.name());
        Ok(values)
    }

    /// Every output of `node`, from cache when clean.
    pub fn node_outputs(&self, node: &RuntimeNode) -> Vec<PortValue> {
        let cached = node.eval.borrow().outputs.clone();
        if let Some(outputs) = cached {
            self.record(true);
            debug!("cache hit for {}", node.name());
            return outputs;
        }

        let inputs = NodeInputs::new(self, node);
        let outputs = node.kind.compute(&node.params, &inputs);
        {
            let mut state = node.eval.borrow_mut();
            state.outputs = Some(outputs.clone());
            state.computed += 1;
            state.dirty = None;
        }
        self.record(false);
        debug!("computed {}", node.name());
        outputs
    }

    /// How many times `node` has actually run a computation.
    pub fn compute_count(&self, node: NodeId) -> u64 {
        self.node(node)
            .map(|node| node.eval.borrow().computed)
            .unwrap_or(0)
    }

    pub fn dirty_reason(&self, node: NodeId) -> Option<DirtyReason> {
        self.node(node).and_then(|node| node.eval.borrow().dirty)
    }

    pub fn is_dirty(&self, node: NodeId) -> bool {
        self.node(node)
            .map(|node| node.eval.borrow().outputs.is_none())
            .unwrap_or(false)
    }

    fn resolve_output(
        &self,
        port: PortId,
    ) -> Result<(&RuntimeNode, &RuntimePort, usize), GraphError> {
        let runtime_port = self.port(port).ok_or(GraphError::MissingPort(port))?;
        let node = self
            .node(runtime_port.node)
            .ok_or(GraphError::MissingNode(runtime_port.node))?;
        if runtime_port.direction != PortDirection::Output {
            return Err(GraphError::WrongPortDirection {
                output: port,
                input: port,
            });
        }
        let index = node
            .ports
            .iter()
            .filter_map(|id| self.port(*id))
            .filter(|p| p.direction == PortDirection::Output)
            .position(|p| p.id == port)
            .ok_or(GraphError::MissingPort(port))?;
        Ok((node, runtime_port, index))
    }

    fn record(&self, hit: bool) {
        let mut stats = self.stats.get();
        if hit {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        self.stats.set(stats);
    }
}

/// Finds the Output node and pulls its geometry and curve.
pub fn evaluate_output(graph: &RuntimeGraph) -> Result<OutputValues, GraphError> {
    let node_id = graph.output_node().ok_or(GraphError::NoOutputNode)?;
    evaluate_output_node(graph, node_id)
}

pub fn evaluate_output_node(
    graph: &RuntimeGraph,
    node_id: NodeId,
) -> Result<OutputValues, GraphError> {
    let node = graph.node(node_id).ok_or(GraphError::MissingNode(node_id))?;
    let inputs = NodeInputs::new(graph, node);
    Ok(OutputValues {
        geometry: inputs
            .geometry("geometry")
            .unwrap_or_else(|| Arc::new(GeometryData::empty())),
        curve: inputs
            .curve("curve")
            .unwrap_or_else(|| Arc::new(CurveData::empty())),
    })
}

/// Read access to a node's inputs during compute. Connected inputs pull
/// from upstream; unconnected ones read the node's literal params.
pub struct NodeInputs<'a> {
    graph: &'a RuntimeGraph,
    node: &'a RuntimeNode,
}

impl<'a> NodeInputs<'a> {
    pub fn new(graph: &'a RuntimeGraph, node: &'a RuntimeNode) -> Self {
        Self { graph, node }
    }

    pub fn params(&self) -> &NodeParams {
        &self.node.params
    }

    fn input(&self, name: &str) -> Option<&'a RuntimePort> {
        let graph = self.graph;
        self.node
            .ports
            .iter()
            .filter_map(|id| graph.port(*id))
            .find(|p| p.direction == PortDirection::Input && p.name == name)
    }

    fn upstream(&self, port: &RuntimePort) -> Vec<PortId> {
        self.graph.connections_to(port.id).map(|c| c.output).collect()
    }

    pub fn is_connected(&self, name: &str) -> bool {
        self.input(name)
            .map(|port| !self.upstream(port).is_empty())
            .unwrap_or(false)
    }

    fn literal(&self, name: &str, port_type: PortType) -> PortValue {
        match self.node.params.values.get(name) {
            Some(param) => convert(PortValue::from_param(param), port_type),
            None => PortValue::default_for(port_type),
        }
    }

    fn pull(&self, output: PortId, port_type: PortType) -> PortValue {
        match self.graph.get_value_for_port(output) {
            Ok(value) => convert(value, port_type),
            Err(err) => {
                warn!("{}: pull failed: {}", self.node.name(), err);
                PortValue::default_for(port_type)
            }
        }
    }

    /// The value at input `name`: the first connection if any, else the literal.
    pub fn value(&self, name: &str) -> PortValue {
        let Some(port) = self.input(name) else {
            return self.literal(name, PortType::Any);
        };
        match self.upstream(port).first() {
            Some(output) => self.pull(*output, port.port_type),
            None => self.literal(name, port.port_type),
        }
    }

    /// One value per connection on `name`, in connection order.
    pub fn all(&self, name: &str) -> Vec<PortValue> {
        let Some(port) = self.input(name) else {
            return Vec::new();
        };
        self.upstream(port)
            .into_iter()
            .map(|output| self.pull(output, port.port_type))
            .collect()
    }

    /// Exactly `count` values for input `name` through the multi-value protocol.
    pub fn values(&self, name: &str, count: usize) -> Vec<PortValue> {
        let port_type = self.input(name).map(|p| p.port_type).unwrap_or(PortType::Any);
        let upstream = self.input(name).and_then(|port| self.upstream(port).first().copied());
        let Some(output) = upstream else {
            return vec![self.literal(name, port_type); count];
        };
        match self.graph.get_values_for_port(output, count) {
            Ok(values) => values
                .into_iter()
                .map(|value| convert(value, port_type))
                .collect(),
            Err(err) => {
                warn!("{}: multi-value pull failed: {}", self.node.name(), err);
                vec![PortValue::default_for(port_type); count]
            }
        }
    }

    pub fn float(&self, name: &str) -> f32 {
        self.value(name).as_float()
    }

    pub fn int(&self, name: &str) -> i32 {
        self.value(name).as_int()
    }

    pub fn bool(&self, name: &str) -> bool {
        self.value(name).as_bool()
    }

    pub fn vector(&self, name: &str) -> glam::Vec3 {
        self.value(name).as_vector()
    }

    pub fn string(&self, name: &str) -> String {
        match self.value(name) {
            PortValue::String(value) => value,
            _ => String::new(),
        }
    }

    pub fn floats(&self, name: &str, count: usize) -> Vec<f32> {
        self.values(name, count).iter().map(PortValue::as_float).collect()
    }

    /// Connected geometry, or `None` when nothing is attached.
    pub fn geometry(&self, name: &str) -> Option<Arc<GeometryData>> {
        if !self.is_connected(name) {
            return None;
        }
        match self.value(name) {
            PortValue::Geometry(geometry) => Some(geometry),
            _ => None,
        }
    }

    pub fn geometries(&self, name: &str) -> Vec<Arc<GeometryData>> {
        self.all(name)
            .into_iter()
            .flat_map(|value| match value {
                PortValue::Geometry(geometry) => vec![geometry],
                PortValue::Collection(items) => items,
                _ => Vec::new(),
            })
            .collect()
    }

    pub fn curve(&self, name: &str) -> Option<Arc<CurveData>> {
        if !self.is_connected(name) {
            return None;
        }
        match self.value(name) {
            PortValue::Curve(curve) => Some(curve),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ParamValue;
    use crate::nodes_builtin::NodeKind;

    fn add(graph: &mut RuntimeGraph, kind: NodeKind) -> NodeId {
        graph.add_node(kind)
    }

    fn connect(graph: &mut RuntimeGraph, from: NodeId, output: &str, to: NodeId, input: &str) {
        let output = graph.output_port(from, output).unwrap();
        let input = graph.input_port(to, input).unwrap();
        graph.connect(output, input).unwrap();
    }

    fn pull_float(graph: &RuntimeGraph, node: NodeId, output: &str) -> f32 {
        let port = graph.output_port(node, output).unwrap();
        graph.get_value_for_port(port).unwrap().as_float()
    }

    fn chain() -> (RuntimeGraph, NodeId, NodeId, NodeId) {
        let mut graph = RuntimeGraph::new();
        let a = add(&mut graph, NodeKind::FloatValue);
        let b = add(&mut graph, NodeKind::FloatMath);
        let c = add(&mut graph, NodeKind::FloatMath);
        graph.set_param(a, "value", ParamValue::Float(2.0)).unwrap();
        graph.set_param(b, "y", ParamValue::Float(3.0)).unwrap();
        graph.set_param(c, "y", ParamValue::Float(1.0)).unwrap();
        connect(&mut graph, a, "value", b, "x");
        connect(&mut graph, b, "result", c, "x");
        (graph, a, b, c)
    }

    #[test]
    fn new_nodes_start_dirty() {
        let mut graph = RuntimeGraph::new();
        let node = add(&mut graph, NodeKind::FloatValue);
        assert!(graph.is_dirty(node));
        assert_eq!(graph.dirty_reason(node), Some(DirtyReason::NewNode));
    }

    #[test]
    fn repeated_pulls_hit_the_cache() {
        let (graph, a, b, c) = chain();
        assert_eq!(pull_float(&graph, c, "result"), 6.0);
        assert_eq!(pull_float(&graph, c, "result"), 6.0);
        assert_eq!(graph.compute_count(a), 1);
        assert_eq!(graph.compute_count(b), 1);
        assert_eq!(graph.compute_count(c), 1);
        assert_eq!(graph.stats().misses, 3);
        assert!(graph.stats().hits >= 1);
        assert!(!graph.is_dirty(c));
    }

    #[test]
    fn upstream_change_recomputes_downstream() {
        let (mut graph, a, b, c) = chain();
        pull_float(&graph, c, "result");
        graph.set_param(a, "value", ParamValue::Float(4.0)).unwrap();
        assert!(graph.is_dirty(b));
        assert_eq!(graph.dirty_reason(c), Some(DirtyReason::UpstreamChanged));
        assert_eq!(pull_float(&graph, c, "result"), 8.0);
        assert_eq!(graph.compute_count(a), 2);
        assert_eq!(graph.compute_count(c), 2);
    }

    #[test]
    fn mid_change_skips_upstream() {
        let (mut graph, a, b, c) = chain();
        pull_float(&graph, c, "result");
        graph.set_param(b, "y", ParamValue::Float(10.0)).unwrap();
        assert_eq!(graph.dirty_reason(b), Some(DirtyReason::ParamChanged));
        assert_eq!(pull_float(&graph, c, "result"), 13.0);
        assert_eq!(graph.compute_count(a), 1);
        assert_eq!(graph.compute_count(b), 2);
    }

    #[test]
    fn unchanged_setter_keeps_cache() {
        let (mut graph, _a, b, c) = chain();
        pull_float(&graph, c, "result");
        graph.set_param(b, "y", ParamValue::Float(3.0)).unwrap();
        assert!(!graph.is_dirty(c));
    }

    #[test]
    fn disconnect_falls_back_to_literal() {
        let (mut graph, a, b, c) = chain();
        pull_float(&graph, c, "result");
        let out = graph.output_port(a, "value").unwrap();
        let x = graph.input_port(b, "x").unwrap();
        assert!(graph.disconnect_between(out, x));
        assert_eq!(graph.dirty_reason(b), Some(DirtyReason::ConnectionChanged));
        assert_eq!(pull_float(&graph, c, "result"), 4.0);
    }

    #[test]
    fn pulling_an_input_port_is_an_error() {
        let (graph, _a, b, _c) = chain();
        let x = graph.input_port(b, "x").unwrap();
        assert!(matches!(
            graph.get_value_for_port(x),
            Err(GraphError::WrongPortDirection { .. })
        ));
    }

    #[test]
    fn single_value_nodes_broadcast_multi_values() {
        let (graph, a, _b, _c) = chain();
        let port = graph.output_port(a, "value").unwrap();
        let values = graph.get_values_for_port(port, 3).unwrap();
        assert_eq!(values, vec![PortValue::Float(2.0); 3]);
    }

    #[test]
    fn multi_values_are_cached_per_count() {
        let mut graph = RuntimeGraph::new();
        let random = add(&mut graph, NodeKind::RandomFloat);
        let port = graph.output_port(random, "value").unwrap();

        let four = graph.get_values_for_port(port, 4).unwrap();
        assert_eq!(four.len(), 4);
        assert_eq!(graph.get_values_for_port(port, 4).unwrap(), four);
        assert_eq!(graph.compute_count(random), 1);

        let eight = graph.get_values_for_port(port, 8).unwrap();
        assert_eq!(&eight[..4], &four[..]);
        assert_eq!(graph.compute_count(random), 2);

        graph.set_param(random, "seed", ParamValue::Int(99)).unwrap();
        assert_ne!(graph.get_values_for_port(port, 4).unwrap(), four);
    }

    #[test]
    fn evaluate_output_requires_output_node() {
        let graph = RuntimeGraph::new();
        assert!(matches!(evaluate_output(&graph), Err(GraphError::NoOutputNode)));
    }

    #[test]
    fn evaluate_output_pulls_geometry() {
        let mut graph = RuntimeGraph::new();
        let cube = add(&mut graph, NodeKind::Cube);
        let output = add(&mut graph, NodeKind::Output);
        connect(&mut graph, cube, "geometry", output, "geometry");
        let values = evaluate_output(&graph).unwrap();
        assert_eq!(values.geometry.vertices.len(), 8);
        assert!(values.curve.is_empty());
    }
}
