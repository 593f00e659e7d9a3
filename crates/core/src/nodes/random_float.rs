use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{input, output};
use crate::port_value::PortValue;

pub const NAME: &str = "Random Float";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Values".to_string(),
        inputs: vec![
            input("seed", PortType::Integer),
            input("min", PortType::Float),
            input("max", PortType::Float),
        ],
        outputs: vec![output("value", PortType::Float)],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("seed".to_string(), ParamValue::Int(0)),
            ("min".to_string(), ParamValue::Float(0.0)),
            ("max".to_string(), ParamValue::Float(1.0)),
        ]),
    }
}

pub fn compute(params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    compute_values(params, inputs, 0, 1)
}

/// The first `count` values of the sequence for the current seed. Asking for
/// more values extends the sequence without changing its prefix.
pub fn compute_values(
    _params: &NodeParams,
    inputs: &NodeInputs,
    _output: usize,
    count: usize,
) -> Vec<PortValue> {
    let seed = inputs.int("seed") as u32;
    let min = inputs.float("min");
    let max = inputs.float("max");
    let mut rng = XorShift32::new(seed);
    (0..count)
        .map(|_| PortValue::Float(min + (max - min) * rng.next_f32()))
        .collect()
}

struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    fn new(seed: u32) -> Self {
        let seed = if seed == 0 { 0x12345678 } else { seed };
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    fn next_f32(&mut self) -> f32 {
        let value = self.next_u32();
        value as f32 / u32::MAX as f32
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{ParamValue, RuntimeGraph};
    use crate::nodes::test_graph::{add_with, pull};
    use crate::nodes_builtin::NodeKind;

    #[test]
    fn values_stay_in_range() {
        let mut graph = RuntimeGraph::new();
        let node = add_with(
            &mut graph,
            NodeKind::RandomFloat,
            &[("min", ParamValue::Float(-2.0)), ("max", ParamValue::Float(3.0))],
        );
        let port = graph.output_port(node, "value").unwrap();
        let values = graph.get_values_for_port(port, 256).unwrap();
        assert_eq!(values.len(), 256);
        for value in values {
            let v = value.as_float();
            assert!((-2.0..=3.0).contains(&v));
        }
    }

    #[test]
    fn single_value_is_first_of_sequence() {
        let mut graph = RuntimeGraph::new();
        let node = add_with(&mut graph, NodeKind::RandomFloat, &[("seed", ParamValue::Int(7))]);
        let single = pull(&graph, node, "value");
        let port = graph.output_port(node, "value").unwrap();
        let many = graph.get_values_for_port(port, 3).unwrap();
        assert_eq!(many[0], single);
        assert_ne!(many[1], many[2]);
    }
}
