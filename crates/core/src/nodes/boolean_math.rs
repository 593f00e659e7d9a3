use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{input, output};
use crate::port_value::PortValue;

pub const NAME: &str = "Boolean Math";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Math".to_string(),
        inputs: vec![input("a", PortType::Boolean), input("b", PortType::Boolean)],
        outputs: vec![output("result", PortType::Boolean)],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("operation".to_string(), ParamValue::Int(0)),
            ("a".to_string(), ParamValue::Bool(false)),
            ("b".to_string(), ParamValue::Bool(false)),
        ]),
    }
}

/// Operations: 0 and, 1 or, 2 xor, 3 not (of `a`).
pub fn compute(params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    let (a, b) = (inputs.bool("a"), inputs.bool("b"));
    let result = match params.get_int("operation", 0).clamp(0, 3) {
        0 => a && b,
        1 => a || b,
        2 => a ^ b,
        _ => !a,
    };
    vec![PortValue::Boolean(result)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RuntimeGraph;
    use crate::nodes::test_graph::{add_with, connect, pull};
    use crate::nodes_builtin::NodeKind;

    #[test]
    fn truth_table() {
        let mut graph = RuntimeGraph::new();
        let node = add_with(
            &mut graph,
            NodeKind::BooleanMath,
            &[("a", ParamValue::Bool(true)), ("b", ParamValue::Bool(true))],
        );
        let expected = [true, true, false, false];
        for (op, want) in expected.into_iter().enumerate() {
            graph.set_param(node, "operation", ParamValue::Int(op as i32)).unwrap();
            assert_eq!(pull(&graph, node, "result"), PortValue::Boolean(want));
        }
    }

    #[test]
    fn float_input_reads_as_truthy() {
        let mut graph = RuntimeGraph::new();
        let value = add_with(&mut graph, NodeKind::FloatValue, &[("value", ParamValue::Float(0.5))]);
        let node = add_with(&mut graph, NodeKind::BooleanMath, &[("operation", ParamValue::Int(3))]);
        connect(&mut graph, value, "value", node, "a");
        assert_eq!(pull(&graph, node, "result"), PortValue::Boolean(false));
    }
}
