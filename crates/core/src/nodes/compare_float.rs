use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::compare_integer::CompareOp;
use crate::nodes::{input, output};
use crate::port_value::PortValue;

pub const NAME: &str = "Compare Float";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Math".to_string(),
        inputs: vec![
            input("a", PortType::Float),
            input("b", PortType::Float),
            input("tolerance", PortType::Float),
        ],
        outputs: vec![output("result", PortType::Boolean)],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("operation".to_string(), ParamValue::Int(0)),
            ("a".to_string(), ParamValue::Float(0.0)),
            ("b".to_string(), ParamValue::Float(0.0)),
            ("tolerance".to_string(), ParamValue::Float(1.0e-5)),
        ]),
    }
}

/// Equality checks use `tolerance`; the orderings are exact.
pub fn compute(params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    let (a, b) = (inputs.float("a"), inputs.float("b"));
    let tolerance = inputs.float("tolerance");
    let result = match CompareOp::from_params(params) {
        CompareOp::LessThan => a < b,
        CompareOp::LessThanOrEqual => a <= b,
        CompareOp::GreaterThan => a > b,
        CompareOp::GreaterThanOrEqual => a >= b,
        CompareOp::Equal => (a - b).abs() < tolerance,
        CompareOp::NotEqual => (a - b).abs() > tolerance,
    };
    vec![PortValue::Boolean(result)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RuntimeGraph;
    use crate::nodes::test_graph::{add_with, pull};
    use crate::nodes_builtin::NodeKind;

    #[test]
    fn equality_uses_tolerance() {
        let mut graph = RuntimeGraph::new();
        let node = add_with(
            &mut graph,
            NodeKind::CompareFloat,
            &[
                ("operation", ParamValue::Int(CompareOp::Equal.index())),
                ("a", ParamValue::Float(1.0)),
                ("b", ParamValue::Float(1.05)),
                ("tolerance", ParamValue::Float(0.1)),
            ],
        );
        assert_eq!(pull(&graph, node, "result"), PortValue::Boolean(true));
        graph.set_param(node, "tolerance", ParamValue::Float(0.01)).unwrap();
        assert_eq!(pull(&graph, node, "result"), PortValue::Boolean(false));
    }
}
