use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{input, output};
use crate::port_value::PortValue;

pub const NAME: &str = "Compare Integer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Equal,
    NotEqual,
}

impl CompareOp {
    pub const ALL: [CompareOp; 6] = [
        CompareOp::LessThan,
        CompareOp::LessThanOrEqual,
        CompareOp::GreaterThan,
        CompareOp::GreaterThanOrEqual,
        CompareOp::Equal,
        CompareOp::NotEqual,
    ];

    pub fn from_params(params: &NodeParams) -> Self {
        let index = params
            .get_int("operation", 0)
            .clamp(0, Self::ALL.len() as i32 - 1);
        Self::ALL[index as usize]
    }

    pub fn index(self) -> i32 {
        Self::ALL.iter().position(|op| *op == self).unwrap_or(0) as i32
    }
}

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Math".to_string(),
        inputs: vec![input("a", PortType::Integer), input("b", PortType::Integer)],
        outputs: vec![output("result", PortType::Boolean)],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("operation".to_string(), ParamValue::Int(0)),
            ("a".to_string(), ParamValue::Int(0)),
            ("b".to_string(), ParamValue::Int(0)),
        ]),
    }
}

pub fn compute(params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    let (a, b) = (inputs.int("a"), inputs.int("b"));
    let result = match CompareOp::from_params(params) {
        CompareOp::LessThan => a < b,
        CompareOp::LessThanOrEqual => a <= b,
        CompareOp::GreaterThan => a > b,
        CompareOp::GreaterThanOrEqual => a >= b,
        CompareOp::Equal => a == b,
        CompareOp::NotEqual => a != b,
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
    fn compares_literals() {
        let mut graph = RuntimeGraph::new();
        let node = add_with(
            &mut graph,
            NodeKind::CompareInteger,
            &[("a", ParamValue::Int(2)), ("b", ParamValue::Int(3))],
        );
        assert_eq!(pull(&graph, node, "result"), PortValue::Boolean(true));
        graph
            .set_param(node, "operation", ParamValue::Int(CompareOp::GreaterThanOrEqual.index()))
            .unwrap();
        assert_eq!(pull(&graph, node, "result"), PortValue::Boolean(false));
    }
}
