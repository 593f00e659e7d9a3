use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::output;
use crate::port_value::PortValue;

pub const NAME: &str = "Integer Value";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Values".to_string(),
        inputs: Vec::new(),
        outputs: vec![output("value", PortType::Integer)],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([("value".to_string(), ParamValue::Int(0))]),
    }
}

pub fn compute(params: &NodeParams, _inputs: &NodeInputs) -> Vec<PortValue> {
    vec![PortValue::Integer(params.get_int("value", 0))]
}
