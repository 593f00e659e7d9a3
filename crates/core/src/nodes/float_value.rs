use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::output;
use crate::port_value::PortValue;

pub const NAME: &str = "Float Value";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Values".to_string(),
        inputs: Vec::new(),
        outputs: vec![output("value", PortType::Float)],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([("value".to_string(), ParamValue::Float(0.0))]),
    }
}

pub fn compute(params: &NodeParams, _inputs: &NodeInputs) -> Vec<PortValue> {
    vec![PortValue::Float(params.get_float("value", 0.0))]
}
