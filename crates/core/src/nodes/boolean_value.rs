use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::output;
use crate::port_value::PortValue;

pub const NAME: &str = "Boolean Value";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Values".to_string(),
        inputs: Vec::new(),
        outputs: vec![output("value", PortType::Boolean)],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([("value".to_string(), ParamValue::Bool(false))]),
    }
}

pub fn compute(params: &NodeParams, _inputs: &NodeInputs) -> Vec<PortValue> {
    vec![PortValue::Boolean(params.get_bool("value", false))]
}
