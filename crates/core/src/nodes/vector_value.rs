use std::collections::BTreeMap;

use glam::Vec3;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::output;
use crate::port_value::PortValue;

pub const NAME: &str = "Vector Value";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Values".to_string(),
        inputs: Vec::new(),
        outputs: vec![output("value", PortType::Vector)],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([("value".to_string(), ParamValue::Vec3([0.0, 0.0, 0.0]))]),
    }
}

pub fn compute(params: &NodeParams, _inputs: &NodeInputs) -> Vec<PortValue> {
    vec![PortValue::Vector(Vec3::from(params.get_vec3("value", [0.0, 0.0, 0.0])))]
}
