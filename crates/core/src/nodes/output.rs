use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams};
use crate::nodes::{curve_in, geometry_in};
use crate::port_value::PortValue;

pub const NAME: &str = "Output";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Output".to_string(),
        inputs: vec![geometry_in("geometry"), curve_in("curve")],
        outputs: Vec::new(),
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::new(),
    }
}

/// The output node is read through its inputs; see `eval::evaluate_output`.
pub fn compute(_params: &NodeParams, _inputs: &NodeInputs) -> Vec<PortValue> {
    Vec::new()
}
