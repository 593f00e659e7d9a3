use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, PortType};
use crate::nodes::{curve_in, output};
use crate::port_value::PortValue;

pub const NAME: &str = "Curve Length";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Curves".to_string(),
        inputs: vec![curve_in("curve")],
        outputs: vec![output("length", PortType::Float)],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::new(),
    }
}

pub fn compute(_params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    let length = inputs.curve("curve").map_or(0.0, |curve| curve.length());
    vec![PortValue::Float(length)]
}
