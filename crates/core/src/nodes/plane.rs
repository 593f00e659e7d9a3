use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{geometry_out, geometry_value, input};
use crate::port_value::PortValue;
use crate::primitives;

pub const NAME: &str = "Plane";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Primitives".to_string(),
        inputs: vec![
            input("width", PortType::Float),
            input("height", PortType::Float),
            input("subdivisions", PortType::Integer),
        ],
        outputs: vec![geometry_out("geometry")],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("width".to_string(), ParamValue::Float(1.0)),
            ("height".to_string(), ParamValue::Float(1.0)),
            ("subdivisions".to_string(), ParamValue::Int(0)),
        ]),
    }
}

pub fn compute(_params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    vec![geometry_value(primitives::plane(
        inputs.float("width"),
        inputs.float("height"),
        inputs.int("subdivisions"),
    ))]
}
