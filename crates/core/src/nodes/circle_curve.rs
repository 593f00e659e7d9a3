use std::collections::BTreeMap;

use crate::curve;
use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{curve_out, curve_value, input};
use crate::port_value::PortValue;

pub const NAME: &str = "Circle Curve";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Curves".to_string(),
        inputs: vec![
            input("resolution", PortType::Integer),
            input("radius", PortType::Float),
        ],
        outputs: vec![curve_out("curve")],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("resolution".to_string(), ParamValue::Int(32)),
            ("radius".to_string(), ParamValue::Float(1.0)),
        ]),
    }
}

pub fn compute(_params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    vec![curve_value(curve::circle_curve(
        inputs.int("resolution"),
        inputs.float("radius"),
    ))]
}
