use std::collections::BTreeMap;

use crate::curve;
use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{curve_out, curve_value, input};
use crate::port_value::PortValue;

pub const NAME: &str = "Line Curve";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Curves".to_string(),
        inputs: vec![
            input("resolution", PortType::Integer),
            input("start", PortType::Vector),
            input("end", PortType::Vector),
        ],
        outputs: vec![curve_out("curve")],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("resolution".to_string(), ParamValue::Int(1)),
            ("start".to_string(), ParamValue::Vec3([0.0, 0.0, 0.0])),
            ("end".to_string(), ParamValue::Vec3([0.0, 0.0, 1.0])),
        ]),
    }
}

pub fn compute(_params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    vec![curve_value(curve::line_curve(
        inputs.int("resolution"),
        inputs.vector("start"),
        inputs.vector("end"),
    ))]
}
