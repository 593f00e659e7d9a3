use std::collections::BTreeMap;
use std::sync::Arc;

use crate::curve::CurveData;
use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{curve_in, curve_out, curve_value, input, trs_matrix};
use crate::port_value::PortValue;

pub const NAME: &str = "Transform Curve";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Curves".to_string(),
        inputs: vec![
            curve_in("curve"),
            input("translation", PortType::Vector),
            input("rotation", PortType::Vector),
            input("scale", PortType::Vector),
            input("is_closed", PortType::Boolean),
        ],
        outputs: vec![curve_out("result")],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("translation".to_string(), ParamValue::Vec3([0.0, 0.0, 0.0])),
            ("rotation".to_string(), ParamValue::Vec3([0.0, 0.0, 0.0])),
            ("scale".to_string(), ParamValue::Vec3([1.0, 1.0, 1.0])),
            ("is_closed".to_string(), ParamValue::Bool(false)),
            ("change_closed".to_string(), ParamValue::Bool(false)),
        ]),
    }
}

/// `is_closed` only applies when `change_closed` is set; otherwise the input
/// curve keeps its own closure.
pub fn compute(params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    let Some(source) = inputs.curve("curve") else {
        return vec![PortValue::Curve(Arc::new(CurveData::empty()))];
    };
    let matrix = trs_matrix(
        inputs.vector("translation"),
        inputs.vector("rotation"),
        inputs.vector("scale"),
    );
    let mut curve = CurveData::clone(&source);
    curve.transform(matrix);
    if params.get_bool("change_closed", false) {
        curve.is_closed = inputs.bool("is_closed");
    }
    vec![curve_value(curve)]
}
