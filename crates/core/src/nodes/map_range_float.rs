use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{input, output};
use crate::port_value::PortValue;

pub const NAME: &str = "Map Range Float";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Math".to_string(),
        inputs: vec![
            input("value", PortType::Float),
            input("from_min", PortType::Float),
            input("from_max", PortType::Float),
            input("to_min", PortType::Float),
            input("to_max", PortType::Float),
        ],
        outputs: vec![output("result", PortType::Float)],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("value".to_string(), ParamValue::Float(0.0)),
            ("from_min".to_string(), ParamValue::Float(0.0)),
            ("from_max".to_string(), ParamValue::Float(1.0)),
            ("to_min".to_string(), ParamValue::Float(0.0)),
            ("to_max".to_string(), ParamValue::Float(1.0)),
            ("clamp".to_string(), ParamValue::Bool(false)),
        ]),
    }
}

struct MapRange {
    from_min: f32,
    from_max: f32,
    to_min: f32,
    to_max: f32,
    clamp: bool,
}

impl MapRange {
    fn from_inputs(params: &NodeParams, inputs: &NodeInputs) -> Self {
        Self {
            from_min: inputs.float("from_min"),
            from_max: inputs.float("from_max"),
            to_min: inputs.float("to_min"),
            to_max: inputs.float("to_max"),
            clamp: params.get_bool("clamp", false),
        }
    }

    fn apply(&self, value: f32) -> f32 {
        let span = self.from_max - self.from_min;
        let t = if span == 0.0 {
            0.0
        } else {
            (value - self.from_min) / span
        };
        let mapped = self.to_min + t * (self.to_max - self.to_min);
        if self.clamp {
            let (lo, hi) = if self.to_min <= self.to_max {
                (self.to_min, self.to_max)
            } else {
                (self.to_max, self.to_min)
            };
            mapped.clamp(lo, hi)
        } else {
            mapped
        }
    }
}

pub fn compute(params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    let range = MapRange::from_inputs(params, inputs);
    vec![PortValue::Float(range.apply(inputs.float("value")))]
}

/// Maps each upstream value; an unconnected `value` repeats its literal.
pub fn compute_values(
    params: &NodeParams,
    inputs: &NodeInputs,
    _output: usize,
    count: usize,
) -> Vec<PortValue> {
    let range = MapRange::from_inputs(params, inputs);
    inputs
        .floats("value", count)
        .into_iter()
        .map(|value| PortValue::Float(range.apply(value)))
        .collect()
}
