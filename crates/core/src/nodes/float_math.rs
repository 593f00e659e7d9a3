use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{input, output};
use crate::port_value::PortValue;

pub const NAME: &str = "Float Math";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatMathOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Logarithm,
    SquareRoot,
    InverseSquareRoot,
    Absolute,
    Exponent,
    Minimum,
    Maximum,
    LessThan,
    GreaterThan,
    Sign,
    Compare,
    SmoothMinimum,
    SmoothMaximum,
    Round,
    Floor,
    Ceil,
    Truncate,
    Fraction,
    Modulo,
    Wrap,
    Snap,
    Sine,
    Cosine,
    Tangent,
    Arcsine,
    Arccosine,
    Arctangent,
    Atan2,
    ToRadians,
    ToDegrees,
    Lerp,
}

impl FloatMathOp {
    pub const ALL: [FloatMathOp; 36] = [
        FloatMathOp::Add,
        FloatMathOp::Subtract,
        FloatMathOp::Multiply,
        FloatMathOp::Divide,
        FloatMathOp::Power,
        FloatMathOp::Logarithm,
        FloatMathOp::SquareRoot,
        FloatMathOp::InverseSquareRoot,
        FloatMathOp::Absolute,
        FloatMathOp::Exponent,
        FloatMathOp::Minimum,
        FloatMathOp::Maximum,
        FloatMathOp::LessThan,
        FloatMathOp::GreaterThan,
        FloatMathOp::Sign,
        FloatMathOp::Compare,
        FloatMathOp::SmoothMinimum,
        FloatMathOp::SmoothMaximum,
        FloatMathOp::Round,
        FloatMathOp::Floor,
        FloatMathOp::Ceil,
        FloatMathOp::Truncate,
        FloatMathOp::Fraction,
        FloatMathOp::Modulo,
        FloatMathOp::Wrap,
        FloatMathOp::Snap,
        FloatMathOp::Sine,
        FloatMathOp::Cosine,
        FloatMathOp::Tangent,
        FloatMathOp::Arcsine,
        FloatMathOp::Arccosine,
        FloatMathOp::Arctangent,
        FloatMathOp::Atan2,
        FloatMathOp::ToRadians,
        FloatMathOp::ToDegrees,
        FloatMathOp::Lerp,
    ];

    pub fn from_params(params: &NodeParams) -> Self {
        let index = params
            .get_int("operation", 0)
            .clamp(0, Self::ALL.len() as i32 - 1);
        Self::ALL[index as usize]
    }

    pub fn index(self) -> i32 {
        Self::ALL.iter().position(|op| *op == self).unwrap_or(0) as i32
    }
}

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Math".to_string(),
        inputs: vec![
            input("x", PortType::Float),
            input("y", PortType::Float),
            input("tolerance", PortType::Float),
            input("extra", PortType::Float),
        ],
        outputs: vec![output("result", PortType::Float)],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("operation".to_string(), ParamValue::Int(0)),
            ("x".to_string(), ParamValue::Float(0.0)),
            ("y".to_string(), ParamValue::Float(0.0)),
            ("tolerance".to_string(), ParamValue::Float(0.0)),
            ("extra".to_string(), ParamValue::Float(0.0)),
        ]),
    }
}

pub fn compute(params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    let op = FloatMathOp::from_params(params);
    let result = apply(
        op,
        inputs.float("x"),
        inputs.float("y"),
        inputs.float("tolerance"),
        inputs.float("extra"),
    );
    vec![PortValue::Float(result)]
}

/// IEEE float semantics throughout: division by zero gives infinity.
pub fn apply(op: FloatMathOp, x: f32, y: f32, tolerance: f32, extra: f32) -> f32 {
    match op {
        FloatMathOp::Add => x + y,
        FloatMathOp::Subtract => x - y,
        FloatMathOp::Multiply => x * y,
        FloatMathOp::Divide => x / y,
        FloatMathOp::Power => x.powf(y),
        FloatMathOp::Logarithm => x.log(y),
        FloatMathOp::SquareRoot => x.sqrt(),
        FloatMathOp::InverseSquareRoot => 1.0 / x.sqrt(),
        FloatMathOp::Absolute => x.abs(),
        FloatMathOp::Exponent => x.exp(),
        FloatMathOp::Minimum => x.min(y),
        FloatMathOp::Maximum => x.max(y),
        FloatMathOp::LessThan => bool_to_float(x < y),
        FloatMathOp::GreaterThan => bool_to_float(x > y),
        FloatMathOp::Sign => {
            if x < 0.0 {
                -1.0
            } else if x == 0.0 {
                0.0
            } else {
                1.0
            }
        }
        FloatMathOp::Compare => bool_to_float((x - y).abs() < tolerance),
        FloatMathOp::SmoothMinimum => smooth_min(x, y, tolerance),
        FloatMathOp::SmoothMaximum => smooth_max(x, y, tolerance),
        FloatMathOp::Round => x.round(),
        FloatMathOp::Floor => x.floor(),
        FloatMathOp::Ceil => x.ceil(),
        FloatMathOp::Truncate => x.trunc(),
        FloatMathOp::Fraction => x - x.trunc(),
        FloatMathOp::Modulo => x - y * (x / y).round_ties_even(),
        FloatMathOp::Wrap => wrap(x, y, extra),
        FloatMathOp::Snap => (x / y).round() * y,
        FloatMathOp::Sine => x.sin(),
        FloatMathOp::Cosine => x.cos(),
        FloatMathOp::Tangent => x.tan(),
        FloatMathOp::Arcsine => x.asin(),
        FloatMathOp::Arccosine => x.acos(),
        FloatMathOp::Arctangent => x.atan(),
        FloatMathOp::Atan2 => x.atan2(y),
        FloatMathOp::ToRadians => x.to_radians(),
        FloatMathOp::ToDegrees => x.to_degrees(),
        FloatMathOp::Lerp => x + (y - x) * extra,
    }
}

fn bool_to_float(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Polynomial smooth minimum; `distance` is the blend radius.
pub(crate) fn smooth_min(x: f32, y: f32, distance: f32) -> f32 {
    let h = (0.5 + 0.5 * (y - x) / distance).clamp(0.0, 1.0);
    y + (x - y) * h - distance * h * (1.0 - h)
}

pub(crate) fn smooth_max(x: f32, y: f32, distance: f32) -> f32 {
    smooth_min(x, y, -distance)
}

/// Wraps `x` into `[min, max)`.
pub(crate) fn wrap(x: f32, min: f32, max: f32) -> f32 {
    let range = max - min;
    ((x - min) % range + range) % range + min
}
