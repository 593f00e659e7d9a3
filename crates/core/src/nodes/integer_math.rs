use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::float_math::{smooth_max, smooth_min};
use crate::nodes::{input, output};
use crate::port_value::PortValue;

pub const NAME: &str = "Integer Math";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerMathOp {
    Add,
    Subtract,
    Multiply,
    IntegerDivision,
    FloatDivision,
    Power,
    Logarithm,
    SquareRoot,
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
    Modulo,
    Wrap,
    Snap,
}

impl IntegerMathOp {
    pub const ALL: [IntegerMathOp; 21] = [
        IntegerMathOp::Add,
        IntegerMathOp::Subtract,
        IntegerMathOp::Multiply,
        IntegerMathOp::IntegerDivision,
        IntegerMathOp::FloatDivision,
        IntegerMathOp::Power,
        IntegerMathOp::Logarithm,
        IntegerMathOp::SquareRoot,
        IntegerMathOp::Absolute,
        IntegerMathOp::Exponent,
        IntegerMathOp::Minimum,
        IntegerMathOp::Maximum,
        IntegerMathOp::LessThan,
        IntegerMathOp::GreaterThan,
        IntegerMathOp::Sign,
        IntegerMathOp::Compare,
        IntegerMathOp::SmoothMinimum,
        IntegerMathOp::SmoothMaximum,
        IntegerMathOp::Modulo,
        IntegerMathOp::Wrap,
        IntegerMathOp::Snap,
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
            input("x", PortType::Integer),
            input("y", PortType::Integer),
            input("tolerance", PortType::Float),
            input("extra", PortType::Integer),
        ],
        outputs: vec![output("result", PortType::Integer)],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("operation".to_string(), ParamValue::Int(0)),
            ("x".to_string(), ParamValue::Int(0)),
            ("y".to_string(), ParamValue::Int(0)),
            ("tolerance".to_string(), ParamValue::Float(0.0)),
            ("extra".to_string(), ParamValue::Int(0)),
        ]),
    }
}

pub fn compute(params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    let op = IntegerMathOp::from_params(params);
    let result = apply(
        op,
        inputs.int("x"),
        inputs.int("y"),
        inputs.float("tolerance"),
        inputs.int("extra"),
    );
    vec![PortValue::Integer(result)]
}

/// Integer arithmetic wraps on overflow. Any division or modulo by zero gives 0.
pub fn apply(op: IntegerMathOp, x: i32, y: i32, tolerance: f32, extra: i32) -> i32 {
    match op {
        IntegerMathOp::Add => x.wrapping_add(y),
        IntegerMathOp::Subtract => x.wrapping_sub(y),
        IntegerMathOp::Multiply => x.wrapping_mul(y),
        IntegerMathOp::IntegerDivision => x.checked_div(y).unwrap_or(0),
        IntegerMathOp::FloatDivision => {
            if y == 0 {
                0
            } else {
                (x as f32 / y as f32) as i32
            }
        }
        IntegerMathOp::Power => (x as f64).powf(y as f64) as i32,
        IntegerMathOp::Logarithm => (x as f64).log(y as f64) as i32,
        IntegerMathOp::SquareRoot => (x as f64).sqrt() as i32,
        IntegerMathOp::Absolute => x.wrapping_abs(),
        IntegerMathOp::Exponent => (x as f64).exp() as i32,
        IntegerMathOp::Minimum => x.min(y),
        IntegerMathOp::Maximum => x.max(y),
        IntegerMathOp::LessThan => (x < y) as i32,
        IntegerMathOp::GreaterThan => (x > y) as i32,
        IntegerMathOp::Sign => x.signum(),
        IntegerMathOp::Compare => (x == y) as i32,
        IntegerMathOp::SmoothMinimum => smooth_min(x as f32, y as f32, tolerance) as i32,
        IntegerMathOp::SmoothMaximum => smooth_max(x as f32, y as f32, tolerance) as i32,
        IntegerMathOp::Modulo => x.checked_rem(y).unwrap_or(0),
        IntegerMathOp::Wrap => {
            let range = extra.wrapping_sub(y);
            match x.wrapping_sub(y).checked_rem(range) {
                Some(rem) => (rem.wrapping_add(range) % range).wrapping_add(y),
                None => 0,
            }
        }
        IntegerMathOp::Snap => {
            if y == 0 {
                0
            } else {
                ((x as f32 / y as f32).round() as i32).wrapping_mul(y)
            }
        }
    }
}
