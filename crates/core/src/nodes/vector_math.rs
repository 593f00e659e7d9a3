use std::collections::BTreeMap;

use glam::Vec3;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{input, output};
use crate::port_value::PortValue;

pub const NAME: &str = "Vector Math";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorMathOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Scale,
    Normalize,
    CrossProduct,
    Project,
    Reflect,
    Absolute,
    Minimum,
    Maximum,
    Length,
    Distance,
    DotProduct,
}

impl VectorMathOp {
    pub const ALL: [VectorMathOp; 15] = [
        VectorMathOp::Add,
        VectorMathOp::Subtract,
        VectorMathOp::Multiply,
        VectorMathOp::Divide,
        VectorMathOp::Scale,
        VectorMathOp::Normalize,
        VectorMathOp::CrossProduct,
        VectorMathOp::Project,
        VectorMathOp::Reflect,
        VectorMathOp::Absolute,
        VectorMathOp::Minimum,
        VectorMathOp::Maximum,
        VectorMathOp::Length,
        VectorMathOp::Distance,
        VectorMathOp::DotProduct,
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

    /// Operations whose result is a scalar.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            VectorMathOp::Length | VectorMathOp::Distance | VectorMathOp::DotProduct
        )
    }
}

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Math".to_string(),
        inputs: vec![
            input("x", PortType::Vector),
            input("y", PortType::Vector),
            input("scale", PortType::Float),
        ],
        outputs: vec![
            output("vector", PortType::Vector),
            output("value", PortType::Float),
        ],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("operation".to_string(), ParamValue::Int(0)),
            ("x".to_string(), ParamValue::Vec3([0.0, 0.0, 0.0])),
            ("y".to_string(), ParamValue::Vec3([0.0, 0.0, 0.0])),
            ("scale".to_string(), ParamValue::Float(1.0)),
        ]),
    }
}

/// Scalar operations fill `value` and leave `vector` at zero; the others
/// fill `vector` and leave `value` at zero.
pub fn compute(params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    let op = VectorMathOp::from_params(params);
    let (x, y) = (inputs.vector("x"), inputs.vector("y"));
    if op.is_scalar() {
        vec![
            PortValue::Vector(Vec3::ZERO),
            PortValue::Float(apply_scalar(op, x, y)),
        ]
    } else {
        vec![
            PortValue::Vector(apply_vector(op, x, y, inputs.float("scale"))),
            PortValue::Float(0.0),
        ]
    }
}

pub fn apply_scalar(op: VectorMathOp, x: Vec3, y: Vec3) -> f32 {
    match op {
        VectorMathOp::Length => x.length(),
        VectorMathOp::Distance => x.distance(y),
        _ => x.dot(y),
    }
}

pub fn apply_vector(op: VectorMathOp, x: Vec3, y: Vec3, scale: f32) -> Vec3 {
    match op {
        VectorMathOp::Add => x + y,
        VectorMathOp::Subtract => x - y,
        VectorMathOp::Multiply => x * y,
        VectorMathOp::Divide => x / y,
        VectorMathOp::Scale => x * scale,
        VectorMathOp::Normalize => x.normalize_or_zero(),
        VectorMathOp::CrossProduct => x.cross(y),
        VectorMathOp::Project => {
            let len_sq = y.length_squared();
            if len_sq == 0.0 {
                Vec3::ZERO
            } else {
                y * (x.dot(y) / len_sq)
            }
        }
        VectorMathOp::Reflect => x - 2.0 * x.dot(y) * y,
        VectorMathOp::Absolute => x.abs(),
        VectorMathOp::Minimum => x.min(y),
        VectorMathOp::Maximum => x.max(y),
        VectorMathOp::Length | VectorMathOp::Distance | VectorMathOp::DotProduct => {
            Vec3::splat(apply_scalar(op, x, y))
        }
    }
}
