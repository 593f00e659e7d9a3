use std::sync::Arc;

use glam::Vec3;
use tracing::trace;

use crate::curve::CurveData;
use crate::geometry::GeometryData;
use crate::graph::{ParamValue, PortType};

/// A value flowing through a port. Geometry and curves are shared; clone the
/// inner data before mutating it.
#[derive(Debug, Clone, PartialEq)]
pub enum PortValue {
    Boolean(bool),
    Integer(i32),
    Float(f32),
    Vector(Vec3),
    Geometry(Arc<GeometryData>),
    Curve(Arc<CurveData>),
    Collection(Vec<Arc<GeometryData>>),
    String(String),
}

impl PortValue {
    pub fn default_for(port_type: PortType) -> Self {
        match port_type {
            PortType::Boolean => PortValue::Boolean(false),
            PortType::Integer => PortValue::Integer(0),
            PortType::Any | PortType::Float => PortValue::Float(0.0),
            PortType::Vector => PortValue::Vector(Vec3::ZERO),
            PortType::Geometry => PortValue::Geometry(Arc::new(GeometryData::empty())),
            PortType::Curve => PortValue::Curve(Arc::new(CurveData::empty())),
            PortType::Collection => PortValue::Collection(Vec::new()),
            PortType::String => PortValue::String(String::new()),
        }
    }

    pub fn port_type(&self) -> PortType {
        match self {
            PortValue::Boolean(_) => PortType::Boolean,
            PortValue::Integer(_) => PortType::Integer,
            PortValue::Float(_) => PortType::Float,
            PortValue::Vector(_) => PortType::Vector,
            PortValue::Geometry(_) => PortType::Geometry,
            PortValue::Curve(_) => PortType::Curve,
            PortValue::Collection(_) => PortType::Collection,
            PortValue::String(_) => PortType::String,
        }
    }

    pub fn from_param(param: &ParamValue) -> Self {
        match param {
            ParamValue::Float(v) => PortValue::Float(*v),
            ParamValue::Int(v) => PortValue::Integer(*v),
            ParamValue::Bool(v) => PortValue::Boolean(*v),
            ParamValue::Vec2(v) => PortValue::Vector(Vec3::new(v[0], v[1], 0.0)),
            ParamValue::Vec3(v) => PortValue::Vector(Vec3::from(*v)),
            ParamValue::String(v) => PortValue::String(v.clone()),
        }
    }

    pub fn as_bool(&self) -> bool {
        matches!(convert(self.clone(), PortType::Boolean), PortValue::Boolean(true))
    }

    pub fn as_int(&self) -> i32 {
        match convert(self.clone(), PortType::Integer) {
            PortValue::Integer(v) => v,
            _ => 0,
        }
    }

    pub fn as_float(&self) -> f32 {
        match convert(self.clone(), PortType::Float) {
            PortValue::Float(v) => v,
            _ => 0.0,
        }
    }

    pub fn as_vector(&self) -> Vec3 {
        match convert(self.clone(), PortType::Vector) {
            PortValue::Vector(v) => v,
            _ => Vec3::ZERO,
        }
    }
}

/// Converts `value` for a port of type `to`.
///
/// Scalars convert into each other, scalars broadcast into vectors and
/// vectors narrow to their x component. A collection merges into one
/// geometry. Anything else becomes the default of `to`.
pub fn convert(value: PortValue, to: PortType) -> PortValue {
    if to == PortType::Any || value.port_type() == to {
        return value;
    }
    match (value, to) {
        (PortValue::Boolean(v), PortType::Integer) => PortValue::Integer(v as i32),
        (PortValue::Boolean(v), PortType::Float) => PortValue::Float(if v { 1.0 } else { 0.0 }),
        (PortValue::Boolean(v), PortType::Vector) => {
            PortValue::Vector(if v { Vec3::ONE } else { Vec3::ZERO })
        }
        (PortValue::Integer(v), PortType::Boolean) => PortValue::Boolean(v != 0),
        (PortValue::Integer(v), PortType::Float) => PortValue::Float(v as f32),
        (PortValue::Integer(v), PortType::Vector) => PortValue::Vector(Vec3::splat(v as f32)),
        (PortValue::Float(v), PortType::Boolean) => PortValue::Boolean(v != 0.0),
        (PortValue::Float(v), PortType::Integer) => PortValue::Integer(v as i32),
        (PortValue::Float(v), PortType::Vector) => PortValue::Vector(Vec3::splat(v)),
        (PortValue::Vector(v), PortType::Boolean) => PortValue::Boolean(v.x != 0.0),
        (PortValue::Vector(v), PortType::Integer) => PortValue::Integer(v.x as i32),
        (PortValue::Vector(v), PortType::Float) => PortValue::Float(v.x),
        (PortValue::Collection(items), PortType::Geometry) => {
            let mut merged = GeometryData::empty();
            for item in &items {
                merged.merge_with(item);
            }
            PortValue::Geometry(Arc::new(merged))
        }
        (PortValue::Geometry(geometry), PortType::Collection) => {
            PortValue::Collection(vec![geometry])
        }
        (value, to) => {
            trace!("no conversion from {:?} to {:?}", value.port_type(), to);
            PortValue::default_for(to)
        }
    }
}
