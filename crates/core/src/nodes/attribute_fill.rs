use std::collections::BTreeMap;

use glam::Vec3;
use tracing::{debug, warn};

use crate::attributes::{Attribute, AttributeDomain};
use crate::eval::NodeInputs;
use crate::geometry::GeometryData;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{domain_from_params, empty_geometry, geometry_in, geometry_out, geometry_value, input};
use crate::port_value::PortValue;

pub const NAME: &str = "Attribute Fill";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillType {
    Float,
    Integer,
    Vector,
    Boolean,
}

impl FillType {
    pub const ALL: [FillType; 4] = [
        FillType::Float,
        FillType::Integer,
        FillType::Vector,
        FillType::Boolean,
    ];

    fn from_params(params: &NodeParams) -> Self {
        let index = params.get_int("type", 0).clamp(0, Self::ALL.len() as i32 - 1);
        Self::ALL[index as usize]
    }
}

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Attributes".to_string(),
        inputs: vec![
            geometry_in("geometry"),
            input("attribute", PortType::String),
            input("float", PortType::Float),
            input("integer", PortType::Integer),
            input("vector", PortType::Vector),
            input("boolean", PortType::Boolean),
        ],
        outputs: vec![geometry_out("result")],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("attribute".to_string(), ParamValue::String(String::new())),
            ("float".to_string(), ParamValue::Float(0.0)),
            ("integer".to_string(), ParamValue::Int(0)),
            ("vector".to_string(), ParamValue::Vec3([0.0, 0.0, 0.0])),
            ("boolean".to_string(), ParamValue::Bool(false)),
            ("domain".to_string(), ParamValue::Int(0)),
            ("type".to_string(), ParamValue::Int(0)),
        ]),
    }
}

/// Replaces `attribute` with one value per element of the target domain.
/// The automatic domain keeps the existing attribute's domain, else Vertex.
pub fn compute(params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    let Some(source) = inputs.geometry("geometry") else {
        return vec![empty_geometry()];
    };
    let name = inputs.string("attribute");
    if name.trim().is_empty() {
        debug!("{NAME}: no attribute name; passing input through");
        return vec![PortValue::Geometry(source)];
    }

    let domain = domain_from_params(params, "domain").unwrap_or_else(|| {
        source
            .get_attribute_any(&name)
            .map(Attribute::domain)
            .unwrap_or(AttributeDomain::Vertex)
    });
    let count = source.domain_len(domain);
    let attribute = match FillType::from_params(params) {
        FillType::Float => {
            Attribute::from_values(name.as_str(), domain, inputs.floats("float", count))
        }
        FillType::Integer => {
            let values = inputs.values("integer", count);
            Attribute::from_values(name.as_str(), domain, values.iter().map(PortValue::as_int))
        }
        FillType::Vector => {
            let values = inputs.values("vector", count);
            let vectors: Vec<Vec3> = values.iter().map(PortValue::as_vector).collect();
            Attribute::from_values(name.as_str(), domain, vectors)
        }
        FillType::Boolean => {
            let values = inputs.values("boolean", count);
            Attribute::from_values(name.as_str(), domain, values.iter().map(PortValue::as_bool))
        }
    };

    let mut geometry = GeometryData::clone(&source);
    geometry.remove_attribute(&name);
    if let Err(err) = geometry.store_attribute(attribute) {
        warn!("{NAME}: cannot store '{}': {}; passing input through", name, err);
        return vec![PortValue::Geometry(source)];
    }
    vec![geometry_value(geometry)]
}
