use std::collections::BTreeMap;

use tracing::debug;

use crate::eval::NodeInputs;
use crate::geometry::{builtin, GeometryData};
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{domain_from_params, empty_geometry, geometry_in, geometry_out, geometry_value, input};
use crate::port_value::PortValue;

pub const NAME: &str = "Attribute Remove";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Attributes".to_string(),
        inputs: vec![geometry_in("geometry"), input("attribute", PortType::String)],
        outputs: vec![geometry_out("result")],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("attribute".to_string(), ParamValue::String(String::new())),
            ("domain".to_string(), ParamValue::Int(0)),
        ]),
    }
}

/// Domain 0 removes the name from every domain. Builtins are never removed.
pub fn compute(params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    let Some(source) = inputs.geometry("geometry") else {
        return vec![empty_geometry()];
    };
    let name = inputs.string("attribute");
    if name.trim().is_empty() || builtin::is_builtin(&name) {
        debug!("{NAME}: refusing to remove '{}'", name);
        return vec![PortValue::Geometry(source)];
    }

    let mut geometry = GeometryData::clone(&source);
    let removed = match domain_from_params(params, "domain") {
        Some(domain) => geometry.remove_attribute_in(&name, domain),
        None => {
            let mut any = false;
            while geometry.remove_attribute(&name) {
                any = true;
            }
            any
        }
    };
    if !removed {
        return vec![PortValue::Geometry(source)];
    }
    vec![geometry_value(geometry)]
}
