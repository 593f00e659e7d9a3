use std::collections::BTreeMap;

use tracing::warn;

use crate::eval::NodeInputs;
use crate::geometry::GeometryData;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{
    domain_from_params, empty_geometry, geometry_in, geometry_out, geometry_value, input,
    type_from_params,
};
use crate::port_value::PortValue;

pub const NAME: &str = "Attribute Convert";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Attributes".to_string(),
        inputs: vec![
            geometry_in("geometry"),
            input("attribute", PortType::String),
            input("result", PortType::String),
        ],
        outputs: vec![geometry_out("result")],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("attribute".to_string(), ParamValue::String(String::new())),
            ("result".to_string(), ParamValue::String(String::new())),
            ("domain".to_string(), ParamValue::Int(0)),
            ("type".to_string(), ParamValue::Int(0)),
        ]),
    }
}

/// Copies `attribute` into `result` with a new domain and/or type. Automatic
/// domain and type come from an existing `result`, else from the source.
pub fn compute(params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    let Some(source) = inputs.geometry("geometry") else {
        return vec![empty_geometry()];
    };
    let name = inputs.string("attribute");
    let result_name = inputs.string("result");
    if name.trim().is_empty() || result_name.trim().is_empty() {
        return vec![PortValue::Geometry(source)];
    }
    let Some(stored) = source.get_attribute_any(&name) else {
        warn!("{NAME}: '{}' not found; passing input through", name);
        return vec![PortValue::Geometry(source)];
    };
    let existing = source.get_attribute_any(&result_name);

    let domain = domain_from_params(params, "domain")
        .or(existing.map(|a| a.domain()))
        .unwrap_or(stored.domain());
    let kind = type_from_params(params, "type")
        .or(existing.map(|a| a.kind()))
        .unwrap_or(stored.kind());

    let Some(mut converted) = source.get_attribute(&name, kind, domain) else {
        return vec![PortValue::Geometry(source)];
    };
    converted.set_name(result_name.as_str());

    let mut geometry = GeometryData::clone(&source);
    geometry.remove_attribute(&result_name);
    if let Err(err) = geometry.store_attribute(converted) {
        warn!("{NAME}: cannot store '{}': {}; passing input through", result_name, err);
        return vec![PortValue::Geometry(source)];
    }
    vec![geometry_value(geometry)]
}

#[cfg(test)]
mod tests {
    use crate::attributes::{AttributeDomain, AttributeType};
    use crate::graph::{ParamValue, RuntimeGraph};
    use crate::nodes::test_graph::{add_with, connect, pull};
    use crate::nodes_builtin::NodeKind;
    use crate::port_value::PortValue;

    #[test]
    fn converts_domain_and_type() {
        let mut graph = RuntimeGraph::new();
        let plane = add_with(&mut graph, NodeKind::Plane, &[]);
        let convert = add_with(
            &mut graph,
            NodeKind::AttributeConvert,
            &[
                ("attribute", ParamValue::String("position".to_string())),
                ("result", ParamValue::String("height".to_string())),
                ("domain", ParamValue::Int(3)),
                ("type", ParamValue::Int(3)),
            ],
        );
        connect(&mut graph, plane, "geometry", convert, "geometry");
        let PortValue::Geometry(geometry) = pull(&graph, convert, "result") else {
            panic!("expected geometry");
        };
        let height = geometry.get_attribute_any("height").unwrap();
        assert_eq!(height.domain(), AttributeDomain::Face);
        assert_eq!(height.kind(), AttributeType::Float);
        assert_eq!(height.len(), 2);
    }

    #[test]
    fn automatic_settings_follow_source() {
        let mut graph = RuntimeGraph::new();
        let cube = add_with(&mut graph, NodeKind::Cube, &[]);
        let convert = add_with(
            &mut graph,
            NodeKind::AttributeConvert,
            &[
                ("attribute", ParamValue::String("material_index".to_string())),
                ("result", ParamValue::String("copy".to_string())),
            ],
        );
        connect(&mut graph, cube, "geometry", convert, "geometry");
        let PortValue::Geometry(geometry) = pull(&graph, convert, "result") else {
            panic!("expected geometry");
        };
        let copy = geometry.get_attribute_any("copy").unwrap();
        assert_eq!(copy.domain(), AttributeDomain::Face);
        assert_eq!(copy.kind(), AttributeType::Integer);
    }
}
