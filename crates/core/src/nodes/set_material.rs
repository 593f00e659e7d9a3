use std::collections::BTreeMap;

use tracing::warn;

use crate::attributes::{Attribute, AttributeDomain};
use crate::eval::NodeInputs;
use crate::geometry::{builtin, GeometryData};
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{empty_geometry, geometry_in, geometry_out, geometry_value, input};
use crate::port_value::PortValue;

pub const NAME: &str = "Set Material";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Geometry".to_string(),
        inputs: vec![
            geometry_in("geometry"),
            input("material_index", PortType::Integer),
        ],
        outputs: vec![geometry_out("result")],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([("material_index".to_string(), ParamValue::Int(0))]),
    }
}

/// One index per face, pulled through the multi-value protocol and clamped
/// to zero or above. The submesh count grows to cover the largest index.
pub fn compute(_params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    let Some(source) = inputs.geometry("geometry") else {
        return vec![empty_geometry()];
    };
    let mut geometry = GeometryData::clone(&source);
    let indices: Vec<i32> = inputs
        .values("material_index", geometry.faces.len())
        .iter()
        .map(|value| value.as_int().max(0))
        .collect();
    let highest = indices.iter().copied().max().unwrap_or(0) as usize;

    let attribute = Attribute::from_values(builtin::MATERIAL_INDEX, AttributeDomain::Face, indices);
    if let Err(err) = geometry.store_attribute(attribute) {
        warn!("{NAME}: {err}; passing input through");
        return vec![PortValue::Geometry(source)];
    }
    if !geometry.faces.is_empty() {
        geometry.submesh_count = geometry.submesh_count.max(highest + 1);
    }
    vec![geometry_value(geometry)]
}

#[cfg(test)]
mod tests {
    use crate::attributes::AttributeDomain;
    use crate::graph::{ParamValue, RuntimeGraph};
    use crate::nodes::test_graph::{add_with, connect, pull};
    use crate::nodes_builtin::NodeKind;
    use crate::port_value::PortValue;

    #[test]
    fn fills_and_clamps_material_index() {
        let mut graph = RuntimeGraph::new();
        let plane = add_with(&mut graph, NodeKind::Plane, &[]);
        let set = add_with(&mut graph, NodeKind::SetMaterial, &[("material_index", ParamValue::Int(-4))]);
        connect(&mut graph, plane, "geometry", set, "geometry");
        let PortValue::Geometry(geometry) = pull(&graph, set, "result") else {
            panic!("expected geometry");
        };
        let materials: Vec<i32> = geometry
            .attribute_values("material_index", AttributeDomain::Face)
            .unwrap();
        assert_eq!(materials, vec![0, 0]);

        graph.set_param(set, "material_index", ParamValue::Int(2)).unwrap();
        let PortValue::Geometry(geometry) = pull(&graph, set, "result") else {
            panic!("expected geometry");
        };
        assert_eq!(geometry.submesh_count, 3);
    }

    #[test]
    fn per_face_values_from_random_source() {
        let mut graph = RuntimeGraph::new();
        let plane = add_with(&mut graph, NodeKind::Plane, &[("subdivisions", ParamValue::Int(3))]);
        let random = add_with(
            &mut graph,
            NodeKind::RandomFloat,
            &[("max", ParamValue::Float(4.0)), ("seed", ParamValue::Int(11))],
        );
        let set = add_with(&mut graph, NodeKind::SetMaterial, &[]);
        connect(&mut graph, plane, "geometry", set, "geometry");
        connect(&mut graph, random, "value", set, "material_index");
        let PortValue::Geometry(geometry) = pull(&graph, set, "result") else {
            panic!("expected geometry");
        };
        let materials: Vec<i32> = geometry
            .attribute_values("material_index", AttributeDomain::Face)
            .unwrap();
        assert_eq!(materials.len(), geometry.faces.len());
        assert!(materials.iter().any(|m| *m != materials[0]));
        assert!(materials.iter().all(|m| (0..=4).contains(m)));
    }
}
