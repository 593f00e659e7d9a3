use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::geometry::GeometryData;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{empty_geometry, geometry_in, geometry_out, geometry_value, input, trs_matrix};
use crate::port_value::PortValue;

pub const NAME: &str = "Transform Geometry";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Geometry".to_string(),
        inputs: vec![
            geometry_in("geometry"),
            input("translation", PortType::Vector),
            input("rotation", PortType::Vector),
            input("scale", PortType::Vector),
        ],
        outputs: vec![geometry_out("result")],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("translation".to_string(), ParamValue::Vec3([0.0, 0.0, 0.0])),
            ("rotation".to_string(), ParamValue::Vec3([0.0, 0.0, 0.0])),
            ("scale".to_string(), ParamValue::Vec3([1.0, 1.0, 1.0])),
        ]),
    }
}

pub fn compute(_params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    let Some(source) = inputs.geometry("geometry") else {
        return vec![empty_geometry()];
    };
    let matrix = trs_matrix(
        inputs.vector("translation"),
        inputs.vector("rotation"),
        inputs.vector("scale"),
    );
    let mut geometry = GeometryData::clone(&source);
    geometry.transform(matrix);
    vec![geometry_value(geometry)]
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use crate::graph::{ParamValue, RuntimeGraph};
    use crate::nodes::test_graph::{add_with, connect, pull};
    use crate::nodes_builtin::NodeKind;
    use crate::port_value::PortValue;

    fn result(graph: &RuntimeGraph, node: crate::graph::NodeId) -> std::sync::Arc<crate::geometry::GeometryData> {
        match pull(graph, node, "result") {
            PortValue::Geometry(geometry) => geometry,
            other => panic!("expected geometry, got {other:?}"),
        }
    }

    #[test]
    fn moves_positions_and_rotates_normals() {
        let mut graph = RuntimeGraph::new();
        let plane = add_with(&mut graph, NodeKind::Plane, &[]);
        let transform = add_with(
            &mut graph,
            NodeKind::TransformGeometry,
            &[
                ("translation", ParamValue::Vec3([0.0, 2.0, 0.0])),
                ("rotation", ParamValue::Vec3([180.0, 0.0, 0.0])),
            ],
        );
        connect(&mut graph, plane, "geometry", transform, "geometry");
        let geometry = result(&graph, transform);
        let bounds = geometry.bounds().unwrap();
        assert!((bounds.center() - Vec3::new(0.0, 2.0, 0.0)).length() < 1.0e-5);
        let normals: Vec<Vec3> = geometry
            .attribute_values("normal", crate::attributes::AttributeDomain::Face)
            .unwrap();
        for normal in normals {
            assert!((normal + Vec3::Y).length() < 1.0e-4);
        }
    }

    #[test]
    fn source_geometry_is_not_mutated() {
        let mut graph = RuntimeGraph::new();
        let cube = add_with(&mut graph, NodeKind::Cube, &[]);
        let transform = add_with(
            &mut graph,
            NodeKind::TransformGeometry,
            &[("scale", ParamValue::Vec3([2.0, 2.0, 2.0]))],
        );
        connect(&mut graph, cube, "geometry", transform, "geometry");
        let scaled = result(&graph, transform);
        let PortValue::Geometry(original) = pull(&graph, cube, "geometry") else {
            panic!("expected geometry");
        };
        assert!((scaled.bounds().unwrap().size() - Vec3::splat(2.0)).length() < 1.0e-5);
        assert!((original.bounds().unwrap().size() - Vec3::ONE).length() < 1.0e-5);
    }

    #[test]
    fn unconnected_input_yields_empty_geometry() {
        let mut graph = RuntimeGraph::new();
        let transform = add_with(&mut graph, NodeKind::TransformGeometry, &[]);
        assert!(result(&graph, transform).is_empty());
    }
}
