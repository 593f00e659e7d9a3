use glam::{Mat4, Vec3};

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, PortType};
use crate::nodes::{empty_geometry, geometry_in, geometry_out, geometry_value, output};
use crate::port_value::PortValue;
use crate::primitives;

pub const NAME: &str = "Bounding Box";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Geometry".to_string(),
        inputs: vec![geometry_in("geometry")],
        outputs: vec![
            output("min", PortType::Vector),
            output("max", PortType::Vector),
            geometry_out("result"),
        ],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams::default()
}

/// Without input geometry both corners are zero and the box is empty.
pub fn compute(_params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    let bounds = inputs
        .geometry("geometry")
        .and_then(|geometry| geometry.bounds());
    let Some(bounds) = bounds else {
        return vec![
            PortValue::Vector(Vec3::ZERO),
            PortValue::Vector(Vec3::ZERO),
            empty_geometry(),
        ];
    };
    let mut shell = primitives::cube(bounds.size());
    shell.transform(Mat4::from_translation(bounds.center()));
    vec![
        PortValue::Vector(bounds.min),
        PortValue::Vector(bounds.max),
        geometry_value(shell),
    ]
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use crate::graph::{ParamValue, RuntimeGraph};
    use crate::nodes::test_graph::{add_with, connect, pull};
    use crate::nodes_builtin::NodeKind;
    use crate::port_value::PortValue;

    #[test]
    fn reports_corners_and_box() {
        let mut graph = RuntimeGraph::new();
        let cube = add_with(&mut graph, NodeKind::Cube, &[("size", ParamValue::Vec3([2.0, 4.0, 6.0]))]);
        let bbox = add_with(&mut graph, NodeKind::BoundingBox, &[]);
        connect(&mut graph, cube, "geometry", bbox, "geometry");

        assert_eq!(pull(&graph, bbox, "min"), PortValue::Vector(Vec3::new(-1.0, -2.0, -3.0)));
        assert_eq!(pull(&graph, bbox, "max"), PortValue::Vector(Vec3::new(1.0, 2.0, 3.0)));
        let PortValue::Geometry(shell) = pull(&graph, bbox, "result") else {
            panic!("expected geometry");
        };
        assert_eq!(shell.vertices.len(), 8);
    }

    #[test]
    fn disconnect_resets_outputs() {
        let mut graph = RuntimeGraph::new();
        let cube = add_with(&mut graph, NodeKind::Cube, &[]);
        let bbox = add_with(&mut graph, NodeKind::BoundingBox, &[]);
        connect(&mut graph, cube, "geometry", bbox, "geometry");
        assert_ne!(pull(&graph, bbox, "max"), PortValue::Vector(Vec3::ZERO));

        let out = graph.output_port(cube, "geometry").unwrap();
        let input = graph.input_port(bbox, "geometry").unwrap();
        assert!(graph.disconnect_between(out, input));

        assert_eq!(pull(&graph, bbox, "min"), PortValue::Vector(Vec3::ZERO));
        assert_eq!(pull(&graph, bbox, "max"), PortValue::Vector(Vec3::ZERO));
        let PortValue::Geometry(shell) = pull(&graph, bbox, "result") else {
            panic!("expected geometry");
        };
        assert!(shell.is_empty());
    }
}
